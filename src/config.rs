//! Configuration management for the annotation core

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context};
use crate::annotations::HighlightColor;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub viewer: ViewerConfig,
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub database_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub scale_step: f64,
    pub default_scale: f64,
    pub default_color: HighlightColor,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            viewer: ViewerConfig::default(),
            log_filter: "pdf_annotator=info".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            kind: StorageKind::Sqlite,
            database_url: "sqlite:./annotations.db".to_string(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            min_scale: 0.5,
            max_scale: 2.0,
            scale_step: 0.1,
            default_scale: 1.0,
            default_color: HighlightColor::Yellow,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and a `.env` file, if any)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are
    /// errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let kind = match lookup("ANNOTATOR_STORAGE").as_deref().map(str::trim) {
            None => defaults.storage.kind,
            Some(v) if v.eq_ignore_ascii_case("memory") => StorageKind::Memory,
            Some(v) if v.eq_ignore_ascii_case("sqlite") => StorageKind::Sqlite,
            Some(other) => bail!("ANNOTATOR_STORAGE must be 'memory' or 'sqlite', got '{other}'"),
        };

        let viewer = ViewerConfig {
            min_scale: parse_var(&lookup, "ANNOTATOR_MIN_SCALE", defaults.viewer.min_scale)?,
            max_scale: parse_var(&lookup, "ANNOTATOR_MAX_SCALE", defaults.viewer.max_scale)?,
            scale_step: parse_var(&lookup, "ANNOTATOR_SCALE_STEP", defaults.viewer.scale_step)?,
            default_scale: parse_var(
                &lookup,
                "ANNOTATOR_DEFAULT_SCALE",
                defaults.viewer.default_scale,
            )?,
            default_color: parse_var(
                &lookup,
                "ANNOTATOR_DEFAULT_COLOR",
                defaults.viewer.default_color,
            )?,
        };
        viewer.validate()?;

        Ok(Config {
            storage: StorageConfig {
                kind,
                database_url: lookup("ANNOTATOR_DATABASE_URL")
                    .unwrap_or(defaults.storage.database_url),
            },
            viewer,
            log_filter: lookup("ANNOTATOR_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

impl ViewerConfig {
    fn validate(&self) -> anyhow::Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !(positive(self.min_scale) && positive(self.max_scale) && positive(self.scale_step)) {
            bail!("scale bounds and step must be positive");
        }
        if self.min_scale > self.max_scale {
            bail!(
                "min scale {} exceeds max scale {}",
                self.min_scale,
                self.max_scale
            );
        }
        if !(self.min_scale..=self.max_scale).contains(&self.default_scale) {
            bail!(
                "default scale {} outside [{}, {}]",
                self.default_scale,
                self.min_scale,
                self.max_scale
            );
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}
