//! Annotation types
//!
//! The serialized form of [`Annotation`] is the persisted record layout:
//! `{id, text, color, pageIndex, comment, anchor:{top,left,width,height}, createdAt}`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::{Anchor, AnchorRect};

/// Unique identifier of an annotation (UUID v4, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AnnotationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Highlight palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HighlightColor {
    #[default]
    #[serde(rename = "#FFD93D", alias = "#ffd93d")]
    Yellow,
    #[serde(rename = "#4ECDC4", alias = "#4ecdc4")]
    Green,
    #[serde(rename = "#FF8B94", alias = "#ff8b94")]
    Pink,
    #[serde(rename = "#9B89B3", alias = "#9b89b3")]
    Purple,
    #[serde(rename = "#FF6B6B", alias = "#ff6b6b")]
    Orange,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 5] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Pink,
        HighlightColor::Purple,
        HighlightColor::Orange,
    ];

    /// CSS hex value
    pub fn hex(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "#FFD93D",
            HighlightColor::Green => "#4ECDC4",
            HighlightColor::Pink => "#FF8B94",
            HighlightColor::Purple => "#9B89B3",
            HighlightColor::Orange => "#FF6B6B",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "Yellow",
            HighlightColor::Green => "Green",
            HighlightColor::Pink => "Pink",
            HighlightColor::Purple => "Purple",
            HighlightColor::Orange => "Orange",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for colors outside the palette
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown highlight color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for HighlightColor {
    type Err = UnknownColor;

    /// Accepts a palette name or hex value, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        HighlightColor::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle) || c.hex().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A highlighted region with an optional comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    /// Selected text at capture time; never re-derived
    pub text: String,
    pub color: HighlightColor,
    /// Page the anchor belongs to (1-indexed)
    pub page_index: u32,
    /// Free-form note, empty by default
    #[serde(default)]
    pub comment: String,
    /// Region in the unscaled page frame
    pub anchor: AnchorRect,
    /// Absent on records written before timestamps were kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Annotation {
    /// Create a fresh annotation for a captured selection
    pub fn new(text: impl Into<String>, color: HighlightColor, anchor: Anchor) -> Self {
        Self {
            id: AnnotationId::new(),
            text: text.into(),
            color,
            page_index: anchor.page_index,
            comment: String::new(),
            anchor: anchor.rect,
            created_at: Some(Utc::now()),
        }
    }

    /// The anchor including its page
    pub fn page_anchor(&self) -> Anchor {
        Anchor {
            page_index: self.page_index,
            rect: self.anchor,
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.trim().is_empty()
    }
}
