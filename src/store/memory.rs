//! In-process storage backend

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::StorageBackend;
use crate::error::{AnnotatorError, Result};

/// Payloads kept in a map for the lifetime of the process.
///
/// An optional byte quota mirrors browser-style local storage limits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses writes which would push total usage past `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently stored (keys and payloads)
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn write(&self, key: &str, payload: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + payload.len();
            if needed > quota {
                return Err(AnnotatorError::StorageWriteFailure(format!(
                    "quota exceeded: {needed} of {quota} bytes"
                )));
            }
        }

        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
