//! Annotation persistence
//!
//! [`AnnotationStore`] keeps one serialized [`AnnotationCollection`] per
//! document fingerprint on top of a raw key/value [`StorageBackend`].
//! Payloads are validated on the way in; a corrupt record reads as an
//! empty collection (logged) rather than failing the document open.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::annotations::AnnotationCollection;
use crate::config::{StorageConfig, StorageKind};
use crate::error::{AnnotatorError, Result};
use crate::identity::FingerprintId;

/// Prefix of every storage key
pub const KEY_PREFIX: &str = "pdf-annotations-";

/// Storage key for a document's annotations
pub fn storage_key(fingerprint: &FingerprintId) -> String {
    format!("{KEY_PREFIX}{fingerprint}")
}

/// Local key/value storage for serialized payloads.
///
/// Writes must be all-or-nothing: a failed `write` leaves the previous
/// payload for that key untouched.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Fetch the payload stored under `key`
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the payload stored under `key`
    async fn write(&self, key: &str, payload: &str) -> Result<()>;
}

/// How a load was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// A valid payload was stored
    Found,
    /// Nothing stored for this document yet
    NotFound,
    /// A payload was stored but failed validation and was ignored
    Corrupt,
}

/// Fingerprint-keyed annotation persistence
#[derive(Clone)]
pub struct AnnotationStore {
    backend: Arc<dyn StorageBackend>,
}

impl AnnotationStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Load the collection for a document.
    ///
    /// Missing and corrupt payloads both yield an empty collection. Only an
    /// unreachable backend is an error.
    pub async fn load(&self, fingerprint: &FingerprintId) -> Result<AnnotationCollection> {
        self.load_with_status(fingerprint)
            .await
            .map(|(collection, _)| collection)
    }

    /// Like [`load`](Self::load), also reporting how the result was obtained
    pub async fn load_with_status(
        &self,
        fingerprint: &FingerprintId,
    ) -> Result<(AnnotationCollection, LoadStatus)> {
        let key = storage_key(fingerprint);

        let payload = self.backend.read(&key).await.map_err(|e| {
            tracing::error!(fingerprint = %fingerprint, error = %e, "Failed to read annotations");
            match e {
                AnnotatorError::StorageReadFailure(_) => e,
                other => AnnotatorError::StorageReadFailure(other.to_string()),
            }
        })?;

        let Some(payload) = payload else {
            tracing::debug!(fingerprint = %fingerprint, "No stored annotations");
            return Ok((AnnotationCollection::new(), LoadStatus::NotFound));
        };

        match AnnotationCollection::from_json(&payload) {
            Ok(collection) => {
                tracing::debug!(
                    fingerprint = %fingerprint,
                    count = collection.len(),
                    "Loaded annotations"
                );
                Ok((collection, LoadStatus::Found))
            }
            Err(e) => {
                tracing::warn!(
                    fingerprint = %fingerprint,
                    payload_bytes = payload.len(),
                    error = %e,
                    "Stored annotations are corrupt, starting with an empty set"
                );
                Ok((AnnotationCollection::new(), LoadStatus::Corrupt))
            }
        }
    }

    /// Overwrite the stored collection for a document
    pub async fn save(
        &self,
        fingerprint: &FingerprintId,
        collection: &AnnotationCollection,
    ) -> Result<()> {
        let key = storage_key(fingerprint);

        let result = match collection.to_json() {
            Ok(payload) => self.backend.write(&key, &payload).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            tracing::error!(fingerprint = %fingerprint, error = %e, "Failed to save annotations");
            match e {
                AnnotatorError::StorageWriteFailure(_) => e,
                other => AnnotatorError::StorageWriteFailure(other.to_string()),
            }
        })?;

        tracing::debug!(
            fingerprint = %fingerprint,
            count = collection.len(),
            "Saved annotations"
        );
        Ok(())
    }
}

/// Open the backend selected by configuration
pub async fn open(config: &StorageConfig) -> Result<AnnotationStore> {
    match config.kind {
        StorageKind::Memory => Ok(AnnotationStore::new(MemoryBackend::new())),
        StorageKind::Sqlite => {
            let backend = SqliteBackend::connect(&config.database_url).await?;
            tracing::info!(url = %config.database_url, "Annotation database initialized");
            Ok(AnnotationStore::new(backend))
        }
    }
}
