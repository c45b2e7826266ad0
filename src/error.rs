//! Error types for the annotation core

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Annotation core error type
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Document bytes could not be read
    #[error("Failed to read document: {0}")]
    ReadFailure(#[from] std::io::Error),

    /// Uploaded bytes are not a PDF
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Selection is empty, zero-sized or spans more than one page
    #[error("Empty selection")]
    EmptySelection,

    /// Selection did not originate inside a rendered page
    #[error("Selection is not inside a rendered page")]
    UnresolvedPage,

    /// Scale factor is zero, negative or not finite
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),

    /// Persisting a collection failed; in-memory state is still valid
    #[error("Failed to save annotations: {0}")]
    StorageWriteFailure(String),

    /// Storage backend could not be queried
    #[error("Failed to read annotations: {0}")]
    StorageReadFailure(String),

    /// Stored payload exists but does not match the annotation schema
    #[error("Stored annotations are corrupt: {0}")]
    StorageReadCorrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnnotatorError {
    /// Selection noise that callers are expected to drop without notice.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            AnnotatorError::EmptySelection | AnnotatorError::UnresolvedPage
        )
    }
}
