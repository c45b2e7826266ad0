//! Document identity
//!
//! Content-addressed fingerprints for uploaded documents. The fingerprint
//! is the SHA-256 of the raw bytes, so the same file always reattaches to
//! the same annotation set no matter its name or where it was loaded from.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AnnotatorError, Result};

/// PDF header magic
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers tolerate junk before the header; so do we, for headers starting
/// before this offset.
const PDF_MAGIC_SEARCH_WINDOW: usize = 1024;

/// Read buffer for streamed hashing
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Hex-encoded SHA-256 digest of a document's bytes.
///
/// Opaque: only ever compared and used as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintId(String);

impl FingerprintId {
    /// Length of the hex digest
    pub const LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of an in-memory document
pub fn fingerprint(bytes: &[u8]) -> FingerprintId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    FingerprintId(hex::encode(hasher.finalize()))
}

/// Compute the fingerprint of a document without buffering it whole
pub fn fingerprint_reader<R: Read>(mut reader: R) -> Result<FingerprintId> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(AnnotatorError::ReadFailure(e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(FingerprintId(hex::encode(hasher.finalize())))
}

/// Read a document from disk and fingerprint it
pub async fn fingerprint_file(path: impl AsRef<Path>) -> Result<FingerprintId> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to read document");
        AnnotatorError::ReadFailure(e)
    })?;

    Ok(fingerprint(&bytes))
}

/// Reject uploads that are not PDF documents.
///
/// Only the header is inspected; the document is never parsed here.
pub fn ensure_pdf(bytes: &[u8]) -> Result<()> {
    let end = bytes
        .len()
        .min(PDF_MAGIC_SEARCH_WINDOW + PDF_MAGIC.len() - 1);
    let window = &bytes[..end];

    if window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        Ok(())
    } else {
        Err(AnnotatorError::InvalidDocument(
            "missing %PDF- header".to_string(),
        ))
    }
}
