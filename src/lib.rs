//! PDF Annotator
//!
//! Highlight and comment persistence for PDF documents. Annotations are
//! keyed by a content fingerprint of the uploaded file, so they reattach to
//! the exact same document in later sessions regardless of its file name.
//!
//! # Modules
//!
//! - `identity`: SHA-256 document fingerprints and upload validation
//! - `anchor`: scale-independent anchors for text selections
//! - `annotations`: annotation records and the per-document collection
//! - `store`: fingerprint-keyed persistence (in-memory or SQLite)
//! - `controller`: owner of the open document's annotations
//! - `viewport`: zoom level handling
//! - `config`, `telemetry`: environment configuration and tracing setup
//!
//! Rendering is out of scope: the viewer reports page geometry through
//! [`anchor::PageLayout`] and draws the rectangles returned by
//! [`controller::AnnotationController::anchors_for`].

pub mod anchor;
pub mod annotations;
pub mod config;
pub mod controller;
pub mod error;
pub mod identity;
pub mod store;
pub mod telemetry;
pub mod viewport;

pub use anchor::{Anchor, AnchorRect, PageLayout, Rect, ScreenRect, SelectionEvent};
pub use annotations::{Annotation, AnnotationCollection, AnnotationId, HighlightColor};
pub use config::Config;
pub use controller::{AnnotationController, ProjectedHighlight};
pub use error::{AnnotatorError, Result};
pub use identity::{fingerprint, FingerprintId};
pub use store::{AnnotationStore, LoadStatus, MemoryBackend, SqliteBackend, StorageBackend};
