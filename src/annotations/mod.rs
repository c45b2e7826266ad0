//! Annotation module
//!
//! Highlights with comments, anchored to a page region of a single
//! fingerprinted document.
//!
//! - [`Annotation`]: one highlight record
//! - [`AnnotationCollection`]: the ordered set stored per document, with
//!   schema validation of persisted payloads

mod collection;
mod types;

pub use collection::AnnotationCollection;
pub use types::{Annotation, AnnotationId, HighlightColor, UnknownColor};
