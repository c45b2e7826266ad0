//! Annotation controller
//!
//! Sole owner of the in-memory annotation collection for the open document.
//! Every mutation is applied in memory first and then the full collection is
//! written back under the document's fingerprint before the call returns,
//! so writes land in mutation order and a document switch can never be
//! overtaken by a stale save.
//!
//! The presentation layer reads state through the accessors and changes it
//! only through the operations here.

use crate::anchor::{self, PageLayout, ScreenRect, SelectionEvent};
use crate::annotations::{Annotation, AnnotationCollection, AnnotationId, HighlightColor};
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::identity::{self, FingerprintId};
use crate::store::{AnnotationStore, LoadStatus};
use crate::viewport::Zoom;

/// An annotation projected for drawing on a page overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedHighlight {
    pub id: AnnotationId,
    pub color: HighlightColor,
    pub rect: ScreenRect,
    pub active: bool,
}

pub struct AnnotationController {
    store: AnnotationStore,
    document: Option<FingerprintId>,
    collection: AnnotationCollection,
    active: Option<AnnotationId>,
    highlight_mode: bool,
    color: HighlightColor,
    zoom: Zoom,
    /// Set while the last write for the open document failed
    unsaved: bool,
}

impl AnnotationController {
    pub fn new(store: AnnotationStore) -> Self {
        Self::with_config(store, &ViewerConfig::default())
    }

    pub fn with_config(store: AnnotationStore, config: &ViewerConfig) -> Self {
        Self {
            store,
            document: None,
            collection: AnnotationCollection::new(),
            active: None,
            highlight_mode: false,
            color: config.default_color,
            zoom: Zoom::new(config),
            unsaved: false,
        }
    }

    // ========================================================================
    // Document lifecycle
    // ========================================================================

    /// Accept an uploaded document and load its annotations.
    ///
    /// Non-PDF content is rejected before anything changes.
    pub async fn open_document(&mut self, bytes: &[u8]) -> Result<FingerprintId> {
        identity::ensure_pdf(bytes)?;
        let fingerprint = identity::fingerprint(bytes);
        self.load_for_document(fingerprint.clone()).await?;
        Ok(fingerprint)
    }

    /// Replace the in-memory collection with the stored one for `fingerprint`.
    ///
    /// Clears the active annotation. If the backend cannot be read, the
    /// current document stays open and unchanged.
    pub async fn load_for_document(&mut self, fingerprint: FingerprintId) -> Result<LoadStatus> {
        let (collection, status) = self.store.load_with_status(&fingerprint).await?;

        tracing::info!(
            fingerprint = %fingerprint,
            annotations = collection.len(),
            status = ?status,
            "Opened document"
        );

        self.document = Some(fingerprint);
        self.collection = collection;
        self.active = None;
        self.unsaved = false;
        Ok(status)
    }

    /// Forget the open document without touching storage
    pub fn close_document(&mut self) {
        self.document = None;
        self.collection = AnnotationCollection::new();
        self.active = None;
        self.unsaved = false;
    }

    pub fn document(&self) -> Option<&FingerprintId> {
        self.document.as_ref()
    }

    // ========================================================================
    // Highlight mode and palette
    // ========================================================================

    pub fn enable_highlight_mode(&mut self) {
        self.highlight_mode = true;
    }

    pub fn disable_highlight_mode(&mut self) {
        self.highlight_mode = false;
    }

    pub fn toggle_highlight_mode(&mut self) -> bool {
        self.highlight_mode = !self.highlight_mode;
        self.highlight_mode
    }

    pub fn is_highlight_mode_enabled(&self) -> bool {
        self.highlight_mode
    }

    /// Color applied to annotations created from now on
    pub fn set_color(&mut self, color: HighlightColor) {
        self.color = color;
    }

    pub fn selected_color(&self) -> HighlightColor {
        self.color
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut Zoom {
        &mut self.zoom
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Turn a finished selection into an annotation.
    ///
    /// Returns `Ok(None)` when highlight mode is off, no document is open, or
    /// the selection is empty or outside a page; such events are ignored.
    /// On a write failure the annotation is still kept (and active).
    pub async fn on_selection(
        &mut self,
        event: &SelectionEvent,
        layout: &(dyn PageLayout + Sync),
    ) -> Result<Option<AnnotationId>> {
        if !self.highlight_mode || self.document.is_none() {
            return Ok(None);
        }

        let captured = match anchor::capture_selection(event, layout) {
            Ok(captured) => captured,
            Err(e) if e.is_benign() => {
                tracing::debug!(reason = %e, "Ignoring selection");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let annotation = Annotation::new(captured.text, self.color, captured.anchor);
        let id = annotation.id;

        tracing::debug!(id = %id, page = annotation.page_index, "Created annotation");

        self.collection.push(annotation);
        self.active = Some(id);
        self.persist().await?;

        Ok(Some(id))
    }

    /// Replace an annotation's comment.
    ///
    /// Unknown ids are a no-op (the annotation may have just been deleted).
    /// An unchanged comment is only written when an earlier save failed.
    /// Returns whether the annotation exists.
    pub async fn edit_comment(&mut self, id: AnnotationId, comment: &str) -> Result<bool> {
        match self.collection.get(id) {
            None => return Ok(false),
            Some(existing) if existing.comment == comment && !self.unsaved => return Ok(true),
            Some(_) => {}
        }

        self.collection.set_comment(id, comment);
        self.persist().await?;
        Ok(true)
    }

    /// Remove an annotation. Returns whether it existed.
    pub async fn delete(&mut self, id: AnnotationId) -> Result<bool> {
        if self.collection.remove(id).is_none() {
            return Ok(false);
        }

        if self.active == Some(id) {
            self.active = None;
        }

        tracing::debug!(id = %id, "Deleted annotation");
        self.persist().await?;
        Ok(true)
    }

    /// Point the side panel at an annotation, or at nothing.
    ///
    /// Unknown ids clear the pointer.
    pub fn set_active(&mut self, id: Option<AnnotationId>) {
        self.active = id.filter(|id| self.collection.contains(*id));
    }

    /// Whether the last write for the open document failed
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    async fn persist(&mut self) -> Result<()> {
        let Some(fingerprint) = self.document.as_ref() else {
            return Ok(());
        };
        let result = self.store.save(fingerprint, &self.collection).await;
        self.unsaved = result.is_err();
        result
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn annotations(&self) -> &AnnotationCollection {
        &self.collection
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.collection.get(id)
    }

    pub fn active_annotation_id(&self) -> Option<AnnotationId> {
        self.active
    }

    pub fn active_annotation(&self) -> Option<&Annotation> {
        self.active.and_then(|id| self.collection.get(id))
    }

    /// Overlays for a page at the current zoom
    pub fn anchors_for(&self, page_index: u32) -> Vec<ProjectedHighlight> {
        self.project(page_index, self.zoom.scale())
    }

    /// Overlays for a page at an explicit render scale
    pub fn anchors_at(&self, page_index: u32, scale: f64) -> Result<Vec<ProjectedHighlight>> {
        let scale = anchor::check_scale(scale)?;
        Ok(self.project(page_index, scale))
    }

    fn project(&self, page_index: u32, scale: f64) -> Vec<ProjectedHighlight> {
        self.collection
            .on_page(page_index)
            .map(|a| ProjectedHighlight {
                id: a.id,
                color: a.color,
                rect: anchor::to_screen_rect(&a.anchor, scale),
                active: self.active == Some(a.id),
            })
            .collect()
    }
}

impl std::fmt::Debug for AnnotationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationController")
            .field("document", &self.document)
            .field("annotations", &self.collection.len())
            .field("active", &self.active)
            .field("highlight_mode", &self.highlight_mode)
            .field("color", &self.color)
            .field("zoom", &self.zoom)
            .field("unsaved", &self.unsaved)
            .finish()
    }
}
