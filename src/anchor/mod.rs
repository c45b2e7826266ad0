//! Selection anchoring
//!
//! Converts a live text selection into a durable anchor and back.
//!
//! A selection arrives in viewport pixels at whatever zoom the viewer is
//! using. [`capture`] rebases it onto the enclosing page (undoing vertical
//! scroll) and divides by the render scale, so the stored [`AnchorRect`] is
//! expressed in the unscaled page frame. [`to_screen_rect`] multiplies back.
//!
//! The renderer itself is an external collaborator, seen only through
//! [`PageLayout`].

mod layout;
mod types;

pub use layout::{FixedLayout, PageLayout};
pub use types::{Anchor, AnchorRect, CapturedSelection, Rect, ScreenRect, SelectionEvent};

use crate::error::{AnnotatorError, Result};

/// Validate a render scale factor
pub fn check_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(AnnotatorError::InvalidScale(scale))
    }
}

/// Normalize a selection rectangle into a scale-independent anchor.
///
/// `page_container` is the page's bounding rectangle at scroll offset zero
/// and `scroll_top` the viewer's current vertical scroll.
pub fn capture(
    selection: &Rect,
    page_container: &Rect,
    scroll_top: f64,
    scale: f64,
    page_index: u32,
) -> Result<Anchor> {
    let scale = check_scale(scale)?;

    if page_index == 0 {
        return Err(AnnotatorError::UnresolvedPage);
    }
    if selection.is_empty() || !selection.is_finite() {
        return Err(AnnotatorError::EmptySelection);
    }

    let top = selection.top + scroll_top - page_container.top;
    let left = selection.left - page_container.left;

    let rect = AnchorRect::new(
        top / scale,
        left / scale,
        selection.width / scale,
        selection.height / scale,
    );

    if !rect.is_valid() {
        return Err(AnnotatorError::EmptySelection);
    }

    Ok(Anchor { page_index, rect })
}

/// Project an anchor onto a render scale. Inverse of the normalization in
/// [`capture`]; `scale` must be positive.
pub fn to_screen_rect(anchor: &AnchorRect, scale: f64) -> ScreenRect {
    debug_assert!(scale.is_finite() && scale > 0.0, "invalid scale {scale}");
    Rect {
        top: anchor.top * scale,
        left: anchor.left * scale,
        width: anchor.width * scale,
        height: anchor.height * scale,
    }
}

/// Resolve a viewer selection against the current layout and capture it.
///
/// Fails with [`AnnotatorError::UnresolvedPage`] when the selection did not
/// start inside a rendered page (e.g. sidebar text) and with
/// [`AnnotatorError::EmptySelection`] when it is blank, zero-sized or
/// crosses a page boundary.
pub fn capture_selection(
    event: &SelectionEvent,
    layout: &dyn PageLayout,
) -> Result<CapturedSelection> {
    let text = event.text.trim();
    if text.is_empty() {
        return Err(AnnotatorError::EmptySelection);
    }

    let page_index = event.start_page.ok_or(AnnotatorError::UnresolvedPage)?;
    if let Some(end) = event.end_page {
        if end != page_index {
            return Err(AnnotatorError::EmptySelection);
        }
    }

    if page_index == 0 || page_index > layout.page_count() {
        return Err(AnnotatorError::UnresolvedPage);
    }
    let container = layout
        .page_container(page_index)
        .ok_or(AnnotatorError::UnresolvedPage)?;

    let anchor = capture(
        &event.bounds,
        &container,
        layout.scroll_top(),
        layout.scale(),
        page_index,
    )?;

    Ok(CapturedSelection {
        text: text.to_string(),
        anchor,
    })
}
