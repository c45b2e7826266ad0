//! Geometry types for selection anchoring

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in viewport (render) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Anchor projected onto the current render scale
pub type ScreenRect = Rect;

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// A rectangle in the unscaled page frame.
///
/// Captured rectangles are divided by the render scale in effect at capture
/// time; multiplying by any later scale re-projects them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Whether the rectangle can be rendered: finite, with positive extent.
    pub fn is_valid(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// A scale-independent location of a highlighted region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    /// Page the region belongs to (1-indexed)
    pub page_index: u32,
    /// Region in the unscaled page frame
    pub rect: AnchorRect,
}

/// A finished text selection as reported by the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    /// Selected text as rendered
    pub text: String,
    /// Bounding rectangle of the selection range, viewport coordinates
    pub bounds: Rect,
    /// Declared index of the page element enclosing the selection start
    pub start_page: Option<u32>,
    /// Declared index of the page element enclosing the selection end
    pub end_page: Option<u32>,
}

impl SelectionEvent {
    /// Selection that starts and ends on the same page
    pub fn on_page(text: impl Into<String>, bounds: Rect, page_index: u32) -> Self {
        Self {
            text: text.into(),
            bounds,
            start_page: Some(page_index),
            end_page: Some(page_index),
        }
    }
}

/// Outcome of a successful capture
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedSelection {
    /// Trimmed snapshot of the selected text
    pub text: String,
    pub anchor: Anchor,
}
