//! Page geometry supplied by the rendering collaborator

use super::types::Rect;

/// What the annotation core needs to know about the rendered document.
///
/// Implemented by whatever draws the pages. All rectangles share the
/// coordinate system of [`SelectionEvent::bounds`](super::SelectionEvent).
pub trait PageLayout {
    /// Number of pages in the loaded document
    fn page_count(&self) -> u32;

    /// Bounding rectangle of a page (1-indexed) at scroll offset zero,
    /// or `None` if the page is not rendered.
    fn page_container(&self, page_index: u32) -> Option<Rect>;

    /// Current vertical scroll offset of the viewer
    fn scroll_top(&self) -> f64;

    /// Render scale currently applied to every page
    fn scale(&self) -> f64;
}

/// Uniformly sized pages stacked vertically in a scrolling viewer.
///
/// Useful for headless callers and tests; a real renderer reports its own
/// geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLayout {
    page_count: u32,
    /// Unscaled page size in points
    page_width: f64,
    page_height: f64,
    /// Space between pages in viewport pixels
    gap: f64,
    /// Viewport position of the first page's top-left corner
    origin_top: f64,
    origin_left: f64,
    scroll_top: f64,
    scale: f64,
}

impl FixedLayout {
    pub fn new(page_count: u32, page_width: f64, page_height: f64) -> Self {
        Self {
            page_count,
            page_width,
            page_height,
            gap: 0.0,
            origin_top: 0.0,
            origin_left: 0.0,
            scroll_top: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_origin(mut self, top: f64, left: f64) -> Self {
        self.origin_top = top;
        self.origin_left = left;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }
}

impl PageLayout for FixedLayout {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_container(&self, page_index: u32) -> Option<Rect> {
        if page_index == 0 || page_index > self.page_count {
            return None;
        }

        let height = self.page_height * self.scale;
        let offset = f64::from(page_index - 1) * (height + self.gap);

        Some(Rect::new(
            self.origin_top + offset,
            self.origin_left,
            self.page_width * self.scale,
            height,
        ))
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scale(&self) -> f64 {
        self.scale
    }
}
