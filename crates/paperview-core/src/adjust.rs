//! Content-bounds adjustment of the scrollable area.

use crate::strategy::CellStrategy;
use crate::transform::PaperTransform;
use crate::viewport::PaperArea;
use kurbo::{Rect, Size, Vec2};

/// Page-aligned logical area covering a content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedBox {
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

/// Snap `bounds` (paper coordinates) outwards to whole pages.
///
/// The result always spans at least one page on each axis.
pub fn compute_adjusted_box(bounds: Rect, page_size: Size) -> AdjustedBox {
    let grid_width = page_size.width;
    let grid_height = page_size.height;

    let left = (bounds.x0 / grid_width).floor();
    let top = (bounds.y0 / grid_height).floor();
    let right = (bounds.x1 / grid_width).ceil();
    let bottom = (bounds.y1 / grid_height).ceil();

    AdjustedBox {
        width: (right - left).max(1.0) * grid_width,
        height: (bottom - top).max(1.0) * grid_height,
        // Subtracting from zero keeps an aligned origin at +0.0.
        origin_x: 0.0 - left * grid_width,
        origin_y: 0.0 - top * grid_height,
    }
}

impl<S: CellStrategy> PaperArea<S> {
    /// Request an area adjustment on the next frame.
    ///
    /// Repeated requests before the frame coalesce into one adjustment.
    pub fn schedule_adjust_area(&mut self) {
        self.adjust.call(());
    }

    /// Adjust the area to the content bounds right away.
    ///
    /// Returns `false` when size, origin and padding were already up to date.
    /// Otherwise the scroll offset is compensated so the content stays put,
    /// and a pan in progress keeps the content under the pointer.
    pub fn force_adjust_area(&mut self) -> bool {
        // A forced run supersedes a pending one.
        self.adjust.dispose();

        let bounds = self.strategy.content_bounds();
        let adjusted = compute_adjusted_box(bounds, self.config.page_size);
        let client = self.layout.area.client_size();
        let previous = self.transform;
        let next = PaperTransform {
            width: adjusted.width,
            height: adjusted.height,
            origin_x: adjusted.origin_x,
            origin_y: adjusted.origin_y,
            scale: previous.scale,
            padding_x: client.width.ceil(),
            padding_y: client.height.ceil(),
        };
        if next == previous {
            return false;
        }

        let scroll_before = self.scroll_offset();
        let compensation = self.scroll_compensation(&next);
        self.transform = next;
        log::debug!(
            "Adjusted paper area to {}x{} at origin ({}, {}), scroll compensation ({:.1}, {:.1})",
            next.width,
            next.height,
            next.origin_x,
            next.origin_y,
            compensation.x,
            compensation.y
        );
        self.scroll_to(scroll_before + compensation);
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.shift_scroll_origin(compensation);
        }
        true
    }

    /// Adjust the area right away, then run `callback`.
    ///
    /// The callback runs whether or not anything changed.
    pub fn force_adjust_area_then(&mut self, callback: impl FnOnce(&mut Self)) {
        self.force_adjust_area();
        callback(self);
    }

    /// Scroll offset shift an adjustment to `next` would apply.
    pub fn scroll_compensation(&self, next: &PaperTransform) -> Vec2 {
        let current = &self.transform;
        (next.origin() - current.origin()) * next.scale + (next.padding() - current.padding())
    }
}
