//! Coordinate spaces and conversions between them.
//!
//! Four spaces are involved:
//! - *paper*: logical content coordinates;
//! - *pane*: the scrollable pane, `pane = (paper + origin) * scale`;
//! - *client*: viewport-local pixels, `client = pane - scroll + padding`;
//! - *page*: document space, `page = client + client_rect.origin + window_scroll`.
//!
//! [`CanvasMetrics`] implements every conversion once on top of four accessors.
//! [`LiveMetrics`] reads them from a running viewport; [`MetricsSnapshot`]
//! freezes them so multi-event gesture math keeps a stable reference frame.

use crate::error::ViewportError;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Transformation between paper and scrollable pane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperTransform {
    /// Page-aligned logical width of the scrollable area, in paper units.
    pub width: f64,
    /// Page-aligned logical height of the scrollable area, in paper units.
    pub height: f64,
    /// Shift making paper coordinates non-negative in pane space.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Paper to pane zoom factor; always positive.
    pub scale: f64,
    /// Extra scroll room on each side, equal to the viewport client size.
    pub padding_x: f64,
    pub padding_y: f64,
}

impl PaperTransform {
    /// Unscaled transform covering `size` with no origin shift or padding.
    pub fn with_size(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            origin_x: 0.0,
            origin_y: 0.0,
            scale: 1.0,
            padding_x: 0.0,
            padding_y: 0.0,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.origin_x, self.origin_y)
    }

    pub fn padding(&self) -> Vec2 {
        Vec2::new(self.padding_x, self.padding_y)
    }

    pub fn pane_from_paper(&self, paper: Point) -> Point {
        Point::new(
            (paper.x + self.origin_x) * self.scale,
            (paper.y + self.origin_y) * self.scale,
        )
    }

    pub fn paper_from_pane(&self, pane: Point) -> Point {
        Point::new(
            pane.x / self.scale - self.origin_x,
            pane.y / self.scale - self.origin_y,
        )
    }

    /// Paper-space rectangle covered by the logical area.
    pub fn paper_rect(&self) -> Rect {
        Rect::from_origin_size((-self.origin_x, -self.origin_y), (self.width, self.height))
    }

    /// Scrollable pane size including padding on both sides.
    pub fn total_pane_size(&self) -> Size {
        Size::new(
            self.width * self.scale + self.padding_x * 2.0,
            self.height * self.scale + self.padding_y * 2.0,
        )
    }

    /// Top-left corner of the scrollable pane in pane coordinates.
    pub fn pane_top_left(&self) -> Point {
        Point::new(-self.padding_x, -self.padding_y)
    }

    /// SVG `transform` attribute mapping paper to pane coordinates.
    pub fn svg_transform(&self) -> String {
        format!(
            "scale({s},{s})translate({},{})",
            self.origin_x,
            self.origin_y,
            s = self.scale
        )
    }

    /// CSS `transform` property mapping paper to pane coordinates.
    pub fn css_transform(&self) -> String {
        format!(
            "scale({s},{s})translate({}px,{}px)",
            self.origin_x,
            self.origin_y,
            s = self.scale
        )
    }
}

/// Sizes and scroll position of the viewport's scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaMetrics {
    pub client_width: f64,
    pub client_height: f64,
    /// Outer size including scrollbars and borders.
    pub offset_width: f64,
    pub offset_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl AreaMetrics {
    pub fn client_size(&self) -> Size {
        Size::new(self.client_width, self.client_height)
    }

    pub fn scroll_offset(&self) -> Vec2 {
        Vec2::new(self.scroll_left, self.scroll_top)
    }
}

/// Placement of the viewport in the host window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportLayout {
    pub area: AreaMetrics,
    /// Bounding box of the viewport relative to the window's visible region.
    pub client_rect: Rect,
    /// Window scroll offset.
    pub window_scroll: Vec2,
}

impl ViewportLayout {
    /// Layout of a viewport of `client_size` at the window's top-left corner.
    pub fn with_client_size(client_size: Size) -> Self {
        let mut layout = Self::default();
        layout.set_client_size(client_size);
        layout
    }

    pub fn set_client_size(&mut self, size: Size) {
        self.area.client_width = size.width;
        self.area.client_height = size.height;
        self.area.offset_width = size.width;
        self.area.offset_height = size.height;
        self.client_rect = Rect::from_origin_size(self.client_rect.origin(), size);
    }

    /// Scroll the area as a native container would: clamped to the pane.
    ///
    /// Returns `true` if the offset changed.
    pub fn scroll_to(&mut self, offset: Vec2, transform: &PaperTransform) -> bool {
        let pane = transform.total_pane_size();
        let max_left = (pane.width - self.area.client_width).max(0.0);
        let max_top = (pane.height - self.area.client_height).max(0.0);
        let left = offset.x.clamp(0.0, max_left);
        let top = offset.y.clamp(0.0, max_top);
        let changed = left != self.area.scroll_left || top != self.area.scroll_top;
        self.area.scroll_left = left;
        self.area.scroll_top = top;
        changed
    }
}

/// Viewport size and transformation with conversions between spaces.
pub trait CanvasMetrics {
    fn layout(&self) -> ViewportLayout;

    fn transform(&self) -> PaperTransform;

    fn area(&self) -> AreaMetrics {
        self.layout().area
    }

    /// An immutable copy that never changes even if the viewport does.
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            layout: self.layout(),
            transform: self.transform(),
        }
    }

    /// Logical area size divided by the scale.
    fn paper_size(&self) -> Size {
        let t = self.transform();
        Size::new(t.width / t.scale, t.height / t.scale)
    }

    /// Viewport bounds in page coordinates.
    fn viewport_page_rect(&self) -> Rect {
        let layout = self.layout();
        layout.client_rect + layout.window_scroll
    }

    fn page_to_client(&self, page: Point) -> Point {
        page - self.viewport_page_rect().origin().to_vec2()
    }

    fn client_to_page(&self, client: Point) -> Point {
        client + self.viewport_page_rect().origin().to_vec2()
    }

    fn page_to_paper(&self, page: Point) -> Point {
        self.client_to_paper(self.page_to_client(page))
    }

    fn paper_to_page(&self, paper: Point) -> Point {
        self.client_to_page(self.pane_to_client(self.paper_to_pane(paper)))
    }

    fn client_to_paper(&self, client: Point) -> Point {
        self.pane_to_paper(self.client_to_pane(client))
    }

    fn paper_to_client(&self, paper: Point) -> Point {
        self.pane_to_client(self.paper_to_pane(paper))
    }

    fn client_to_pane(&self, client: Point) -> Point {
        let scroll = self.area().scroll_offset();
        client + scroll - self.transform().padding()
    }

    fn pane_to_client(&self, pane: Point) -> Point {
        let scroll = self.area().scroll_offset();
        pane - scroll + self.transform().padding()
    }

    fn pane_to_paper(&self, pane: Point) -> Point {
        self.transform().paper_from_pane(pane)
    }

    fn paper_to_pane(&self, paper: Point) -> Point {
        self.transform().pane_from_paper(paper)
    }

    /// Paper point under the viewport's center.
    fn viewport_center(&self) -> Point {
        let size = self.area().client_size();
        self.client_to_paper(Point::new(size.width / 2.0, size.height / 2.0))
    }
}

/// Metrics reading from a running viewport.
#[derive(Debug, Clone, Copy)]
pub struct LiveMetrics<'a> {
    layout: &'a ViewportLayout,
    transform: &'a PaperTransform,
}

impl<'a> LiveMetrics<'a> {
    pub(crate) fn new(layout: &'a ViewportLayout, transform: &'a PaperTransform) -> Self {
        Self { layout, transform }
    }
}

impl CanvasMetrics for LiveMetrics<'_> {
    fn layout(&self) -> ViewportLayout {
        *self.layout
    }

    fn transform(&self) -> PaperTransform {
        *self.transform
    }
}

/// Frozen metrics captured by [`CanvasMetrics::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub layout: ViewportLayout,
    pub transform: PaperTransform,
}

impl CanvasMetrics for MetricsSnapshot {
    fn layout(&self) -> ViewportLayout {
        self.layout
    }

    fn transform(&self) -> PaperTransform {
        self.transform
    }

    fn snapshot(&self) -> MetricsSnapshot {
        *self
    }
}

/// Size and transform for an SVG layer rendered in paper coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLayer {
    pub width: f64,
    pub height: f64,
    /// Value for the inner group's `transform` attribute.
    pub transform: String,
}

/// Transform context handed to content layers.
///
/// Layers rendered outside a canvas get a detached context; asking it for a
/// transform is a usage error rather than a silent identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerContext {
    transform: Option<PaperTransform>,
}

impl LayerContext {
    pub fn new(transform: PaperTransform) -> Self {
        Self {
            transform: Some(transform),
        }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn transform(&self, layer: &'static str) -> Result<PaperTransform, ViewportError> {
        self.transform
            .ok_or(ViewportError::MissingTransformContext { layer })
    }

    pub fn svg_layer(&self) -> Result<SvgLayer, ViewportError> {
        let t = self.transform("SVG")?;
        Ok(SvgLayer {
            width: t.width * t.scale,
            height: t.height * t.scale,
            transform: t.svg_transform(),
        })
    }

    /// CSS transform for an HTML layer.
    pub fn html_layer(&self) -> Result<String, ViewportError> {
        Ok(self.transform("HTML")?.css_transform())
    }
}
