//! Content strategy: the viewport's window into the rendered content.

use kurbo::{Point, Rect};

/// Capability interface to the content rendered inside the viewport.
///
/// The viewport never owns cells; it only threads them through gesture
/// handling and events.
pub trait CellStrategy {
    /// Logical content item (node, link, ...).
    type Cell: Clone;
    /// Host element a pointer event may be dispatched on.
    type Element;

    /// Bounding box of all content in paper coordinates.
    fn content_bounds(&self) -> Rect;

    /// Cell rendered by `element`, if any.
    fn cell_from_element(&self, element: &Self::Element) -> Option<Self::Cell>;

    /// Current paper position of a cell.
    fn cell_position(&self, cell: &Self::Cell) -> Point;

    fn set_cell_position(&mut self, cell: &Self::Cell, position: Point);

    /// Whether dragging the cell should move it.
    fn should_move(&self, cell: &Self::Cell) -> bool;

    /// Observe a non-moving drag over `cell` at paper `position`.
    ///
    /// Returns the cell the gesture should target from now on, which lets
    /// click-drag-to-create interactions swap in a newly created cell.
    fn update_move(&mut self, cell: &Self::Cell, position: Point) -> Self::Cell;

    /// Whether a scrollable element inside `cell` keeps native scrolling,
    /// aborting any drag in progress.
    fn allow_scroll_cell(&self, cell: &Self::Cell) -> bool;

    /// First cell along an element path, innermost element first.
    fn find_cell<'a>(&self, path: impl IntoIterator<Item = &'a Self::Element>) -> Option<Self::Cell>
    where
        Self::Element: 'a,
    {
        path.into_iter()
            .find_map(|element| self.cell_from_element(element))
    }
}

/// Strategy for a viewport without content.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyStrategy;

impl CellStrategy for EmptyStrategy {
    type Cell = ();
    type Element = ();

    fn content_bounds(&self) -> Rect {
        Rect::ZERO
    }

    fn cell_from_element(&self, _element: &()) -> Option<()> {
        None
    }

    fn cell_position(&self, _cell: &()) -> Point {
        Point::ZERO
    }

    fn set_cell_position(&mut self, _cell: &(), _position: Point) {}

    fn should_move(&self, _cell: &()) -> bool {
        false
    }

    fn update_move(&mut self, _cell: &(), _position: Point) {}

    fn allow_scroll_cell(&self, _cell: &()) -> bool {
        false
    }
}
