//! Shared fixtures for unit tests.

use crate::events::CanvasEvent;
use crate::gesture::GestureHost;
use crate::options::PaperAreaConfig;
use crate::strategy::CellStrategy;
use crate::viewport::PaperArea;
use kurbo::{Point, Rect, Size};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Element a pointer event can be dispatched on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Part {
    Cell(u32),
    /// Anything inside a cell that is not a cell itself.
    Decoration,
}

#[derive(Debug, Clone, Copy)]
pub struct BoardCell {
    pub position: Point,
    pub movable: bool,
    pub scrollable: bool,
}

/// Strategy over a handful of numbered cells.
#[derive(Debug, Default)]
pub struct Board {
    pub bounds: Rect,
    pub cells: HashMap<u32, BoardCell>,
    /// Cell that `update_move` swaps in, if any.
    pub spawn: Option<u32>,
    pub observed_moves: Vec<(u32, Point)>,
}

impl Board {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn with_cell(mut self, id: u32, position: Point, movable: bool) -> Self {
        self.cells.insert(
            id,
            BoardCell {
                position,
                movable,
                scrollable: false,
            },
        );
        self
    }

    pub fn with_scrollable_cell(mut self, id: u32, position: Point) -> Self {
        self.cells.insert(
            id,
            BoardCell {
                position,
                movable: true,
                scrollable: true,
            },
        );
        self
    }
}

impl CellStrategy for Board {
    type Cell = u32;
    type Element = Part;

    fn content_bounds(&self) -> Rect {
        self.bounds
    }

    fn cell_from_element(&self, element: &Part) -> Option<u32> {
        match element {
            Part::Cell(id) if self.cells.contains_key(id) => Some(*id),
            _ => None,
        }
    }

    fn cell_position(&self, cell: &u32) -> Point {
        self.cells.get(cell).map_or(Point::ZERO, |c| c.position)
    }

    fn set_cell_position(&mut self, cell: &u32, position: Point) {
        if let Some(c) = self.cells.get_mut(cell) {
            c.position = position;
        }
    }

    fn should_move(&self, cell: &u32) -> bool {
        self.cells.get(cell).is_some_and(|c| c.movable)
    }

    fn update_move(&mut self, cell: &u32, position: Point) -> u32 {
        self.observed_moves.push((*cell, position));
        self.spawn.unwrap_or(*cell)
    }

    fn allow_scroll_cell(&self, cell: &u32) -> bool {
        self.cells.get(cell).is_some_and(|c| c.scrollable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Acquire { listen_cancel: bool },
    Release,
    ClearSelection,
    Panning(bool),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: RefCell<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn take(&self) -> Vec<HostCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

impl GestureHost for RecordingHost {
    fn acquire_pointer_listeners(&self, listen_cancel: bool) {
        self.calls
            .borrow_mut()
            .push(HostCall::Acquire { listen_cancel });
    }

    fn release_pointer_listeners(&self) {
        self.calls.borrow_mut().push(HostCall::Release);
    }

    fn clear_text_selection(&self) {
        self.calls.borrow_mut().push(HostCall::ClearSelection);
    }

    fn set_panning(&self, panning: bool) {
        self.calls.borrow_mut().push(HostCall::Panning(panning));
    }
}

/// A mounted 800x600 board at the window's top-left corner.
pub fn mounted_board(
    board: Board,
    config: PaperAreaConfig,
) -> (PaperArea<Board>, Rc<RecordingHost>) {
    let host = Rc::new(RecordingHost::default());
    let mut area = PaperArea::new(board, config, Size::new(800.0, 600.0)).with_host(host.clone());
    area.mount();
    (area, host)
}

/// Collect every non-scroll event emitted by `area`.
pub fn record_events(area: &PaperArea<Board>) -> Rc<RefCell<Vec<CanvasEvent<u32>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    area.events().subscribe(move |event: &CanvasEvent<u32>| {
        if !matches!(event, CanvasEvent::Scroll { .. }) {
            sink.borrow_mut().push(event.clone());
        }
    });
    seen
}

pub fn assert_point_close(a: Point, b: Point, tolerance: f64) {
    assert!(
        (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance,
        "{a:?} != {b:?}"
    );
}
