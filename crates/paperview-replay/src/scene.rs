//! Content strategy over the cells declared by a script.

use crate::script::CellSpec;
use kurbo::{Point, Rect};
use paperview_core::CellStrategy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneCell {
    pub id: String,
    pub rect: Rect,
    pub movable: bool,
    pub scrollable: bool,
}

/// Rectangular cells addressed by id. Elements are cell ids as well.
#[derive(Debug, Default)]
pub struct SceneStrategy {
    cells: Vec<SceneCell>,
}

impl SceneStrategy {
    pub fn new(specs: &[CellSpec]) -> Self {
        let cells = specs
            .iter()
            .map(|spec| SceneCell {
                id: spec.id.clone(),
                rect: spec.rect,
                movable: spec.movable,
                scrollable: spec.scrollable,
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[SceneCell] {
        &self.cells
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn get(&self, id: &str) -> Option<&SceneCell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut SceneCell> {
        self.cells.iter_mut().find(|cell| cell.id == id)
    }
}

impl CellStrategy for SceneStrategy {
    type Cell = String;
    type Element = String;

    fn content_bounds(&self) -> Rect {
        self.cells
            .iter()
            .map(|cell| cell.rect)
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    fn cell_from_element(&self, element: &String) -> Option<String> {
        self.get(element).map(|cell| cell.id.clone())
    }

    fn cell_position(&self, cell: &String) -> Point {
        self.get(cell).map_or(Point::ZERO, |c| c.rect.origin())
    }

    fn set_cell_position(&mut self, cell: &String, position: Point) {
        if let Some(c) = self.get_mut(cell) {
            c.rect = c.rect.with_origin(position);
        }
    }

    fn should_move(&self, cell: &String) -> bool {
        self.get(cell).is_some_and(|c| c.movable)
    }

    fn update_move(&mut self, cell: &String, _position: Point) -> String {
        cell.clone()
    }

    fn allow_scroll_cell(&self, cell: &String) -> bool {
        self.get(cell).is_some_and(|c| c.scrollable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, rect: Rect, movable: bool) -> CellSpec {
        CellSpec {
            id: id.to_string(),
            rect,
            movable,
            scrollable: false,
        }
    }

    #[test]
    fn test_content_bounds_is_union() {
        let scene = SceneStrategy::new(&[
            spec("a", Rect::new(0.0, 0.0, 10.0, 10.0), true),
            spec("b", Rect::new(-5.0, 20.0, 3.0, 30.0), false),
        ]);
        assert_eq!(scene.content_bounds(), Rect::new(-5.0, 0.0, 10.0, 30.0));
        assert_eq!(SceneStrategy::default().content_bounds(), Rect::ZERO);
    }

    #[test]
    fn test_move_keeps_size() {
        let mut scene = SceneStrategy::new(&[spec("a", Rect::new(0.0, 0.0, 10.0, 20.0), true)]);
        scene.set_cell_position(&"a".to_string(), Point::new(5.0, 5.0));
        assert_eq!(scene.cells()[0].rect, Rect::new(5.0, 5.0, 15.0, 25.0));
        assert!(scene.should_move(&"a".to_string()));
        assert!(!scene.should_move(&"missing".to_string()));
    }
}
