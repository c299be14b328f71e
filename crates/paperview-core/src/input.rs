//! Raw input events consumed by the gesture state machine.
//!
//! Positions are in page coordinates (absolute document space, including the
//! window scroll), as reported by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Main button; also reported for touch contacts and pen tips.
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Control on most platforms, Command on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Kind of device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Host-assigned identifier of an active pointer.
pub type PointerId = i64;

/// Device-level data shared by every pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInfo {
    pub pointer_id: PointerId,
    #[serde(default)]
    pub pointer_type: PointerType,
    #[serde(default)]
    pub button: MouseButton,
    /// Position in page coordinates.
    pub page: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Whether this is the primary pointer of its device type.
    #[serde(default = "default_primary")]
    pub is_primary: bool,
}

fn default_primary() -> bool {
    true
}

impl PointerInfo {
    /// A primary left-button mouse pointer at `page`.
    pub fn mouse(page: Point) -> Self {
        Self {
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            button: MouseButton::Left,
            page,
            modifiers: Modifiers::default(),
            is_primary: true,
        }
    }

    /// A touch contact at `page`; the first contact is primary.
    pub fn touch(pointer_id: PointerId, page: Point, is_primary: bool) -> Self {
        Self {
            pointer_id,
            pointer_type: PointerType::Touch,
            button: MouseButton::Left,
            page,
            modifiers: Modifiers::default(),
            is_primary,
        }
    }

    /// Same pointer moved to `page`.
    pub fn at(self, page: Point) -> Self {
        Self { page, ..self }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
}

/// Pointer event together with the element path it was dispatched on.
///
/// `path` lists the elements under the pointer innermost first; an empty path
/// means the empty canvas area itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput<E> {
    pub pointer: PointerInfo,
    pub path: Vec<E>,
}

impl<E> PointerInput<E> {
    /// Event over the empty canvas area.
    pub fn on_area(pointer: PointerInfo) -> Self {
        Self {
            pointer,
            path: Vec::new(),
        }
    }

    /// Event over `element` (and whatever contains it).
    pub fn on(pointer: PointerInfo, path: Vec<E>) -> Self {
        Self { pointer, path }
    }
}

/// Mouse wheel or trackpad scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    /// Position in page coordinates.
    pub page: Point,
    /// Scroll delta as reported by the platform (positive `y` scrolls down).
    pub delta: Vec2,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelInput {
    /// The signed delta driving zoom, clamped to `[-1, 1]`.
    ///
    /// Uses the vertical component unless it is zero.
    pub fn zoom_delta(&self) -> f64 {
        let delta = if self.delta.y != 0.0 {
            self.delta.y
        } else {
            self.delta.x
        };
        delta.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_info_builders() {
        let pointer = PointerInfo::mouse(Point::new(10.0, 20.0));
        assert_eq!(pointer.pointer_type, PointerType::Mouse);
        assert!(pointer.is_primary);

        let moved = pointer.at(Point::new(15.0, 25.0));
        assert_eq!(moved.pointer_id, pointer.pointer_id);
        assert_eq!(moved.page, Point::new(15.0, 25.0));

        let shifted = pointer.with_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        assert!(shifted.modifiers.shift);
    }

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::default().command());
        assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
        assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    }

    #[test]
    fn test_wheel_zoom_delta() {
        let wheel = |x, y| WheelInput {
            page: Point::ZERO,
            delta: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        };
        assert!((wheel(0.0, 120.0).zoom_delta() - 1.0).abs() < f64::EPSILON);
        assert!((wheel(0.0, -0.5).zoom_delta() + 0.5).abs() < f64::EPSILON);
        assert!((wheel(-3.0, 0.0).zoom_delta() + 1.0).abs() < f64::EPSILON);
        assert!(wheel(0.0, 0.0).zoom_delta().abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_info_deserialize_defaults() {
        let json = r#"{"pointer_id": 3, "page": {"x": 1.0, "y": 2.0}}"#;
        let pointer: PointerInfo = serde_json::from_str(json).unwrap();
        assert_eq!(pointer.pointer_type, PointerType::Mouse);
        assert_eq!(pointer.button, MouseButton::Left);
        assert!(pointer.is_primary);
    }
}
