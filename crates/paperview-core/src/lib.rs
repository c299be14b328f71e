//! PaperView Core Library
//!
//! Headless engine for a scrollable, zoomable paper area: coordinate spaces,
//! camera moves with frame-driven animation, page-snapped content bounds and
//! pointer gestures. The embedder reports input, layout and frame ticks; the
//! engine answers with scroll offsets, transforms and canvas events.

pub mod adjust;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod options;
pub mod scheduler;
pub mod strategy;
pub mod transform;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use adjust::{AdjustedBox, compute_adjusted_box};
pub use error::ViewportError;
pub use events::{CanvasEvent, EventSource, ListenerId};
pub use gesture::{GestureHost, GesturePhase, NoopGestureHost, PinchOrigin};
pub use input::{
    Modifiers, MouseButton, PointerId, PointerInfo, PointerInput, PointerType, WheelInput,
};
pub use options::{
    CenterToOptions, PaperAreaConfig, PointerMode, ScaleOptions, ViewportOptions, ZoomOptions,
};
pub use scheduler::{Debouncer, Timeout, Transition};
pub use strategy::{CellStrategy, EmptyStrategy};
pub use transform::{CanvasMetrics, LayerContext, MetricsSnapshot, PaperTransform};
pub use viewport::{PaperArea, ViewportState};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Instant;
    use crate::testing::{Board, assert_point_close, mounted_board};
    use kurbo::{Point, Rect, Vec2};
    use std::time::Duration;

    #[test]
    fn test_scale_clamps_to_max_from_origin() {
        let (mut area, _) = mounted_board(Board::new(Rect::ZERO), PaperAreaConfig::default());
        area.center_to(Some(Point::ZERO), CenterToOptions::default());
        assert!((area.scale() - 1.0).abs() < f64::EPSILON);
        assert_point_close(area.viewport_state().center, Point::ZERO, 1e-9);

        area.set_scale(5.0, ScaleOptions::default());
        assert!((area.scale() - 2.0).abs() < f64::EPSILON);
        assert_eq!(area.viewport_state().scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_zoom_to_fit_small_content() {
        let board = Board::new(Rect::from_origin_size((100.0, 100.0), (50.0, 50.0)));
        let (mut area, _) = mounted_board(board, PaperAreaConfig::default());
        area.zoom_to_fit(ViewportOptions::default());

        let state = area.viewport_state();
        assert_point_close(state.center, Point::new(125.0, 125.0), 1e-9);
        assert!(state.scale.x <= area.zoom_options().max_fit);
    }

    #[test]
    fn test_pan_gesture_end_to_end() {
        let board = Board::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let (mut area, _) = mounted_board(board, PaperAreaConfig::default());
        let start = area.scroll_offset();
        area.pointer_down(&PointerInput::on_area(PointerInfo::mouse(Point::new(100.0, 100.0))));
        area.pointer_move(PointerInfo::mouse(Point::new(110.0, 105.0)));
        area.pointer_up(PointerInfo::mouse(Point::new(110.0, 105.0)));
        assert_eq!(start - area.scroll_offset(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_animated_fit_after_content_grows() {
        let board = Board::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let (mut area, _) = mounted_board(board, PaperAreaConfig::default());
        area.strategy_mut().bounds = Rect::new(-2000.0, 0.0, 100.0, 100.0);
        area.schedule_adjust_area();

        let transition = area.zoom_to_fit(ViewportOptions::animated());
        let t0 = Instant::now();
        area.on_frame(t0);
        assert!((area.transform().origin_x - 3000.0).abs() < f64::EPSILON);

        area.on_frame(t0 + Duration::from_millis(250));
        assert!(!transition.is_finished());
        area.on_frame(t0 + Duration::from_millis(500));
        assert!(transition.is_finished());
        assert!(!transition.is_cancelled());

        let fitted = geometry::pad_rect(Rect::new(-2000.0, 0.0, 100.0, 100.0), 20.0);
        assert_point_close(area.viewport_state().center, fitted.center(), 1e-6);
        assert!((area.scale() - 800.0 / fitted.width()).abs() < 1e-9);
    }

    #[test]
    fn test_layer_context_follows_transform() {
        let board = Board::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let (mut area, _) = mounted_board(board, PaperAreaConfig::default());
        area.set_scale(1.5, ScaleOptions::default());
        let svg = area.layer_context().svg_layer().unwrap();
        assert!((svg.width - 2250.0).abs() < 1e-9);
        assert_eq!(svg.transform, "scale(1.5,1.5)translate(0,0)");
    }

    #[test]
    fn test_config_from_json_drives_area() {
        let config = PaperAreaConfig::from_json(
            r#"{"zoom": {"max": 3.0}, "page_size": {"width": 1000.0, "height": 500.0}}"#,
        )
        .unwrap();
        let (mut area, _) = mounted_board(Board::new(Rect::new(0.0, 0.0, 100.0, 100.0)), config);
        assert!((area.transform().width - 1000.0).abs() < f64::EPSILON);
        area.set_scale(5.0, ScaleOptions::default());
        assert!((area.scale() - 3.0).abs() < f64::EPSILON);
    }
}
