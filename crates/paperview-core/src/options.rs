//! Construction-time configuration and per-call viewport options.

use crate::error::ViewportError;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default duration of animated viewport transitions.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Default size of a scrollable-area page in paper units.
pub const DEFAULT_PAGE_SIZE: Size = Size::new(1500.0, 800.0);

/// Default action when dragging the main button over empty canvas.
///
/// Holding Shift swaps the two modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
    /// Drag pans the viewport.
    #[default]
    Panning,
    /// Drag is left to the embedder (e.g. rubber-band selection).
    Selection,
}

/// Options for scale-affecting operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    /// Minimum scale factor.
    pub min: f64,
    /// Maximum scale factor.
    pub max: f64,
    /// Maximum scale reached by fitting content into the viewport.
    pub max_fit: f64,
    /// Scale step for zoom in/out and the mouse wheel.
    pub step: f64,
    /// Margin around fitted content, in paper units.
    pub fit_padding: f64,
    /// Whether wheel zoom requires Ctrl/Cmd (otherwise Ctrl/Cmd+wheel scrolls).
    pub require_ctrl: bool,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 2.0,
            max_fit: 1.0,
            step: 0.1,
            fit_padding: 20.0,
            require_ctrl: true,
        }
    }
}

impl ZoomOptions {
    /// Bring the options into a consistent state.
    ///
    /// Out-of-range values are defaulted or clamped, never rejected.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let min = if self.min.is_finite() && self.min > 0.0 {
            self.min
        } else {
            defaults.min
        };
        let max = if self.max.is_finite() {
            self.max.max(min)
        } else {
            defaults.max.max(min)
        };
        let max_fit = if self.max_fit.is_finite() {
            self.max_fit.max(min)
        } else {
            defaults.max_fit.max(min)
        };
        let non_negative = |v: f64, default: f64| if v.is_finite() { v.max(0.0) } else { default };
        Self {
            min,
            max,
            max_fit,
            step: non_negative(self.step, defaults.step),
            fit_padding: non_negative(self.fit_padding, defaults.fit_padding),
            require_ctrl: self.require_ctrl,
        }
    }

    /// Clamp a manual scale into `[min, max]`.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    /// Clamp a fit-to-content scale into `[min, max_fit]`.
    pub fn clamp_fit_scale(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max_fit)
    }
}

/// Configuration for a [`PaperArea`](crate::PaperArea).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperAreaConfig {
    pub zoom: ZoomOptions,
    /// Granularity of the scrollable area, in paper units.
    pub page_size: Size,
    /// Duration used by animated operations without an explicit duration.
    pub animation_duration_ms: u64,
    pub pointer_mode: PointerMode,
}

impl Default for PaperAreaConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION.as_millis() as u64,
            pointer_mode: PointerMode::default(),
        }
    }
}

impl PaperAreaConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ViewportError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Same configuration with different zoom options.
    pub fn with_zoom(self, zoom: ZoomOptions) -> Self {
        Self { zoom, ..self }
    }

    pub fn normalized(self) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        let page_size = if valid(self.page_size.width) && valid(self.page_size.height) {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            zoom: self.zoom.normalized(),
            page_size,
            ..self
        }
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

/// Options shared by all operations that move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportOptions {
    /// Animate the change. Implied by a positive `duration`.
    pub animate: bool,
    /// Animation duration; defaults to the configured duration.
    pub duration: Option<Duration>,
}

impl ViewportOptions {
    /// Animate with the configured default duration.
    pub fn animated() -> Self {
        Self {
            animate: true,
            duration: None,
        }
    }

    /// Animate over `duration`.
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            animate: false,
            duration: Some(duration),
        }
    }

    pub(crate) fn should_animate(&self) -> bool {
        self.animate || self.duration.is_some_and(|d| !d.is_zero())
    }
}

/// Options for [`PaperArea::center_to`](crate::PaperArea::center_to).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CenterToOptions {
    pub viewport: ViewportOptions,
    /// Scale to set together with the new center (clamped).
    pub scale: Option<f64>,
}

/// Options for scale-affecting operations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleOptions {
    pub viewport: ViewportOptions,
    /// Paper point that keeps its on-screen position across the change.
    pub pivot: Option<Point>,
}

impl ScaleOptions {
    pub fn at(pivot: Point) -> Self {
        Self {
            viewport: ViewportOptions::default(),
            pivot: Some(pivot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_defaults() {
        let zoom = ZoomOptions::default();
        assert!((zoom.min - 0.2).abs() < f64::EPSILON);
        assert!((zoom.max - 2.0).abs() < f64::EPSILON);
        assert!((zoom.max_fit - 1.0).abs() < f64::EPSILON);
        assert!((zoom.step - 0.1).abs() < f64::EPSILON);
        assert!((zoom.fit_padding - 20.0).abs() < f64::EPSILON);
        assert!(zoom.require_ctrl);
    }

    #[test]
    fn test_zoom_normalization_clamps_instead_of_rejecting() {
        let zoom = ZoomOptions {
            min: -1.0,
            max: 0.1,
            max_fit: f64::NAN,
            step: -0.5,
            fit_padding: -10.0,
            require_ctrl: false,
        }
        .normalized();
        assert!((zoom.min - 0.2).abs() < f64::EPSILON);
        assert!((zoom.max - 0.2).abs() < f64::EPSILON);
        assert!((zoom.max_fit - 1.0).abs() < f64::EPSILON);
        assert!(zoom.step.abs() < f64::EPSILON);
        assert!(zoom.fit_padding.abs() < f64::EPSILON);
        assert!(!zoom.require_ctrl);
    }

    #[test]
    fn test_clamp_scale() {
        let zoom = ZoomOptions::default();
        assert!((zoom.clamp_scale(5.0) - 2.0).abs() < f64::EPSILON);
        assert!((zoom.clamp_scale(0.01) - 0.2).abs() < f64::EPSILON);
        assert!((zoom.clamp_scale(1.3) - 1.3).abs() < f64::EPSILON);
        assert!((zoom.clamp_fit_scale(1.5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = PaperAreaConfig::from_json(
            r#"{"zoom": {"max": 4.0}, "pointer_mode": "selection"}"#,
        )
        .unwrap();
        assert!((config.zoom.max - 4.0).abs() < f64::EPSILON);
        assert!((config.zoom.min - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.pointer_mode, PointerMode::Selection);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.animation_duration(), DEFAULT_ANIMATION_DURATION);
    }

    #[test]
    fn test_config_from_json_invalid() {
        let err = PaperAreaConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ViewportError::Config(_)));
    }

    #[test]
    fn test_config_invalid_page_size_falls_back() {
        let config = PaperAreaConfig {
            page_size: Size::new(0.0, 100.0),
            ..PaperAreaConfig::default()
        }
        .normalized();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_viewport_options_animation_flag() {
        assert!(!ViewportOptions::default().should_animate());
        assert!(ViewportOptions::animated().should_animate());
        assert!(ViewportOptions::with_duration(Duration::from_millis(10)).should_animate());
        assert!(!ViewportOptions::with_duration(Duration::ZERO).should_animate());
    }
}
