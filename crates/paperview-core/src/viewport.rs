//! Viewport state controller.
//!
//! [`PaperArea`] owns the logical scrollable area (size, origin, scale,
//! padding) and the scroll position of its viewport, and moves the "camera"
//! either immediately or through a frame-driven animation. Gesture handling
//! and content-bounds adjustment live in their own modules as further
//! `impl` blocks on the same type.

use crate::events::{CanvasEvent, EventSource};
use crate::geometry::{fit_rect_keeping_aspect_ratio, pad_rect};
use crate::gesture::{GestureHost, NoopGestureHost, PointerMoveState};
use crate::options::{
    CenterToOptions, PaperAreaConfig, PointerMode, ScaleOptions, ViewportOptions, ZoomOptions,
};
use crate::scheduler::{
    AnimationInterval, CancellationToken, Debouncer, Instant, Tick, Timeout, Transition,
    ease_in_out,
};
use crate::strategy::CellStrategy;
use crate::transform::{CanvasMetrics, LayerContext, LiveMetrics, PaperTransform, ViewportLayout};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Externally observable camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Center of the viewport in paper coordinates.
    pub center: Point,
    /// Uniform scale (`x == y`).
    pub scale: Vec2,
}

impl ViewportState {
    /// Linear interpolation between two states.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(to.center, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// An animated transition between two viewport states.
#[derive(Debug)]
pub(crate) struct ViewportAnimation {
    from: ViewportState,
    to: ViewportState,
    interval: AnimationInterval,
    transition: Transition,
}

/// Scrollable paper area seen through a fixed-size viewport.
pub struct PaperArea<S: CellStrategy> {
    pub(crate) strategy: S,
    pub(crate) config: PaperAreaConfig,
    pub(crate) transform: PaperTransform,
    pub(crate) layout: ViewportLayout,
    pub(crate) pointer_mode: PointerMode,
    animation: Option<ViewportAnimation>,
    pub(crate) gesture: Option<PointerMoveState<S::Cell>>,
    pub(crate) adjust: Debouncer<()>,
    pub(crate) host: Rc<dyn GestureHost>,
    pub(crate) events: EventSource<CanvasEvent<S::Cell>>,
}

impl<S: CellStrategy> std::fmt::Debug for PaperArea<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperArea")
            .field("transform", &self.transform)
            .field("layout", &self.layout)
            .field("pointer_mode", &self.pointer_mode)
            .field("animating", &self.animation.is_some())
            .field("gesture", &self.gesture.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: CellStrategy> PaperArea<S> {
    /// Create a paper area with a viewport of `client_size`.
    ///
    /// The logical area starts as a single page at scale 1; call
    /// [`mount`](Self::mount) once the viewport is laid out.
    pub fn new(strategy: S, config: PaperAreaConfig, client_size: Size) -> Self {
        let config = config.normalized();
        Self {
            strategy,
            transform: PaperTransform::with_size(config.page_size),
            layout: ViewportLayout::with_client_size(client_size),
            pointer_mode: config.pointer_mode,
            animation: None,
            gesture: None,
            adjust: Debouncer::new(Timeout::Frame),
            host: Rc::new(NoopGestureHost),
            events: EventSource::new(),
            config,
        }
    }

    /// Use `host` for gesture-scoped resources (global listeners, cursor).
    pub fn with_host(mut self, host: Rc<dyn GestureHost>) -> Self {
        self.host = host;
        self
    }

    /// Content strategy driving hit-testing and bounds.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutable access to the content strategy.
    ///
    /// Call [`schedule_adjust_area`](Self::schedule_adjust_area) after changing
    /// the content bounds.
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Normalized configuration.
    pub fn config(&self) -> &PaperAreaConfig {
        &self.config
    }

    /// Zoom limits and steps in effect.
    pub fn zoom_options(&self) -> &ZoomOptions {
        &self.config.zoom
    }

    /// Source of every canvas event emitted by this area.
    pub fn events(&self) -> &EventSource<CanvasEvent<S::Cell>> {
        &self.events
    }

    /// Live metrics of the viewport.
    pub fn metrics(&self) -> LiveMetrics<'_> {
        LiveMetrics::new(&self.layout, &self.transform)
    }

    /// Current paper-to-pane transform.
    pub fn transform(&self) -> PaperTransform {
        self.transform
    }

    /// Transform context for content layers rendered inside this area.
    pub fn layer_context(&self) -> LayerContext {
        LayerContext::new(self.transform)
    }

    /// Scroll offset of the viewport over the pane.
    pub fn scroll_offset(&self) -> Vec2 {
        self.layout.area.scroll_offset()
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Default action of a main-button drag over empty canvas.
    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer_mode
    }

    /// Switch the pointer mode; emits `ChangePointerMode` on change.
    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        let previous = self.pointer_mode;
        if previous == mode {
            return;
        }
        self.pointer_mode = mode;
        self.events.trigger(&CanvasEvent::ChangePointerMode { previous });
    }

    /// Whether a viewport animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Current camera state, derived from the scroll position.
    pub fn viewport_state(&self) -> ViewportState {
        let scale = self.transform.scale;
        ViewportState {
            center: self.metrics().viewport_center(),
            scale: Vec2::new(scale, scale),
        }
    }

    /// Lay out the area around the content and center the viewport on it.
    pub fn mount(&mut self) -> Transition {
        self.force_adjust_area();
        self.center_to(None, CenterToOptions::default())
    }

    /// Report a new viewport client size.
    pub fn resize(&mut self, client_size: Size) {
        self.layout.set_client_size(client_size);
        self.events.trigger(&CanvasEvent::Resize { client_size });
        self.schedule_adjust_area();
    }

    /// Report where the viewport sits in the window's visible region.
    pub fn set_client_rect(&mut self, rect: Rect) {
        self.layout.client_rect = rect;
    }

    /// Report the window's scroll offset.
    pub fn set_window_scroll(&mut self, scroll: Vec2) {
        self.layout.window_scroll = scroll;
    }

    /// Report a native scroll of the viewport.
    pub fn on_scroll(&mut self, offset: Vec2) {
        self.scroll_to(offset);
    }

    /// Frame tick: runs the pending area adjustment, then steps the animation.
    pub fn on_frame(&mut self, now: Instant) {
        if self.adjust.poll(now).is_some() {
            self.force_adjust_area();
        }
        self.step_animation(now);
    }

    /// Release every resource held by the viewport.
    pub fn dispose(&mut self) {
        self.end_gesture(None);
        self.replace_animation(None);
        self.adjust.dispose();
    }

    /// Center the viewport on `paper_position`.
    ///
    /// Without a position the middle of the logical area is used.
    pub fn center_to(
        &mut self,
        paper_position: Option<Point>,
        options: CenterToOptions,
    ) -> Transition {
        let center = paper_position.unwrap_or_else(|| self.transform.paper_rect().center());
        let scale = options.scale.map(|s| self.config.zoom.clamp_scale(s));
        self.set_viewport_state(Some(center), scale, options.viewport)
    }

    /// Center the viewport on the middle of the content bounding box.
    pub fn center_content(&mut self, options: ViewportOptions) -> Transition {
        let center = self.strategy.content_bounds().center();
        self.center_to(
            Some(center),
            CenterToOptions {
                viewport: options,
                scale: None,
            },
        )
    }

    /// Set the scale, clamped into `[min, max]`.
    ///
    /// With a pivot, the pivot keeps its position in the viewport, as when
    /// zooming at the cursor.
    pub fn set_scale(&mut self, value: f64, options: ScaleOptions) -> Transition {
        let scale = self.config.zoom.clamp_scale(value);
        let center = options.pivot.map(|pivot| {
            let paper_center = self.metrics().viewport_center();
            let scaled_by = scale / self.transform.scale;
            pivot - (pivot - paper_center) / scaled_by
        });
        self.set_viewport_state(center, Some(scale), options.viewport)
    }

    /// Change the scale by `value`, clamped like [`set_scale`](Self::set_scale).
    pub fn zoom_by(&mut self, value: f64, options: ScaleOptions) -> Transition {
        self.set_scale(self.scale() + value, options)
    }

    /// Zoom in by one `step`.
    pub fn zoom_in(&mut self, options: ScaleOptions) -> Transition {
        self.zoom_by(self.config.zoom.step, options)
    }

    /// Zoom out by one `step`.
    pub fn zoom_out(&mut self, options: ScaleOptions) -> Transition {
        self.zoom_by(-self.config.zoom.step, options)
    }

    /// Fit the whole content into the viewport.
    pub fn zoom_to_fit(&mut self, options: ViewportOptions) -> Transition {
        let bounds = self.strategy.content_bounds();
        self.zoom_to_fit_rect(bounds, options)
    }

    /// Fit `paper_rect`, padded by `fit_padding`, into the viewport.
    ///
    /// The scale is clamped into `[min, max_fit]`. A rectangle without area
    /// leaves the viewport untouched.
    pub fn zoom_to_fit_rect(&mut self, paper_rect: Rect, options: ViewportOptions) -> Transition {
        if paper_rect.width() == 0.0 || paper_rect.height() == 0.0 {
            return Transition::resolved();
        }
        let zoom = self.config.zoom;
        let padded = pad_rect(paper_rect, zoom.fit_padding);
        let client = self.layout.area.client_size();
        let fitted = fit_rect_keeping_aspect_ratio(
            padded.size(),
            Some(client.width),
            Some(client.height),
        );
        let scale = zoom.clamp_fit_scale(fitted.width / padded.width());
        self.set_viewport_state(Some(padded.center()), Some(scale), options)
    }

    /// Move to a new state, superseding any running animation.
    fn set_viewport_state(
        &mut self,
        center: Option<Point>,
        scale: Option<f64>,
        options: ViewportOptions,
    ) -> Transition {
        let from = self.viewport_state();
        let to = ViewportState {
            center: center.unwrap_or(from.center),
            scale: scale.map_or(from.scale, |s| Vec2::new(s, s)),
        };
        let duration = options
            .duration
            .unwrap_or_else(|| self.config.animation_duration());
        if !options.should_animate() || duration.is_zero() {
            self.replace_animation(None);
            self.apply_viewport_state(to);
            return Transition::resolved();
        }

        log::debug!(
            "Animating viewport to center ({:.1}, {:.1}) at scale {:.3} over {:?}",
            to.center.x,
            to.center.y,
            to.scale.x,
            duration
        );
        let token = CancellationToken::new();
        let transition = Transition::pending(token.clone());
        self.replace_animation(Some(ViewportAnimation {
            from,
            to,
            interval: AnimationInterval::new(duration, token),
            transition: transition.clone(),
        }));
        transition
    }

    /// Scroll so that `state.center` sits in the middle of the viewport.
    ///
    /// The scroll offset is derived from the target state alone, so repeated
    /// animation frames never accumulate drift.
    fn apply_viewport_state(&mut self, state: ViewportState) {
        let previous_scale = self.transform.scale;
        self.transform.scale = state.scale.x;

        let client = self.layout.area.client_size();
        let pane_center = self.transform.pane_from_paper(state.center);
        let offset = Vec2::new(
            pane_center.x - client.width / 2.0 + self.transform.padding_x,
            pane_center.y - client.height / 2.0 + self.transform.padding_y,
        );
        self.scroll_to(offset);

        if self.transform.scale != previous_scale {
            self.events.trigger(&CanvasEvent::ChangeScale {
                previous: previous_scale,
            });
        }
    }

    fn step_animation(&mut self, now: Instant) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        match animation.interval.tick(now) {
            Tick::Running(progress) => {
                let state = animation.from.lerp(&animation.to, ease_in_out(progress));
                self.apply_viewport_state(state);
            }
            Tick::Finished => {
                let to = animation.to;
                let transition = animation.transition.clone();
                self.animation = None;
                self.apply_viewport_state(to);
                transition.finish(false);
                log::debug!("Viewport animation finished");
                self.events.trigger(&CanvasEvent::ChangeAnimating { previous: true });
            }
            Tick::Cancelled => self.replace_animation(None),
        }
    }

    /// Swap the running animation, cancelling the previous one.
    pub(crate) fn replace_animation(&mut self, next: Option<ViewportAnimation>) {
        let previous = self.is_animating();
        if let Some(animation) = self.animation.take() {
            if !animation.transition.is_finished() {
                log::debug!("Viewport animation cancelled");
            }
            animation.interval.token().cancel();
            animation.transition.finish(true);
        }
        self.animation = next;
        if previous != self.is_animating() {
            self.events.trigger(&CanvasEvent::ChangeAnimating { previous });
        }
    }

    /// Scroll the viewport, clamped to the pane; emits `Scroll` on change.
    pub(crate) fn scroll_to(&mut self, offset: Vec2) {
        if self.layout.scroll_to(offset, &self.transform) {
            let offset = self.layout.area.scroll_offset();
            self.events.trigger(&CanvasEvent::Scroll { offset });
        }
    }
}
