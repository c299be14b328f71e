//! Pointer gesture state machine.
//!
//! A gesture starts on a left-button pointer-down and lives until the
//! originating pointer goes up or the gesture is cancelled. While it is
//! active, further pointers join it; two pointers turn it into a pinch.

use crate::events::CanvasEvent;
use crate::geometry::midpoint;
use crate::input::{MouseButton, PointerId, PointerInfo, PointerInput, PointerType, WheelInput};
use crate::options::{CenterToOptions, PointerMode, ScaleOptions, ZoomOptions};
use crate::strategy::CellStrategy;
use crate::transform::{CanvasMetrics, MetricsSnapshot};
use crate::viewport::PaperArea;
use kurbo::{Point, Vec2};
use std::collections::HashMap;
use std::rc::Rc;

/// Embedder side of the resources a gesture holds while it is active.
///
/// Every method has an empty default so hosts only implement what they use.
pub trait GestureHost {
    /// Start routing document-level move/up events (and cancel, if
    /// `listen_cancel`) to the viewport.
    fn acquire_pointer_listeners(&self, _listen_cancel: bool) {}

    fn release_pointer_listeners(&self) {}

    /// Drop any text selection inside the viewport.
    fn clear_text_selection(&self) {}

    /// Toggle the panning cursor.
    fn set_panning(&self, _panning: bool) {}
}

/// Host that holds no resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGestureHost;

impl GestureHost for NoopGestureHost {}

/// Document listeners held for the duration of one gesture.
///
/// Released exactly once when dropped, whatever ended the gesture.
struct ListenerGuard {
    host: Rc<dyn GestureHost>,
    panning_shown: bool,
}

impl ListenerGuard {
    fn acquire(host: Rc<dyn GestureHost>, listen_cancel: bool) -> Self {
        host.acquire_pointer_listeners(listen_cancel);
        Self {
            host,
            panning_shown: false,
        }
    }

    fn show_panning(&mut self) {
        if !self.panning_shown {
            self.panning_shown = true;
            self.host.set_panning(true);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if self.panning_shown {
            self.host.set_panning(false);
        }
        self.host.release_pointer_listeners();
    }
}

/// Reference frame of a pinch: both pointers' start positions (page
/// coordinates) and the viewport metrics when the pinch began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchOrigin {
    pub pointers: [(PointerId, Point); 2],
    pub metrics: MetricsSnapshot,
}

impl PinchOrigin {
    fn contains(&self, pointer_id: PointerId) -> bool {
        self.pointers.iter().any(|(id, _)| *id == pointer_id)
    }
}

/// What the active gesture does with pointer movement.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureMode {
    /// Movement is only reported.
    Observe,
    Panning { scroll_origin: Vec2 },
    /// Dragging the target cell; both positions in paper coordinates.
    MovingCell { pointer_origin: Point, cell_origin: Point },
    Pinching(PinchOrigin),
}

/// State of the gesture in progress.
pub(crate) struct PointerMoveState<C> {
    /// Last page position of every pointer taking part in the gesture.
    pointers: HashMap<PointerId, Point>,
    pointer_moved: bool,
    pinched: bool,
    target: Option<C>,
    origin_pointer: PointerId,
    origin_page: Point,
    panning: bool,
    listen_cancel: bool,
    mode: GestureMode,
    guard: ListenerGuard,
}

impl<C> PointerMoveState<C> {
    /// Re-anchor a pan after the viewport scroll was shifted under it.
    pub(crate) fn shift_scroll_origin(&mut self, delta: Vec2) {
        if let GestureMode::Panning { scroll_origin } = &mut self.mode {
            *scroll_origin += delta;
        }
    }
}

/// Coarse gesture state exposed to embedders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    SinglePointer,
    Pinch,
}

enum MoveAction<C> {
    Pinch { origin: PinchOrigin, a: Point, b: Point },
    Pan { scroll: Vec2 },
    MoveCell { cell: C, position: Point },
    Observe,
}

/// New viewport center and scale for a pinch.
///
/// The content under the pointers' starting centroid ends up under their
/// current centroid, and the scale follows the change in pointer distance.
pub fn pinch_viewport(
    origin: &PinchOrigin,
    a: Point,
    b: Point,
    zoom: &ZoomOptions,
) -> (Point, f64) {
    let [(_, origin_a), (_, origin_b)] = origin.pointers;
    let last = midpoint(a, b);
    let start = midpoint(origin_a, origin_b);

    let ratio = (b - a).hypot() / (origin_b - origin_a).hypot().max(1.0);
    let origin_scale = origin.metrics.transform.scale;
    let scale = zoom.clamp_scale(origin_scale * ratio);
    let ratio = scale / origin_scale;

    let metrics = &origin.metrics;
    let center_paper = metrics.viewport_center();
    let last_paper = metrics.page_to_paper(last);
    let start_paper = metrics.page_to_paper(start);
    (start_paper + (center_paper - last_paper) / ratio, scale)
}

impl<S: CellStrategy> PaperArea<S> {
    /// Phase of the gesture in progress, if any.
    pub fn gesture_phase(&self) -> GesturePhase {
        match &self.gesture {
            None => GesturePhase::Idle,
            Some(state) if matches!(state.mode, GestureMode::Pinching(_)) => GesturePhase::Pinch,
            Some(_) => GesturePhase::SinglePointer,
        }
    }

    /// Pointer pressed over the canvas.
    ///
    /// Starts a gesture, or joins the active one as an extra pointer.
    pub fn pointer_down(&mut self, input: &PointerInput<S::Element>) {
        let pointer = input.pointer;
        if pointer.button != MouseButton::Left {
            return;
        }
        if self.gesture.is_some() {
            self.multi_pointer_down(pointer);
            return;
        }

        let target = self.strategy.find_cell(&input.path);
        let is_mouse = pointer.pointer_type == PointerType::Mouse;
        let mode = match &target {
            None if self.should_start_panning(&pointer) => {
                self.host.clear_text_selection();
                GestureMode::Panning {
                    scroll_origin: self.scroll_offset(),
                }
            }
            Some(cell) if is_mouse && self.strategy.should_move(cell) => GestureMode::MovingCell {
                pointer_origin: self.metrics().page_to_paper(pointer.page),
                cell_origin: self.strategy.cell_position(cell),
            },
            _ => GestureMode::Observe,
        };
        let panning = matches!(mode, GestureMode::Panning { .. });
        let listen_cancel = !is_mouse;
        log::trace!(
            "Gesture started by pointer {} ({:?}), mode {:?}",
            pointer.pointer_id,
            pointer.pointer_type,
            mode
        );

        self.gesture = Some(PointerMoveState {
            pointers: HashMap::from([(pointer.pointer_id, pointer.page)]),
            pointer_moved: false,
            pinched: false,
            target: target.clone(),
            origin_pointer: pointer.pointer_id,
            origin_page: pointer.page,
            panning,
            listen_cancel,
            mode,
            guard: ListenerGuard::acquire(self.host.clone(), listen_cancel),
        });
        self.events.trigger(&CanvasEvent::PointerDown {
            pointer,
            target,
            panning,
        });
    }

    fn should_start_panning(&self, pointer: &PointerInfo) -> bool {
        let require_shift = self.pointer_mode == PointerMode::Selection;
        let modifiers = pointer.modifiers;
        pointer.pointer_type == PointerType::Mouse
            && modifiers.shift == require_shift
            && !(modifiers.ctrl || modifiers.alt)
    }

    fn multi_pointer_down(&mut self, pointer: PointerInfo) {
        let metrics = self.metrics().snapshot();
        let Some(state) = self.gesture.as_mut() else {
            return;
        };
        state.pointers.insert(pointer.pointer_id, pointer.page);
        if state.pointers.len() != 2 || matches!(state.mode, GestureMode::Pinching(_)) {
            return;
        }
        let Some(&origin_page) = state.pointers.get(&state.origin_pointer) else {
            return;
        };
        state.mode = GestureMode::Pinching(PinchOrigin {
            pointers: [
                (state.origin_pointer, origin_page),
                (pointer.pointer_id, pointer.page),
            ],
            metrics,
        });
        state.pinched = true;
        log::trace!("Pinch started with pointer {}", pointer.pointer_id);
        // Direct manipulation wins over a running animation.
        self.replace_animation(None);
    }

    /// Pointer moved while a gesture is active.
    pub fn pointer_move(&mut self, pointer: PointerInfo) {
        let paper = self.metrics().page_to_paper(pointer.page);
        let Some(state) = self.gesture.as_mut() else {
            return;
        };
        let Some(last) = state.pointers.get_mut(&pointer.pointer_id) else {
            return;
        };
        *last = pointer.page;

        let offset = pointer.page - state.origin_page;
        if pointer.is_primary && offset.x.abs() >= 1.0 && offset.y.abs() >= 1.0 {
            state.pointer_moved = true;
        }

        let action = match state.mode {
            GestureMode::Pinching(origin) => {
                let a = state.pointers.get(&origin.pointers[0].0);
                let b = state.pointers.get(&origin.pointers[1].0);
                let (Some(&a), Some(&b)) = (a, b) else {
                    return;
                };
                MoveAction::Pinch { origin, a, b }
            }
            GestureMode::Panning { scroll_origin } => {
                state.guard.show_panning();
                MoveAction::Pan {
                    scroll: scroll_origin - offset,
                }
            }
            GestureMode::MovingCell {
                pointer_origin,
                cell_origin,
            } => match state.target.clone() {
                Some(cell) => MoveAction::MoveCell {
                    cell,
                    position: cell_origin + (paper - pointer_origin),
                },
                None => MoveAction::Observe,
            },
            GestureMode::Observe => MoveAction::Observe,
        };
        let panning = state.panning;

        let target = match action {
            MoveAction::Pinch { origin, a, b } => {
                let (center, scale) = pinch_viewport(&origin, a, b, &self.config.zoom);
                self.center_to(
                    Some(center),
                    CenterToOptions {
                        scale: Some(scale),
                        ..CenterToOptions::default()
                    },
                );
                return;
            }
            MoveAction::Pan { scroll } => {
                self.scroll_to(scroll);
                None
            }
            MoveAction::MoveCell { cell, position } => {
                self.strategy.set_cell_position(&cell, position);
                Some(cell)
            }
            MoveAction::Observe => self.observe_move(paper),
        };
        self.events.trigger(&CanvasEvent::PointerMove {
            pointer,
            target,
            panning,
        });
    }

    /// Let the strategy retarget a non-moving drag over a cell.
    fn observe_move(&mut self, paper: Point) -> Option<S::Cell> {
        let target = self.gesture.as_ref()?.target.clone()?;
        let updated = self.strategy.update_move(&target, paper);
        if let Some(state) = self.gesture.as_mut() {
            state.target = Some(updated.clone());
        }
        Some(updated)
    }

    /// Pointer released.
    ///
    /// Releasing the originating pointer ends the gesture and emits
    /// `PointerUp`; other pointers only leave the pointer set.
    pub fn pointer_up(&mut self, pointer: PointerInfo) {
        let Some(state) = self.gesture.as_mut() else {
            return;
        };
        if state.pointers.remove(&pointer.pointer_id).is_none() {
            return;
        }
        if let GestureMode::Pinching(origin) = state.mode {
            if origin.contains(pointer.pointer_id) || state.pointers.len() < 2 {
                log::trace!("Pinch ended by pointer {}", pointer.pointer_id);
                state.mode = GestureMode::Observe;
            }
        }
        if pointer.pointer_id == state.origin_pointer {
            self.end_gesture(Some(pointer));
        }
    }

    /// Platform cancelled the pointer stream (touch and pen only).
    pub fn pointer_cancel(&mut self) {
        if self.gesture.as_ref().is_some_and(|state| state.listen_cancel) {
            log::trace!("Gesture cancelled");
            self.end_gesture(None);
        }
    }

    /// A scrollable element inside the cell rendered by `path` scrolled.
    ///
    /// Aborts the active gesture if the strategy lets that cell keep native
    /// scrolling. Returns whether the gesture was aborted.
    pub fn scroll_capture(&mut self, path: &[S::Element]) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        let allow = self
            .strategy
            .find_cell(path)
            .is_some_and(|cell| self.strategy.allow_scroll_cell(&cell));
        if allow {
            log::trace!("Gesture aborted by nested scroll");
            self.end_gesture(None);
        }
        allow
    }

    /// Wheel over the canvas; zooms about the pointer when the Ctrl/Cmd state
    /// matches `require_ctrl`.
    ///
    /// Returns `false` when the event should scroll natively instead.
    pub fn wheel(&mut self, input: WheelInput) -> bool {
        let zoom = self.config.zoom;
        if input.modifiers.command() != zoom.require_ctrl {
            return false;
        }
        let pivot = self.metrics().page_to_paper(input.page);
        self.zoom_by(-input.zoom_delta() * zoom.step, ScaleOptions::at(pivot));
        true
    }

    /// Drag-and-drop payload dropped at a page position.
    ///
    /// Returns the drop position in paper coordinates.
    pub fn on_drop(&mut self, page: Point) -> Point {
        let position = self.metrics().page_to_paper(page);
        self.events.trigger(&CanvasEvent::Drop { position });
        position
    }

    pub fn context_menu(&mut self, input: &PointerInput<S::Element>) {
        let target = self.strategy.find_cell(&input.path);
        let position = self.metrics().page_to_paper(input.pointer.page);
        self.events
            .trigger(&CanvasEvent::ContextMenu { target, position });
    }

    /// Drop the gesture state, releasing its listeners.
    ///
    /// With the releasing pointer, `PointerUp` is emitted after the release.
    pub(crate) fn end_gesture(&mut self, released: Option<PointerInfo>) {
        let Some(state) = self.gesture.take() else {
            return;
        };
        let PointerMoveState {
            target,
            pointer_moved,
            pinched,
            panning,
            guard,
            ..
        } = state;
        drop(guard);

        if let Some(pointer) = released {
            self.events.trigger(&CanvasEvent::PointerUp {
                pointer,
                target,
                panning,
                trigger_as_click: !pointer_moved && !pinched,
            });
        }
    }
}
