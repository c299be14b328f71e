//! Drives a paper area through a script.

use crate::error::ReplayError;
use crate::scene::{SceneCell, SceneStrategy};
use crate::script::{Script, Step};
use kurbo::Vec2;
use paperview_core::scheduler::Instant;
use paperview_core::{
    CanvasEvent, CellStrategy, CenterToOptions, PaperArea, PaperTransform, PointerInput,
    ScaleOptions, ViewportOptions, ViewportState,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Outcome of a replayed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub viewport: ViewportState,
    pub transform: PaperTransform,
    pub scroll: Vec2,
    pub animating: bool,
    pub cells: Vec<SceneCell>,
    /// Names of the emitted canvas events, scrolls excluded.
    pub events: Vec<String>,
}

fn event_name(event: &CanvasEvent<String>) -> String {
    match event {
        CanvasEvent::PointerDown { .. } => "pointer_down".into(),
        CanvasEvent::PointerMove { .. } => "pointer_move".into(),
        CanvasEvent::PointerUp {
            trigger_as_click: true,
            ..
        } => "click".into(),
        CanvasEvent::PointerUp { .. } => "pointer_up".into(),
        CanvasEvent::Scroll { .. } => "scroll".into(),
        CanvasEvent::Drop { .. } => "drop".into(),
        CanvasEvent::ContextMenu { .. } => "context_menu".into(),
        CanvasEvent::Resize { .. } => "resize".into(),
        CanvasEvent::ChangePointerMode { .. } => "change_pointer_mode".into(),
        CanvasEvent::ChangeScale { .. } => "change_scale".into(),
        CanvasEvent::ChangeAnimating { .. } => "change_animating".into(),
    }
}

fn viewport_options(animate: bool) -> ViewportOptions {
    if animate {
        ViewportOptions::animated()
    } else {
        ViewportOptions::default()
    }
}

/// Replays scripts against a fresh paper area.
pub struct Runner {
    area: PaperArea<SceneStrategy>,
    start: Instant,
    events: Rc<RefCell<Vec<String>>>,
}

impl Runner {
    pub fn new(script: &Script) -> Self {
        let strategy = SceneStrategy::new(&script.cells);
        let area = PaperArea::new(strategy, script.config.clone(), script.viewport);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        area.events().subscribe(move |event: &CanvasEvent<String>| {
            let name = event_name(event);
            if matches!(event, CanvasEvent::Scroll { .. }) {
                log::debug!("{name}: {event:?}");
            } else {
                log::info!("{name}: {event:?}");
                sink.borrow_mut().push(name);
            }
        });

        Self {
            area,
            start: Instant::now(),
            events,
        }
    }

    /// Mount the area, replay every step, and report the final state.
    pub fn run(mut self, script: &Script) -> Result<Report, ReplayError> {
        self.area.mount();
        for (index, step) in script.steps.iter().enumerate() {
            log::debug!("Step {index}: {step:?}");
            self.apply(step)?;
        }
        Ok(self.report())
    }

    fn path(&self, target: &Option<String>) -> Result<Vec<String>, ReplayError> {
        match target {
            None => Ok(Vec::new()),
            Some(id) if self.area.strategy().contains(id) => Ok(vec![id.clone()]),
            Some(id) => Err(ReplayError::UnknownCell(id.clone())),
        }
    }

    pub fn apply(&mut self, step: &Step) -> Result<(), ReplayError> {
        match step {
            Step::PointerDown { pointer, target } => {
                let path = self.path(target)?;
                self.area.pointer_down(&PointerInput::on(*pointer, path));
            }
            Step::PointerMove { pointer } => self.area.pointer_move(*pointer),
            Step::PointerUp { pointer } => self.area.pointer_up(*pointer),
            Step::PointerCancel => self.area.pointer_cancel(),
            Step::Wheel(wheel) => {
                if !self.area.wheel(*wheel) {
                    log::debug!("Wheel left to native scrolling");
                }
            }
            Step::Drop { page } => {
                self.area.on_drop(*page);
            }
            Step::ContextMenu { pointer, target } => {
                let path = self.path(target)?;
                self.area.context_menu(&PointerInput::on(*pointer, path));
            }
            Step::ScrollCapture { target } => {
                let path = self.path(&Some(target.clone()))?;
                self.area.scroll_capture(&path);
            }
            Step::Scroll { offset } => self.area.on_scroll(*offset),
            Step::Resize { size } => self.area.resize(*size),
            Step::Frame { at_ms } => {
                self.area.on_frame(self.start + Duration::from_millis(*at_ms));
            }
            Step::SetPointerMode { mode } => self.area.set_pointer_mode(*mode),
            Step::CenterTo {
                center,
                scale,
                animate,
            } => {
                self.area.center_to(
                    *center,
                    CenterToOptions {
                        viewport: viewport_options(*animate),
                        scale: *scale,
                    },
                );
            }
            Step::CenterContent { animate } => {
                self.area.center_content(viewport_options(*animate));
            }
            Step::SetScale {
                scale,
                pivot,
                animate,
            } => {
                self.area.set_scale(
                    *scale,
                    ScaleOptions {
                        viewport: viewport_options(*animate),
                        pivot: *pivot,
                    },
                );
            }
            Step::ZoomIn { animate } => {
                self.area.zoom_in(ScaleOptions {
                    viewport: viewport_options(*animate),
                    pivot: None,
                });
            }
            Step::ZoomOut { animate } => {
                self.area.zoom_out(ScaleOptions {
                    viewport: viewport_options(*animate),
                    pivot: None,
                });
            }
            Step::ZoomToFit { animate } => {
                self.area.zoom_to_fit(viewport_options(*animate));
            }
            Step::ZoomToFitRect { rect, animate } => {
                self.area.zoom_to_fit_rect(*rect, viewport_options(*animate));
            }
            Step::MoveCell { id, position } => {
                if !self.area.strategy().contains(id) {
                    return Err(ReplayError::UnknownCell(id.clone()));
                }
                self.area.strategy_mut().set_cell_position(id, *position);
                self.area.schedule_adjust_area();
            }
            Step::AdjustArea { force: true } => {
                self.area.force_adjust_area();
            }
            Step::AdjustArea { force: false } => self.area.schedule_adjust_area(),
        }
        Ok(())
    }

    pub fn report(&self) -> Report {
        Report {
            viewport: self.area.viewport_state(),
            transform: self.area.transform(),
            scroll: self.area.scroll_offset(),
            animating: self.area.is_animating(),
            cells: self.area.strategy().cells().to_vec(),
            events: self.events.borrow().clone(),
        }
    }
}
