//! Session script format.
//!
//! A script declares the viewport, the cells on the paper and a list of
//! steps replayed in order:
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "cells": [{ "id": "a", "rect": { "x0": 0, "y0": 0, "x1": 100, "y1": 50 }, "movable": true }],
//!   "steps": [
//!     { "type": "pointer_down", "target": "a",
//!       "pointer": { "pointer_id": 1, "page": { "x": 50, "y": 20 } } },
//!     { "type": "pointer_move", "pointer": { "pointer_id": 1, "page": { "x": 80, "y": 40 } } },
//!     { "type": "pointer_up", "pointer": { "pointer_id": 1, "page": { "x": 80, "y": 40 } } },
//!     { "type": "zoom_to_fit", "animate": true },
//!     { "type": "frame", "at_ms": 0 },
//!     { "type": "frame", "at_ms": 500 }
//!   ]
//! }
//! ```

use crate::error::ReplayError;
use kurbo::{Point, Rect, Size, Vec2};
use paperview_core::{PaperAreaConfig, PointerInfo, PointerMode, WheelInput};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Client size of the viewport.
    pub viewport: Size,
    #[serde(default)]
    pub config: PaperAreaConfig,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A rectangular cell on the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    pub id: String,
    /// Bounds in paper coordinates.
    pub rect: Rect,
    #[serde(default)]
    pub movable: bool,
    /// Whether the cell hosts a nested scroller that keeps native scrolling.
    #[serde(default)]
    pub scrollable: bool,
}

/// One replayed input or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Pointer pressed; `target` names the cell under it, if any.
    PointerDown {
        pointer: PointerInfo,
        #[serde(default)]
        target: Option<String>,
    },
    PointerMove { pointer: PointerInfo },
    PointerUp { pointer: PointerInfo },
    PointerCancel,
    Wheel(WheelInput),
    Drop { page: Point },
    ContextMenu {
        pointer: PointerInfo,
        #[serde(default)]
        target: Option<String>,
    },
    /// Nested scroll inside `target`.
    ScrollCapture { target: String },
    /// Native scroll of the viewport.
    Scroll { offset: Vec2 },
    Resize { size: Size },
    /// Frame tick at `at_ms` milliseconds after the session start.
    Frame { at_ms: u64 },
    SetPointerMode { mode: PointerMode },
    CenterTo {
        #[serde(default)]
        center: Option<Point>,
        #[serde(default)]
        scale: Option<f64>,
        #[serde(default)]
        animate: bool,
    },
    CenterContent {
        #[serde(default)]
        animate: bool,
    },
    SetScale {
        scale: f64,
        #[serde(default)]
        pivot: Option<Point>,
        #[serde(default)]
        animate: bool,
    },
    ZoomIn {
        #[serde(default)]
        animate: bool,
    },
    ZoomOut {
        #[serde(default)]
        animate: bool,
    },
    ZoomToFit {
        #[serde(default)]
        animate: bool,
    },
    ZoomToFitRect {
        rect: Rect,
        #[serde(default)]
        animate: bool,
    },
    /// Move a cell, as an editor would, and request an area adjustment.
    MoveCell { id: String, position: Point },
    AdjustArea {
        #[serde(default)]
        force: bool,
    },
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
