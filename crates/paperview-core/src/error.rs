//! Error types.

use thiserror::Error;

/// Errors raised by the viewport engine.
///
/// Numeric inputs (scales, zoom options, geometry) never produce errors; they
/// are clamped or defaulted instead.
#[derive(Debug, Error)]
pub enum ViewportError {
    /// A layer asked for its paper transform outside of a canvas.
    ///
    /// This is a wiring bug in the embedder, not a runtime condition.
    #[error("Cannot render canvas {layer} layer outside a canvas")]
    MissingTransformContext { layer: &'static str },
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
