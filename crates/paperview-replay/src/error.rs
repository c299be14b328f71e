//! Error types for the replay harness.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Usage: paperview-replay <script.json>")]
    Usage,
    #[error("Failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    /// A step refers to a cell the script does not declare.
    #[error("Unknown cell id: {0}")]
    UnknownCell(String),
}
