//! Headless replay of scripted paperview sessions.
//!
//! Usage: `paperview-replay <script.json>`. Every canvas event is logged at
//! `info` (set `RUST_LOG=info` to see them); the final viewport state is
//! printed to stdout as JSON.

mod error;
mod runner;
mod scene;
mod script;

use error::ReplayError;
use runner::{Report, Runner};
use script::Script;
use std::path::{Path, PathBuf};

/// Load the script at `path` and replay it.
fn replay(path: &Path) -> Result<Report, ReplayError> {
    let script = Script::load(path)?;
    log::info!(
        "Replaying {} steps over {} cells in a {}x{} viewport",
        script.steps.len(),
        script.cells.len(),
        script.viewport.width,
        script.viewport.height
    );
    Runner::new(&script).run(&script)
}

fn main() -> Result<(), ReplayError> {
    env_logger::init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(ReplayError::Usage)?;
    let report = replay(&path)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
