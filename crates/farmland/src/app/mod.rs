mod bootstrap;
mod layout;
mod runner;

use std::process::ExitCode;

use thiserror::Error;
use tilescene::demo::DemoError;
use tilescene::{RenderError, StartupError};

pub(crate) use layout::LayoutError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to build farm land: {0}")]
    Farmland(#[from] DemoError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("failed to render farm land: {0}")]
    Render(#[from] RenderError),
}

pub(crate) fn run() -> ExitCode {
    let wiring = match bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            tracing::error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    runner::run(wiring)
}
