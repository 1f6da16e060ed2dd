use std::process::ExitCode;

use tilescene::demo::create_demo_farmland;
use tracing::{error, info};

use super::bootstrap::{AppWiring, LAYOUT_FILE_NAME};
use super::layout::{apply_layout, load_layout};
use super::AppError;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match render_farmland(&app) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "render_failed");
            ExitCode::FAILURE
        }
    }
}

fn render_farmland(app: &AppWiring) -> Result<std::path::PathBuf, AppError> {
    let mut scene = create_demo_farmland(&app.assets, app.scene_config)?;

    let layout_path = app.paths.assets_dir.join(LAYOUT_FILE_NAME);
    let layout = load_layout(&layout_path)?;
    let report = apply_layout(&mut scene, &app.assets, &layout)?;
    info!(
        placed = report.placed,
        rejected = report.rejected,
        texts = scene.texts().len(),
        "layout_applied"
    );

    Ok(app.compositor.render(&mut scene)?)
}
