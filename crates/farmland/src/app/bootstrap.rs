use tilescene::{
    resolve_asset_paths, AssetPaths, BuiltinFont, Compositor, DirectorySink, FsAssets,
    RenderConfig, SceneConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::AppError;

pub(crate) const LAYOUT_FILE_NAME: &str = "farmland.json";

pub(crate) struct AppWiring {
    pub(crate) paths: AssetPaths,
    pub(crate) assets: FsAssets,
    pub(crate) scene_config: SceneConfig,
    pub(crate) compositor: Compositor,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Farmland Startup ===");

    let paths = resolve_asset_paths()?;
    let scene_config = SceneConfig::from_env();
    info!(
        root = %paths.root.display(),
        artifacts_dir = %paths.artifacts_dir.display(),
        debug_overlay = scene_config.debug_overlay,
        "paths_resolved"
    );

    let compositor = Compositor::new(
        Box::new(FsAssets::new(&paths.assets_dir)),
        Box::new(BuiltinFont),
        Box::new(DirectorySink::new(&paths.artifacts_dir)),
        RenderConfig::default(),
    );

    Ok(AppWiring {
        assets: FsAssets::new(&paths.assets_dir),
        paths,
        scene_config,
        compositor,
    })
}

/// Logs go to stderr; stdout carries only the artifact path.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
