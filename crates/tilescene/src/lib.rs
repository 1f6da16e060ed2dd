use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod assets;
pub mod config;
pub mod demo;
pub mod grid;
pub mod output;
pub mod placement;
pub mod render;
pub mod scene;
pub mod sprite;

pub use assets::{
    validate_asset_key, AssetError, AssetKeyError, AssetSource, FsAssets, ImagePayload,
    LoadedAsset, MemoryAssets,
};
pub use config::{RenderConfig, SceneConfig, DEBUG_OVERLAY_ENV_VAR};
pub use grid::{GridError, GridGeometry};
pub use output::{unique_artifact_name, ArtifactSink, DirectorySink, PersistError};
pub use placement::{check_placement, Placement, PlacementError, PlacementPolicy};
pub use render::{BuiltinFont, Compositor, FontError, FontFace, FontSource, RenderError};
pub use scene::{Scene, SceneError, TextColor, TextLabel};
pub use sprite::{Footprint, Sprite};

pub const ROOT_ENV_VAR: &str = "TILESCENE_ROOT";

/// Where a caller finds its images and drops rendered artifacts.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub artifacts_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create artifact directory at {path}: {source}")]
    CreateArtifactDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "{env_var} is set but {path} is not a project root\n\
A project root must contain Cargo.toml and an assets/ directory."
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
    #[error(
        "no project root found above {start_dir}\n\
Expected a directory containing Cargo.toml and assets/.\n\
Set {env_var} explicitly, e.g. export {env_var}=\"/path/to/project\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root and makes sure `assets/tmp` exists.
pub fn resolve_asset_paths() -> Result<AssetPaths, StartupError> {
    let root = resolve_root()?;
    asset_paths_under(root)
}

fn asset_paths_under(root: PathBuf) -> Result<AssetPaths, StartupError> {
    let assets_dir = root.join("assets");
    let artifacts_dir = assets_dir.join("tmp");
    fs::create_dir_all(&artifacts_dir).map_err(|source| StartupError::CreateArtifactDir {
        path: artifacts_dir.clone(),
        source,
    })?;
    Ok(AssetPaths {
        root,
        assets_dir,
        artifacts_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let candidate = canonical_or_raw(Path::new(&value));
            if is_project_root(&candidate) {
                Ok(candidate)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    path: candidate,
                    env_var: ROOT_ENV_VAR,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_above(exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: canonical_or_raw(exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_project_root(candidate))
        .map(canonical_or_raw)
}

fn is_project_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("assets").is_dir()
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
