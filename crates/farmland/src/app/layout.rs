use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tilescene::demo::{leveled_sprite, DemoError};
use tilescene::{AssetSource, Footprint, ImagePayload, Scene, Sprite, TextLabel};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse layout {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load image for placement '{id}': {source}")]
    Image {
        id: String,
        #[source]
        source: DemoError,
    },
}

/// Farm contents applied on top of the demo background.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Layout {
    #[serde(default)]
    pub(crate) placements: Vec<PlacementEntry>,
    #[serde(default)]
    pub(crate) notification: Option<String>,
    #[serde(default)]
    pub(crate) texts: Vec<TextLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlacementEntry {
    pub(crate) id: String,
    pub(crate) kind: String,
    pub(crate) source: ImageSource,
    pub(crate) x: i32,
    pub(crate) y: i32,
    #[serde(default)]
    pub(crate) footprint: Footprint,
    #[serde(default)]
    pub(crate) z_index: i32,
    #[serde(default)]
    pub(crate) level: Option<u32>,
    #[serde(default)]
    pub(crate) hoverable_by: Vec<String>,
    #[serde(default)]
    pub(crate) requires_hover_on: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum ImageSource {
    Asset(String),
    Leveled { prefix: String, max_level: u32 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LayoutReport {
    pub(crate) placed: usize,
    pub(crate) rejected: usize,
}

/// A missing layout file is an empty farm, not an error.
pub(crate) fn load_layout(path: &Path) -> Result<Layout, LayoutError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "layout_missing_using_empty_farm");
            return Ok(Layout::default());
        }
        Err(source) => {
            return Err(LayoutError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_layout(path, &raw)
}

fn parse_layout(path: &Path, raw: &str) -> Result<Layout, LayoutError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        LayoutError::Parse {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}

/// Placements go in file order. Rejected ones are logged with their code
/// and skipped; an image that cannot be loaded aborts the whole layout.
pub(crate) fn apply_layout(
    scene: &mut Scene,
    assets: &dyn AssetSource,
    layout: &Layout,
) -> Result<LayoutReport, LayoutError> {
    let mut report = LayoutReport::default();
    for entry in &layout.placements {
        let sprite = build_sprite(assets, entry).map_err(|source| LayoutError::Image {
            id: entry.id.clone(),
            source,
        })?;
        match scene.upsert(entry.id.as_str(), sprite) {
            Ok(()) => report.placed += 1,
            Err(err) => {
                warn!(
                    sprite_id = entry.id.as_str(),
                    x = entry.x,
                    y = entry.y,
                    code = err.code(),
                    error = %err,
                    "layout_placement_rejected"
                );
                report.rejected += 1;
            }
        }
    }

    for label in &layout.texts {
        scene.add_text(label.clone());
    }
    if let Some(message) = &layout.notification {
        scene.send_notification(message.as_str());
    }
    Ok(report)
}

fn build_sprite(assets: &dyn AssetSource, entry: &PlacementEntry) -> Result<Sprite, DemoError> {
    let mut sprite = match &entry.source {
        ImageSource::Asset(key) => {
            let image: ImagePayload = assets.load(key)?.into();
            Sprite::new(entry.kind.as_str(), image, entry.x, entry.y)
        }
        ImageSource::Leveled { prefix, max_level } => {
            leveled_sprite(assets, &entry.kind, prefix, *max_level, entry.x, entry.y)?
        }
    };
    sprite = sprite
        .with_footprint(entry.footprint.width, entry.footprint.height)
        .with_z_index(entry.z_index);
    if let Some(level) = entry.level {
        sprite = sprite.with_level(level);
    }
    for kind in &entry.hoverable_by {
        sprite = sprite.hoverable_by(kind.as_str());
    }
    for kind in &entry.requires_hover_on {
        sprite = sprite.requires_hover_on(kind.as_str());
    }
    Ok(sprite)
}
