use std::collections::BTreeMap;
use std::path::PathBuf;

use image::{ImageError, Rgba, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use super::font::{FontError, FontSource};
use super::overlays::{paint_debug_grid, paint_notification, paint_text_labels};
use super::raster::{paint_image, scale_nearest};
use crate::assets::{AssetError, AssetSource};
use crate::config::RenderConfig;
use crate::output::{unique_artifact_name, ArtifactSink, PersistError};
use crate::scene::Scene;
use crate::sprite::Sprite;

const CANVAS_CLEAR: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to decode background image: {0}")]
    DecodeBackground(#[source] ImageError),
    #[error("failed to decode image for sprite '{sprite_id}': {source}")]
    DecodeSprite {
        sprite_id: String,
        #[source]
        source: ImageError,
    },
    #[error("failed to load notification banner: {0}")]
    Banner(#[source] AssetError),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("canvas {width}x{height} cannot be scaled by {factor}")]
    CanvasTooLarge { width: u32, height: u32, factor: u32 },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Flattens a [`Scene`] into a raster and hands it to an [`ArtifactSink`].
///
/// Paint order: background, sprites by ascending z (ties by id), pending
/// notification, text labels, debug grid. The result is then upscaled by
/// `RenderConfig::scale_factor`.
pub struct Compositor {
    assets: Box<dyn AssetSource>,
    fonts: Box<dyn FontSource>,
    sink: Box<dyn ArtifactSink>,
    config: RenderConfig,
}

impl Compositor {
    pub fn new(
        assets: Box<dyn AssetSource>,
        fonts: Box<dyn FontSource>,
        sink: Box<dyn ArtifactSink>,
        config: RenderConfig,
    ) -> Self {
        Self {
            assets,
            fonts,
            sink,
            config,
        }
    }

    /// Composes and persists the scene, returning the artifact path. The
    /// file belongs to the caller afterwards. A pending notification is
    /// consumed only once the artifact carrying it has been persisted.
    pub fn render(&self, scene: &mut Scene) -> Result<PathBuf, RenderError> {
        let frame = self.paint(scene)?;
        let name = unique_artifact_name(&self.config.artifact_prefix);
        let path = self.sink.persist(&frame.canvas, &name)?;
        if frame.notification_painted {
            scene.clear_notification();
        }
        info!(
            path = %path.display(),
            width = frame.canvas.width(),
            height = frame.canvas.height(),
            sprites = scene.len(),
            "scene_rendered"
        );
        Ok(path)
    }

    /// Builds the scaled canvas without persisting it. The only scene state
    /// touched is the pending notification, which is consumed once painted.
    pub fn compose(&self, scene: &mut Scene) -> Result<RgbaImage, RenderError> {
        let frame = self.paint(scene)?;
        if frame.notification_painted {
            scene.clear_notification();
        }
        Ok(frame.canvas)
    }

    fn paint(&self, scene: &Scene) -> Result<Frame, RenderError> {
        let background = scene
            .background()
            .decode()
            .map_err(RenderError::DecodeBackground)?;
        let mut canvas =
            RgbaImage::from_pixel(background.width(), background.height(), Rgba(CANVAS_CLEAR));
        paint_image(&mut canvas, &background, 0, 0);

        for (id, sprite) in paint_order(scene) {
            let raster = sprite
                .display_image()
                .decode()
                .map_err(|source| RenderError::DecodeSprite {
                    sprite_id: id.to_string(),
                    source,
                })?;
            let (x, y) = scene.cell_to_pixel(sprite.x, sprite.y);
            paint_image(&mut canvas, &raster, x, y);
        }

        let notification_painted = match scene.pending_notification() {
            Some(message) => {
                paint_notification(
                    &mut canvas,
                    scene.geometry(),
                    self.assets.as_ref(),
                    self.fonts.as_ref(),
                    &self.config,
                    message,
                )?;
                debug!(text = message, "notification_painted");
                true
            }
            None => false,
        };

        paint_text_labels(
            &mut canvas,
            scene.geometry(),
            self.fonts.as_ref(),
            scene.texts(),
        )?;

        if scene.debug_overlay() {
            paint_debug_grid(&mut canvas, scene.geometry());
        }

        let factor = self.config.scale_factor;
        let canvas = scale_nearest(&canvas, factor).ok_or(RenderError::CanvasTooLarge {
            width: canvas.width(),
            height: canvas.height(),
            factor,
        })?;
        Ok(Frame {
            canvas,
            notification_painted,
        })
    }
}

struct Frame {
    canvas: RgbaImage,
    notification_painted: bool,
}

fn paint_order(scene: &Scene) -> Vec<(&str, &Sprite)> {
    let mut layers: BTreeMap<i32, Vec<(&str, &Sprite)>> = BTreeMap::new();
    for (id, sprite) in scene.sprites() {
        layers.entry(sprite.z_index).or_default().push((id, sprite));
    }
    layers
        .into_values()
        .flat_map(|mut layer| {
            layer.sort_unstable_by_key(|(id, _)| *id);
            layer
        })
        .collect()
}
