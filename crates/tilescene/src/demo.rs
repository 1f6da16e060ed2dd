//! Ready-made farm land: a `base` background on a 16 px grid, plus helpers
//! for crops that change image as they grow.

use thiserror::Error;
use tracing::info;

use crate::assets::{AssetError, AssetSource, ImagePayload};
use crate::config::SceneConfig;
use crate::scene::{Scene, SceneError};
use crate::sprite::Sprite;

pub const FARMLAND_BACKGROUND_KEY: &str = "base";
pub const FARMLAND_CELL_SIZE: u32 = 16;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("leveled sprite '{prefix}' needs at least one level")]
    NoLevels { prefix: String },
}

pub fn create_demo_farmland(
    assets: &dyn AssetSource,
    config: SceneConfig,
) -> Result<Scene, DemoError> {
    let background: ImagePayload = assets.load(FARMLAND_BACKGROUND_KEY)?.into();
    let scene = Scene::new(background, FARMLAND_CELL_SIZE, config)?;
    info!(
        width_cells = scene.geometry().width_cells(),
        height_cells = scene.geometry().height_cells(),
        debug_overlay = scene.debug_overlay(),
        "farmland_created"
    );
    Ok(scene)
}

/// Sprite whose image for level `n` is the asset `<prefix>_<n>`, for
/// `n` in `1..=max_level`. The base image is level 1's and the sprite
/// starts at level 1.
pub fn leveled_sprite(
    assets: &dyn AssetSource,
    kind: &str,
    prefix: &str,
    max_level: u32,
    x: i32,
    y: i32,
) -> Result<Sprite, DemoError> {
    if max_level == 0 {
        return Err(DemoError::NoLevels {
            prefix: prefix.to_string(),
        });
    }
    let base: ImagePayload = assets.load(&level_key(prefix, 1))?.into();
    let mut sprite = Sprite::new(kind, base, x, y).with_level(1);
    for level in 1..=max_level {
        let image: ImagePayload = assets.load(&level_key(prefix, level))?.into();
        sprite = sprite.with_level_variant(level, Sprite::new(kind, image, x, y));
    }
    Ok(sprite)
}

fn level_key(prefix: &str, level: u32) -> String {
    format!("{prefix}_{level}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use image::{Rgba, RgbaImage};

    fn farm_assets() -> MemoryAssets {
        let mut assets = MemoryAssets::new();
        assets
            .insert_rgba("base", RgbaImage::from_pixel(320, 240, Rgba([0, 128, 0, 255])))
            .expect("base");
        for (level, shade) in [(1, 40u8), (2, 80), (3, 120)] {
            assets
                .insert_rgba(
                    &format!("farms/pum_{level}"),
                    RgbaImage::from_pixel(16, 16, Rgba([shade, shade, 0, 255])),
                )
                .expect("pumpkin");
        }
        assets
    }

    #[test]
    fn farmland_uses_sixteen_pixel_cells() {
        let scene = create_demo_farmland(&farm_assets(), SceneConfig::default()).expect("scene");
        assert_eq!(scene.geometry().cell_size(), 16);
        assert_eq!(scene.geometry().width_cells(), 20);
        assert_eq!(scene.geometry().height_cells(), 15);
        assert!(scene.is_empty());
        assert!(!scene.debug_overlay());
    }

    #[test]
    fn farmland_honours_debug_flag() {
        let scene = create_demo_farmland(
            &farm_assets(),
            SceneConfig {
                debug_overlay: true,
            },
        )
        .expect("scene");
        assert!(scene.debug_overlay());
    }

    #[test]
    fn missing_background_is_an_asset_error() {
        let err = create_demo_farmland(&MemoryAssets::new(), SceneConfig::default())
            .expect_err("no base");
        assert!(matches!(err, DemoError::Asset(AssetError::Missing { .. })));
    }

    #[test]
    fn leveled_sprite_loads_every_level() {
        let assets = farm_assets();
        let sprite = leveled_sprite(&assets, "crop", "farms/pum", 3, 4, 5).expect("pumpkin");
        assert_eq!(sprite.levels.len(), 3);
        assert_eq!(sprite.level, 1);
        assert_eq!((sprite.x, sprite.y), (4, 5));

        let level_three = assets.load("farms/pum_3").expect("pum_3").payload;
        assert_eq!(sprite.clone().with_level(3).display_image(), &level_three);
    }

    #[test]
    fn leveled_sprite_reports_missing_level() {
        let err = leveled_sprite(&farm_assets(), "crop", "farms/pum", 4, 0, 0)
            .expect_err("pum_4 missing");
        assert!(matches!(err, DemoError::Asset(AssetError::Missing { key }) if key == "farms/pum_4"));
    }

    #[test]
    fn zero_levels_is_rejected() {
        assert!(matches!(
            leveled_sprite(&farm_assets(), "crop", "farms/pum", 0, 0, 0),
            Err(DemoError::NoLevels { .. })
        ));
    }
}
