use std::collections::HashMap;

use image::ImageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::assets::ImagePayload;
use crate::config::SceneConfig;
use crate::grid::{GridError, GridGeometry};
use crate::placement::{check_placement, Placement, PlacementError, PlacementPolicy};
use crate::sprite::Sprite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TextColor {
    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Text painted at a cell position on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLabel {
    pub message: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: TextColor,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to decode background image: {0}")]
    DecodeBackground(#[source] ImageError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Background, grid and the sprite registry, plus the overlay state the
/// compositor consumes.
///
/// Every stored sprite went through [`check_placement`] when it was written;
/// nothing is re-validated later.
#[derive(Debug, Clone)]
pub struct Scene {
    geometry: GridGeometry,
    background: ImagePayload,
    sprites: HashMap<String, Sprite>,
    notification: Option<String>,
    texts: Vec<TextLabel>,
    debug_overlay: bool,
    policy: PlacementPolicy,
}

impl Scene {
    pub fn new(
        background: ImagePayload,
        cell_size: u32,
        config: SceneConfig,
    ) -> Result<Self, SceneError> {
        let raster = background.decode().map_err(SceneError::DecodeBackground)?;
        let geometry = GridGeometry::new(cell_size, raster.width(), raster.height())?;
        debug!(
            width_px = geometry.width_px(),
            height_px = geometry.height_px(),
            width_cells = geometry.width_cells(),
            height_cells = geometry.height_cells(),
            cell_size,
            debug_overlay = config.debug_overlay,
            "scene_created"
        );
        Ok(Self {
            geometry,
            background,
            sprites: HashMap::new(),
            notification: None,
            texts: Vec::new(),
            debug_overlay: config.debug_overlay,
            policy: PlacementPolicy::default(),
        })
    }

    pub fn with_placement_policy(mut self, policy: PlacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn background(&self) -> &ImagePayload {
        &self.background
    }

    pub fn cell_to_pixel(&self, x: i32, y: i32) -> (i64, i64) {
        self.geometry.cell_to_pixel(x, y)
    }

    /// Dry run of [`Scene::upsert`]: reports what placing `candidate` under
    /// `id` would do without touching the registry.
    pub fn check(&self, id: &str, candidate: &Sprite) -> Result<Placement, PlacementError> {
        check_placement(&self.geometry, self.policy, &self.sprites, id, candidate)
    }

    /// Validates `candidate` and, when it lands on a hover target, claims
    /// that occupant's slot for `id`. The candidate itself is not stored.
    pub fn validate(&mut self, id: &str, candidate: &Sprite) -> Result<(), PlacementError> {
        if let Placement::Hover { target } = self.check(id, candidate)? {
            self.claim_hover_slot(&target, id);
        }
        Ok(())
    }

    /// Stores or replaces the sprite under `id`. On error nothing changes.
    pub fn upsert(&mut self, id: impl Into<String>, mut sprite: Sprite) -> Result<(), PlacementError> {
        let id = id.into();
        let placement = match self.check(&id, &sprite) {
            Ok(placement) => placement,
            Err(err) => {
                debug!(
                    sprite_id = %id,
                    x = sprite.x,
                    y = sprite.y,
                    code = err.code(),
                    error = %err,
                    "placement_rejected"
                );
                return Err(err);
            }
        };

        let carried_claim = self
            .sprites
            .get(&id)
            .filter(|previous| previous.occupies_cell_of(&sprite))
            .and_then(|previous| previous.hovered_by().map(str::to_string));
        sprite.set_hovered_by(carried_claim);

        let target = match &placement {
            Placement::Hover { target } => Some(target.as_str()),
            Placement::Free => None,
        };
        self.release_hover_slots_held_by(&id, target);
        if let Some(target) = target {
            self.claim_hover_slot(target, &id);
        }

        debug!(
            sprite_id = %id,
            kind = %sprite.kind,
            x = sprite.x,
            y = sprite.y,
            z_index = sprite.z_index,
            level = sprite.level,
            hover_target = target.unwrap_or(""),
            "sprite_upserted"
        );
        self.sprites.insert(id, sprite);
        Ok(())
    }

    /// Removes the sprite under `id` and frees any hover slot claimed for
    /// `id`, including claims made by [`Scene::validate`] for a sprite that
    /// was never stored. Removing an unknown id is otherwise a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Sprite> {
        let removed = self.sprites.remove(id);
        let released = self.release_hover_slots_held_by(id, None);
        if removed.is_some() || released > 0 {
            debug!(
                sprite_id = id,
                stored = removed.is_some(),
                released_slots = released,
                "sprite_removed"
            );
        }
        removed
    }

    pub fn sprite(&self, id: &str) -> Option<&Sprite> {
        self.sprites.get(id)
    }

    pub fn sprites(&self) -> impl Iterator<Item = (&str, &Sprite)> {
        self.sprites
            .iter()
            .map(|(id, sprite)| (id.as_str(), sprite))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Queues a banner message for the next render only.
    pub fn send_notification(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.notification = if message.is_empty() {
            None
        } else {
            Some(message)
        };
    }

    pub fn pending_notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub(crate) fn clear_notification(&mut self) {
        self.notification = None;
    }

    pub fn add_text(&mut self, label: TextLabel) {
        self.texts.push(label);
    }

    pub fn texts(&self) -> &[TextLabel] {
        &self.texts
    }

    pub fn clear_texts(&mut self) {
        self.texts.clear();
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    fn claim_hover_slot(&mut self, target: &str, holder: &str) {
        if let Some(occupant) = self.sprites.get_mut(target) {
            occupant.set_hovered_by(Some(holder.to_string()));
        }
    }

    fn release_hover_slots_held_by(&mut self, holder: &str, keep: Option<&str>) -> usize {
        let mut released = 0;
        for (id, sprite) in self.sprites.iter_mut() {
            if sprite.hovered_by() == Some(holder) && keep != Some(id.as_str()) {
                sprite.set_hovered_by(None);
                released += 1;
            }
        }
        released
    }
}
