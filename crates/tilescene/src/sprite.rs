use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::assets::ImagePayload;

/// Width and height in cells, measured from the sprite's anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

/// A visual entity anchored on a grid cell.
///
/// `kind` is the type identifier used by the hover rules: an occupant lists
/// in `hoverable_by` the kinds it accepts on top of it, and a sprite that
/// lists kinds in `requires_hover_on` can only be placed on such an occupant.
///
/// Level variants only contribute their image; the live sprite's position is
/// always the one painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub footprint: Footprint,
    pub z_index: i32,
    pub image: ImagePayload,
    pub levels: BTreeMap<u32, Sprite>,
    pub level: u32,
    pub hoverable_by: BTreeSet<String>,
    pub requires_hover_on: BTreeSet<String>,
    hovered_by: Option<String>,
}

impl Sprite {
    pub fn new(kind: impl Into<String>, image: ImagePayload, x: i32, y: i32) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            footprint: Footprint::default(),
            z_index: 0,
            image,
            levels: BTreeMap::new(),
            level: 0,
            hoverable_by: BTreeSet::new(),
            requires_hover_on: BTreeSet::new(),
            hovered_by: None,
        }
    }

    pub fn with_footprint(mut self, width: u32, height: u32) -> Self {
        self.footprint = Footprint { width, height };
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_level_variant(mut self, level: u32, variant: Sprite) -> Self {
        self.levels.insert(level, variant);
        self
    }

    pub fn hoverable_by(mut self, kind: impl Into<String>) -> Self {
        self.hoverable_by.insert(kind.into());
        self
    }

    pub fn requires_hover_on(mut self, kind: impl Into<String>) -> Self {
        self.requires_hover_on.insert(kind.into());
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn needs_hover(&self) -> bool {
        !self.requires_hover_on.is_empty()
    }

    pub fn accepts_hover_from(&self, kind: &str) -> bool {
        self.hoverable_by.contains(kind)
    }

    /// Whether another sprite currently sits on this one.
    pub fn is_hovered(&self) -> bool {
        self.hovered_by.is_some()
    }

    /// Id of the sprite occupying this sprite's hover slot.
    pub fn hovered_by(&self) -> Option<&str> {
        self.hovered_by.as_deref()
    }

    pub(crate) fn set_hovered_by(&mut self, id: Option<String>) {
        self.hovered_by = id;
    }

    pub fn occupies_cell_of(&self, other: &Sprite) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Image painted for the current level: the matching variant's image when
    /// `level > 1` and the variant exists, the base image otherwise.
    pub fn display_image(&self) -> &ImagePayload {
        if self.level > 1 {
            if let Some(variant) = self.levels.get(&self.level) {
                return &variant.image;
            }
        }
        &self.image
    }
}
