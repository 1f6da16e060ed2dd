use std::collections::HashMap;

use thiserror::Error;

use crate::grid::GridGeometry;
use crate::sprite::Sprite;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("x={x} with footprint width {width} is outside the {limit}-cell grid width")]
    WidthBoundExceeded { x: i32, width: u32, limit: i32 },
    #[error("y={y} with footprint height {height} is outside the {limit}-cell grid height")]
    HeightBoundExceeded { y: i32, height: u32, limit: i32 },
    #[error("cell ({x},{y}) is already occupied by '{occupant}'")]
    AlreadyOccupiedNoHover { x: i32, y: i32, occupant: String },
    #[error("'{occupant}' does not accept sprites of kind '{kind}' on top of it")]
    BadHoverCapability { occupant: String, kind: String },
    #[error("hover slot of '{occupant}' is already used")]
    HoverSlotAlreadyUsed { occupant: String },
    #[error("cell ({x},{y}) has no sprite to hover")]
    NoHoverTarget { x: i32, y: i32 },
}

impl PlacementError {
    /// Stable identifier for callers that match on strings (bot commands).
    pub fn code(&self) -> &'static str {
        match self {
            Self::WidthBoundExceeded { .. } => "MAX_WIDTH",
            Self::HeightBoundExceeded { .. } => "MAX_HEIGHT",
            Self::AlreadyOccupiedNoHover { .. } => "ALREADY_ENT_HERE_NO_HOVER_BY",
            Self::BadHoverCapability { .. } => "BAD_HOVERED_ENTITY",
            Self::HoverSlotAlreadyUsed { .. } => "HOVERED_ENTITY_ALREADY_USED",
            Self::NoHoverTarget { .. } => "NO_ENTITY_TO_PUT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPolicy {
    /// Negative coordinates fail the matching axis bound check.
    pub reject_negative: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            reject_negative: true,
        }
    }
}

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Free,
    /// The candidate sits on `target` and consumes its hover slot.
    Hover { target: String },
}

/// Decides whether `candidate` may be stored under `id`.
///
/// Checks run in order and stop at the first failure: width bound, height
/// bound, then the occupancy scan. Neither the entry already stored under `id`
/// nor the sprite sitting in that entry's hover slot counts as an occupant, so
/// re-checking a sprite in place succeeds.
///
/// Bounds follow the upper-exclusive rule `x >= width_cells` for single-cell
/// sprites and `x + footprint.width >= width_cells` for wider ones.
pub fn check_placement(
    geometry: &GridGeometry,
    policy: PlacementPolicy,
    sprites: &HashMap<String, Sprite>,
    id: &str,
    candidate: &Sprite,
) -> Result<Placement, PlacementError> {
    if axis_out_of_bounds(
        candidate.x,
        candidate.footprint.width,
        geometry.width_cells(),
        policy,
    ) {
        return Err(PlacementError::WidthBoundExceeded {
            x: candidate.x,
            width: candidate.footprint.width,
            limit: geometry.width_cells(),
        });
    }
    if axis_out_of_bounds(
        candidate.y,
        candidate.footprint.height,
        geometry.height_cells(),
        policy,
    ) {
        return Err(PlacementError::HeightBoundExceeded {
            y: candidate.y,
            height: candidate.footprint.height,
            limit: geometry.height_cells(),
        });
    }

    let slot_holder = sprites
        .get(id)
        .filter(|stored| stored.occupies_cell_of(candidate))
        .and_then(Sprite::hovered_by);
    let mut occupants = sprites
        .iter()
        .filter(|(key, sprite)| {
            key.as_str() != id
                && slot_holder != Some(key.as_str())
                && sprite.occupies_cell_of(candidate)
        })
        .collect::<Vec<_>>();
    occupants.sort_by(|(left, _), (right, _)| left.cmp(right));

    if !candidate.needs_hover() {
        return match occupants.first() {
            Some((occupant, _)) => Err(PlacementError::AlreadyOccupiedNoHover {
                x: candidate.x,
                y: candidate.y,
                occupant: (*occupant).clone(),
            }),
            None => Ok(Placement::Free),
        };
    }

    let Some((first_occupant, _)) = occupants.first() else {
        return Err(PlacementError::NoHoverTarget {
            x: candidate.x,
            y: candidate.y,
        });
    };
    let accepting = occupants
        .iter()
        .filter(|(_, sprite)| sprite.accepts_hover_from(&candidate.kind))
        .collect::<Vec<_>>();
    let Some((first_accepting, _)) = accepting.first() else {
        return Err(PlacementError::BadHoverCapability {
            occupant: (*first_occupant).clone(),
            kind: candidate.kind.clone(),
        });
    };
    accepting
        .iter()
        .find(|(_, sprite)| sprite.hovered_by().map_or(true, |holder| holder == id))
        .map(|(target, _)| Placement::Hover {
            target: (*target).clone(),
        })
        .ok_or_else(|| PlacementError::HoverSlotAlreadyUsed {
            occupant: (*first_accepting).clone(),
        })
}

fn axis_out_of_bounds(position: i32, span: u32, limit_cells: i32, policy: PlacementPolicy) -> bool {
    if policy.reject_negative && position < 0 {
        return true;
    }
    let position = i64::from(position);
    let limit = i64::from(limit_cells);
    if span > 1 {
        position + i64::from(span) >= limit
    } else {
        position >= limit
    }
}
