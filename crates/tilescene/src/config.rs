use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scene::TextColor;

pub const DEBUG_OVERLAY_ENV_VAR: &str = "LAND_DEBUGGING";

/// Scene-level settings, read once when a scene is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub debug_overlay: bool,
}

impl SceneConfig {
    pub fn from_env() -> Self {
        Self {
            debug_overlay: resolve_debug_overlay(),
        }
    }
}

fn resolve_debug_overlay() -> bool {
    match env::var(DEBUG_OVERLAY_ENV_VAR) {
        Ok(value) => match parse_bool_flag(&value) {
            Some(enabled) => enabled,
            None => {
                warn!(
                    env_var = DEBUG_OVERLAY_ENV_VAR,
                    value = value.as_str(),
                    "invalid debug overlay env var value; overlay disabled"
                );
                false
            }
        },
        Err(env::VarError::NotPresent) => false,
        Err(err) => {
            warn!(
                env_var = DEBUG_OVERLAY_ENV_VAR,
                error = %err,
                "unable to read debug overlay env var; overlay disabled"
            );
            false
        }
    }
}

pub(crate) fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Compositor policy values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub scale_factor: u32,
    pub banner_asset_key: String,
    pub banner_cell: (i32, i32),
    pub notification_text_cell: (i32, i32),
    pub notification_font_size: u32,
    pub notification_color: TextColor,
    pub artifact_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale_factor: 3,
            banner_asset_key: "gui".to_string(),
            banner_cell: (0, 5),
            notification_text_cell: (2, 7),
            notification_font_size: 10,
            notification_color: TextColor { r: 0, g: 0, b: 0 },
            artifact_prefix: "tmp_".to_string(),
        }
    }
}
