//! Tunable editor constants.

use crate::component::{DEFAULT_COMPONENT_SIZE, RecommendedSize};
use serde::{Deserialize, Serialize};

/// Editor configuration. Every field has a default so partial JSON files
/// are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Pointer travel (px) before a press on a widget becomes a drag.
    pub drag_threshold: f64,
    /// Marquee width and height must both exceed this (px) to select.
    pub marquee_min_size: f64,
    /// Side of the square resize handle at a widget's bottom-right corner.
    pub resize_handle_size: i32,
    /// Size used for components without a recommended size.
    pub default_component_size: RecommendedSize,
    /// Height of the gallery panel docked at the display edge.
    pub gallery_height: i32,
    pub settings_panel_width: i32,
    pub settings_panel_height: i32,
    /// Gap between a widget and its settings panel.
    pub settings_panel_gap: i32,
    pub context_menu_width: i32,
    pub menu_item_height: i32,
    pub menu_separator_height: i32,
    pub toolbar_width: i32,
    pub toolbar_height: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            marquee_min_size: 5.0,
            resize_handle_size: 16,
            default_component_size: DEFAULT_COMPONENT_SIZE,
            gallery_height: 200,
            settings_panel_width: 350,
            settings_panel_height: 500,
            settings_panel_gap: 20,
            context_menu_width: 200,
            menu_item_height: 28,
            menu_separator_height: 9,
            toolbar_width: 300,
            toolbar_height: 36,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
