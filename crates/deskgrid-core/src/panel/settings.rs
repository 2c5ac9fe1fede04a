//! Settings panel for one widget and the messages it exchanges.
//!
//! The panel content is an opaque child surface. It is initialised with the
//! widget's component id, current config and the component's schema, and
//! answers with one of the [`SettingsMessage`]s.

use crate::component::ComponentId;
use crate::config::EditorConfig;
use crate::geometry::GridRect;
use crate::scene::{WidgetConfig, WidgetId};
use serde::{Deserialize, Serialize};

/// Payload of the `init-settings` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInit {
    pub component_id: ComponentId,
    pub config: WidgetConfig,
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
}

/// Messages sent back by the settings surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "kebab-case")]
pub enum SettingsMessage {
    /// Live preview; pushed to the widget but not persisted.
    SettingsChanged(WidgetConfig),
    /// Store, persist and close.
    SaveSettings(WidgetConfig),
    /// Restore the pre-open config and close.
    CancelSettings,
}

/// An open settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPanel {
    pub widget_id: WidgetId,
    pub rect: GridRect,
    /// Config the widget had when the panel opened.
    pub original_config: WidgetConfig,
}

impl SettingsPanel {
    pub fn open(
        widget_id: WidgetId,
        widget_rect: GridRect,
        original_config: WidgetConfig,
        display: GridRect,
        config: &EditorConfig,
    ) -> Self {
        Self {
            widget_id,
            rect: placement(widget_rect, display, config),
            original_config,
        }
    }
}

/// Beside the widget on the right, else on the left; pulled up to stay
/// above the bottom edge.
fn placement(widget: GridRect, display: GridRect, config: &EditorConfig) -> GridRect {
    let (width, height, gap) = (
        config.settings_panel_width,
        config.settings_panel_height,
        config.settings_panel_gap,
    );

    let mut x = widget.right() + gap;
    if x + width > display.right() {
        x = widget.x - width - gap;
    }
    let x = x.min(display.right() - width).max(display.x);

    let mut y = widget.y;
    if y + height > display.bottom() - gap {
        y = display.bottom() - height - gap;
    }
    let y = y.max(display.y);

    GridRect::new(x, y, width, height)
}
