//! Right-click menu for a single widget.

use crate::config::EditorConfig;
use crate::geometry::{GridRect, clamp};
use crate::mode::EditMode;
use crate::scene::WidgetId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Entries of the widget context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    EnterEditMode,
    Separator,
    Settings,
    ResetSize,
    Remove,
}

impl MenuItem {
    /// Entries offered in `mode`.
    pub fn for_mode(mode: EditMode) -> Vec<MenuItem> {
        match mode {
            EditMode::View => vec![MenuItem::EnterEditMode, MenuItem::Separator, MenuItem::Settings],
            EditMode::Edit => vec![MenuItem::Settings, MenuItem::ResetSize, MenuItem::Remove],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::EnterEditMode => "Edit Mode",
            MenuItem::Separator => "",
            MenuItem::Settings => "Settings",
            MenuItem::ResetSize => "Reset Size",
            MenuItem::Remove => "Remove",
        }
    }

    pub fn is_separator(self) -> bool {
        self == MenuItem::Separator
    }

    fn height(self, config: &EditorConfig) -> i32 {
        if self.is_separator() {
            config.menu_separator_height
        } else {
            config.menu_item_height
        }
    }
}

/// An open context menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub target: WidgetId,
    pub items: Vec<MenuItem>,
    /// Surface of the menu, kept inside the display.
    pub rect: GridRect,
    item_height: i32,
    separator_height: i32,
}

impl ContextMenu {
    /// Open a menu for `target` with its top-left corner at `position`.
    pub fn open(
        target: WidgetId,
        position: Point,
        mode: EditMode,
        display: GridRect,
        config: &EditorConfig,
    ) -> Self {
        let items = MenuItem::for_mode(mode);
        let height: i32 = items.iter().map(|item| item.height(config)).sum();
        let at = GridRect::new(
            position.x.round() as i32,
            position.y.round() as i32,
            config.context_menu_width,
            height,
        );
        Self {
            target,
            items,
            rect: clamp(at, display),
            item_height: config.menu_item_height,
            separator_height: config.menu_separator_height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains_point(point)
    }

    /// The clickable item under `point`; separators never match.
    pub fn item_at(&self, point: Point) -> Option<MenuItem> {
        if !self.contains(point) {
            return None;
        }
        let mut top = self.rect.y as f64;
        for item in &self.items {
            let height = if item.is_separator() {
                self.separator_height
            } else {
                self.item_height
            };
            let bottom = top + height as f64;
            if point.y >= top && point.y < bottom {
                return (!item.is_separator()).then_some(*item);
            }
            top = bottom;
        }
        None
    }
}
