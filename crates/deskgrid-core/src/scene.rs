//! Scene document: placed widgets plus global layout settings.

use crate::component::ComponentId;
use crate::geometry::{GridRect, intersects};
use crate::snap::GridPitch;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Opaque, never-reused widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(format!("widget_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Widget-private configuration, opaque to the editor.
pub type WidgetConfig = serde_json::Map<String, serde_json::Value>;

/// One placed instance of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub component_id: ComponentId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default)]
    pub config: WidgetConfig,
}

impl Widget {
    pub fn new(component_id: impl Into<ComponentId>, rect: GridRect) -> Self {
        Self {
            id: WidgetId::new(),
            component_id: component_id.into(),
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            config: WidgetConfig::new(),
        }
    }

    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: GridRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }
}

/// The authoritative layout, persisted as
/// `{ gridPitch, widgets, processedDefaults }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub grid_pitch: GridPitch,
    /// Widgets in paint order (back to front).
    #[serde(default)]
    pub widgets: Vec<Widget>,
    /// Components whose default widget has already been inserted once.
    #[serde(default)]
    pub processed_defaults: Vec<ComponentId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default grid pitch.
    pub fn new() -> Self {
        Self {
            grid_pitch: GridPitch::default(),
            widgets: Vec::new(),
            processed_defaults: Vec::new(),
        }
    }

    pub fn pitch(&self) -> i32 {
        self.grid_pitch.get()
    }

    pub fn set_grid_pitch(&mut self, pitch: i32) {
        self.grid_pitch = GridPitch::new(pitch);
    }

    /// Add a widget on top of the paint order.
    pub fn add_widget(&mut self, widget: Widget) -> WidgetId {
        let id = widget.id.clone();
        self.widgets.push(widget);
        id
    }

    /// Remove a widget from the scene.
    pub fn remove_widget(&mut self, id: &WidgetId) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| &w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.get(id).is_some()
    }

    pub fn rect_of(&self, id: &WidgetId) -> Option<GridRect> {
        self.get(id).map(Widget::rect)
    }

    /// Widgets in paint order (back to front).
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Topmost widget under a point.
    pub fn widget_at_point(&self, point: Point) -> Option<&Widget> {
        self.widgets.iter().rev().find(|w| w.rect().contains_point(point))
    }

    /// Rectangles of every widget not in `excluded`.
    pub fn rects_excluding(&self, excluded: &HashSet<WidgetId>) -> Vec<GridRect> {
        self.widgets
            .iter()
            .filter(|w| !excluded.contains(&w.id))
            .map(Widget::rect)
            .collect()
    }

    /// True if `rect` overlaps any widget.
    pub fn collides(&self, rect: &GridRect) -> bool {
        self.widgets.iter().any(|w| intersects(&w.rect(), rect))
    }

    pub fn is_default_processed(&self, component_id: &str) -> bool {
        self.processed_defaults.iter().any(|c| c == component_id)
    }

    pub fn mark_default_processed(&mut self, component_id: impl Into<ComponentId>) {
        let component_id = component_id.into();
        if !self.is_default_processed(&component_id) {
            self.processed_defaults.push(component_id);
        }
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
