//! Component gallery shown along a display edge while editing.

use crate::component::{Component, ComponentCatalog, ComponentId, SortOrder};
use crate::geometry::GridRect;
use serde::{Deserialize, Serialize};

/// Which page of the gallery is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryView {
    #[default]
    Components,
    GlobalSettings,
}

/// Display edge the gallery is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryDock {
    #[default]
    Bottom,
    Top,
}

/// Requests issued from the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GalleryAction {
    /// Click on a component card.
    AddComponent { component_id: ComponentId },
    /// Grid pitch slider moved.
    SetGridPitch { pitch: i32 },
    SetSearch { query: String },
    CycleSort,
    ShowView { view: GalleryView },
    SetDock { dock: GalleryDock },
    ExitEditMode,
}

/// Gallery state: view, search text, sort order and dock edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryPanel {
    pub view: GalleryView,
    pub search: String,
    pub sort: SortOrder,
    pub dock: GalleryDock,
}

impl GalleryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface occupied by the gallery on `display`.
    pub fn rect(&self, display: GridRect, height: i32) -> GridRect {
        let height = height.min(display.h).max(0);
        match self.dock {
            GalleryDock::Bottom => GridRect::new(display.x, display.bottom() - height, display.w, height),
            GalleryDock::Top => GridRect::new(display.x, display.y, display.w, height),
        }
    }

    /// Components to list, honouring search and sort.
    pub fn entries<'a>(&self, catalog: &'a ComponentCatalog) -> Vec<&'a Component> {
        catalog.search(&self.search, self.sort)
    }

    /// Apply a gallery-local action. Returns the action back when the
    /// session has to handle it.
    pub fn apply(&mut self, action: GalleryAction) -> Option<GalleryAction> {
        match action {
            GalleryAction::SetSearch { query } => self.search = query,
            GalleryAction::CycleSort => self.sort = self.sort.next(),
            GalleryAction::ShowView { view } => self.view = view,
            GalleryAction::SetDock { dock } => self.dock = dock,
            other => return Some(other),
        }
        None
    }

    /// Back to the component list with search cleared.
    pub fn reset(&mut self) {
        self.view = GalleryView::Components;
        self.search.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: GridRect = GridRect::new(0, 0, 1000, 800);

    #[test]
    fn test_rect_docked_bottom_and_top() {
        let mut gallery = GalleryPanel::new();
        assert_eq!(gallery.rect(DISPLAY, 200), GridRect::new(0, 600, 1000, 200));
        gallery.dock = GalleryDock::Top;
        assert_eq!(gallery.rect(DISPLAY, 200), GridRect::new(0, 0, 1000, 200));
    }

    #[test]
    fn test_local_actions_consumed() {
        let mut gallery = GalleryPanel::new();
        assert!(gallery.apply(GalleryAction::SetSearch { query: "clo".into() }).is_none());
        assert!(gallery.apply(GalleryAction::CycleSort).is_none());
        assert_eq!(gallery.search, "clo");
        assert_eq!(gallery.sort, SortOrder::NameAscending);

        let passed = gallery.apply(GalleryAction::ExitEditMode);
        assert_eq!(passed, Some(GalleryAction::ExitEditMode));
    }

    #[test]
    fn test_entries_filtered() {
        let catalog = ComponentCatalog::from_listing(vec![
            Component::new("clock", "Clock"),
            Component::new("notes", "Notes"),
        ]);
        let mut gallery = GalleryPanel::new();
        gallery.apply(GalleryAction::SetSearch { query: "note".into() });
        let ids: Vec<&str> = gallery.entries(&catalog).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["notes"]);

        gallery.reset();
        assert_eq!(gallery.entries(&catalog).len(), 2);
    }

    #[test]
    fn test_action_json() {
        let action: GalleryAction =
            serde_json::from_str(r#"{ "action": "set_grid_pitch", "pitch": 40 }"#).unwrap();
        assert_eq!(action, GalleryAction::SetGridPitch { pitch: 40 });
    }
}
