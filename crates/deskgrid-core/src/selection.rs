//! Selection of widgets and the derived multi-selection bounding box.

use crate::geometry::{GridRect, bounding_box};
use crate::scene::{Scene, WidgetId};
use kurbo::Point;
use std::collections::HashSet;

/// Vertical gap between the selection and the alignment toolbar.
pub const TOOLBAR_OFFSET: f64 = 10.0;

/// Tracks which widgets are selected.
///
/// Never persisted. Every mutation drops the cached alignment-toolbar anchor
/// so it is recomputed from the scene before the next paint.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<WidgetId>,
    /// Cached top-center anchor of the alignment toolbar.
    toolbar_anchor: Option<Point>,
    /// Bumped on every mutation.
    revision: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self) {
        self.toolbar_anchor = None;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Make `id` the only selected widget.
    pub fn replace(&mut self, id: WidgetId) {
        self.ids.clear();
        self.ids.insert(id);
        self.touch();
    }

    /// Add a widget to the selection.
    pub fn add(&mut self, id: WidgetId) {
        self.ids.insert(id);
        self.touch();
    }

    /// Remove a widget from the selection.
    pub fn remove(&mut self, id: &WidgetId) {
        self.ids.remove(id);
        self.touch();
    }

    /// Flip a widget's membership.
    pub fn toggle(&mut self, id: WidgetId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
        self.touch();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.touch();
    }

    /// Drop ids that no longer exist in the scene.
    pub fn retain_existing(&mut self, scene: &Scene) {
        let before = self.ids.len();
        self.ids.retain(|id| scene.contains(id));
        if self.ids.len() != before {
            self.touch();
        }
    }

    /// Called after selected widgets move without the set changing.
    pub fn geometry_changed(&mut self) {
        self.touch();
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<WidgetId> {
        &self.ids
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bounding box of the selection; `None` unless at least two widgets are
    /// selected.
    pub fn bounding_box_of(&self, scene: &Scene) -> Option<GridRect> {
        if self.ids.len() < 2 {
            return None;
        }
        let rects: Vec<GridRect> = scene
            .widgets()
            .filter(|w| self.ids.contains(&w.id))
            .map(|w| w.rect())
            .collect();
        if rects.len() < 2 {
            return None;
        }
        bounding_box(&rects)
    }

    /// Top-center point of the alignment toolbar, centered under the
    /// selection bounding box.
    pub fn toolbar_anchor(&mut self, scene: &Scene) -> Option<Point> {
        if self.toolbar_anchor.is_none() {
            self.toolbar_anchor = self.bounding_box_of(scene).map(|bbox| {
                Point::new(bbox.center().x, bbox.bottom() as f64 + TOOLBAR_OFFSET)
            });
        }
        self.toolbar_anchor
    }

    /// Whether the toolbar anchor is currently cached.
    pub fn has_cached_toolbar_anchor(&self) -> bool {
        self.toolbar_anchor.is_some()
    }
}
