//! Moving the selected widgets as a group.

use super::GestureOutcome;
use crate::error::{EditorError, EditorResult};
use crate::geometry::{GridRect, intersects};
use crate::scene::{Scene, WidgetId};
use crate::selection::Selection;
use crate::snap::snap;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;

/// Where a drag is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed on a widget, movement still under the threshold.
    Armed,
    Dragging,
}

/// Grid-snapped destination of the leader, with whether the whole group
/// could be dropped there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapPreview {
    pub rect: GridRect,
    pub valid: bool,
}

/// State of a drag started on `leader`.
///
/// The scene is never touched while dragging; visual positions are the
/// captured origins plus [`DragGesture::delta`].
#[derive(Debug, Clone)]
pub struct DragGesture {
    leader: WidgetId,
    start: Point,
    /// Pre-gesture rectangles of every selected widget.
    origins: Vec<(WidgetId, GridRect)>,
    phase: DragPhase,
    /// Bounds-clamped, unsnapped pointer delta.
    delta: Vec2,
    preview: Option<SnapPreview>,
}

impl DragGesture {
    /// Arm a drag on `leader`, capturing the current selection.
    pub fn arm(leader: WidgetId, start: Point, scene: &Scene, selection: &Selection) -> Self {
        let origins = scene
            .widgets()
            .filter(|w| selection.contains(&w.id) || w.id == leader)
            .map(|w| (w.id.clone(), w.rect()))
            .collect();
        Self {
            leader,
            start,
            origins,
            phase: DragPhase::Armed,
            delta: Vec2::ZERO,
            preview: None,
        }
    }

    pub fn leader(&self) -> &WidgetId {
        &self.leader
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    pub fn preview(&self) -> Option<SnapPreview> {
        self.preview
    }

    pub fn moving(&self) -> impl Iterator<Item = &WidgetId> {
        self.origins.iter().map(|(id, _)| id)
    }

    /// Provisional rectangle of a moving widget.
    pub fn visual_rect(&self, id: &WidgetId) -> Option<Rect> {
        self.origin_of(id).map(|origin| origin.to_kurbo() + self.delta)
    }

    fn origin_of(&self, id: &WidgetId) -> Option<GridRect> {
        self.origins.iter().find(|(w, _)| w == id).map(|(_, rect)| *rect)
    }

    /// Range of deltas that keeps every moving widget on the display.
    fn delta_bounds(&self, display: GridRect) -> ((i32, i32), (i32, i32)) {
        let mut lo = (i32::MIN, i32::MIN);
        let mut hi = (i32::MAX, i32::MAX);
        for (_, origin) in &self.origins {
            lo.0 = lo.0.max(display.left() - origin.left());
            lo.1 = lo.1.max(display.top() - origin.top());
            hi.0 = hi.0.min(display.right() - origin.right());
            hi.1 = hi.1.min(display.bottom() - origin.bottom());
        }
        (lo, hi)
    }

    /// Clamp a raw delta so every moving widget stays on the display.
    fn clamp_delta(&self, raw: Vec2, display: GridRect) -> Vec2 {
        let (lo, hi) = self.delta_bounds(display);
        Vec2::new(
            raw.x.max(lo.0 as f64).min(hi.0 as f64),
            raw.y.max(lo.1 as f64).min(hi.1 as f64),
        )
    }

    /// Delta that puts the leader's visual position on the grid.
    ///
    /// Rounding can carry the group past a display edge that is not on the
    /// grid; such an axis steps back one pitch toward the inside.
    fn snapped_delta(&self, display: GridRect, pitch: i32) -> (i32, i32) {
        let (dx, dy) = match self.origin_of(&self.leader) {
            Some(origin) => (
                snap(origin.x as f64 + self.delta.x, pitch) - origin.x,
                snap(origin.y as f64 + self.delta.y, pitch) - origin.y,
            ),
            None => (snap(self.delta.x, pitch), snap(self.delta.y, pitch)),
        };
        let (lo, hi) = self.delta_bounds(display);
        (pull_inside(dx, lo.0, hi.0, pitch), pull_inside(dy, lo.1, hi.1, pitch))
    }

    /// Check every destination against the display and the widgets that
    /// stay put.
    fn validate(&self, scene: &Scene, display: GridRect, dx: i32, dy: i32) -> Result<(), String> {
        let moving: HashSet<WidgetId> = self.moving().cloned().collect();
        let stationary = scene.rects_excluding(&moving);
        for (id, origin) in &self.origins {
            let target = origin.translate(dx, dy);
            if !display.contains_rect(&target) {
                return Err(format!("widget {} would leave the display", id));
            }
            if stationary.iter().any(|other| intersects(&target, other)) {
                return Err(format!("widget {} would overlap another widget", id));
            }
        }
        Ok(())
    }

    pub fn update(&mut self, point: Point, scene: &Scene, display: GridRect, pitch: i32, threshold: f64) {
        let raw = point - self.start;
        if self.phase == DragPhase::Armed {
            if raw.hypot() <= threshold {
                return;
            }
            self.phase = DragPhase::Dragging;
        }

        self.delta = self.clamp_delta(raw, display);
        let (dx, dy) = self.snapped_delta(display, pitch);
        self.preview = self.origin_of(&self.leader).map(|leader| SnapPreview {
            rect: leader.translate(dx, dy),
            valid: self.validate(scene, display, dx, dy).is_ok(),
        });
    }

    /// End the drag at `point`.
    ///
    /// `over_gallery` turns the release into a delete of every moving widget.
    /// A failed validation leaves the scene untouched and reports
    /// [`EditorError::InvalidGeometryOnCommit`].
    pub fn finish(
        mut self,
        point: Point,
        scene: &mut Scene,
        display: GridRect,
        pitch: i32,
        threshold: f64,
        over_gallery: bool,
    ) -> EditorResult<GestureOutcome> {
        self.update(point, scene, display, pitch, threshold);
        if self.phase == DragPhase::Armed {
            return Ok(GestureOutcome::Unchanged);
        }

        if over_gallery {
            let removed: Vec<WidgetId> = self
                .origins
                .iter()
                .filter_map(|(id, _)| scene.remove_widget(id).map(|w| w.id))
                .collect();
            return Ok(GestureOutcome::Removed(removed));
        }

        let (dx, dy) = self.snapped_delta(display, pitch);
        if dx == 0 && dy == 0 {
            return Ok(GestureOutcome::Unchanged);
        }
        self.validate(scene, display, dx, dy)
            .map_err(EditorError::InvalidGeometryOnCommit)?;

        let mut moved = Vec::with_capacity(self.origins.len());
        for (id, origin) in &self.origins {
            if let Some(widget) = scene.get_mut(id) {
                widget.set_rect(origin.translate(dx, dy));
                moved.push(id.clone());
            }
        }
        Ok(GestureOutcome::Moved(moved))
    }
}

fn pull_inside(delta: i32, lo: i32, hi: i32, pitch: i32) -> i32 {
    if delta > hi {
        delta - pitch.max(1)
    } else if delta < lo {
        delta + pitch.max(1)
    } else {
        delta
    }
}
