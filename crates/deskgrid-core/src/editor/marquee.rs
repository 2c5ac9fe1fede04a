//! Rubber-band selection over empty canvas.

use super::GestureOutcome;
use crate::geometry::intersects_f64;
use crate::scene::Scene;
use crate::selection::Selection;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeGesture {
    pub start: Point,
    pub current: Point,
}

impl MarqueeGesture {
    pub fn new(start: Point) -> Self {
        Self { start, current: start }
    }

    pub fn update(&mut self, point: Point) {
        self.current = point;
    }

    /// Normalized rectangle from the press point to the pointer.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    /// Add every widget touched by the band to the selection, unless the band
    /// is too small on either axis.
    pub fn finish(mut self, point: Point, scene: &Scene, selection: &mut Selection, min_size: f64) -> GestureOutcome {
        self.update(point);
        let band = self.rect();
        if band.width() <= min_size || band.height() <= min_size {
            return GestureOutcome::Unchanged;
        }

        let mut added = false;
        for widget in scene.widgets() {
            if intersects_f64(widget.rect().to_kurbo(), band) && !selection.contains(&widget.id) {
                selection.add(widget.id.clone());
                added = true;
            }
        }
        if added {
            GestureOutcome::SelectionChanged
        } else {
            GestureOutcome::Unchanged
        }
    }
}
