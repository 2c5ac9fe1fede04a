//! Resizing one widget from its bottom-right handle.

use super::GestureOutcome;
use crate::error::{EditorError, EditorResult};
use crate::geometry::GridRect;
use crate::scene::{Scene, WidgetId};
use crate::snap::{snap_down, snap_size};
use kurbo::{Point, Rect, Vec2};

/// Square handle at the bottom-right corner of `rect`.
pub fn resize_handle(rect: GridRect, size: i32) -> GridRect {
    let size = size.min(rect.w).min(rect.h).max(0);
    GridRect::new(rect.right() - size, rect.bottom() - size, size, size)
}

/// State of a resize. Like a drag, the scene is only written on release.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    target: WidgetId,
    start: Point,
    origin: GridRect,
    /// Live, unsnapped width and height.
    size: Vec2,
    preview: GridRect,
}

impl ResizeGesture {
    pub fn begin(target: WidgetId, start: Point, origin: GridRect) -> Self {
        Self {
            target,
            start,
            origin,
            size: Vec2::new(origin.w as f64, origin.h as f64),
            preview: origin,
        }
    }

    pub fn target(&self) -> &WidgetId {
        &self.target
    }

    /// Snapped size the widget would get on release.
    pub fn preview(&self) -> GridRect {
        self.preview
    }

    pub fn visual_rect(&self) -> Rect {
        Rect::from_origin_size(
            (self.origin.x as f64, self.origin.y as f64),
            (self.size.x, self.size.y),
        )
    }

    /// Largest grid-multiple size that keeps the widget on the display.
    fn max_size(&self, display: GridRect, pitch: i32) -> (i32, i32) {
        (
            snap_down(display.right() - self.origin.x, pitch).max(pitch),
            snap_down(display.bottom() - self.origin.y, pitch).max(pitch),
        )
    }

    pub fn update(&mut self, point: Point, display: GridRect, pitch: i32) {
        let raw = point - self.start;
        let (max_w, max_h) = self.max_size(display, pitch);
        let min = pitch as f64;
        self.size = Vec2::new(
            (self.origin.w as f64 + raw.x).max(min).min(max_w as f64),
            (self.origin.h as f64 + raw.y).max(min).min(max_h as f64),
        );
        self.preview = self.origin.with_size(
            snap_size(self.size.x, pitch).min(max_w),
            snap_size(self.size.y, pitch).min(max_h),
        );
    }

    /// Commit the snapped size. No collision check is made.
    pub fn finish(
        mut self,
        point: Point,
        scene: &mut Scene,
        display: GridRect,
        pitch: i32,
    ) -> EditorResult<GestureOutcome> {
        self.update(point, display, pitch);
        let widget = scene
            .get_mut(&self.target)
            .ok_or_else(|| EditorError::WidgetNotFound(self.target.clone()))?;
        if widget.rect() == self.preview {
            return Ok(GestureOutcome::Unchanged);
        }
        widget.set_rect(self.preview);
        Ok(GestureOutcome::Resized(self.target))
    }
}
