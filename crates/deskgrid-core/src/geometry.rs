//! Integer rectangles in screen pixels and the pure helpers built on them.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in whole screen pixels.
///
/// Committed widget geometry, panel surfaces and the display itself are all
/// expressed this way. Provisional geometry during a gesture is fractional
/// and lives in `kurbo` types instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True when the rectangle has no area.
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Move by a whole-pixel offset.
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Same origin, new size.
    pub const fn with_size(self, w: i32, h: i32) -> Self {
        Self::new(self.x, self.y, w, h)
    }

    /// Same size, new origin.
    pub const fn with_origin(self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.w, self.h)
    }

    /// Half-open containment test for a pointer position.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x as f64
            && point.x < self.right() as f64
            && point.y >= self.y as f64
            && point.y < self.bottom() as f64
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    pub const fn contains_rect(&self, other: &GridRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersection(&self, other: &GridRect) -> Option<GridRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(GridRect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &GridRect) -> GridRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        GridRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }

    pub fn to_kurbo(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }

    /// Normalize a fractional rectangle (corners may be in any order),
    /// rounding each edge to the nearest pixel.
    pub fn from_kurbo(rect: Rect) -> Self {
        let rect = rect.abs();
        let x0 = rect.x0.round() as i32;
        let y0 = rect.y0.round() as i32;
        let x1 = rect.x1.round() as i32;
        let y1 = rect.y1.round() as i32;
        GridRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Open-rectangle overlap test. Rectangles that only share an edge do not
/// intersect.
pub fn intersects(a: &GridRect, b: &GridRect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Fractional variant of [`intersects`] for provisional geometry.
pub fn intersects_f64(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Translate (and if necessary shrink) `rect` so it lies fully inside
/// `bounds`.
pub fn clamp(rect: GridRect, bounds: GridRect) -> GridRect {
    let w = rect.w.min(bounds.w).max(0);
    let h = rect.h.min(bounds.h).max(0);
    let x = rect.x.max(bounds.x).min(bounds.right() - w);
    let y = rect.y.max(bounds.y).min(bounds.bottom() - h);
    GridRect::new(x, y, w, h)
}

/// Bounding box of a set of rectangles; `None` for an empty set.
pub fn bounding_box<'a>(rects: impl IntoIterator<Item = &'a GridRect>) -> Option<GridRect> {
    rects.into_iter().fold(None, |acc, rect| match acc {
        Some(acc) => Some(rect.union(&acc)),
        None => Some(*rect),
    })
}
