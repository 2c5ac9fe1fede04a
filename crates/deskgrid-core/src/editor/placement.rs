//! Finding a free spot for a new widget.

use crate::geometry::{GridRect, clamp};
use crate::scene::Scene;
use crate::snap::{snap, snap_down, snap_size};
use kurbo::Point;

/// Auto-place a `width`×`height` widget.
///
/// Candidates keep one grid cell away from the display edges and stay above
/// `reserve_bottom` pixels at the bottom. Columns are tried from the
/// rightmost one leftwards, rows top to bottom within each column. When
/// nothing is free the widget goes to the first cell in the top-left
/// corner and may overlap.
pub fn auto_place(
    scene: &Scene,
    width: i32,
    height: i32,
    display: GridRect,
    pitch: i32,
    reserve_bottom: i32,
) -> GridRect {
    let w = snap_size(width as f64, pitch);
    let h = snap_size(height as f64, pitch);
    let margin = pitch;
    let min_x = display.left() + margin;
    let min_y = display.top() + margin;
    let max_x = display.right() - margin;
    let max_y = display.bottom() - reserve_bottom.max(0);

    let first_column = snap_down(max_x - w, pitch);
    let step = pitch.max(1) as usize;
    for x in (min_x..=first_column).rev().step_by(step) {
        for y in (min_y..=max_y - h).step_by(step) {
            let candidate = GridRect::new(x, y, w, h);
            if !scene.collides(&candidate) {
                return candidate;
            }
        }
    }

    log::debug!("No free {}x{} spot, falling back to the top-left cell", w, h);
    clamp(GridRect::new(min_x, min_y, w, h), display)
}

/// Place a widget with its top-left corner on the grid point nearest to
/// `point`, pulled inside the display. `None` if that spot is taken or the
/// widget cannot fit at all.
pub fn place_at(
    scene: &Scene,
    point: Point,
    width: i32,
    height: i32,
    display: GridRect,
    pitch: i32,
) -> Option<GridRect> {
    let w = snap_size(width as f64, pitch);
    let h = snap_size(height as f64, pitch);
    if w > display.w || h > display.h {
        return None;
    }
    let max_x = snap_down(display.right() - w, pitch);
    let max_y = snap_down(display.bottom() - h, pitch);
    let x = snap(point.x, pitch).min(max_x).max(display.left());
    let y = snap(point.y, pitch).min(max_y).max(display.top());
    let rect = GridRect::new(x, y, w, h);

    (display.contains_rect(&rect) && !scene.collides(&rect)).then_some(rect)
}
