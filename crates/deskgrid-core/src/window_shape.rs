//! Window shape: which parts of the borderless desktop window accept
//! pointer input.
//!
//! The widget window covers the whole display and sits above the desktop
//! icons. Outside edit mode only the widgets themselves and any open popup
//! may swallow clicks; everything else must fall through to the desktop.

use crate::geometry::GridRect;
use crate::host::Host;
use crate::scene::Scene;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Interactive region of the widget window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rects", rename_all = "snake_case")]
pub enum WindowShape {
    /// The entire window accepts input (edit mode).
    WholeWindow,
    /// Only these rectangles accept input.
    Regions(Vec<GridRect>),
}

impl WindowShape {
    /// True when no part of the window accepts input.
    pub fn is_empty(&self) -> bool {
        matches!(self, WindowShape::Regions(rects) if rects.is_empty())
    }

    /// Whether a pointer at `point` would be captured by the window.
    pub fn accepts_point(&self, point: Point) -> bool {
        match self {
            WindowShape::WholeWindow => true,
            WindowShape::Regions(rects) => rects.iter().any(|r| r.contains_point(point)),
        }
    }
}

/// Transient UI state that affects the shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub edit_mode: bool,
    pub settings_panel: Option<GridRect>,
    pub context_menu: Option<GridRect>,
}

/// Derive the interactive region from committed scene state.
///
/// Edit mode claims the whole window. Otherwise the region is every widget
/// rectangle, then the settings panel, then the context menu, each clipped
/// to the display.
pub fn compute_shape(scene: &Scene, overlays: &OverlayState, display: GridRect) -> WindowShape {
    if overlays.edit_mode {
        return WindowShape::WholeWindow;
    }

    let rects = scene
        .widgets()
        .map(|w| w.rect())
        .chain(overlays.settings_panel)
        .chain(overlays.context_menu)
        .filter_map(|rect| rect.intersection(&display))
        .collect();
    WindowShape::Regions(rects)
}

/// Pushes the window shape to the host, skipping redundant calls.
#[derive(Debug, Clone, Default)]
pub struct ShapeSynchronizer {
    last_shape: Option<WindowShape>,
    last_ignore_mouse: Option<bool>,
    push_count: u64,
}

impl ShapeSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `shape` if it differs from the last one pushed.
    /// Returns whether the host was called.
    pub fn sync(&mut self, host: &dyn Host, shape: WindowShape) -> bool {
        if self.last_shape.as_ref() == Some(&shape) {
            return false;
        }

        let ignore = shape.is_empty();
        if self.last_ignore_mouse != Some(ignore) {
            host.set_ignore_mouse(ignore);
            self.last_ignore_mouse = Some(ignore);
        }

        match &shape {
            WindowShape::WholeWindow => log::debug!("Window shape: whole window"),
            WindowShape::Regions(rects) => log::debug!("Window shape: {} regions", rects.len()),
        }
        host.set_interactive_regions(&shape);
        self.last_shape = Some(shape);
        self.push_count += 1;
        true
    }

    /// The shape most recently pushed to the host.
    pub fn current(&self) -> Option<&WindowShape> {
        self.last_shape.as_ref()
    }

    pub fn push_count(&self) -> u64 {
        self.push_count
    }

    /// Forget what was pushed, e.g. after the host recreated the window.
    pub fn invalidate(&mut self) {
        self.last_shape = None;
        self.last_ignore_mouse = None;
    }
}
