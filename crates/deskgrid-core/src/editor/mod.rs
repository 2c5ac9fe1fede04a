//! Layout editor: turns pointer streams into widget geometry.
//!
//! At most one gesture runs at a time. A gesture owns only provisional
//! state; the scene is written once, when the gesture ends, and only if the
//! result is valid.

mod align;
mod drag;
mod marquee;
mod placement;
mod resize;

pub use align::{AlignAction, align};
pub use drag::{DragGesture, DragPhase, SnapPreview};
pub use marquee::MarqueeGesture;
pub use placement::{auto_place, place_at};
pub use resize::{ResizeGesture, resize_handle};

use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::geometry::GridRect;
use crate::input::Modifiers;
use crate::scene::{Scene, Widget, WidgetId};
use crate::selection::Selection;
use kurbo::{Point, Rect};

/// The gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drag(DragGesture),
    Resize(ResizeGesture),
    Marquee(MarqueeGesture),
}

/// What a finished gesture did to the scene or selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Unchanged,
    SelectionChanged,
    Moved(Vec<WidgetId>),
    Resized(WidgetId),
    Removed(Vec<WidgetId>),
}

impl GestureOutcome {
    /// Whether the scene changed and must be persisted.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            GestureOutcome::Moved(_) | GestureOutcome::Resized(_) | GestureOutcome::Removed(_)
        )
    }
}

/// Geometry a gesture is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub display: GridRect,
    pub pitch: i32,
    /// Gallery area; a drag released here deletes the dragged widgets.
    pub gallery: Option<GridRect>,
}

/// Drives drag, resize and marquee gestures.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    gesture: Gesture,
    config: EditorConfig,
}

impl LayoutEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_marquee_active(&self) -> bool {
        matches!(self.gesture, Gesture::Marquee(_))
    }

    /// Start a gesture for a press on the canvas. Any gesture still running
    /// is dropped first.
    pub fn pointer_down(
        &mut self,
        point: Point,
        modifiers: Modifiers,
        scene: &Scene,
        selection: &mut Selection,
    ) {
        self.cancel();

        let Some(widget) = scene.widget_at_point(point) else {
            if !modifiers.is_additive() {
                selection.clear();
            }
            self.gesture = Gesture::Marquee(MarqueeGesture::new(point));
            return;
        };

        let id = widget.id.clone();
        if resize_handle(widget.rect(), self.config.resize_handle_size).contains_point(point) {
            self.gesture = Gesture::Resize(ResizeGesture::begin(id, point, widget.rect()));
            return;
        }

        if modifiers.is_additive() {
            selection.add(id.clone());
        } else if !selection.contains(&id) {
            selection.replace(id.clone());
        }
        self.gesture = Gesture::Drag(DragGesture::arm(id, point, scene, selection));
    }

    pub fn pointer_move(&mut self, point: Point, scene: &Scene, surface: &Surface) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drag(drag) => drag.update(
                point,
                scene,
                surface.display,
                surface.pitch,
                self.config.drag_threshold,
            ),
            Gesture::Resize(resize) => resize.update(point, surface.display, surface.pitch),
            Gesture::Marquee(marquee) => marquee.update(point),
        }
    }

    /// End the current gesture. The editor is idle afterwards whatever the
    /// result.
    pub fn pointer_up(
        &mut self,
        point: Point,
        scene: &mut Scene,
        selection: &mut Selection,
        surface: &Surface,
    ) -> EditorResult<GestureOutcome> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(GestureOutcome::Unchanged),
            Gesture::Drag(drag) => {
                let over_gallery = surface
                    .gallery
                    .is_some_and(|gallery| gallery.contains_point(point));
                let outcome = drag.finish(
                    point,
                    scene,
                    surface.display,
                    surface.pitch,
                    self.config.drag_threshold,
                    over_gallery,
                )?;
                if outcome.is_commit() {
                    selection.retain_existing(scene);
                    selection.geometry_changed();
                }
                Ok(outcome)
            }
            Gesture::Resize(resize) => {
                let outcome = resize.finish(point, scene, surface.display, surface.pitch)?;
                if outcome.is_commit() {
                    selection.geometry_changed();
                }
                Ok(outcome)
            }
            Gesture::Marquee(marquee) => {
                Ok(marquee.finish(point, scene, selection, self.config.marquee_min_size))
            }
        }
    }

    /// Abandon the current gesture. Nothing was written to the scene, so
    /// this is also the revert path.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        self.gesture = Gesture::Idle;
        was_active
    }

    /// Where `widget` should be drawn right now.
    pub fn visual_rect(&self, widget: &Widget) -> Rect {
        let provisional = match &self.gesture {
            Gesture::Drag(drag) => drag.visual_rect(&widget.id),
            Gesture::Resize(resize) if resize.target() == &widget.id => Some(resize.visual_rect()),
            _ => None,
        };
        provisional.unwrap_or_else(|| widget.rect().to_kurbo())
    }

    /// Snapped drop indicator for the current drag or resize.
    pub fn snap_preview(&self) -> Option<SnapPreview> {
        match &self.gesture {
            Gesture::Drag(drag) => drag.preview(),
            Gesture::Resize(resize) => Some(SnapPreview {
                rect: resize.preview(),
                valid: true,
            }),
            _ => None,
        }
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }
}
