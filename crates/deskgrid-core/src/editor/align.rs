//! Alignment of a multi-selection.

use crate::scene::{Scene, WidgetId};
use crate::selection::Selection;
use crate::snap::snap;
use serde::{Deserialize, Serialize};

/// Toolbar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignAction {
    Left,
    Right,
    Top,
    Bottom,
    CenterH,
    CenterV,
    MatchW,
    MatchH,
}

impl AlignAction {
    pub const ALL: [AlignAction; 8] = [
        AlignAction::Left,
        AlignAction::CenterH,
        AlignAction::Right,
        AlignAction::Top,
        AlignAction::CenterV,
        AlignAction::Bottom,
        AlignAction::MatchW,
        AlignAction::MatchH,
    ];
}

/// Align the selected widgets in place. Overlap is allowed.
///
/// Returns the ids that were aligned; empty when fewer than two widgets are
/// selected.
pub fn align(scene: &mut Scene, selection: &Selection, action: AlignAction) -> Vec<WidgetId> {
    let Some(bbox) = selection.bounding_box_of(scene) else {
        return Vec::new();
    };
    let pitch = scene.pitch();
    let center = bbox.center();
    let max_w = scene
        .widgets()
        .filter(|w| selection.contains(&w.id))
        .map(|w| w.w)
        .max()
        .unwrap_or(0);
    let max_h = scene
        .widgets()
        .filter(|w| selection.contains(&w.id))
        .map(|w| w.h)
        .max()
        .unwrap_or(0);

    let mut aligned = Vec::new();
    for widget in scene.widgets.iter_mut().filter(|w| selection.contains(&w.id)) {
        match action {
            AlignAction::Left => widget.x = bbox.left(),
            AlignAction::Right => widget.x = bbox.right() - widget.w,
            AlignAction::Top => widget.y = bbox.top(),
            AlignAction::Bottom => widget.y = bbox.bottom() - widget.h,
            AlignAction::CenterH => widget.x = snap(center.x - widget.w as f64 / 2.0, pitch),
            AlignAction::CenterV => widget.y = snap(center.y - widget.h as f64 / 2.0, pitch),
            AlignAction::MatchW => widget.w = max_w,
            AlignAction::MatchH => widget.h = max_h,
        }
        aligned.push(widget.id.clone());
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridRect;
    use crate::scene::Widget;

    fn setup() -> (Scene, Selection, WidgetId, WidgetId) {
        let mut scene = Scene::new();
        let a = scene.add_widget(Widget::new("clock", GridRect::new(0, 0, 100, 100)));
        let b = scene.add_widget(Widget::new("notes", GridRect::new(200, 50, 150, 200)));
        let mut selection = Selection::new();
        selection.add(a.clone());
        selection.add(b.clone());
        (scene, selection, a, b)
    }

    #[test]
    fn test_align_left() {
        let (mut scene, selection, a, b) = setup();
        let aligned = align(&mut scene, &selection, AlignAction::Left);
        assert_eq!(aligned.len(), 2);
        assert_eq!(scene.rect_of(&a).unwrap().x, 0);
        assert_eq!(scene.rect_of(&b).unwrap().x, 0);
    }

    #[test]
    fn test_align_right_and_bottom() {
        let (mut scene, selection, a, b) = setup();
        align(&mut scene, &selection, AlignAction::Right);
        align(&mut scene, &selection, AlignAction::Bottom);
        assert_eq!(scene.rect_of(&a), Some(GridRect::new(250, 150, 100, 100)));
        assert_eq!(scene.rect_of(&b), Some(GridRect::new(200, 50, 150, 200)));
    }

    #[test]
    fn test_center_is_snapped() {
        let (mut scene, selection, a, b) = setup();
        align(&mut scene, &selection, AlignAction::CenterH);
        // Bounding box center x is 175.
        assert_eq!(scene.rect_of(&a).unwrap().x, 150);
        assert_eq!(scene.rect_of(&b).unwrap().x, 100);
    }

    #[test]
    fn test_match_sizes() {
        let (mut scene, selection, a, _) = setup();
        align(&mut scene, &selection, AlignAction::MatchW);
        align(&mut scene, &selection, AlignAction::MatchH);
        assert_eq!(scene.rect_of(&a), Some(GridRect::new(0, 0, 150, 200)));
    }

    #[test]
    fn test_needs_two_selected() {
        let (mut scene, _, a, _) = setup();
        let mut selection = Selection::new();
        selection.add(a.clone());
        assert!(align(&mut scene, &selection, AlignAction::Right).is_empty());
        assert_eq!(scene.rect_of(&a).unwrap().x, 0);
    }

    #[test]
    fn test_action_names() {
        let names: Vec<String> = AlignAction::ALL
            .iter()
            .map(|a| serde_json::to_value(a).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["left", "center-h", "right", "top", "center-v", "bottom", "match-w", "match-h"]
        );
    }
}
