//! View/edit mode and deferral of toggles while widget content loads.

use serde::{Deserialize, Serialize};

/// Whether the desktop surface is being arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    View,
    Edit,
}

impl EditMode {
    pub fn is_edit(self) -> bool {
        self == EditMode::Edit
    }

    pub fn toggled(self) -> Self {
        match self {
            EditMode::View => EditMode::Edit,
            EditMode::Edit => EditMode::View,
        }
    }
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The mode changed to the contained value.
    Switched(EditMode),
    /// Widget content is still loading; the toggle will be applied later.
    Deferred,
}

/// Owns the current mode and the queue of toggles that arrived while
/// widget content was loading.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: EditMode,
    content_loading: bool,
    pending_toggles: u32,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_edit()
    }

    pub fn is_content_loading(&self) -> bool {
        self.content_loading
    }

    pub fn pending_toggles(&self) -> u32 {
        self.pending_toggles
    }

    /// Flip the mode now, or queue the flip if content is loading.
    pub fn request_toggle(&mut self) -> ToggleOutcome {
        if self.content_loading {
            self.pending_toggles += 1;
            log::debug!("Edit mode toggle deferred ({} pending)", self.pending_toggles);
            return ToggleOutcome::Deferred;
        }
        self.mode = self.mode.toggled();
        ToggleOutcome::Switched(self.mode)
    }

    /// Force a specific mode, dropping any queued toggles.
    pub fn set_mode(&mut self, mode: EditMode) -> bool {
        self.pending_toggles = 0;
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Record a loading transition. When loading finishes, queued toggles
    /// collapse by parity; returns the mode to switch to, if any.
    pub fn set_content_loading(&mut self, loading: bool) -> Option<EditMode> {
        self.content_loading = loading;
        if loading || self.pending_toggles == 0 {
            return None;
        }
        let flips = std::mem::take(&mut self.pending_toggles);
        if flips % 2 == 0 {
            log::debug!("Deferred toggles cancelled out");
            return None;
        }
        self.mode = self.mode.toggled();
        Some(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_immediate() {
        let mut mode = ModeController::new();
        assert_eq!(mode.request_toggle(), ToggleOutcome::Switched(EditMode::Edit));
        assert!(mode.is_editing());
        assert_eq!(mode.request_toggle(), ToggleOutcome::Switched(EditMode::View));
    }

    #[test]
    fn test_toggle_deferred_until_loaded() {
        let mut mode = ModeController::new();
        mode.set_content_loading(true);
        assert_eq!(mode.request_toggle(), ToggleOutcome::Deferred);
        assert_eq!(mode.mode(), EditMode::View);

        assert_eq!(mode.set_content_loading(false), Some(EditMode::Edit));
        assert!(mode.is_editing());
        assert_eq!(mode.pending_toggles(), 0);
    }

    #[test]
    fn test_even_deferred_toggles_cancel() {
        let mut mode = ModeController::new();
        mode.set_content_loading(true);
        mode.request_toggle();
        mode.request_toggle();
        assert_eq!(mode.set_content_loading(false), None);
        assert_eq!(mode.mode(), EditMode::View);
    }

    #[test]
    fn test_set_mode_drops_pending() {
        let mut mode = ModeController::new();
        mode.set_content_loading(true);
        mode.request_toggle();
        assert!(mode.set_mode(EditMode::Edit));
        assert_eq!(mode.set_content_loading(false), None);
        assert!(mode.is_editing());
    }
}
