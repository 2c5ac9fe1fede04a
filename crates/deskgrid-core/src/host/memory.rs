//! In-memory host implementation.

use super::{BoxFuture, Host, HostError, HostResult, WindowHandle};
use crate::component::Component;
use crate::scene::Scene;
use crate::window_shape::WindowShape;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Default)]
struct State {
    /// `None` means the capability is not ready.
    components: Option<Vec<Component>>,
    config: Option<Scene>,
    fail_loads: bool,
    fail_saves: bool,
    saves: Vec<Scene>,
    region_pushes: Vec<WindowShape>,
    ignore_mouse_calls: Vec<bool>,
    attached: Vec<WindowHandle>,
    opened_paths: Vec<PathBuf>,
}

/// Host that keeps everything in memory and records every call.
///
/// Used by tests and by headless runs of the editor.
#[derive(Default)]
pub struct MemoryHost {
    state: RwLock<State>,
}

fn lock_error(e: impl std::fmt::Display) -> HostError {
    HostError::Transport(format!("Lock error: {}", e))
}

impl MemoryHost {
    /// Create a host with an empty component listing and no saved config.
    pub fn new() -> Self {
        Self::with_components(Vec::new())
    }

    pub fn with_components(components: Vec<Component>) -> Self {
        let host = Self::default();
        host.set_components(Some(components));
        host
    }

    /// A host whose capability API is not ready yet.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Seed the persisted config.
    pub fn with_config(self, scene: Scene) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.config = Some(scene);
        }
        self
    }

    /// Replace the component listing; `None` makes listing unavailable.
    pub fn set_components(&self, components: Option<Vec<Component>>) {
        if let Ok(mut state) = self.state.write() {
            state.components = components;
        }
    }

    pub fn set_fail_loads(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_loads = fail;
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_saves = fail;
        }
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.read().map(|s| s.saves.len()).unwrap_or(0)
    }

    pub fn last_saved(&self) -> Option<Scene> {
        self.state.read().ok().and_then(|s| s.saves.last().cloned())
    }

    pub fn region_pushes(&self) -> Vec<WindowShape> {
        self.state.read().map(|s| s.region_pushes.clone()).unwrap_or_default()
    }

    pub fn last_shape(&self) -> Option<WindowShape> {
        self.state.read().ok().and_then(|s| s.region_pushes.last().cloned())
    }

    pub fn ignore_mouse_calls(&self) -> Vec<bool> {
        self.state.read().map(|s| s.ignore_mouse_calls.clone()).unwrap_or_default()
    }

    pub fn attached_windows(&self) -> Vec<WindowHandle> {
        self.state.read().map(|s| s.attached.clone()).unwrap_or_default()
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.state.read().map(|s| s.opened_paths.clone()).unwrap_or_default()
    }
}

impl Host for MemoryHost {
    fn list_components(&self) -> BoxFuture<'_, HostResult<Vec<Component>>> {
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            state
                .components
                .clone()
                .ok_or_else(|| HostError::Unavailable("component listing".to_string()))
        })
    }

    fn load_config(&self) -> BoxFuture<'_, HostResult<Option<Scene>>> {
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            if state.fail_loads {
                return Err(HostError::Io("config store unreadable".to_string()));
            }
            Ok(state.config.clone())
        })
    }

    fn save_config(&self, snapshot: &Scene) -> HostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.fail_saves {
            return Err(HostError::Io("config store rejected write".to_string()));
        }
        state.config = Some(snapshot.clone());
        state.saves.push(snapshot.clone());
        Ok(())
    }

    fn set_ignore_mouse(&self, ignore: bool) {
        if let Ok(mut state) = self.state.write() {
            state.ignore_mouse_calls.push(ignore);
        }
    }

    fn set_interactive_regions(&self, shape: &WindowShape) {
        if let Ok(mut state) = self.state.write() {
            state.region_pushes.push(shape.clone());
        }
    }

    fn attach_to_desktop_background(&self, window: WindowHandle) -> HostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.attached.push(window);
        Ok(())
    }

    fn open_external_path(&self, path: &Path) -> HostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.opened_paths.push(path.to_path_buf());
        Ok(())
    }
}
