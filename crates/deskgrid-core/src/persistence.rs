//! Loading and saving the scene through the host's config store.

use crate::error::{EditorError, EditorResult};
use crate::host::Host;
use crate::scene::Scene;

/// Tracks whether the in-memory scene has reached the host.
///
/// The in-memory scene stays authoritative when a save fails; the scene is
/// kept dirty so a later [`PersistenceBridge::flush`] can retry.
#[derive(Debug, Clone, Default)]
pub struct PersistenceBridge {
    dirty: bool,
    save_count: u64,
    last_error: Option<String>,
}

impl PersistenceBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted scene. Missing or unreadable config yields an
    /// empty scene.
    pub async fn load(&mut self, host: &dyn Host) -> Scene {
        self.dirty = false;
        match host.load_config().await {
            Ok(Some(scene)) => scene,
            Ok(None) => {
                log::info!("No saved layout, starting empty");
                Scene::new()
            }
            Err(e) => {
                log::warn!("Failed to load layout, starting empty: {}", e);
                self.last_error = Some(e.to_string());
                Scene::new()
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save_count(&self) -> u64 {
        self.save_count
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Hand a snapshot to the host.
    pub fn save(&mut self, host: &dyn Host, scene: &Scene) -> EditorResult<()> {
        self.dirty = true;
        match host.save_config(scene) {
            Ok(()) => {
                self.dirty = false;
                self.save_count += 1;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Persistence failure: {}", e);
                self.last_error = Some(e.to_string());
                Err(EditorError::Persistence(e))
            }
        }
    }

    /// Save only if a previous save did not go through.
    pub fn flush(&mut self, host: &dyn Host, scene: &Scene) -> EditorResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(host, scene)?;
        Ok(true)
    }
}
