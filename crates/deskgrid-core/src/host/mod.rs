//! Capability surface supplied by the host plugin runtime.
//!
//! The session never owns the host; every operation that may reach it takes
//! `&dyn Host`. Component listing and config loading are asynchronous,
//! everything else is fire-and-forget.

mod memory;

pub use memory::MemoryHost;

use crate::component::Component;
use crate::scene::Scene;
use crate::window_shape::WindowShape;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

/// Host capability errors.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Boxed future for async host operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Native handle of the widget window, as understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

/// Capabilities consumed by the editor.
pub trait Host {
    /// List every component the runtime knows about.
    fn list_components(&self) -> BoxFuture<'_, HostResult<Vec<Component>>>;

    /// Load the persisted scene, `None` if nothing was saved yet.
    fn load_config(&self) -> BoxFuture<'_, HostResult<Option<Scene>>>;

    /// Persist a scene snapshot. Must not block on durability.
    fn save_config(&self, snapshot: &Scene) -> HostResult<()>;

    /// Let pointer input fall through the whole window.
    fn set_ignore_mouse(&self, ignore: bool);

    /// Replace the window's interactive region.
    fn set_interactive_regions(&self, shape: &WindowShape);

    /// Pin the widget window to the desktop background.
    fn attach_to_desktop_background(&self, window: WindowHandle) -> HostResult<()>;

    /// Open a file or folder with the system handler.
    fn open_external_path(&self, path: &Path) -> HostResult<()>;
}
