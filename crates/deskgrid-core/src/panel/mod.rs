//! Transient surfaces drawn over the desktop: the component gallery, the
//! right-click menu and the per-widget settings panel.
//!
//! None of this state is persisted and none of it may mutate the scene
//! directly; each surface reports what the user asked for and the session
//! applies it.

mod gallery;
mod menu;
mod settings;

pub use gallery::{GalleryAction, GalleryDock, GalleryPanel, GalleryView};
pub use menu::{ContextMenu, MenuItem};
pub use settings::{SettingsInit, SettingsMessage, SettingsPanel};
