//! DeskGrid Core Library
//!
//! Platform-agnostic layout editor and window-shape engine for desktop widgets.

pub mod component;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod mode;
pub mod panel;
pub mod persistence;
pub mod scene;
pub mod selection;
pub mod session;
pub mod snap;
pub mod storage;
pub mod window_shape;

pub use component::{Component, ComponentCatalog, ComponentId, RecommendedSize, SortOrder};
pub use config::EditorConfig;
pub use editor::{AlignAction, GestureOutcome, LayoutEditor, Surface};
pub use error::{EditorError, EditorResult};
pub use geometry::GridRect;
pub use host::{Host, HostError, HostResult, MemoryHost, WindowHandle};
pub use input::{InputState, Modifiers, MouseButton, PointerEvent};
pub use mode::{EditMode, ModeController, ToggleOutcome};
pub use scene::{Scene, Widget, WidgetConfig, WidgetId};
pub use selection::Selection;
pub use session::{EditorSession, SessionEvent, WidgetMessage, WidgetStatus, WidgetView};
pub use snap::{DEFAULT_GRID_PITCH, GridPitch, snap};
pub use storage::{FileStorage, StorageError};
pub use window_shape::{OverlayState, ShapeSynchronizer, WindowShape, compute_shape};
