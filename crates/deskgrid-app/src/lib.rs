//! DeskGrid Application
//!
//! Native shell that binds an editor session to the desktop and speaks
//! line-delimited JSON with the host plugin runtime.

mod app;
mod host;
mod protocol;

pub use app::{App, AppConfig, AppError, parse_display};
pub use host::DesktopHost;
pub use protocol::{EngineEvent, HostCommand};
