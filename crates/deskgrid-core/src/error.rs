//! Editor error kinds.
//!
//! None of these end the session: callers log them and carry on.

use crate::component::ComponentId;
use crate::host::HostError;
use crate::scene::WidgetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Host capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("Widget not found: {0}")]
    WidgetNotFound(WidgetId),
    #[error("Invalid geometry on commit: {0}")]
    InvalidGeometryOnCommit(String),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] HostError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
