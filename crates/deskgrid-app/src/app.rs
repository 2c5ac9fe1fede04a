//! Application state and the stdin/stdout command loop.

use crate::host::DesktopHost;
use crate::protocol::{EngineEvent, HostCommand};
use deskgrid_core::config::EditorConfig;
use deskgrid_core::error::EditorResult;
use deskgrid_core::geometry::GridRect;
use deskgrid_core::session::EditorSession;
use deskgrid_core::storage::{FileStorage, StorageError, default_data_dir};
use kurbo::Point;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use thiserror::Error;

/// Errors that stop the shell from starting or talking to the host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shell configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// JSON array of components; without it the catalog is unavailable.
    pub catalog_path: Option<PathBuf>,
    pub display: GridRect,
    pub editor_config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().unwrap_or_else(|_| PathBuf::from("deskgrid")),
            catalog_path: None,
            display: GridRect::new(0, 0, 1920, 1080),
            editor_config_path: None,
        }
    }
}

impl AppConfig {
    /// Read `DESKGRID_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(dir) = lookup("DESKGRID_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.catalog_path = lookup("DESKGRID_CATALOG").map(PathBuf::from);
        if let Some(display) = lookup("DESKGRID_DISPLAY") {
            config.display = parse_display(&display)?;
        }
        config.editor_config_path = lookup("DESKGRID_EDITOR_CONFIG").map(PathBuf::from);
        Ok(config)
    }

    /// Load the editor config file, or defaults when none is set.
    pub fn editor_config(&self) -> Result<EditorConfig, AppError> {
        match &self.editor_config_path {
            Some(path) => Ok(EditorConfig::from_json(&std::fs::read_to_string(path)?)?),
            None => Ok(EditorConfig::default()),
        }
    }
}

/// Parse `WIDTHxHEIGHT` into a display rectangle at the origin.
pub fn parse_display(value: &str) -> Result<GridRect, AppError> {
    let invalid = || AppError::Config(format!("display must be WIDTHxHEIGHT, got {:?}", value));
    let (w, h) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: i32 = w.trim().parse().map_err(|_| invalid())?;
    let h: i32 = h.trim().parse().map_err(|_| invalid())?;
    if w <= 0 || h <= 0 {
        return Err(invalid());
    }
    Ok(GridRect::new(0, 0, w, h))
}

/// A running shell: one session bound to one desktop host.
pub struct App {
    host: DesktopHost,
    events: Receiver<EngineEvent>,
    session: EditorSession,
    errors: Vec<EngineEvent>,
    running: bool,
}

impl App {
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let editor_config = config.editor_config()?;
        let storage = FileStorage::new(config.data_dir.clone())?;
        log::info!("Layout stored in {}", storage.base_path().display());
        let (host, events) = DesktopHost::new(storage, config.catalog_path.clone())?;
        let session = EditorSession::load(&host, config.display, editor_config).await;
        Ok(Self {
            host,
            events,
            session,
            errors: Vec::new(),
            running: true,
        })
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handle one protocol line. Malformed lines are logged and skipped.
    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match HostCommand::parse(line) {
            Ok(command) => self.dispatch(command),
            Err(e) => log::warn!("Skipping malformed command: {}", e),
        }
    }

    pub fn dispatch(&mut self, command: HostCommand) {
        log::debug!("Command: {:?}", command);
        let host = &self.host;
        let session = &mut self.session;
        let result: EditorResult<()> = match command {
            HostCommand::Pointer { event } => {
                session.handle_pointer(host, event);
                Ok(())
            }
            HostCommand::ToggleEditMode => {
                session.toggle_edit_mode(host);
                Ok(())
            }
            HostCommand::SetEditMode { mode } => {
                session.set_edit_mode(host, mode);
                Ok(())
            }
            HostCommand::ContentLoading { loading } => {
                session.set_content_loading(host, loading);
                Ok(())
            }
            HostCommand::FocusLost => {
                session.focus_lost(host);
                Ok(())
            }
            HostCommand::Display { x, y, width, height } => {
                session.set_display_bounds(host, GridRect::new(x, y, width, height));
                Ok(())
            }
            HostCommand::AddComponent { component_id } => {
                session.add_component(host, &component_id).map(|_| ())
            }
            HostCommand::DropComponent { component_id, x, y } => session
                .drop_component(host, &component_id, Point::new(x, y))
                .map(|_| ()),
            HostCommand::RemoveWidget { widget_id } => session.remove_widget(host, &widget_id),
            HostCommand::Align { action } => {
                session.align_selection(host, action);
                Ok(())
            }
            HostCommand::Gallery { action } => session.gallery_action(host, action),
            HostCommand::MenuItem { item } => {
                session.activate_menu_item(host, item);
                Ok(())
            }
            HostCommand::OpenSettings { widget_id } => session.open_settings(host, &widget_id),
            HostCommand::Settings { message } => session.handle_settings_message(host, message),
            HostCommand::WidgetReady { widget_id } => session.widget_ready(&widget_id),
            HostCommand::Widget { widget_id, message } => {
                session.handle_widget_message(host, &widget_id, message)
            }
            HostCommand::ReloadCatalog => {
                pollster::block_on(session.refresh_catalog(host));
                Ok(())
            }
            HostCommand::Attach { window } => session.attach_window(host, window),
            HostCommand::OpenPath { path } => session.open_path(host, &path),
            HostCommand::Flush => session.flush(host).map(|_| ()),
            HostCommand::Quit => {
                log::info!("Quit requested");
                self.running = false;
                Ok(())
            }
        };

        if let Err(e) = result {
            log::warn!("{}", e);
            self.errors.push(EngineEvent::Error {
                message: e.to_string(),
            });
        }
    }

    /// Everything to send to the host since the last call: window calls
    /// first, then session messages.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        let mut out: Vec<EngineEvent> = self.events.try_iter().collect();
        out.extend(self.session.drain_events().into_iter().map(EngineEvent::Session));
        out.append(&mut self.errors);
        out
    }

    /// Serve commands from stdin until it closes or `quit` arrives.
    pub fn run_stdio(mut self) -> Result<(), AppError> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout().lock();

        write_events(&mut stdout, self.drain_events())?;
        for line in stdin.lock().lines() {
            self.handle_line(&line?);
            write_events(&mut stdout, self.drain_events())?;
            if !self.running {
                break;
            }
        }

        if let Err(e) = self.session.flush(&self.host) {
            log::error!("Unsaved layout changes lost: {}", e);
        }
        log::info!("Shutting down");
        Ok(())
    }
}

fn write_events(out: &mut impl Write, events: Vec<EngineEvent>) -> Result<(), AppError> {
    for event in events {
        writeln!(out, "{}", event.to_line()?)?;
    }
    out.flush()?;
    Ok(())
}
