//! Line-delimited JSON protocol spoken with the host plugin runtime.
//!
//! Every stdin line is one [`HostCommand`]; every stdout line is one
//! [`EngineEvent`].

use deskgrid_core::editor::AlignAction;
use deskgrid_core::host::WindowHandle;
use deskgrid_core::input::PointerEvent;
use deskgrid_core::mode::EditMode;
use deskgrid_core::panel::{GalleryAction, MenuItem, SettingsMessage};
use deskgrid_core::scene::WidgetId;
use deskgrid_core::session::{SessionEvent, WidgetMessage};
use deskgrid_core::window_shape::WindowShape;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Commands received from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum HostCommand {
    Pointer { event: PointerEvent },
    ToggleEditMode,
    SetEditMode { mode: EditMode },
    /// A widget web view started or finished loading.
    ContentLoading { loading: bool },
    FocusLost,
    /// The display was resized or moved.
    Display { x: i32, y: i32, width: i32, height: i32 },
    AddComponent { component_id: String },
    DropComponent { component_id: String, x: f64, y: f64 },
    RemoveWidget { widget_id: WidgetId },
    Align { action: AlignAction },
    Gallery { action: GalleryAction },
    MenuItem { item: MenuItem },
    OpenSettings { widget_id: WidgetId },
    Settings { message: SettingsMessage },
    WidgetReady { widget_id: WidgetId },
    Widget { widget_id: WidgetId, message: WidgetMessage },
    ReloadCatalog,
    Attach { window: WindowHandle },
    OpenPath { path: PathBuf },
    Flush,
    Quit,
}

/// Events emitted to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    IgnoreMouse { ignore: bool },
    WindowShape { shape: WindowShape },
    Attach { window: WindowHandle },
    OpenPath { path: PathBuf },
    Session(SessionEvent),
    Error { message: String },
}

impl HostCommand {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

impl EngineEvent {
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskgrid_core::geometry::GridRect;
    use deskgrid_core::input::MouseButton;
    use kurbo::Point;

    #[test]
    fn test_parse_pointer_command() {
        let command = HostCommand::parse(
            r#"{"cmd":"pointer","event":{"kind":"down","position":{"x":10.0,"y":20.0},"button":"left"}}"#,
        )
        .unwrap();
        match command {
            HostCommand::Pointer {
                event: PointerEvent::Down { position, button, modifiers },
            } => {
                assert_eq!(position, Point::new(10.0, 20.0));
                assert_eq!(button, MouseButton::Left);
                assert!(!modifiers.is_additive());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let command =
            HostCommand::parse(r#"{"cmd":"drop_component","componentId":"clock","x":120.0,"y":80.0}"#)
                .unwrap();
        assert_eq!(
            command,
            HostCommand::DropComponent {
                component_id: "clock".to_string(),
                x: 120.0,
                y: 80.0,
            }
        );
    }

    #[test]
    fn test_parse_nested_messages() {
        let command = HostCommand::parse(
            r#"{"cmd":"settings","message":{"type":"save-settings","config":{"tz":"UTC"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            command,
            HostCommand::Settings { message: SettingsMessage::SaveSettings(ref c) } if c["tz"] == "UTC"
        ));

        let command = HostCommand::parse(r#"{"cmd":"align","action":"center-h"}"#).unwrap();
        assert_eq!(command, HostCommand::Align { action: AlignAction::CenterH });
    }

    #[test]
    fn test_malformed_command() {
        assert!(HostCommand::parse("not json").is_err());
        assert!(HostCommand::parse(r#"{"cmd":"explode"}"#).is_err());
    }

    #[test]
    fn test_event_lines() {
        let line = EngineEvent::WindowShape {
            shape: WindowShape::Regions(vec![GridRect::new(0, 0, 100, 50)]),
        }
        .to_line()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "window_shape");
        assert_eq!(value["shape"]["type"], "regions");
        assert_eq!(value["shape"]["rects"][0]["w"], 100);

        let line = EngineEvent::Session(SessionEvent::ModeChanged { mode: EditMode::Edit })
            .to_line()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "session");
        assert_eq!(value["event"], "mode_changed");
        assert_eq!(value["mode"], "edit");
    }
}
