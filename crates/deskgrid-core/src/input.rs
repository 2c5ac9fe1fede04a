//! Pointer events for mouse and touch, plus adapters from `winit` events.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase};
use winit::keyboard::ModifiersState;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a `winit` button; auxiliary buttons are ignored.
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(MouseButton::Left),
            winit::event::MouseButton::Right => Some(MouseButton::Right),
            winit::event::MouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Shift or Ctrl extends the selection instead of replacing it.
    pub fn is_additive(&self) -> bool {
        self.shift || self.ctrl
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// Unified pointer event for mouse and touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }

    /// Translate a touch phase into the equivalent primary-button event.
    /// A cancelled touch ends the gesture exactly like a release.
    pub fn from_touch(phase: TouchPhase, location: PhysicalPosition<f64>) -> Self {
        let position = Point::new(location.x, location.y);
        match phase {
            TouchPhase::Started => PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers: Modifiers::default(),
            },
            TouchPhase::Moved => PointerEvent::Move { position },
            TouchPhase::Ended | TouchPhase::Cancelled => PointerEvent::Up {
                position,
                button: MouseButton::Left,
            },
        }
    }
}

/// Tracks cursor position, modifiers and held buttons across `winit` window
/// events and turns them into [`PointerEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in window coordinates.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    pressed_buttons: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle `WindowEvent::ModifiersChanged`.
    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = state.into();
    }

    /// Handle `WindowEvent::CursorMoved`.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerEvent {
        self.pointer_position = Point::new(position.x, position.y);
        PointerEvent::Move {
            position: self.pointer_position,
        }
    }

    /// Handle `WindowEvent::MouseInput`.
    pub fn mouse_input(
        &mut self,
        state: ElementState,
        button: winit::event::MouseButton,
    ) -> Option<PointerEvent> {
        let button = MouseButton::from_winit(button)?;
        let position = self.pointer_position;
        match state {
            ElementState::Pressed => {
                self.pressed_buttons.insert(button);
                Some(PointerEvent::Down {
                    position,
                    button,
                    modifiers: self.modifiers,
                })
            }
            ElementState::Released => {
                // A release without a matching press belongs to a gesture
                // that started outside the window.
                if !self.pressed_buttons.remove(&button) {
                    return None;
                }
                Some(PointerEvent::Up { position, button })
            }
        }
    }

    /// Handle `WindowEvent::Touch`.
    pub fn touch(&mut self, phase: TouchPhase, location: PhysicalPosition<f64>) -> PointerEvent {
        self.pointer_position = Point::new(location.x, location.y);
        PointerEvent::from_touch(phase, location)
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }
}
