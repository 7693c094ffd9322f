/// Input routing: window events turned into the discrete events scene
/// objects subscribe to.
///
/// Drags become `Move` deltas (only while a mouse button is held) and left
/// presses become `Click`s at the last known cursor position. The `World`
/// delivers both to subscribers as messages sent from [`INPUT_SENDER`].

use glam::Vec2;
use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Sender name of routed input messages
pub const INPUT_SENDER: &str = "Input";

/// Default scale applied to cursor deltas
pub const DEFAULT_SENSITIVITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Drag delta in scaled pixels
    Move { dx: f32, dy: f32 },
    /// Click in raster coordinates, origin top-left
    Click { x: f32, y: f32 },
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    sensitivity: f32,
    cursor: Option<Vec2>,
    held: FxHashSet<MouseButton>,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            cursor: None,
            held: FxHashSet::default(),
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Ignored unless finite and positive
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() && sensitivity > 0.0 {
            self.sensitivity = sensitivity;
        } else {
            crate::engine_debug!("vitrine::InputRouter", "Ignoring sensitivity {}", sensitivity);
        }
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        !self.held.is_empty()
    }

    /// Record the cursor position; yields a `Move` while a button is held
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<InputEvent> {
        let position = Vec2::new(x, y);
        let previous = self.cursor.replace(position)?;
        if !self.is_dragging() {
            return None;
        }
        let delta = (position - previous) * self.sensitivity;
        Some(InputEvent::Move { dx: delta.x, dy: delta.y })
    }

    /// Track held buttons; a left press yields a `Click` at the cursor
    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputEvent> {
        match state {
            ElementState::Pressed => {
                self.held.insert(button);
                let cursor = self.cursor?;
                (button == MouseButton::Left).then_some(InputEvent::Click { x: cursor.x, y: cursor.y })
            }
            ElementState::Released => {
                self.held.remove(&button);
                None
            }
        }
    }

    /// Forget the cursor so the next move does not produce a jump
    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn focus_lost(&mut self) {
        self.held.clear();
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*button, *state),
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                None
            }
            WindowEvent::Focused(false) => {
                self.focus_lost();
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
