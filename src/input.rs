//! Pointer and keyboard input tracking.
//!
//! [`Input`] folds raw window events into the continuous state the frame loop
//! needs: where the cursor is, which buttons are held, and how far the pointer
//! was dragged or the wheel scrolled since the last frame. Discrete pointer
//! callbacks (enter/leave/down/up on objects) are dispatched separately by
//! [`crate::picking::PointerTracker`].

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{
    ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent,
};
use winit::keyboard::Key;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Pixels per wheel "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// Input state tracking for the pointer.
#[derive(Debug, Default)]
pub struct Input {
    mouse_held: HashSet<MouseButton>,

    /// `None` while the cursor is outside the window.
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,

    /// Accumulated wheel lines since the last frame. Positive is up/away.
    scroll_delta: f32,

    window_size: (u32, u32),
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Cursor position in window pixels, if the cursor is inside the window.
    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    /// Cursor position in normalized device coordinates (-1 to 1, Y up).
    pub fn mouse_ndc(&self) -> Option<Vec2> {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return None;
        }
        self.mouse_position
            .map(|p| Vec2::new((p.x / w as f32) * 2.0 - 1.0, 1.0 - (p.y / h as f32) * 2.0))
    }

    /// Cursor movement since the last frame, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Wheel movement since the last frame, in lines.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Current window size in physical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Clear per-frame deltas. Call after the frame has consumed them.
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = MouseButton::from_winit(*button) {
                    self.on_button(btn, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.on_scroll(lines);
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }
            _ => {}
        }
    }

    pub(crate) fn on_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_held.insert(button);
        } else {
            self.mouse_held.remove(&button);
        }
    }

    pub(crate) fn on_cursor_moved(&mut self, position: Vec2) {
        if let Some(last) = self.mouse_position {
            self.mouse_delta += position - last;
        }
        self.mouse_position = Some(position);
    }

    pub(crate) fn on_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }
}

/// The character typed by a key press, ignoring releases and auto-repeat.
pub fn pressed_text(event: &KeyEvent) -> Option<&str> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match &event.logical_key {
        Key::Character(text) => Some(text.as_str()),
        _ => None,
    }
}
