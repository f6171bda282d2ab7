use rustc_hash::FxHashSet;

use crate::math::Vector2;
use crate::render::window::{InputEvent, MouseButton};

/// Input state accumulated from window events.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Cursor position inside the window
    pub cursor_position: Vector2,
    /// Cursor movement since the last frame
    pub cursor_delta: Vector2,
    /// Scroll amount this frame (x, y)
    pub scroll_delta: Vector2,
    pub screen_size: Vector2,
    /// Set when the window asked to close this frame
    pub close_requested: bool,
    has_cursor: bool,
    mouse_buttons: Vec<MouseButton>,
    keys: FxHashSet<u32>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame state.
    pub fn begin_frame(&mut self) {
        self.cursor_delta = Vector2::ZERO;
        self.scroll_delta = Vector2::ZERO;
        self.close_requested = false;
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Resized { width, height } => self.handle_resize(width, height),
            InputEvent::CursorMoved { x, y } => self.handle_cursor_move(x, y),
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    if !self.mouse_buttons.contains(&button) {
                        self.mouse_buttons.push(button);
                    }
                } else {
                    self.mouse_buttons.retain(|b| *b != button);
                }
            }
            InputEvent::MouseWheel { dx, dy } => self.scroll_delta += Vector2::new(dx, dy),
            InputEvent::Key { code, pressed } => {
                if pressed {
                    self.keys.insert(code);
                } else {
                    self.keys.remove(&code);
                }
            }
            InputEvent::CloseRequested => self.close_requested = true,
        }
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vector2::new(width as f32, height as f32);
    }

    fn handle_cursor_move(&mut self, x: f32, y: f32) {
        let new_pos = Vector2::new(x, y);
        // No delta on the first sample
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_key_down(&self, code: u32) -> bool {
        self.keys.contains(&code)
    }
}
