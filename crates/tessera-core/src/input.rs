//! Input contract.
//!
//! The engine never talks to devices. The host polls them and exposes the
//! result through [`InputSource`]; trigger-style components query it once
//! per update. [`InputState`] is the plain snapshot implementation most hosts
//! (and all headless runs) use.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Mouse buttons the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Platform key code. Mapping from physical keys is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u32);

/// Queryable input state, polled during update.
pub trait InputSource {
    fn mouse_down(&self, button: MouseButton) -> bool;

    fn key_down(&self, key: KeyCode) -> bool;

    /// Cursor position in window pixels.
    fn cursor_screen(&self) -> Vec2;

    /// Cursor position in world units.
    fn cursor_world(&self) -> Vec2;

    /// Whether the window currently has focus.
    fn focused(&self) -> bool;
}

/// Snapshot of held buttons, cursor position and focus.
///
/// World-space cursor position is derived from the screen position through
/// `view_origin` (the world point shown at the window's top-left corner) and
/// `view_scale` (world units per pixel).
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub buttons_down: HashSet<MouseButton>,
    pub keys_down: HashSet<KeyCode>,
    pub cursor: Vec2,
    pub focused: bool,
    pub view_origin: Vec2,
    pub view_scale: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            buttons_down: HashSet::new(),
            keys_down: HashSet::new(),
            cursor: Vec2::ZERO,
            focused: true,
            view_origin: Vec2::ZERO,
            view_scale: 1.0,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: MouseButton) {
        self.buttons_down.insert(button);
    }

    pub fn release(&mut self, button: MouseButton) {
        self.buttons_down.remove(&button);
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn set_cursor(&mut self, screen: Vec2) {
        self.cursor = screen;
    }

    /// Update focus. Losing focus clears every held button and key so
    /// nothing stays stuck down while another window has the input.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.buttons_down.clear();
            self.keys_down.clear();
        }
    }
}

impl InputSource for InputState {
    fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    fn cursor_screen(&self) -> Vec2 {
        self.cursor
    }

    fn cursor_world(&self) -> Vec2 {
        self.view_origin + self.cursor * self.view_scale
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
