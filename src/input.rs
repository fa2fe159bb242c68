use std::collections::HashMap;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Discrete camera commands delivered to the frame driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    RotateLeft,
    RotateRight,
    ZoomIn,
    ZoomOut,
}

/// Maps physical keys to [`InputEvent`]s.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, InputEvent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings
            .bind(KeyCode::ArrowLeft, InputEvent::RotateLeft)
            .bind(KeyCode::KeyA, InputEvent::RotateLeft)
            .bind(KeyCode::ArrowRight, InputEvent::RotateRight)
            .bind(KeyCode::KeyD, InputEvent::RotateRight)
            .bind(KeyCode::ArrowUp, InputEvent::ZoomIn)
            .bind(KeyCode::KeyW, InputEvent::ZoomIn)
            .bind(KeyCode::Equal, InputEvent::ZoomIn)
            .bind(KeyCode::NumpadAdd, InputEvent::ZoomIn)
            .bind(KeyCode::ArrowDown, InputEvent::ZoomOut)
            .bind(KeyCode::KeyS, InputEvent::ZoomOut)
            .bind(KeyCode::Minus, InputEvent::ZoomOut)
            .bind(KeyCode::NumpadSubtract, InputEvent::ZoomOut);
        bindings
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Maps `key` to `event`, replacing any previous mapping for that key.
    pub fn bind(&mut self, key: KeyCode, event: InputEvent) -> &mut Self {
        self.bindings.insert(key, event);
        self
    }

    pub fn unbind(&mut self, key: KeyCode) -> &mut Self {
        self.bindings.remove(&key);
        self
    }

    pub fn event_for(&self, key: KeyCode) -> Option<InputEvent> {
        self.bindings.get(&key).copied()
    }

    /// Translates a key press (including auto-repeat) into an input event.
    pub fn translate(&self, event: &WindowEvent) -> Option<InputEvent> {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return None;
        };
        if event.state != ElementState::Pressed {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(key) => self.event_for(key),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}
