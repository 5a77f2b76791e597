//! Device-agnostic input events

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::World;
use crate::sim::jump;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    A,
    D,
    Space,
    Other,
}

impl KeyCode {
    /// Map a DOM-style `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Self {
        match code {
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "KeyA" => KeyCode::A,
            "KeyD" => KeyCode::D,
            "Space" => KeyCode::Space,
            _ => KeyCode::Other,
        }
    }
}

/// One input primitive from the host
///
/// On-screen touch buttons should emit the same `Key` events as a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Key { code: KeyCode, pressed: bool },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Treated like a release at the last known position
    PointerCancel,
    /// Viewport the pointer coordinates are measured in
    Resize { width: f32, height: f32 },
}

/// Write one event into the world's input state.
/// Returns true if the event was recognised.
pub fn apply_input(world: &mut World, event: InputEvent, settings: &Settings) -> bool {
    match event {
        InputEvent::Key { code, pressed } => match code {
            KeyCode::ArrowLeft | KeyCode::A => world.input.left = pressed,
            KeyCode::ArrowRight | KeyCode::D => world.input.right = pressed,
            KeyCode::Space if pressed => jump::begin_hold(world),
            KeyCode::Space => jump::release_hold(world, settings),
            KeyCode::Other => return false,
        },
        InputEvent::PointerDown { x, y } => jump::begin_drag(world, Vec2::new(x, y)),
        InputEvent::PointerMove { x, y } => jump::update_drag(world, Vec2::new(x, y)),
        InputEvent::PointerUp { x, y } => {
            jump::release_drag(world, Some(Vec2::new(x, y)), settings)
        }
        InputEvent::PointerCancel => jump::release_drag(world, None, settings),
        InputEvent::Resize { width, height } => {
            world.input.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        }
    }
    true
}
