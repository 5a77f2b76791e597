//! Platform abstraction layer
//!
//! Maps device events (keyboard, pointer, on-screen buttons) onto the
//! simulation's input primitives. Adapters only ever write into the world's
//! input state; they never touch the player or platforms.

pub mod input;

pub use input::{InputEvent, KeyCode, apply_input};
