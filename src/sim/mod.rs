//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only
//! - Stable iteration order (platform insertion order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod generate;
pub mod jump;
pub mod physics;
pub mod state;
pub mod stream;
pub mod tick;

pub use collision::LandingResult;
pub use state::{
    BASE_PLATFORM_ID, Camera, Drag, GameEvent, InputState, JumpIntent, Oscillation, Platform,
    PlatformKind, Player, Progress, RunStats, World,
};
pub use tick::{clamp_dt, tick};
