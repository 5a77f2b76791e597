//! Smoothed vertical camera follow
//!
//! Read-side only: nothing in the simulation reads the camera except culling.

use super::state::World;
use crate::settings::Settings;

/// Where the camera wants to be for the current player position
#[inline]
pub fn target_y(world: &World, settings: &Settings) -> f32 {
    world.player.pos.y - settings.camera_offset
}

/// Ease the camera toward its target by the configured lag factor
pub fn follow(world: &mut World, settings: &Settings) {
    let target = target_y(world, settings);
    world.camera.y = crate::lerp(world.camera.y, target, settings.camera_lag);
}
