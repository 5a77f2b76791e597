//! World streaming: drop platforms the player has left behind

use super::state::World;
use crate::settings::Settings;

/// World y of the bottom edge of the view
#[inline]
pub fn view_bottom(world: &World, settings: &Settings) -> f32 {
    world.camera.y + settings.height / 2.0
}

/// Remove stale platforms. The floor is never removed.
/// Returns the number of platforms dropped.
pub fn cull(world: &mut World, settings: &Settings) -> usize {
    let before = world.platforms.len();
    let bottom = view_bottom(world, settings);

    world
        .platforms
        .retain(|p| p.is_base() || p.top() - bottom <= settings.cull_below);

    // Hard cap on live platforms, oldest first
    let excess = world
        .normal_platform_count()
        .saturating_sub(settings.max_live_platforms);
    if excess > 0 {
        let mut to_drop = excess;
        world.platforms.retain(|p| {
            if to_drop > 0 && !p.is_base() {
                to_drop -= 1;
                false
            } else {
                true
            }
        });
        log::debug!("Platform cap reached, dropped {} oldest", excess);
    }

    before - world.platforms.len()
}
