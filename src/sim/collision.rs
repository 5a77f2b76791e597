//! Landing detection and floor safety
//!
//! Landings use a swept test on the player's bottom edge so fast falls can't
//! tunnel through thin platforms: the edge must cross a platform top between
//! the previous and current frame while the horizontal spans overlap.

use super::state::{GameEvent, World};
use crate::settings::Settings;

/// Outcome of the landing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingResult {
    /// Rising or nothing crossed this frame
    Airborne,
    /// Swept onto a platform
    Landed { platform_id: u32 },
    /// Fell through everything and was caught by the floor clamp
    Floor,
}

/// Index of the first platform whose top the bottom edge crossed
///
/// Iteration follows insertion order; when several platforms qualify in the
/// same frame, the first one found wins.
pub fn find_landing(world: &World, prev_bottom: f32) -> Option<usize> {
    let player = &world.player;
    let (left, right) = (player.pos.x, player.right());
    let curr_bottom = player.bottom();

    world.platforms.iter().position(|platform| {
        let top = platform.top();
        platform.overlaps_x(left, right) && prev_bottom <= top && top <= curr_bottom
    })
}

/// Resolve landings for this frame. `prev_y` is the player's y before
/// integration.
pub fn resolve(world: &mut World, prev_y: f32, settings: &Settings) -> LandingResult {
    let mut result = LandingResult::Airborne;

    let landing = if world.player.vel.y >= 0.0 {
        find_landing(world, prev_y + world.player.size)
    } else {
        None
    };

    match landing {
        Some(index) => {
            let (id, top, mover, base) = {
                let p = &world.platforms[index];
                (p.id, p.top(), p.is_mover(), p.is_base())
            };
            let was_grounded = world.player.grounded && world.player.standing_on == Some(id);
            world.player.land_on(top, id, world.time);

            if !was_grounded {
                record_landing(world, id, mover, base);
            }
            result = LandingResult::Landed { platform_id: id };
        }
        None => {
            // Walked off an edge or rising: keep the coyote timestamp fresh
            if world.player.grounded {
                world.player.last_grounded_at = world.time;
            }
            world.player.grounded = false;
            world.player.standing_on = None;
        }
    }

    if clamp_to_floor(world, settings) {
        result = LandingResult::Floor;
    }

    result
}

/// Keep the player from sinking through the floor
///
/// Returns true when the clamp fired.
pub fn clamp_to_floor(world: &mut World, settings: &Settings) -> bool {
    let (base_id, base_top) = match world.base() {
        Some(base) => (base.id, base.top()),
        None => (super::state::BASE_PLATFORM_ID, settings.base_top),
    };

    if world.player.bottom() <= base_top {
        return false;
    }

    world.player.land_on(base_top, base_id, world.time);
    world.stats.floor_returns += 1;
    world.stats.mover_streak = 0;
    log::debug!("Floor clamp at t={:.2}", world.time);
    world.events.push(GameEvent::FloorReturn);
    true
}

fn record_landing(world: &mut World, platform_id: u32, mover: bool, base: bool) {
    let stats = &mut world.stats;
    if base {
        stats.mover_streak = 0;
    } else {
        stats.landings += 1;
        if mover {
            stats.mover_landings += 1;
            stats.mover_streak += 1;
            stats.best_mover_streak = stats.best_mover_streak.max(stats.mover_streak);
        } else {
            stats.mover_streak = 0;
        }
    }
    world.events.push(GameEvent::Landed {
        platform_id,
        mover,
    });
}
