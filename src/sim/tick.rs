//! Per-frame simulation step
//!
//! Order matters: the landing sweep needs this frame's integrated position,
//! and generation needs the post-landing peak to size the lead buffer.

use super::state::{GameEvent, World};
use super::{camera, collision, generate, jump, physics, stream};
use crate::settings::Settings;

/// Clamp a host-supplied frame delta into `[0, max_dt]` (NaN becomes 0)
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, max_dt.max(0.0))
}

/// Advance the world by one frame
pub fn tick(world: &mut World, settings: &Settings, dt: f32) {
    let dt = clamp_dt(dt, settings.max_dt);
    world.time += dt;
    world.time_ticks += 1;

    let peak_before = world.peak_meters(settings);

    jump::consume_intent(world, settings);

    physics::update_movers(world, settings);
    let prev_y = physics::integrate_player(world, settings, dt);
    collision::resolve(world, prev_y, settings);

    world.progress.peak_y = world.progress.peak_y.min(world.player.pos.y);
    let peak = world.peak_meters(settings);
    if peak > peak_before {
        world.events.push(GameEvent::NewPeak { meters: peak });
    }
    if !world.progress.summit_reached && peak >= settings.max_meters {
        world.progress.summit_reached = true;
        log::info!("Summit reached at {}m", peak);
        world.events.push(GameEvent::SummitReached { meters: peak });
    }

    generate::extend(world, settings);
    stream::cull(world, settings);
    camera::follow(world, settings);
}
