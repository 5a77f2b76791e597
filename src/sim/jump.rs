//! Charge-based jump control
//!
//! Two gestures charge a jump: holding a key, or dragging a pointer. Either
//! one queues a single [`JumpIntent`]; the tick consumes it as soon as the
//! player is allowed to jump, or drops it once it goes stale.

use glam::Vec2;

use super::state::{Drag, GameEvent, JumpIntent, World};
use crate::clamp_f32;
use crate::settings::Settings;

/// Charge from a key held for `held` seconds
pub fn hold_power(held: f32, settings: &Settings) -> f32 {
    let held = held.max(0.0);
    clamp_f32(
        settings.charge_min + held,
        settings.charge_min,
        settings.charge_max,
    )
}

/// Charge and sideways direction from a released drag
///
/// Screen y grows downward, so dragging up produces a negative `delta.y`.
pub fn drag_power(delta: Vec2, held: f32, viewport: Vec2, settings: &Settings) -> (f32, f32) {
    let view_w = viewport.x.max(1.0);
    let view_h = viewport.y.max(1.0);

    let normalized_length = delta.length() / view_w.max(view_h);
    let upward_bias = (-delta.y).max(0.0) / view_h;
    let held = held.max(0.0);

    let power = clamp_f32(
        settings.charge_min
            + normalized_length * settings.drag_length_weight
            + upward_bias * settings.drag_upward_weight
            + held * settings.drag_hold_weight,
        settings.charge_min,
        settings.charge_max,
    );
    let full_deflection = view_w * settings.drag_full_deflection.max(f32::EPSILON);
    let direction_x = clamp_f32(delta.x / full_deflection, -1.0, 1.0);

    (power, direction_x)
}

/// Queue a jump, replacing any earlier one
pub fn queue_jump(world: &mut World, power: f32, direction_x: f32) {
    world.input.pending_jump = Some(JumpIntent {
        power,
        direction_x: clamp_f32(direction_x, -1.0, 1.0),
        queued_at: world.time,
    });
}

/// Charge key pressed (repeats while held are ignored)
pub fn begin_hold(world: &mut World) {
    if world.input.hold_started_at.is_none() {
        world.input.hold_started_at = Some(world.time);
    }
}

/// Charge key released
pub fn release_hold(world: &mut World, settings: &Settings) {
    if let Some(started) = world.input.hold_started_at.take() {
        let power = hold_power(world.time - started, settings);
        queue_jump(world, power, 0.0);
    }
}

pub fn begin_drag(world: &mut World, at: Vec2) {
    world.input.drag = Some(Drag {
        start: at,
        delta: Vec2::ZERO,
        started_at: world.time,
    });
}

pub fn update_drag(world: &mut World, at: Vec2) {
    if let Some(drag) = world.input.drag.as_mut() {
        drag.delta = at - drag.start;
    }
}

/// Pointer released (or cancelled). `at` overrides the last move position.
pub fn release_drag(world: &mut World, at: Option<Vec2>, settings: &Settings) {
    let Some(mut drag) = world.input.drag.take() else {
        return;
    };
    if let Some(at) = at {
        drag.delta = at - drag.start;
    }
    let held = world.time - drag.started_at;
    let (power, direction_x) = drag_power(drag.delta, held, world.input.viewport, settings);
    queue_jump(world, power, direction_x);
}

/// Fill (0-1) of the charge indicator while a gesture is in progress
pub fn charge_progress(world: &World, settings: &Settings) -> Option<f32> {
    let started = world
        .input
        .hold_started_at
        .or(world.input.drag.map(|d| d.started_at))?;
    let max = settings.charge_max.max(f32::EPSILON);
    Some(clamp_f32((world.time - started) / max, 0.0, 1.0))
}

/// Whether the player may launch right now
pub fn can_jump(world: &World, settings: &Settings) -> bool {
    let player = &world.player;
    player.grounded
        || near_base(world, settings)
        || world.time - player.last_grounded_at <= settings.coyote_time
}

/// Player's bottom edge is within tolerance of the floor
fn near_base(world: &World, settings: &Settings) -> bool {
    world.player.bottom() >= world.base_top(settings) - settings.near_ground_tolerance
}

/// Launch with the given charge if allowed. Returns false (and leaves the
/// player untouched) when the player can't jump.
pub fn perform_jump(world: &mut World, power: f32, direction_x: f32, settings: &Settings) -> bool {
    if !can_jump(world, settings) {
        return false;
    }

    if near_base(world, settings) {
        // Lift off the floor so the next sweep doesn't land immediately
        let base_top = world.base_top(settings);
        world.player.pos.y = base_top - world.player.size - settings.base_nudge;
    }

    let direction_x = clamp_f32(direction_x, -1.0, 1.0);
    let player = &mut world.player;
    player.vel.y = -settings.launch_speed(power);
    player.vel.x = direction_x * settings.lateral_jump_boost;
    player.grounded = false;
    player.standing_on = None;

    world.input.pending_jump = None;
    world.stats.jumps += 1;
    world.events.push(GameEvent::Jumped { power, direction_x });
    true
}

/// Fire the pending jump if possible, or expire it when too old
pub fn consume_intent(world: &mut World, settings: &Settings) {
    let Some(intent) = world.input.pending_jump else {
        return;
    };

    if perform_jump(world, intent.power, intent.direction_x, settings) {
        return;
    }

    if world.time - intent.queued_at > settings.intent_timeout {
        log::debug!(
            "Jump intent expired after {:.2}s",
            world.time - intent.queued_at
        );
        world.input.pending_jump = None;
        world.events.push(GameEvent::IntentExpired);
    }
}
