//! Player integration and platform kinematics

use super::state::World;
use crate::settings::Settings;

/// Sweep movers to their position at the current sim time
///
/// Each mover oscillates around its anchor and is kept inside the spawn
/// margins. The per-tick displacement is recorded for riders.
pub fn update_movers(world: &mut World, settings: &Settings) {
    let omega = settings.mover_frequency;
    let time = world.time;

    for platform in &mut world.platforms {
        platform.last_dx = 0.0;
        let Some(osc) = platform.oscillation else {
            continue;
        };

        let lo = settings.spawn_margin;
        let hi = (settings.width - settings.spawn_margin - platform.width).max(lo);
        let x = (osc.anchor_x + osc.amplitude * (osc.phase + omega * time).sin()).clamp(lo, hi);

        platform.last_dx = x - platform.pos.x;
        platform.pos.x = x;
    }
}

/// Steer, apply gravity and integrate the player. Returns the pre-move y.
pub fn integrate_player(world: &mut World, settings: &Settings, dt: f32) -> f32 {
    let steering = world.input.steering();

    // Carry a grounded rider along with its platform
    if world.player.grounded {
        let carried = world
            .player
            .standing_on
            .and_then(|id| world.platforms.iter().find(|p| p.id == id))
            .map_or(0.0, |p| p.last_dx);
        world.player.pos.x += carried;
    }

    let player = &mut world.player;
    let target_vx = steering * settings.air_drift;
    if player.grounded {
        player.vel.x += (target_vx - player.vel.x) * settings.ground_blend;
    } else {
        player.vel.x += (target_vx - player.vel.x) * settings.air_blend;
        player.vel.x *= settings.air_damp;
    }

    let prev_y = player.pos.y;
    player.vel.y += settings.gravity * dt;
    player.pos += player.vel * dt;

    // Walls are a hard limit, not a collision
    let max_x = (settings.width - player.size).max(0.0);
    player.pos.x = player.pos.x.clamp(0.0, max_x);

    prev_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Oscillation;
    use glam::Vec2;

    #[test]
    fn test_gravity_accumulates() {
        let settings = Settings::default();
        let mut world = World::new(3, &settings);
        world.player.grounded = false;
        let dt = 0.01;
        let prev = integrate_player(&mut world, &settings, dt);
        assert_eq!(prev, BASE_TOP - PLAYER_SIZE);
        assert!((world.player.vel.y - GRAVITY * dt).abs() < 1e-4);
        assert!(world.player.pos.y > prev);
    }

    #[test]
    fn test_steering_blends_faster_on_ground() {
        let settings = Settings::default();
        let mut ground = World::new(3, &settings);
        ground.input.right = true;
        integrate_player(&mut ground, &settings, 0.016);

        let mut air = World::new(3, &settings);
        air.input.right = true;
        air.player.grounded = false;
        integrate_player(&mut air, &settings, 0.016);

        assert!((ground.player.vel.x - AIR_DRIFT * GROUND_BLEND).abs() < 1e-3);
        assert!((air.player.vel.x - AIR_DRIFT * AIR_BLEND * AIR_DAMP).abs() < 1e-3);
    }

    #[test]
    fn test_walls_clamp_position() {
        let settings = Settings::default();
        let mut world = World::new(3, &settings);
        world.player.pos.x = 5.0;
        world.player.vel.x = -10_000.0;
        integrate_player(&mut world, &settings, 0.033);
        assert_eq!(world.player.pos.x, 0.0);

        world.player.pos.x = PLAYFIELD_WIDTH - PLAYER_SIZE - 1.0;
        world.player.vel.x = 10_000.0;
        integrate_player(&mut world, &settings, 0.033);
        assert_eq!(world.player.pos.x, PLAYFIELD_WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_mover_sweeps_within_margins() {
        let settings = Settings::default();
        let mut world = World::new(3, &settings);
        let id = world.push_platform(
            Vec2::new(200.0, 100.0),
            60.0,
            PLATFORM_HEIGHT,
            Some(Oscillation {
                anchor_x: 200.0,
                amplitude: 500.0,
                phase: 0.0,
            }),
        );

        let mut seen_moves = 0;
        for step in 0..200 {
            world.time = step as f32 * 0.05;
            update_movers(&mut world, &settings);
            let p = world.platforms.iter().find(|p| p.id == id).unwrap();
            assert!(p.pos.x >= SPAWN_MARGIN);
            assert!(p.right() <= PLAYFIELD_WIDTH - SPAWN_MARGIN + 1e-3);
            if p.last_dx != 0.0 {
                seen_moves += 1;
            }
        }
        assert!(seen_moves > 0);
        // Static platforms never move
        assert!(world.platforms.iter().filter(|p| !p.is_mover()).all(|p| p.last_dx == 0.0));
    }

    #[test]
    fn test_rider_is_carried() {
        let settings = Settings::default();
        let mut world = World::new(3, &settings);
        let id = world.push_platform(
            Vec2::new(200.0, 600.0),
            80.0,
            PLATFORM_HEIGHT,
            Some(Oscillation {
                anchor_x: 200.0,
                amplitude: 40.0,
                phase: 0.0,
            }),
        );
        world.player.land_on(600.0, id, 0.0);
        world.player.pos.x = 210.0;

        world.time = 0.5;
        update_movers(&mut world, &settings);
        let dx = world.platforms.iter().find(|p| p.id == id).unwrap().last_dx;
        assert!(dx > 0.0);
        integrate_player(&mut world, &settings, 0.0);
        assert!((world.player.pos.x - (210.0 + dx)).abs() < 1e-4);
    }
}
