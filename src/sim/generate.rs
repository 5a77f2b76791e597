//! Procedural platform generation
//!
//! Keeps a lead buffer of platforms above the player's best height. Each new
//! platform takes its width, spacing and mover odds from the difficulty tier
//! of the height it is created at. Nothing is generated past the meters cap.

use glam::Vec2;
use rand::Rng;

use super::state::{Oscillation, World};
use crate::settings::Settings;

/// Meters height the world should be built up to for the current peak
pub fn lead_target(world: &World, settings: &Settings) -> u32 {
    world
        .peak_meters(settings)
        .saturating_add(settings.lead_meters)
        .min(settings.max_meters)
}

/// Extend the world upward if the lead buffer ran low.
/// Returns the number of platforms created.
pub fn extend(world: &mut World, settings: &Settings) -> usize {
    let target = lead_target(world, settings);
    if target <= world.progress.highest_generated_meters {
        return 0;
    }

    let created = generate_up_to(world, target, settings);
    world.progress.highest_generated_meters = target;
    if created > 0 {
        log::debug!("Generated {} platforms up to {}m", created, target);
    }
    created
}

/// Place platforms upward from the next free slot until `target_meters` is reached
///
/// Consecutive platforms are exactly one tier gap apart, so repeated calls
/// continue the same ladder instead of restarting at the current top.
pub fn generate_up_to(world: &mut World, target_meters: u32, settings: &Settings) -> usize {
    let mut y = world.progress.next_slot_y;
    let mut created = 0;

    loop {
        let meters = world.meters_at(y, settings);
        if meters >= target_meters {
            break;
        }

        let tier = settings.tiers.tier_for_meters(meters);
        let width = if tier.width_max > tier.width_min {
            world.rng.random_range(tier.width_min..tier.width_max)
        } else {
            tier.width_min
        }
        .min(settings.width - 2.0 * settings.spawn_margin)
        .max(1.0);

        let span = (settings.width - 2.0 * settings.spawn_margin - width).max(0.0);
        let x = settings.spawn_margin + world.rng.random::<f32>() * span;

        let moving = tier.mover_speed > 0.0 && world.rng.random::<f32>() < tier.mover_probability;
        let oscillation = moving.then(|| Oscillation {
            anchor_x: x,
            amplitude: tier.mover_speed,
            phase: world.rng.random::<f32>() * std::f32::consts::TAU,
        });

        world.push_platform(Vec2::new(x, y), width, settings.platform_height, oscillation);
        created += 1;

        y -= tier.gap.max(1.0);
    }

    world.progress.next_slot_y = y;
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{camera, stream};
    use crate::tuning::{DifficultyTier, TierTable};
    use proptest::prelude::*;

    #[test]
    fn test_extend_meets_lead() {
        let settings = Settings::default();
        let mut world = World::new(11, &settings);
        let before = world.normal_platform_count();

        world.progress.peak_y = world.progress.start_y - 500.0; // 50m
        extend(&mut world, &settings);

        assert_eq!(world.progress.highest_generated_meters, 50 + LEAD_METERS);
        assert!(world.normal_platform_count() > before);

        let top = world
            .platforms
            .iter()
            .map(|p| p.top())
            .fold(f32::INFINITY, f32::min);
        // The last gap step pushes the frontier to or past the target
        let frontier = world.meters_at(top, &settings);
        assert!(frontier + 15 >= 50 + LEAD_METERS);
    }

    #[test]
    fn test_extend_is_idempotent_without_progress() {
        let settings = Settings::default();
        let mut world = World::new(11, &settings);
        extend(&mut world, &settings);
        let count = world.platforms.len();
        assert_eq!(extend(&mut world, &settings), 0);
        assert_eq!(world.platforms.len(), count);
    }

    #[test]
    fn test_nothing_past_cap() {
        let settings = Settings::default();
        let mut world = World::new(11, &settings);
        let climb = (MAX_METERS as f32 + 50.0) * METERS_SCALE;
        world.progress.peak_y = world.progress.start_y - climb;
        assert_eq!(lead_target(&world, &settings), MAX_METERS);

        world.progress.highest_generated_meters = MAX_METERS;
        assert_eq!(extend(&mut world, &settings), 0);
    }

    #[test]
    fn test_tier_boundary_at_1000m() {
        // Only the tier at 1000 produces movers, so a platform created exactly
        // at 1000m must be a mover
        let settings = Settings {
            tiers: TierTable {
                version: 1,
                tiers: vec![
                    DifficultyTier {
                        min_meters: 0,
                        width_min: 70.0,
                        width_max: 70.0,
                        gap: 120.0,
                        mover_probability: 0.0,
                        mover_speed: 0.0,
                    },
                    DifficultyTier {
                        min_meters: 1000,
                        width_min: 40.0,
                        width_max: 40.0,
                        gap: 150.0,
                        mover_probability: 1.0,
                        mover_speed: 70.0,
                    },
                ],
            },
            ..Default::default()
        };
        let mut world = World::new(5, &settings);
        world.platforms.retain(|p| p.is_base());

        // Next slot exactly on the 1000m line
        world.progress.next_slot_y = world.progress.start_y - 1000.0 * METERS_SCALE;

        generate_up_to(&mut world, 1001, &settings);
        let created = world.platforms.last().unwrap();
        assert_eq!(world.meters_at(created.top(), &settings), 1000);
        assert_eq!(created.width, 40.0);
        assert!(created.is_mover());
    }

    #[test]
    fn test_generation_continues_above_seed_stack() {
        let settings = Settings::default();
        let mut world = World::new(5, &settings);
        let seed_top = BASE_TOP - SEED_FIRST_GAP - (SEED_PLATFORMS - 1) as f32 * SEED_SPACING;

        let created = generate_up_to(&mut world, 100, &settings);
        assert!(created > 0);
        let first = &world.platforms[1 + SEED_PLATFORMS as usize];
        assert_eq!(seed_top - first.top(), SEED_SPACING);
    }

    #[test]
    fn test_generated_platforms_are_one_gap_apart() {
        let settings = Settings::default();
        let mut world = World::new(8, &settings);
        world.platforms.retain(|p| p.is_base());
        generate_up_to(&mut world, MAX_METERS, &settings);

        let generated: Vec<_> = world.platforms.iter().filter(|p| !p.is_base()).collect();
        for pair in generated.windows(2) {
            let below = world.meters_at(pair[0].top(), &settings);
            let gap = settings.tiers.tier_for_meters(below).gap;
            let step = pair[0].top() - pair[1].top();
            assert!((step - gap).abs() < 0.05, "{}m: step {} vs gap {}", below, step, gap);
        }
    }

    #[test]
    fn test_repeated_extend_never_stacks() {
        let settings = Settings::default();
        let mut world = World::new(3, &settings);
        extend(&mut world, &settings);
        let count = world.platforms.len();
        let next_slot = world.progress.next_slot_y;

        // One metre of progress only moves the target, not the ladder
        world.progress.peak_y -= METERS_SCALE;
        extend(&mut world, &settings);
        assert_eq!(world.platforms.len(), count);
        assert_eq!(world.progress.next_slot_y, next_slot);
    }

    #[test]
    fn test_metre_by_metre_climb_stays_climbable() {
        let settings = Settings::default();
        let mut world = World::new(13, &settings);
        let reach = settings.jump_max_speed.powi(2) / (2.0 * settings.gravity);
        let min_gap = settings
            .tiers
            .tiers
            .iter()
            .map(|t| t.gap)
            .fold(settings.seed_spacing, f32::min);

        for m in 0..=1500u32 {
            let y = world.progress.start_y - m as f32 * settings.meters_scale;
            world.progress.peak_y = y;
            world.player.pos.y = y;
            world.camera.y = camera::target_y(&world, &settings);
            extend(&mut world, &settings);
            stream::cull(&mut world, &settings);

            let mut tops: Vec<f32> = world
                .platforms
                .iter()
                .filter(|p| !p.is_base())
                .map(|p| p.top())
                .collect();
            tops.sort_by(f32::total_cmp);
            for pair in tops.windows(2) {
                assert!(pair[1] - pair[0] >= min_gap - 0.05, "{}m: {:?}", m, pair);
            }

            let bottom = world.player.bottom();
            assert!(
                world
                    .platforms
                    .iter()
                    .any(|p| p.top() < bottom && bottom - p.top() <= reach),
                "nothing within one jump at {}m",
                m
            );
        }
        assert!(world.normal_platform_count() < settings.max_live_platforms);
    }

    #[test]
    fn test_generated_platforms_fit_playfield() {
        let settings = Settings::default();
        let mut world = World::new(21, &settings);
        generate_up_to(&mut world, MAX_METERS, &settings);
        for p in world.platforms.iter().filter(|p| !p.is_base()) {
            assert!(p.pos.x >= SPAWN_MARGIN);
            assert!(p.right() <= PLAYFIELD_WIDTH - SPAWN_MARGIN + 1e-3);
        }
        assert!(world.platforms.iter().any(|p| p.is_mover()));
    }

    proptest! {
        #[test]
        fn lead_invariant_holds(seed in 0u64..1000, climb in 0.0f32..40_000.0) {
            let settings = Settings::default();
            let mut world = World::new(seed, &settings);
            world.progress.peak_y = world.progress.start_y - climb;
            extend(&mut world, &settings);
            let want = (world.peak_meters(&settings) + LEAD_METERS).min(MAX_METERS);
            prop_assert!(world.progress.highest_generated_meters >= want);

            // The ladder itself reaches the target, not just the counter
            let top = world
                .platforms
                .iter()
                .map(|p| p.top())
                .fold(f32::INFINITY, f32::min);
            let gap_max = settings
                .tiers
                .tiers
                .iter()
                .map(|t| t.gap)
                .fold(0.0, f32::max);
            let reached = world.meters_at(top - gap_max, &settings);
            prop_assert!(reached >= want);
        }
    }
}
