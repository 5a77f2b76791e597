//! Data-driven difficulty tiers
//!
//! The climb is paced by an ordered table of tiers keyed by the height (in
//! meters) at which a platform is created. The authored curve is deliberately
//! non-monotonic: widths shrink, then gaps widen, then movers appear, then a
//! short easy stretch, then a very hard final run up to the summit.

use serde::{Deserialize, Serialize};

/// Current tier table format version
pub const TIER_TABLE_VERSION: u32 = 1;

/// Generation parameters for one contiguous meters range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// First meters value (inclusive) this tier applies to
    pub min_meters: u32,
    /// Platform width range (pixels)
    pub width_min: f32,
    pub width_max: f32,
    /// Vertical step to the next platform (pixels)
    pub gap: f32,
    /// Chance (0-1) that a platform oscillates horizontally
    pub mover_probability: f32,
    /// Oscillation amplitude for movers (pixels)
    pub mover_speed: f32,
}

impl DifficultyTier {
    const fn new(
        min_meters: u32,
        width_min: f32,
        width_max: f32,
        gap: f32,
        mover_probability: f32,
        mover_speed: f32,
    ) -> Self {
        Self {
            min_meters,
            width_min,
            width_max,
            gap,
            mover_probability,
            mover_speed,
        }
    }
}

/// Authored difficulty curve
const DEFAULT_TIERS: [DifficultyTier; 7] = [
    // Warm-up
    DifficultyTier::new(0, 70.0, 120.0, 120.0, 0.0, 0.0),
    // Narrower platforms
    DifficultyTier::new(300, 50.0, 90.0, 120.0, 0.0, 0.0),
    // Wider vertical gaps
    DifficultyTier::new(600, 50.0, 90.0, 140.0, 0.0, 0.0),
    // Movers introduced
    DifficultyTier::new(1000, 48.0, 86.0, 145.0, 0.35, 70.0),
    // Small, spread out, moving
    DifficultyTier::new(1500, 42.0, 78.0, 155.0, 0.45, 85.0),
    // Breather
    DifficultyTier::new(2000, 70.0, 120.0, 120.0, 0.15, 55.0),
    // Final ascent
    DifficultyTier::new(2700, 34.0, 56.0, 170.0, 0.55, 95.0),
];

/// Versioned, ordered list of difficulty tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub version: u32,
    pub tiers: Vec<DifficultyTier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            version: TIER_TABLE_VERSION,
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }
}

impl TierTable {
    /// Tier for a platform created at `meters`
    ///
    /// Picks the last tier whose `min_meters` is at or below `meters`; heights
    /// below the first tier use the first tier. Falls back to the built-in
    /// warm-up tier when the table is empty.
    pub fn tier_for_meters(&self, meters: u32) -> DifficultyTier {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.min_meters <= meters)
            .or_else(|| self.tiers.first())
            .copied()
            .unwrap_or(DEFAULT_TIERS[0])
    }

    /// Sort tiers and repair degenerate ranges
    ///
    /// Returns the number of corrections made.
    pub fn sanitize(&mut self) -> usize {
        let mut fixes = 0;

        if self.tiers.is_empty() {
            log::warn!("Difficulty table is empty, using built-in tiers");
            self.tiers = DEFAULT_TIERS.to_vec();
            fixes += 1;
        }

        if !self.tiers.is_sorted_by_key(|t| t.min_meters) {
            self.tiers.sort_by_key(|t| t.min_meters);
            fixes += 1;
        }

        for tier in &mut self.tiers {
            if !(tier.width_min > 0.0) {
                log::warn!("Tier {}m: width_min {} -> 1", tier.min_meters, tier.width_min);
                tier.width_min = 1.0;
                fixes += 1;
            }
            if !(tier.width_max >= tier.width_min) {
                log::warn!(
                    "Tier {}m: width_max {} below width_min {}",
                    tier.min_meters,
                    tier.width_max,
                    tier.width_min
                );
                tier.width_max = tier.width_min;
                fixes += 1;
            }
            // A non-positive gap would never advance the generator
            if !(tier.gap >= 1.0) {
                log::warn!("Tier {}m: gap {} -> 1", tier.min_meters, tier.gap);
                tier.gap = 1.0;
                fixes += 1;
            }
            let p = crate::clamp_f32(tier.mover_probability, 0.0, 1.0);
            if p != tier.mover_probability {
                tier.mover_probability = p;
                fixes += 1;
            }
            if !(tier.mover_speed >= 0.0) {
                tier.mover_speed = 0.0;
                fixes += 1;
            }
        }

        fixes
    }
}
