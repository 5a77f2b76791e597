//! Engine settings
//!
//! Every physics, control and streaming constant the simulation reads. Hosts
//! can ship their own values as JSON; anything missing falls back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::TierTable;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Top edge of the floor platform
    pub base_top: f32,
    pub base_height: f32,
    pub platform_height: f32,

    // === Physics ===
    pub gravity: f32,
    pub jump_min_speed: f32,
    pub jump_max_speed: f32,
    pub lateral_jump_boost: f32,
    pub player_size: f32,
    pub air_drift: f32,
    /// Per-tick velocity blend toward the steering target
    pub ground_blend: f32,
    pub air_blend: f32,
    /// Per-tick horizontal damping while airborne
    pub air_damp: f32,
    /// Largest step accepted from the host clock
    pub max_dt: f32,

    // === Jump control ===
    pub charge_min: f32,
    pub charge_max: f32,
    pub coyote_time: f32,
    pub near_ground_tolerance: f32,
    /// Seconds a queued jump survives while the player cannot jump
    pub intent_timeout: f32,
    /// Lift off the floor before a near-ground jump
    pub base_nudge: f32,
    pub drag_length_weight: f32,
    pub drag_upward_weight: f32,
    pub drag_hold_weight: f32,
    /// Fraction of viewport width for a full sideways drag
    pub drag_full_deflection: f32,

    // === Camera ===
    pub camera_offset: f32,
    pub camera_lag: f32,

    // === Streaming ===
    pub lead_meters: u32,
    pub cull_below: f32,
    pub max_live_platforms: usize,
    pub max_meters: u32,
    pub meters_scale: f32,
    pub spawn_margin: f32,
    pub mover_frequency: f32,

    // === Starting stack ===
    pub seed_platforms: u32,
    pub seed_first_gap: f32,
    pub seed_spacing: f32,
    pub seed_margin: f32,

    /// Difficulty curve
    pub tiers: TierTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            base_top: BASE_TOP,
            base_height: BASE_HEIGHT,
            platform_height: PLATFORM_HEIGHT,

            gravity: GRAVITY,
            jump_min_speed: JUMP_MIN_SPEED,
            jump_max_speed: JUMP_MAX_SPEED,
            lateral_jump_boost: LATERAL_JUMP_BOOST,
            player_size: PLAYER_SIZE,
            air_drift: AIR_DRIFT,
            ground_blend: GROUND_BLEND,
            air_blend: AIR_BLEND,
            air_damp: AIR_DAMP,
            max_dt: MAX_DT,

            charge_min: CHARGE_MIN,
            charge_max: CHARGE_MAX,
            coyote_time: COYOTE_TIME,
            near_ground_tolerance: NEAR_GROUND_TOLERANCE,
            intent_timeout: INTENT_TIMEOUT,
            base_nudge: BASE_NUDGE,
            drag_length_weight: DRAG_LENGTH_WEIGHT,
            drag_upward_weight: DRAG_UPWARD_WEIGHT,
            drag_hold_weight: DRAG_HOLD_WEIGHT,
            drag_full_deflection: DRAG_FULL_DEFLECTION,

            camera_offset: CAMERA_OFFSET,
            camera_lag: CAMERA_LAG,

            lead_meters: LEAD_METERS,
            cull_below: CULL_BELOW,
            max_live_platforms: MAX_LIVE_PLATFORMS,
            max_meters: MAX_METERS,
            meters_scale: METERS_SCALE,
            spawn_margin: SPAWN_MARGIN,
            mover_frequency: MOVER_FREQUENCY,

            seed_platforms: SEED_PLATFORMS,
            seed_first_gap: SEED_FIRST_GAP,
            seed_spacing: SEED_SPACING,
            seed_margin: SEED_MARGIN,

            tiers: TierTable::default(),
        }
    }
}

/// Replace `value` with `fallback` when it fails `ok`, logging the fix
fn repair<T: PartialOrd + Copy + std::fmt::Debug>(
    name: &str,
    value: &mut T,
    ok: impl Fn(T) -> bool,
    fallback: T,
) -> bool {
    if ok(*value) {
        return false;
    }
    log::warn!("Setting {} = {:?} is out of range, using {:?}", name, value, fallback);
    *value = fallback;
    true
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load sanitized settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        };
        loaded.sanitized()
    }

    /// Clamp every value into a range the simulation can run with
    ///
    /// Nothing here is fatal: bad values are replaced and logged.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        let positive = |v: f32| v > 0.0;
        let non_negative = |v: f32| v >= 0.0;
        let unit = |v: f32| (0.0..=1.0).contains(&v);

        repair("width", &mut self.width, |v| v >= 1.0, d.width);
        repair("height", &mut self.height, |v| v >= 1.0, d.height);
        repair("base_top", &mut self.base_top, f32::is_finite, d.base_top);
        repair("base_height", &mut self.base_height, positive, d.base_height);
        repair("platform_height", &mut self.platform_height, positive, d.platform_height);

        repair("gravity", &mut self.gravity, non_negative, d.gravity);
        repair("jump_min_speed", &mut self.jump_min_speed, non_negative, d.jump_min_speed);
        let min_speed = self.jump_min_speed;
        repair("jump_max_speed", &mut self.jump_max_speed, |v| v >= min_speed, min_speed);
        repair(
            "lateral_jump_boost",
            &mut self.lateral_jump_boost,
            non_negative,
            d.lateral_jump_boost,
        );
        let max_size = self.width;
        repair(
            "player_size",
            &mut self.player_size,
            |v| v > 0.0 && v <= max_size,
            d.player_size.min(max_size),
        );
        repair("air_drift", &mut self.air_drift, non_negative, d.air_drift);
        repair("ground_blend", &mut self.ground_blend, unit, d.ground_blend);
        repair("air_blend", &mut self.air_blend, unit, d.air_blend);
        repair("air_damp", &mut self.air_damp, unit, d.air_damp);
        repair("max_dt", &mut self.max_dt, positive, d.max_dt);

        repair("charge_min", &mut self.charge_min, non_negative, d.charge_min);
        let charge_min = self.charge_min;
        // An empty window would divide by zero when normalizing power
        repair("charge_max", &mut self.charge_max, |v| v > charge_min, charge_min + 1.0);
        repair("coyote_time", &mut self.coyote_time, non_negative, d.coyote_time);
        repair(
            "near_ground_tolerance",
            &mut self.near_ground_tolerance,
            non_negative,
            d.near_ground_tolerance,
        );
        repair("intent_timeout", &mut self.intent_timeout, non_negative, d.intent_timeout);
        repair("base_nudge", &mut self.base_nudge, non_negative, d.base_nudge);
        repair("drag_length_weight", &mut self.drag_length_weight, non_negative, 0.0);
        repair("drag_upward_weight", &mut self.drag_upward_weight, non_negative, 0.0);
        repair("drag_hold_weight", &mut self.drag_hold_weight, non_negative, 0.0);
        repair(
            "drag_full_deflection",
            &mut self.drag_full_deflection,
            positive,
            d.drag_full_deflection,
        );

        repair("camera_offset", &mut self.camera_offset, f32::is_finite, d.camera_offset);
        repair("camera_lag", &mut self.camera_lag, unit, d.camera_lag);

        repair("cull_below", &mut self.cull_below, non_negative, d.cull_below);
        repair(
            "max_live_platforms",
            &mut self.max_live_platforms,
            |v| v >= 1,
            d.max_live_platforms,
        );
        repair("meters_scale", &mut self.meters_scale, positive, d.meters_scale);
        let half_width = self.width / 2.0;
        repair("spawn_margin", &mut self.spawn_margin, |v| v >= 0.0 && v < half_width, 0.0);
        repair("mover_frequency", &mut self.mover_frequency, non_negative, d.mover_frequency);

        repair("seed_first_gap", &mut self.seed_first_gap, positive, d.seed_first_gap);
        repair("seed_spacing", &mut self.seed_spacing, positive, d.seed_spacing);
        repair("seed_margin", &mut self.seed_margin, |v| v >= 0.0 && v < half_width, 0.0);

        self.tiers.sanitize();
        self
    }

    /// Normalized charge (0-1) within the charge window
    pub fn normalized_charge(&self, power: f32) -> f32 {
        let span = (self.charge_max - self.charge_min).max(f32::EPSILON);
        crate::clamp_f32((power - self.charge_min) / span, 0.0, 1.0)
    }

    /// Upward launch speed for a charge value
    pub fn launch_speed(&self, power: f32) -> f32 {
        crate::lerp(
            self.jump_min_speed,
            self.jump_max_speed,
            self.normalized_charge(power),
        )
    }
}
