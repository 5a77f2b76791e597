//! Space in-Finite - An endless vertical climber
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jumping, physics, landings, world streaming)
//! - `platform`: Device input mapping (keyboard, pointer, on-screen buttons)
//! - `session`: Run lifecycle and frame pacing driven by the host
//! - `settings`: Externally supplied physics/control constants
//! - `tuning`: Data-driven difficulty tiers

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{FrameReport, RunState, Session};
pub use settings::Settings;
pub use tuning::{DifficultyTier, TierTable};

/// Game configuration defaults
///
/// Every value here can be overridden through [`Settings`].
pub mod consts {
    /// Largest simulation step accepted from the host (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Playfield dimensions (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Top edge of the permanent floor platform
    pub const BASE_TOP: f32 = 740.0;
    pub const BASE_HEIGHT: f32 = 24.0;
    /// Thickness of every generated platform
    pub const PLATFORM_HEIGHT: f32 = 14.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1850.0;
    /// Launch speed at minimum and maximum charge (pixels/s)
    pub const JUMP_MIN_SPEED: f32 = 560.0;
    pub const JUMP_MAX_SPEED: f32 = 1300.0;
    /// Charge window (time units)
    pub const CHARGE_MIN: f32 = 0.18;
    pub const CHARGE_MAX: f32 = 1.20;
    /// Horizontal launch speed at full drag deflection
    pub const LATERAL_JUMP_BOOST: f32 = 380.0;

    /// Player square
    pub const PLAYER_SIZE: f32 = 28.0;
    pub const AIR_DRIFT: f32 = 300.0;
    /// Per-tick steering blend factors
    pub const GROUND_BLEND: f32 = 0.18;
    pub const AIR_BLEND: f32 = 0.12;
    pub const AIR_DAMP: f32 = 0.995;

    /// Jump grace windows
    pub const COYOTE_TIME: f32 = 0.16;
    pub const NEAR_GROUND_TOLERANCE: f32 = 1.25;
    pub const INTENT_TIMEOUT: f32 = 0.7;
    /// Lift applied before a jump honoured by the near-ground snap
    pub const BASE_NUDGE: f32 = 0.5;
    /// Drag charge weights (viewport-normalized length, upward fraction, hold seconds)
    pub const DRAG_LENGTH_WEIGHT: f32 = 1.0;
    pub const DRAG_UPWARD_WEIGHT: f32 = 0.7;
    pub const DRAG_HOLD_WEIGHT: f32 = 0.3;
    /// Fraction of viewport width that maps to a full sideways launch
    pub const DRAG_FULL_DEFLECTION: f32 = 0.4;

    /// Camera follow
    pub const CAMERA_OFFSET: f32 = 220.0;
    pub const CAMERA_LAG: f32 = 0.08;

    /// World streaming
    pub const LEAD_METERS: u32 = 120;
    pub const CULL_BELOW: f32 = PLAYFIELD_HEIGHT * 1.2;
    pub const MAX_LIVE_PLATFORMS: usize = 32;
    pub const MAX_METERS: u32 = 3000;
    /// Pixels per meter
    pub const METERS_SCALE: f32 = 10.0;
    /// Horizontal keep-out on both sides of generated platforms
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Mover sweep angular frequency (radians/s)
    pub const MOVER_FREQUENCY: f32 = 1.4;

    /// Starting stack placed above the floor
    pub const SEED_PLATFORMS: u32 = 6;
    pub const SEED_FIRST_GAP: f32 = 130.0;
    pub const SEED_SPACING: f32 = 120.0;
    pub const SEED_MARGIN: f32 = 40.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp that tolerates inverted bounds and maps NaN to `min`
#[inline]
pub fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max.max(min))
}

/// Convert a vertical distance climbed (pixels, positive upward) to whole meters
#[inline]
pub fn meters_from_climb(climb: f32, scale: f32) -> u32 {
    let meters = (climb / scale.max(f32::EPSILON)).round();
    if meters.is_finite() && meters > 0.0 {
        meters as u32
    } else {
        0
    }
}
