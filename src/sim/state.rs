//! World state and core simulation types
//!
//! Everything one run owns lives in [`World`]. A world is built fresh when a
//! run starts and dropped when it stops.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::meters_from_climb;
use crate::settings::Settings;

/// The player's square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (y grows downward)
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub grounded: bool,
    /// Sim time of the last frame the player stood on something
    pub last_grounded_at: f32,
    /// Platform currently stood on
    #[serde(default)]
    pub standing_on: Option<u32>,
}

impl Player {
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }

    /// Rest the player's bottom edge on `top`
    pub fn land_on(&mut self, top: f32, platform_id: u32, time: f32) {
        self.pos.y = top - self.size;
        self.vel.y = 0.0;
        self.grounded = true;
        self.last_grounded_at = time;
        self.standing_on = Some(platform_id);
    }
}

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Full-width floor, never culled
    Base,
    Normal,
}

/// Horizontal sinusoidal sweep for movers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Rest x position the sweep is centred on
    pub anchor_x: f32,
    pub amplitude: f32,
    pub phase: f32,
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Present for movers only
    #[serde(default)]
    pub oscillation: Option<Oscillation>,
    /// Horizontal displacement applied on the latest tick
    #[serde(skip)]
    pub last_dx: f32,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.kind == PlatformKind::Base
    }

    #[inline]
    pub fn is_mover(&self) -> bool {
        self.oscillation.is_some_and(|o| o.amplitude > 0.0)
    }

    /// Whether a horizontal span overlaps this platform (open intervals)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        right > self.pos.x && left < self.right()
    }
}

/// A queued jump request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpIntent {
    /// Charge in the `[charge_min, charge_max]` window
    pub power: f32,
    /// Horizontal launch direction in `[-1, 1]`
    pub direction_x: f32,
    pub queued_at: f32,
}

/// In-progress pointer drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    pub start: Vec2,
    /// Offset from `start` as of the latest move
    pub delta: Vec2,
    pub started_at: f32,
}

/// Input written by device adapters, read once per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    /// Sim time the charge key went down
    pub hold_started_at: Option<f32>,
    pub drag: Option<Drag>,
    pub pending_jump: Option<JumpIntent>,
    /// Viewport used to normalize drags
    pub viewport: Vec2,
}

impl InputState {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            left: false,
            right: false,
            hold_started_at: None,
            drag: None,
            pending_jump: None,
            viewport,
        }
    }

    /// -1, 0 or 1 from the steering flags
    #[inline]
    pub fn steering(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    #[inline]
    pub fn is_charging(&self) -> bool {
        self.hold_started_at.is_some() || self.drag.is_some()
    }
}

/// Vertical view offset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
}

/// Per-run climb bookkeeping (all monotonic within a run)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Player y at world creation
    pub start_y: f32,
    /// Smallest y reached
    pub peak_y: f32,
    /// Highest meters value the generator has built up to
    pub highest_generated_meters: u32,
    /// y of the next generated platform, one gap above the last one placed
    pub next_slot_y: f32,
    /// Set once the peak reaches the meters cap
    pub summit_reached: bool,
}

/// Counters for missions/achievements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub jumps: u32,
    /// Landings on generated platforms
    pub landings: u32,
    pub mover_landings: u32,
    /// Consecutive landings on movers
    pub mover_streak: u32,
    pub best_mover_streak: u32,
    /// Times the player dropped back to the floor from above
    pub floor_returns: u32,
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    Jumped { power: f32, direction_x: f32 },
    Landed { platform_id: u32, mover: bool },
    /// Safety clamp put the player back on the floor
    FloorReturn,
    /// A queued jump timed out before it could fire
    IntentExpired,
    NewPeak { meters: u32 },
    SummitReached { meters: u32 },
    Paused,
    Resumed,
    RunEnded { peak_meters: u32 },
}

/// Id of the floor platform in every world
pub const BASE_PLATFORM_ID: u32 = 0;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub rng: Pcg32,
    /// Sim clock (seconds since run start, paused time excluded)
    pub time: f32,
    pub time_ticks: u64,
    pub player: Player,
    /// Live platforms in insertion order; the base is always first
    pub platforms: Vec<Platform>,
    pub input: InputState,
    pub camera: Camera,
    pub progress: Progress,
    pub stats: RunStats,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Build a fresh run: floor, player standing on it, a static starting stack
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let size = settings.player_size;
        let base = Platform {
            id: BASE_PLATFORM_ID,
            kind: PlatformKind::Base,
            pos: Vec2::new(0.0, settings.base_top),
            width: settings.width,
            height: settings.base_height,
            oscillation: None,
            last_dx: 0.0,
        };

        let player = Player {
            pos: Vec2::new(settings.width * 0.5 - size / 2.0, settings.base_top - size),
            vel: Vec2::ZERO,
            size,
            grounded: true,
            last_grounded_at: 0.0,
            standing_on: Some(BASE_PLATFORM_ID),
        };
        let start_y = player.pos.y;

        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            time_ticks: 0,
            camera: Camera {
                y: start_y - settings.camera_offset,
            },
            player,
            platforms: vec![base],
            input: InputState::new(Vec2::new(settings.width, settings.height)),
            progress: Progress {
                start_y,
                peak_y: start_y,
                highest_generated_meters: 0,
                next_slot_y: settings.base_top - settings.seed_first_gap,
                summit_reached: false,
            },
            stats: RunStats::default(),
            events: vec![GameEvent::RunStarted { seed }],
            next_id: BASE_PLATFORM_ID + 1,
        };

        let next_slot = world.seed_stack(settings);
        world.progress.next_slot_y = next_slot;
        world.progress.highest_generated_meters = world.meters_at(next_slot, settings);

        world
    }

    /// Static starting platforms, narrowing slightly with height.
    /// Returns the y of the next unfilled slot.
    fn seed_stack(&mut self, settings: &Settings) -> f32 {
        let mut y = settings.base_top - settings.seed_first_gap;
        let warm_up = settings.tiers.tier_for_meters(0);

        for i in 0..settings.seed_platforms {
            let width = if i < 2 {
                warm_up.width_max
            } else {
                (warm_up.width_max - i as f32 * 10.0).max(warm_up.width_min)
            }
            .min(settings.width);
            let span = (settings.width - 2.0 * settings.seed_margin - width).max(0.0);
            let x = settings.seed_margin + self.rng.random::<f32>() * span;
            self.push_platform(Vec2::new(x, y), width, settings.platform_height, None);
            y -= settings.seed_spacing;
        }

        y
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a normal platform and return its id
    pub fn push_platform(
        &mut self,
        pos: Vec2,
        width: f32,
        height: f32,
        oscillation: Option<Oscillation>,
    ) -> u32 {
        let id = self.next_entity_id();
        self.platforms.push(Platform {
            id,
            kind: PlatformKind::Normal,
            pos,
            width,
            height,
            oscillation,
            last_dx: 0.0,
        });
        id
    }

    pub fn base(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.is_base())
    }

    /// Top of the floor (falls back to the configured value)
    pub fn base_top(&self, settings: &Settings) -> f32 {
        self.base().map_or(settings.base_top, Platform::top)
    }

    /// Meters equivalent of a world y
    pub fn meters_at(&self, y: f32, settings: &Settings) -> u32 {
        meters_from_climb(self.progress.start_y - y, settings.meters_scale)
    }

    /// Best height reached this run
    pub fn peak_meters(&self, settings: &Settings) -> u32 {
        self.meters_at(self.progress.peak_y, settings)
    }

    pub fn normal_platform_count(&self) -> usize {
        self.platforms.iter().filter(|p| !p.is_base()).count()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
