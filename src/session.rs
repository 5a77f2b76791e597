//! Run lifecycle and frame pacing
//!
//! The host calls [`Session::frame`] from its refresh callback with a
//! monotonic clock in seconds. The session owns the world for the duration of
//! a run and is the only thing that mutates it.

use serde::Serialize;

use crate::platform::{InputEvent, apply_input};
use crate::settings::Settings;
use crate::sim::{GameEvent, World, clamp_dt, jump, tick};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// No world exists
    Idle,
    Running,
    /// World kept, ticks suspended
    Paused,
}

/// What one frame produced
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Best height this run (monotonic)
    pub meters: u32,
    /// Step actually simulated
    pub dt: f32,
    pub events: Vec<GameEvent>,
}

/// Owns the current run and drives it from the host clock
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    state: RunState,
    world: Option<World>,
    /// Host time of the previous frame
    last_frame: Option<f64>,
    base_seed: u64,
    runs_started: u64,
    /// Events raised outside a tick (lifecycle edges), flushed with the next report
    pending: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings: settings.sanitized(),
            state: RunState::Idle,
            world: None,
            last_frame: None,
            base_seed: seed,
            runs_started: 0,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read-only view of the current world (for rendering)
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Seed for the next run, decorrelated per run
    fn next_seed(&mut self) -> u64 {
        let seed = self
            .base_seed
            .wrapping_add(self.runs_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.runs_started += 1;
        seed
    }

    /// Host start/stop signal. A false→true edge always builds a fresh world.
    pub fn set_running(&mut self, running: bool, now: f64) {
        match (running, self.state) {
            (true, RunState::Idle) => {
                let seed = self.next_seed();
                log::info!("Run starting (seed {})", seed);
                self.world = Some(World::new(seed, &self.settings));
                self.last_frame = Some(now);
                self.state = RunState::Running;
            }
            (false, RunState::Running | RunState::Paused) => {
                self.stop();
            }
            _ => {}
        }
    }

    /// Foreground visibility/focus changes pause and resume the run
    pub fn set_visible(&mut self, visible: bool, now: f64) {
        match (visible, self.state) {
            (false, RunState::Running) => {
                log::info!("Run paused");
                self.state = RunState::Paused;
                self.last_frame = None;
                self.pending.push(GameEvent::Paused);
            }
            (true, RunState::Paused) => {
                log::info!("Run resumed");
                self.state = RunState::Running;
                // Re-anchor so the hidden interval never reaches the integrator
                self.last_frame = Some(now);
                self.pending.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    /// Advance one frame at host time `now` (seconds)
    ///
    /// Returns `None` while idle or paused.
    pub fn frame(&mut self, now: f64) -> Option<FrameReport> {
        if self.state != RunState::Running {
            return None;
        }
        let last = self.last_frame.replace(now).unwrap_or(now);
        let dt = clamp_dt((now - last) as f32, self.settings.max_dt);
        self.tick_dt(dt)
    }

    /// Advance by an explicit step for hosts that run their own clock
    pub fn tick_dt(&mut self, dt: f32) -> Option<FrameReport> {
        if self.state != RunState::Running {
            return None;
        }
        let world = self.world.as_mut()?;
        let dt = clamp_dt(dt, self.settings.max_dt);
        tick(world, &self.settings, dt);

        let mut events = std::mem::take(&mut self.pending);
        events.extend(world.drain_events());
        Some(FrameReport {
            meters: world.peak_meters(&self.settings),
            dt,
            events,
        })
    }

    /// Forward a device event into the run's input state.
    /// Ignored while idle; recorded while paused.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.world.as_mut() {
            Some(world) => apply_input(world, event, &self.settings),
            None => false,
        }
    }

    /// Charge indicator fill for the HUD
    pub fn charge_progress(&self) -> Option<f32> {
        jump::charge_progress(self.world.as_ref()?, &self.settings)
    }

    /// Best height of the current run, if one exists
    pub fn peak_meters(&self) -> Option<u32> {
        self.world.as_ref().map(|w| w.peak_meters(&self.settings))
    }

    /// External end condition fired: stop the run and return its final height
    pub fn finish(&mut self) -> Option<u32> {
        let peak = self.peak_meters();
        if peak.is_some() {
            self.stop();
        }
        peak
    }

    /// Events raised since the last frame without a tick (e.g. `RunEnded`)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    fn stop(&mut self) {
        if let Some(world) = self.world.take() {
            let peak_meters = world.peak_meters(&self.settings);
            log::info!(
                "Run ended at {}m after {} ticks ({} jumps)",
                peak_meters,
                world.time_ticks,
                world.stats.jumps
            );
            self.pending.push(GameEvent::RunEnded { peak_meters });
        }
        self.state = RunState::Idle;
        self.last_frame = None;
    }
}
