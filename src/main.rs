//! Space in-Finite headless runner
//!
//! Drives a session with a simple autopilot at a fixed frame rate and logs
//! the height it reaches. Useful for tuning difficulty tables.
//!
//! Usage: `space-infinite [settings.json] [frames] [seed]`

use space_infinite::platform::{InputEvent, KeyCode};
use space_infinite::sim::{GameEvent, World};
use space_infinite::{Session, Settings};

/// Host frame period
const FRAME: f64 = 1.0 / 60.0;

/// Picks a platform above and charges a keyboard jump sized to reach it
#[derive(Default)]
struct Autopilot {
    /// Host time to release Space
    release_at: Option<f64>,
    /// Platform being aimed at
    target: Option<u32>,
}

impl Autopilot {
    fn events(&mut self, world: &World, settings: &Settings, now: f64) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let key = |code, pressed| InputEvent::Key { code, pressed };

        if let Some(release_at) = self.release_at {
            if now >= release_at {
                events.push(key(KeyCode::Space, false));
                self.release_at = None;
            }
            return events;
        }

        let player = &world.player;
        let center = player.pos.x + player.size / 2.0;

        // Steer toward the target while airborne, stop on the ground
        let target = self
            .target
            .and_then(|id| world.platforms.iter().find(|p| p.id == id));
        let (left, right) = match target {
            Some(p) if !player.grounded => {
                let mid = p.pos.x + p.width / 2.0;
                (mid < center - 4.0, mid > center + 4.0)
            }
            _ => (false, false),
        };
        events.push(key(KeyCode::ArrowLeft, left));
        events.push(key(KeyCode::ArrowRight, right));

        if !player.grounded || world.input.pending_jump.is_some() {
            return events;
        }

        // Nearest platform above, within one jump
        let reach = settings.jump_max_speed.powi(2) / (2.0 * settings.gravity.max(1.0));
        let next = world
            .platforms
            .iter()
            .filter(|p| p.top() < player.bottom() - 1.0 && player.bottom() - p.top() < reach * 0.9)
            .max_by(|a, b| a.top().total_cmp(&b.top()));

        if let Some(p) = next {
            let rise = player.bottom() - p.top() + player.size * 1.5;
            let speed = (2.0 * settings.gravity * rise).sqrt();
            let t = ((speed - settings.jump_min_speed)
                / (settings.jump_max_speed - settings.jump_min_speed).max(1.0))
            .clamp(0.0, 1.0);
            let held = t * (settings.charge_max - settings.charge_min);

            self.target = Some(p.id);
            self.release_at = Some(now + held as f64);
            events.push(key(KeyCode::Space, true));
        }

        events
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(|path| Settings::load(path))
        .unwrap_or_default();
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 120);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);

    log::info!("Space in-Finite (headless) - {} frames, seed {}", frames, seed);

    let mut session = Session::new(settings, seed);
    let mut pilot = Autopilot::default();
    let mut now = 0.0;
    session.set_running(true, now);

    let mut meters = 0;
    for _ in 0..frames {
        now += FRAME;

        let events = match session.world() {
            Some(world) => pilot.events(world, session.settings(), now),
            None => break,
        };
        for event in events {
            session.handle_input(event);
        }

        let Some(report) = session.frame(now) else {
            break;
        };
        meters = report.meters;
        for event in &report.events {
            match event {
                GameEvent::NewPeak { meters } if meters % 100 == 0 => {
                    log::info!("{}m", meters);
                }
                GameEvent::SummitReached { meters } => {
                    log::info!("Summit! {}m at t={:.1}s", meters, now);
                }
                GameEvent::FloorReturn => log::debug!("Back on the floor"),
                _ => {}
            }
        }
    }

    let stats = session.world().map(|w| w.stats.clone()).unwrap_or_default();
    let final_meters = session.finish().unwrap_or(meters);
    println!(
        "Reached {} m ({} jumps, {} landings, best mover streak {})",
        final_meters, stats.jumps, stats.landings, stats.best_mover_streak
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts embed the library directly
}
