use space_infinite::consts::*;
use space_infinite::platform::{InputEvent, KeyCode};
use space_infinite::sim::{GameEvent, World, jump, tick};
use space_infinite::{RunState, Session, Settings};

const FRAME: f64 = 1.0 / 60.0;

fn space(pressed: bool) -> InputEvent {
    InputEvent::Key {
        code: KeyCode::Space,
        pressed,
    }
}

fn run_frames(session: &mut Session, now: &mut f64, frames: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        *now += FRAME;
        if let Some(report) = session.frame(*now) {
            events.extend(report.events);
        }
    }
    events
}

#[test]
fn tap_jump_launches_at_minimum_speed() {
    let mut session = Session::new(Settings::default(), 3);
    let mut now = 100.0;
    session.set_running(true, now);

    session.handle_input(space(true));
    session.handle_input(space(false));
    run_frames(&mut session, &mut now, 1);

    let world = session.world().unwrap();
    let dt = world.time;
    // Launch speed, then one frame of gravity
    let expected = -JUMP_MIN_SPEED + GRAVITY * dt;
    assert!((world.player.vel.y - expected).abs() < 1e-2);
    assert_eq!(world.player.vel.x, 0.0);
}

#[test]
fn peak_never_decreases_through_a_climb() {
    let mut session = Session::new(Settings::default(), 9);
    let mut now = 0.0;
    session.set_running(true, now);

    let mut last = 0;
    for round in 0..30 {
        session.handle_input(space(true));
        run_frames(&mut session, &mut now, 10 + round % 20);
        session.handle_input(space(false));
        for _ in 0..90 {
            now += FRAME;
            let report = session.frame(now).unwrap();
            assert!(report.meters >= last);
            last = report.meters;
        }
    }

    let world = session.world().unwrap();
    assert_eq!(world.platforms.iter().filter(|p| p.is_base()).count(), 1);
    assert!(world.normal_platform_count() <= MAX_LIVE_PLATFORMS);
    let lead = (world.peak_meters(session.settings()) + LEAD_METERS).min(MAX_METERS);
    assert!(world.progress.highest_generated_meters >= lead);
}

#[test]
fn stale_jump_is_dropped_before_landing() {
    let settings = Settings {
        intent_timeout: 0.3,
        ..Default::default()
    };
    let mut session = Session::new(settings, 5);
    let mut now = 0.0;
    session.set_running(true, now);

    // Full-charge jump, then wait out coyote time
    session.handle_input(space(true));
    run_frames(&mut session, &mut now, 70);
    session.handle_input(space(false));
    run_frames(&mut session, &mut now, 16);
    let world = session.world().unwrap();
    assert!(!world.player.grounded);
    assert!(world.player.vel.y < 0.0);

    // Tap while still rising: can't fire, must time out
    session.handle_input(space(true));
    session.handle_input(space(false));
    let events = run_frames(&mut session, &mut now, 60);
    assert!(events.contains(&GameEvent::IntentExpired));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Jumped { .. }))
            .count(),
        0
    );
}

#[test]
fn background_gap_does_not_blow_up_velocity() {
    let mut session = Session::new(Settings::default(), 1);
    let mut now = 0.0;
    session.set_running(true, now);
    run_frames(&mut session, &mut now, 5);

    session.set_visible(false, now);
    assert_eq!(session.state(), RunState::Paused);
    now += 3600.0;
    assert!(session.frame(now).is_none());
    session.set_visible(true, now);

    let report = session.frame(now + FRAME).unwrap();
    assert!(report.dt <= MAX_DT);
    let world = session.world().unwrap();
    assert!(world.player.vel.y.abs() < GRAVITY * MAX_DT + 1.0);
    assert_eq!(world.player.bottom(), BASE_TOP);
}

#[test]
fn custom_settings_flow_through() {
    let settings = Settings::from_json(
        r#"{
            "gravity": 900.0,
            "max_live_platforms": 8,
            "tiers": { "version": 2, "tiers": [
                { "min_meters": 0, "width_min": 200.0, "width_max": 200.0,
                  "gap": 60.0, "mover_probability": 0.0, "mover_speed": 0.0 }
            ] }
        }"#,
    )
    .unwrap();
    let mut session = Session::new(settings, 4);
    let mut now = 0.0;
    session.set_running(true, now);
    run_frames(&mut session, &mut now, 3);

    let world = session.world().unwrap();
    assert!(world.normal_platform_count() <= 8);
    assert!(
        world
            .platforms
            .iter()
            .filter(|p| !p.is_base())
            .any(|p| p.width == 200.0)
    );
}

#[test]
fn finish_hands_back_peak() {
    let mut session = Session::new(Settings::default(), 2);
    let mut now = 0.0;
    session.set_running(true, now);
    session.handle_input(space(true));
    run_frames(&mut session, &mut now, 30);
    session.handle_input(space(false));
    run_frames(&mut session, &mut now, 20);

    let peak = session.peak_meters().unwrap();
    assert!(peak > 0);
    assert_eq!(session.finish(), Some(peak));
    assert!(session.frame(now + FRAME).is_none());
    assert!(matches!(
        session.drain_events().as_slice(),
        [GameEvent::RunEnded { peak_meters }] if *peak_meters == peak
    ));
}

#[test]
fn world_stays_climbable_platform_by_platform() {
    let settings = Settings::default();
    let mut world = World::new(21, &settings);
    let reach = settings.jump_max_speed.powi(2) / (2.0 * settings.gravity);
    let dt = FRAME as f32;

    for _ in 0..80 {
        if world.peak_meters(&settings) >= 400 {
            break;
        }

        // Nearest platform above the player's feet
        let bottom = world.player.bottom();
        let target = world
            .platforms
            .iter()
            .filter(|p| p.top() < bottom - 1.0)
            .max_by(|a, b| a.top().total_cmp(&b.top()))
            .cloned()
            .expect("a platform above the player");
        let rise = bottom - target.top();
        assert!(rise <= reach * 0.6, "next platform {}px up", rise);

        // Line up under it and charge just enough to clear it
        world.player.pos.x = target.pos.x + (target.width - world.player.size) / 2.0;
        let needed = (2.0 * settings.gravity * (rise + world.player.size * 1.5)).sqrt();
        let t = ((needed - settings.jump_min_speed)
            / (settings.jump_max_speed - settings.jump_min_speed))
            .clamp(0.0, 1.0);
        let power = settings.charge_min + t * (settings.charge_max - settings.charge_min);
        jump::queue_jump(&mut world, power, 0.0);

        let landed = (0..180).any(|_| {
            tick(&mut world, &settings, dt);
            world.player.grounded && world.player.standing_on == Some(target.id)
        });
        assert!(landed, "missed platform {} at {}m", target.id, world.peak_meters(&settings));
    }

    assert!(world.peak_meters(&settings) >= 400);
    assert!(world.normal_platform_count() < MAX_LIVE_PLATFORMS);

    // Live platforms still form a ladder of distinct rungs
    let mut tops: Vec<f32> = world
        .platforms
        .iter()
        .filter(|p| !p.is_base())
        .map(|p| p.top())
        .collect();
    tops.sort_by(f32::total_cmp);
    assert!(tops.windows(2).all(|pair| pair[1] - pair[0] >= 119.9));
}
