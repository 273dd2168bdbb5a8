//! Whole-session scenarios driven through the public API

use chrono_misfire::autopilot::Autopilot;
use chrono_misfire::consts::{DEFAULT_TICK_MS, RUNNER_PLAYER_X};
use chrono_misfire::sim::shooting::{ShotOutcome, try_shoot};
use chrono_misfire::sim::targets::spawn_target;
use chrono_misfire::sim::{
    GameEvent, GamePhase, GameState, LossCause, Motion, Overlap, TickInput, Wave, tick,
};
use chrono_misfire::{Director, Tuning};
use glam::Vec2;

const DT: f32 = DEFAULT_TICK_MS;

fn run_idle(state: &mut GameState, ms: f32) {
    let input = TickInput::default();
    let mut left = ms;
    while left > 0.0 {
        tick(state, &input, DT);
        left -= DT;
    }
}

/// No opening burst and no spawner: the test places every target itself
fn quiet(mut tuning: Tuning) -> Tuning {
    tuning.initial_targets = 0;
    tuning.spawn_base_delay_ms = 1.0e9;
    tuning
}

/// Spawn a target with fixed polarity, then shoot it through an injected overlap
fn shoot_target(state: &mut GameState, is_correct: bool) {
    let target = spawn_target(state);
    if let Some(t) = state.targets.iter_mut().find(|t| t.id == target) {
        t.is_correct = is_correct;
    }
    let ShotOutcome::Fired(bullet) = try_shoot(state, Vec2::new(800.0, 270.0)) else {
        panic!("shot should fire");
    };
    state.on_overlap(Overlap::BulletTarget { bullet, target });
}

#[test]
fn test_runner_scale_scenario() {
    let mut state = GameState::new(Tuning::runner(), 3);

    // Already at the floor: a correct hit cannot slow time further
    shoot_target(&mut state, true);
    assert_eq!(state.scale().value(), 1.0);

    let mut state = GameState::new(Tuning::runner(), 3);
    shoot_target(&mut state, false);
    assert!((state.scale().value() - 1.3).abs() < 1e-5);
    assert_eq!(state.combo.count(), 0);
}

#[test]
fn test_wave_boundaries() {
    let thresholds = Tuning::arena().waves.thresholds;
    assert_eq!(Wave::at(44.9, &thresholds).number(), 3);
    assert_eq!(Wave::at(45.0, &thresholds).number(), 4);
    assert_eq!(Wave::at(0.0, &thresholds).number(), 1);
}

#[test]
fn test_last_round_scenario() {
    let mut state = GameState::new(quiet(Tuning::runner()), 3);
    for _ in 0..7 {
        try_shoot(&mut state, Vec2::new(800.0, 270.0));
    }
    assert_eq!(state.ammo.rounds(), Some(1));

    assert!(matches!(
        try_shoot(&mut state, Vec2::new(800.0, 270.0)),
        ShotOutcome::Fired(_)
    ));
    assert_eq!(state.ammo.rounds(), Some(0));
    assert!(state.ammo.is_reloading());
    assert_eq!(
        try_shoot(&mut state, Vec2::new(800.0, 270.0)),
        ShotOutcome::Rejected
    );

    run_idle(&mut state, 1300.0);
    assert!(!state.ammo.is_reloading());
    assert_eq!(state.ammo.rounds(), Some(8));
    assert!(
        state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ReloadFinished))
    );
}

#[test]
fn test_expired_correct_target_penalised_once() {
    let mut state = GameState::new(quiet(Tuning::arena()), 9);
    let id = spawn_target(&mut state);
    let target = &mut state.targets[0];
    target.is_correct = true;
    target.motion = Motion::Bounce { vel: Vec2::ZERO };

    run_idle(&mut state, 2700.0);
    assert!(!state.has_target(id));
    assert_eq!(state.stats.misses, 1);
    let scale = state.scale().value();
    assert!((scale - 1.1).abs() < 1e-5);

    run_idle(&mut state, 3000.0);
    assert_eq!(state.stats.misses, 1);
    assert_eq!(state.scale().value(), scale);
}

#[test]
fn test_passed_runner_target_penalised_once() {
    let mut state = GameState::new(quiet(Tuning::runner()), 9);
    spawn_target(&mut state);
    state.targets[0].is_correct = true;
    state.targets[0].pos.x = RUNNER_PLAYER_X + 5.0;

    run_idle(&mut state, 500.0);
    assert!(state.targets.is_empty());
    assert_eq!(state.stats.misses, 1);
    assert!((state.scale().value() - 1.15).abs() < 1e-5);
}

#[test]
fn test_restart_leaves_no_stale_callbacks() {
    let mut state = GameState::new(quiet(Tuning::arena()), 17);

    // Plenty in flight: targets with expiry timers, bullets with timeouts,
    // a feedback pulse
    for _ in 0..4 {
        spawn_target(&mut state);
    }
    let fire = TickInput {
        aim: Some(Vec2::new(20.0, 20.0)),
        fire: true,
        ..Default::default()
    };
    for _ in 0..5 {
        tick(&mut state, &fire, DT);
    }
    assert!(state.scheduler.pending_count() > 0);

    tick(
        &mut state,
        &TickInput {
            restart: true,
            ..Default::default()
        },
        DT,
    );
    assert_eq!(state.live_entity_count(), 0);
    assert_eq!(state.combo.count(), 0);
    assert_eq!(state.wave, Wave::FIRST);
    assert_eq!(state.elapsed_secs, 0.0);

    // Long enough for every old timer to have come due
    run_idle(&mut state, 5000.0);
    assert_eq!(state.stats.misses, 0);
    assert_eq!(state.stats.shots_fired, 0);
    assert_eq!(state.scale().value(), state.tuning.initial_scale);
    assert_eq!(state.feedback, None);
    assert!(state.is_playing());
}

#[test]
fn test_closed_gate_crash() {
    let mut state = GameState::new(quiet(Tuning::runner_gates()), 2);
    run_idle(&mut state, 12_000.0);
    assert_eq!(state.phase, GamePhase::Lost);
    assert_eq!(state.loss_cause, Some(LossCause::GateCrash));
    assert_eq!(state.hud.phase, GamePhase::Lost);

    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::GateSpawned { .. })));
    let losses = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Lost { .. }))
        .count();
    assert_eq!(losses, 1);
}

#[test]
fn test_shooting_gate_open_avoids_crash() {
    let mut state = GameState::new(quiet(Tuning::runner_gates()), 2);
    run_idle(&mut state, 4100.0);
    assert_eq!(state.gates.len(), 1);

    shoot_target(&mut state, true);
    shoot_target(&mut state, true);
    assert!(state.gates[0].is_open);

    run_idle(&mut state, 4000.0);
    assert!(state.is_playing());
    assert!(state.gates.is_empty());
    assert_eq!(state.stats.gates_opened, 1);
}

#[test]
fn test_overload_is_terminal_and_frozen() {
    let mut state = GameState::new(Tuning::arena(), 4);
    run_idle(&mut state, 100.0);
    let mut wrong_hits = 0;
    while state.is_playing() {
        shoot_target(&mut state, false);
        wrong_hits += 1;
    }
    // 1.0 + 12 * 0.25 reaches the 4.0 ceiling
    assert_eq!(wrong_hits, 12);
    assert_eq!(state.phase, GamePhase::Lost);
    assert_eq!(state.loss_cause, Some(LossCause::TimeOverload));
    assert_eq!(state.scale().value(), state.tuning.max_scale);

    let ticks = state.time_ticks;
    let targets = state.targets.len();
    run_idle(&mut state, 3000.0);
    assert_eq!(state.time_ticks, ticks);
    assert_eq!(state.targets.len(), targets);
}

fn autopilot_session(tuning: Tuning, seed: u64) -> GameState {
    let mut director = Director::new(tuning, seed).unwrap();
    let mut pilot = Autopilot::new(seed, 0.7);
    director.update(
        &TickInput {
            fire: true,
            ..Default::default()
        },
        DT,
    );
    for _ in 0..20_000 {
        let state = director.game().unwrap();
        if !state.is_playing() {
            break;
        }
        let input = pilot.next_input(state, DT);
        director.update(&input, DT);
        director.game_mut().unwrap().drain_events();
    }
    director.game().unwrap().clone()
}

#[test]
fn test_autopilot_sessions_terminate() {
    for tuning in [Tuning::arena(), Tuning::runner(), Tuning::runner_gates()] {
        let state = autopilot_session(tuning, 31);
        assert!(state.phase.is_terminal());
        assert!(state.stats.shots_fired > 0);
        let scale = state.scale().value();
        assert!(scale >= state.tuning.min_scale && scale <= state.tuning.max_scale);
    }
}

#[test]
fn test_sessions_are_reproducible() {
    let a = autopilot_session(Tuning::runner_gates(), 1234);
    let b = autopilot_session(Tuning::runner_gates(), 1234);
    assert_eq!(a.phase, b.phase);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.time_ticks, b.time_ticks);
    assert_eq!(a.elapsed_secs, b.elapsed_secs);
}

#[test]
fn test_tuning_file_overrides_defaults() {
    let tuning = Tuning::from_json(r#"{ "movement": "runner", "survive_secs": 30.0 }"#).unwrap();
    assert_eq!(tuning.survive_secs, 30.0);
    assert_eq!(tuning.initial_scale, 1.0);
    assert!(Tuning::from_json("{ not json").is_err());
    assert!(Tuning::preset("space").is_err());
}

#[test]
fn test_drained_host_keeps_event_queue_empty() {
    let state = autopilot_session(Tuning::arena(), 8);
    assert!(state.phase.is_terminal());
    assert!(state.pending_events().is_empty());
}
