//! Target registry: spawning, expiry and pass-through

use glam::Vec2;
use rand::Rng;

use super::entity::{Bob, Motion, Target};
use super::scheduler::Deferred;
use super::state::{EntityId, GameState};
use crate::consts::*;
use crate::tuning::MovementModel;

/// Spawn one target using the current wave and time scale
pub fn spawn_target(state: &mut GameState) -> EntityId {
    let id = state.next_entity_id();
    let wave = state.wave;
    let correct_chance = state.tuning.waves.correct_chance(wave);
    let is_correct = state.rng.random_bool(correct_chance);

    let (pos, motion) = match state.tuning.movement {
        MovementModel::Arena => arena_placement(state),
        MovementModel::Runner => runner_placement(state),
    };

    let expiry = match state.tuning.movement {
        MovementModel::Arena => {
            let lifetime = state.tuning.waves.target_lifetime_ms(wave);
            Some(state.scheduler.schedule(lifetime, Deferred::TargetExpiry(id)))
        }
        // Runner targets live until they pass the player
        MovementModel::Runner => None,
    };

    log::debug!(
        "Spawned {} target {} at ({:.0}, {:.0}) {:?}",
        if is_correct { "correct" } else { "wrong" },
        id,
        pos.x,
        pos.y,
        motion
    );

    state.targets.push(Target {
        id,
        pos,
        radius: TARGET_RADIUS,
        is_correct,
        motion,
        consumed: false,
        expiry,
    });
    state.stats.targets_spawned += 1;
    id
}

fn arena_placement(state: &mut GameState) -> (Vec2, Motion) {
    let x = state
        .rng
        .random_range(ARENA_SPAWN_MARGIN_X..=FIELD_WIDTH - ARENA_SPAWN_MARGIN_X);
    let y = state
        .rng
        .random_range(ARENA_SPAWN_TOP..=FIELD_HEIGHT - ARENA_SPAWN_BOTTOM_MARGIN);
    let pos = Vec2::new(x, y);

    // Faster world => faster targets, fixed at spawn
    let base = state.tuning.waves.target_speed(state.wave) * state.scale().value();

    let motion = if state.rng.random_bool(state.tuning.sweep_chance) {
        let speed = state.rng.random_range(base * 0.5..=base.max(1.0));
        let dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let reach = ARENA_SPAWN_MARGIN_X + 60.0;
        Motion::Sweep {
            speed,
            dir,
            min_x: (x - reach).max(TARGET_RADIUS),
            max_x: (x + reach).min(FIELD_WIDTH - TARGET_RADIUS),
        }
    } else {
        let vy_max = base * ARENA_VERTICAL_FACTOR;
        let vel = Vec2::new(
            state.rng.random_range(-base..=base),
            state.rng.random_range(-vy_max..=vy_max),
        );
        Motion::Bounce { vel }
    };

    (pos, motion)
}

fn runner_placement(state: &mut GameState) -> (Vec2, Motion) {
    let y = state
        .rng
        .random_range(RUNNER_LANE_TOP..=RUNNER_LANE_BOTTOM);
    let pos = Vec2::new(FIELD_WIDTH + RUNNER_SPAWN_OFFSET, y);
    let speed_factor = state.tuning.waves.run_speed_factor(state.wave);

    let bob = if state.rng.random_bool(state.tuning.bob_chance) {
        let dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Some(Bob {
            speed: state.tuning.bob_speed,
            dir,
            min_y: (y - RUNNER_BOB_RANGE).max(RUNNER_LANE_TOP),
            max_y: (y + RUNNER_BOB_RANGE).min(RUNNER_LANE_BOTTOM),
        })
    } else {
        None
    };

    (pos, Motion::Scroll { speed_factor, bob })
}

/// Spawn cadence: the opening burst, then one target whenever enough scaled
/// time has accumulated
pub fn update_spawner(state: &mut GameState, scaled_ms: f32) {
    while state.opening_burst > 0 {
        state.opening_burst -= 1;
        spawn_target(state);
    }

    state.spawn_timer_ms += scaled_ms;
    let delay = spawn_delay_ms(state);
    if state.spawn_timer_ms >= delay {
        state.spawn_timer_ms = 0.0;
        spawn_target(state);
    }
}

/// Current spawn interval: denser at higher waves and faster time
pub fn spawn_delay_ms(state: &GameState) -> f32 {
    let factor = state.tuning.waves.spawn_delay_factor(state.wave);
    state.tuning.spawn_base_delay_ms * factor / state.scale().value()
}

/// Arena target timer fired. Escaped correct targets count as a miss.
pub fn expire(state: &mut GameState, id: EntityId) {
    // Already shot: nothing to do
    let Some(target) = state.remove_target(id) else {
        return;
    };
    log::trace!("Target {} expired", id);
    if target.is_correct {
        state.score_miss(Some(target.pos));
    }
}

/// Runner: remove targets that crossed the player's x. Correct ones that got
/// past count as a miss, exactly once.
pub fn check_passed(state: &mut GameState) {
    if state.tuning.movement != MovementModel::Runner {
        return;
    }
    let passed: Vec<EntityId> = state
        .targets
        .iter()
        .filter(|t| !t.consumed && t.pos.x < RUNNER_PLAYER_X)
        .map(|t| t.id)
        .collect();

    for id in passed {
        let Some(target) = state.remove_target(id) else {
            continue;
        };
        if target.is_correct {
            state.score_miss(Some(target.pos));
        }
        if !state.is_playing() {
            break;
        }
    }
}
