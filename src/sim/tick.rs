//! Per-frame simulation tick
//!
//! Step order is fixed and matters:
//! 1. restart (honoured even after the session ended)
//! 2. freeze if terminal
//! 3. input: reload, then fire
//! 4. time: scale the frame, advance the survival clock, derive the wave
//! 5. move every entity
//! 6. overlaps
//! 7. pass-through and off-screen cleanup
//! 8. deferred timers that came due
//! 9. spawners
//! 10. win check
//! 11. HUD
//!
//! Any step may end the session; every later step then sees a frozen phase
//! and does nothing, so the first terminal condition reached is final.

use glam::Vec2;

use super::collision::{detect_overlaps, resolve};
use super::entity::Entity;
use super::scheduler::Deferred;
use super::state::{GameEvent, GameState};
use super::{gates, shooting, targets};
use crate::consts::{MAX_TICK_MS, SHAKE_DECAY};

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position (crosshair), if it moved
    pub aim: Option<Vec2>,
    /// Shoot at the crosshair
    pub fire: bool,
    /// Reload key
    pub reload: bool,
    /// Restart key
    pub restart: bool,
    /// Back to the menu (handled by the scene director)
    pub menu: bool,
}

/// Advance the game by `dt_ms` real milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.restart {
        state.reset();
        state.refresh_hud();
        return;
    }
    if let Some(aim) = input.aim {
        state.aim = aim;
    }
    if !state.is_playing() {
        return;
    }

    step(state, input, dt_ms.clamp(0.0, MAX_TICK_MS));
    state.refresh_hud();
}

fn step(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.time_ticks += 1;
    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    // Input
    if input.reload {
        shooting::manual_reload(state);
    }
    if input.fire {
        let aim = state.aim;
        shooting::try_shoot(state, aim);
    }

    // Time
    let scaled_ms = state.scale().scale_ms(dt_ms);
    state.elapsed_secs += scaled_ms / 1000.0;
    let wave = state.tuning.waves.wave_at(state.elapsed_secs);
    if wave != state.wave {
        log::info!("Wave {} at {:.1}s", wave, state.elapsed_secs);
        state.wave = wave;
        state.push_event(GameEvent::WaveChanged {
            wave: wave.number(),
        });
    }

    // Motion
    let ctx = state.motion_context(dt_ms / 1000.0);
    for target in &mut state.targets {
        target.advance(&ctx);
    }
    for bullet in &mut state.bullets {
        bullet.advance(&ctx);
    }
    for gate in &mut state.gates {
        gate.advance(&ctx);
    }

    // Collisions
    for overlap in detect_overlaps(state) {
        resolve(state, overlap);
    }
    if !state.is_playing() {
        return;
    }

    // Lifetimes bound to position
    targets::check_passed(state);
    gates::cull_passed(state);
    if !state.is_playing() {
        return;
    }

    // Deferred one-shots
    for task in state.scheduler.advance(dt_ms as f64) {
        run_deferred(state, task);
        if !state.is_playing() {
            return;
        }
    }

    // Spawning
    targets::update_spawner(state, scaled_ms);
    gates::update_spawner(state, scaled_ms);

    // Win
    if state.remaining_secs() <= 0.0 {
        state.win();
    }
}

/// Dispatch one timer; each handler re-checks that its entity is still alive
fn run_deferred(state: &mut GameState, task: Deferred) {
    match task {
        Deferred::BulletTimeout(id) => shooting::bullet_timeout(state, id),
        Deferred::TargetExpiry(id) => targets::expire(state, id),
        Deferred::ReloadComplete => shooting::finish_reload(state),
        Deferred::FeedbackPulseEnd => state.end_pulse(),
        Deferred::GateDespawn(id) => gates::despawn(state, id),
    }
}
