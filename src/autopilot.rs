//! Scripted player for headless runs
//!
//! Leads the nearest reachable correct target and fires on a fixed cadence.
//! `accuracy` is the chance each shot is aimed true; the rest go to a random
//! point on the field, which is how a sloppy player ends up feeding the clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{GameState, Target, TickInput};

/// Minimum gap between shots
const FIRE_INTERVAL_MS: f32 = 220.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    accuracy: f64,
    cooldown_ms: f32,
}

impl Autopilot {
    pub fn new(seed: u64, accuracy: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            cooldown_ms: 0.0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(seed, self.accuracy);
    }

    /// Decide this frame's input from the current state
    pub fn next_input(&mut self, state: &GameState, dt_ms: f32) -> TickInput {
        if !state.is_playing() {
            return TickInput::default();
        }
        self.cooldown_ms = (self.cooldown_ms - dt_ms).max(0.0);

        let Some(target) = pick_target(state) else {
            // Nothing worth shooting: top up while it's quiet
            return TickInput {
                reload: !state.ammo.is_full(),
                ..Default::default()
            };
        };

        let lead = lead_point(state, target);
        if self.cooldown_ms > 0.0 || state.ammo.is_reloading() {
            return TickInput {
                aim: Some(lead),
                ..Default::default()
            };
        }

        self.cooldown_ms = FIRE_INTERVAL_MS;
        let aim = if self.rng.random_bool(self.accuracy) {
            lead
        } else {
            Vec2::new(
                self.rng.random_range(0.0..FIELD_WIDTH),
                self.rng.random_range(0.0..FIELD_HEIGHT),
            )
        };
        TickInput {
            aim: Some(aim),
            fire: true,
            ..Default::default()
        }
    }
}

/// Closest on-screen correct target to the muzzle
fn pick_target(state: &GameState) -> Option<&Target> {
    let muzzle = state.emission_point();
    let bounds = state.bounds();
    state
        .targets
        .iter()
        .filter(|t| t.is_correct && !t.consumed && bounds.contains(t.pos))
        .min_by(|a, b| {
            a.pos
                .distance_squared(muzzle)
                .partial_cmp(&b.pos.distance_squared(muzzle))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Where `target` will be when a bullet fired now reaches it (first order)
fn lead_point(state: &GameState, target: &Target) -> Vec2 {
    let muzzle = state.emission_point();
    let flight_secs = target.pos.distance(muzzle) / state.tuning.bullet_speed;
    let vel = target
        .motion
        .velocity(state.scale().value(), state.tuning.base_run_speed);
    target.pos + vel * flight_secs
}
