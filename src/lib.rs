//! Chrono Misfire - an arcade shooter where accuracy controls time
//!
//! Core modules:
//! - `sim`: Deterministic simulation (time scale, waves, entities, game state)
//! - `tuning`: Data-driven game balance and mode selection
//! - `scene`: Menu / game scene transitions
//! - `autopilot`: Scripted player used by the headless runner

pub mod autopilot;
pub mod error;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use scene::{Director, Scene};
pub use tuning::{MovementModel, ObstacleModel, ResourceModel, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 540.0;

    /// Fixed tick used by the headless runner (~60 Hz)
    pub const DEFAULT_TICK_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta accepted by a tick (prevents tunnelling after stalls)
    pub const MAX_TICK_MS: f32 = 100.0;

    /// Number of difficulty tiers
    pub const WAVE_COUNT: usize = 4;

    /// Target body radius
    pub const TARGET_RADIUS: f32 = 22.0;
    /// Bullet body radius
    pub const BULLET_RADIUS: f32 = 5.0;

    /// Arena spawn margins (targets spawn inside these bounds)
    pub const ARENA_SPAWN_MARGIN_X: f32 = 90.0;
    pub const ARENA_SPAWN_TOP: f32 = 100.0;
    pub const ARENA_SPAWN_BOTTOM_MARGIN: f32 = 220.0;
    /// Arena gun sits this far above the bottom edge
    pub const ARENA_GUN_OFFSET: f32 = 40.0;
    /// Vertical speed is a fraction of horizontal speed for bouncing targets
    pub const ARENA_VERTICAL_FACTOR: f32 = 0.7;

    /// Runner: fixed player position and body size
    pub const RUNNER_PLAYER_X: f32 = 160.0;
    pub const RUNNER_PLAYER_Y: f32 = 270.0;
    pub const RUNNER_PLAYER_SIZE: (f32, f32) = (36.0, 56.0);
    /// Runner: lane band targets spawn within
    pub const RUNNER_LANE_TOP: f32 = 80.0;
    pub const RUNNER_LANE_BOTTOM: f32 = 460.0;
    /// Runner: entities spawn this far past the right edge
    pub const RUNNER_SPAWN_OFFSET: f32 = 40.0;
    /// Runner: vertical bob amplitude around the spawn lane
    pub const RUNNER_BOB_RANGE: f32 = 70.0;

    /// Gate body width (height spans the playfield)
    pub const GATE_WIDTH: f32 = 40.0;

    /// Feedback pulse length after a hit or miss
    pub const FEEDBACK_PULSE_MS: f64 = 120.0;
    /// Screen shake decay per tick
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Combo count at which the bonus saturates
    pub const COMBO_SATURATION: u32 = 10;
}

/// Axis-aligned playfield bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The full playfield
    pub fn field() -> Self {
        Self::new(
            Vec2::ZERO,
            Vec2::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Unit direction from `from` toward `to`, straight up when the points coincide
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir }
}
