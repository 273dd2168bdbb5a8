//! Wave progression: elapsed survival time -> difficulty tier

use serde::{Deserialize, Serialize};

use crate::consts::WAVE_COUNT;
use crate::tuning::WaveTables;

/// Difficulty tier, 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wave(u8);

impl Wave {
    pub const FIRST: Wave = Wave(1);

    /// Tier number (1-based)
    pub fn number(self) -> u8 {
        self.0
    }

    /// Index into the per-wave tables
    #[inline]
    pub fn index(self) -> usize {
        (self.0 as usize - 1).min(WAVE_COUNT - 1)
    }

    /// Highest tier whose threshold has been reached
    pub fn at(elapsed_secs: f32, thresholds: &[f32; WAVE_COUNT]) -> Self {
        let reached = thresholds
            .iter()
            .rposition(|&t| elapsed_secs >= t)
            .unwrap_or(0);
        Wave(reached as u8 + 1)
    }
}

impl Default for Wave {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Wave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-wave lookups
impl WaveTables {
    pub fn wave_at(&self, elapsed_secs: f32) -> Wave {
        Wave::at(elapsed_secs, &self.thresholds)
    }

    pub fn correct_chance(&self, wave: Wave) -> f64 {
        self.correct_chance[wave.index()]
    }

    pub fn spawn_delay_factor(&self, wave: Wave) -> f32 {
        self.spawn_delay_factor[wave.index()]
    }

    pub fn target_speed(&self, wave: Wave) -> f32 {
        self.target_speed[wave.index()]
    }

    pub fn target_lifetime_ms(&self, wave: Wave) -> f64 {
        self.target_lifetime_ms[wave.index()]
    }

    pub fn run_speed_factor(&self, wave: Wave) -> f32 {
        self.run_speed_factor[wave.index()]
    }
}
