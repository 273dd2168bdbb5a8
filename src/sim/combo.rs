//! Consecutive-correct-hit streak

use serde::{Deserialize, Serialize};

use crate::consts::COMBO_SATURATION;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    count: u32,
    best: u32,
}

impl Combo {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Longest streak this session
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn on_correct(&mut self) {
        self.count = self.count.saturating_add(1);
        self.best = self.best.max(self.count);
    }

    pub fn on_wrong_or_miss(&mut self) {
        self.count = 0;
    }

    /// Extra slow-down earned by the current streak, in `[0, max_bonus]`
    pub fn bonus(&self, max_bonus: f32) -> f32 {
        let factor = (self.count as f32 / COMBO_SATURATION as f32).clamp(0.0, 1.0);
        factor * max_bonus
    }
}
