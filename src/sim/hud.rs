//! Derived values for presentation, recomputed at the end of every tick

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};

/// Time-bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DangerLevel {
    Calm,
    Warning,
    Critical,
}

impl DangerLevel {
    pub fn from_fraction(danger: f32) -> Self {
        if danger < 0.35 {
            DangerLevel::Calm
        } else if danger < 0.7 {
            DangerLevel::Warning
        } else {
            DangerLevel::Critical
        }
    }
}

/// Short colour flash on the HUD after a hit or miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feedback {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub time_scale: f32,
    /// Whole seconds left to survive, rounded up
    pub survive_secs_left: u32,
    pub wave: u8,
    pub combo: u32,
    /// `None` when shots are unlimited
    pub ammo: Option<u32>,
    pub max_ammo: Option<u32>,
    pub reloading: bool,
    /// 0.0 at the minimum time scale, 1.0 at overload
    pub danger: f32,
    pub danger_level: DangerLevel,
    pub feedback: Option<Feedback>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let danger = state.scale().danger();
        Self {
            phase: state.phase,
            time_scale: state.scale().value(),
            survive_secs_left: state.remaining_secs().ceil() as u32,
            wave: state.wave.number(),
            combo: state.combo.count(),
            ammo: state.ammo.rounds(),
            max_ammo: state.ammo.max(),
            reloading: state.ammo.is_reloading(),
            danger,
            danger_level: DangerLevel::from_fraction(danger),
            feedback: state.feedback,
        }
    }

    /// Fraction of the time bar still filled (shrinks as danger rises)
    pub fn time_bar_fill(&self) -> f32 {
        (1.0 - self.danger).clamp(0.0, 1.0)
    }

    /// "Time: 1.00x"
    pub fn time_label(&self) -> String {
        format!("Time: {:.2}x", self.time_scale)
    }
}
