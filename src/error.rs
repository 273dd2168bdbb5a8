//! Error types for tuning validation and loading.
//!
//! Gameplay itself never fails: rejected shots and stale timers are silent
//! no-ops. Only building a session from bad configuration can error.

/// Reasons a [`Tuning`](crate::Tuning) cannot be used to build a session
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown preset '{0}' (expected arena, runner or runner-gates)")]
    UnknownPreset(String),

    #[error("Time scale bounds are inverted: min {min} must be below max {max}")]
    ScaleBounds { min: f32, max: f32 },

    #[error("Initial time scale {initial} is outside [{min}, {max})")]
    InitialScale { initial: f32, min: f32, max: f32 },

    #[error("Delta '{name}' has the wrong sign: {value}")]
    DeltaSign { name: &'static str, value: f32 },

    #[error("Wave thresholds must start at 0 and strictly increase: {0:?}")]
    WaveThresholds([f32; 4]),

    #[error("Wave table '{0}' must not get easier at higher waves")]
    WaveTable(&'static str),

    #[error("'{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("'{name}' must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("'{name}' is a probability and must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("Magazine size must be at least 1")]
    EmptyMagazine,

    #[error("Gates require the runner movement model")]
    GatesWithoutRunner,
}
