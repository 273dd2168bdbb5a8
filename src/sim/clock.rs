//! The time scale: one bounded multiplier that every subsystem reads
//!
//! Only [`TimeScale::apply_delta`] mutates the value, so the bound holds no
//! matter how many call sites push on it.

use serde::{Deserialize, Serialize};

/// Result of a single delta application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// Value moved (or stayed) strictly below the ceiling
    Nominal,
    /// Value is pinned at the ceiling: time overload
    Saturated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    value: f32,
    min: f32,
    max: f32,
}

impl TimeScale {
    pub fn new(initial: f32, min: f32, max: f32) -> Self {
        Self {
            value: initial.clamp(min, max),
            min,
            max,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Add `delta`, clamping into `[min, max]`
    pub fn apply_delta(&mut self, delta: f32) -> ScaleOutcome {
        let next = self.value + delta;
        // NaN deltas leave the value untouched
        if next.is_nan() {
            return self.outcome();
        }
        self.value = next.clamp(self.min, self.max);
        self.outcome()
    }

    fn outcome(&self) -> ScaleOutcome {
        if self.value >= self.max {
            ScaleOutcome::Saturated
        } else {
            ScaleOutcome::Nominal
        }
    }

    /// Scale a real-time delta into game time
    #[inline]
    pub fn scale_ms(&self, dt_ms: f32) -> f32 {
        dt_ms * self.value
    }

    /// How close to overload, 0.0 at min and 1.0 at max
    pub fn danger(&self) -> f32 {
        ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_correct_hit_at_floor_stays_at_floor() {
        let mut scale = TimeScale::new(1.0, 1.0, 6.0);
        assert_eq!(scale.apply_delta(-0.20), ScaleOutcome::Nominal);
        assert_eq!(scale.value(), 1.0);
    }

    #[test]
    fn test_wrong_hit_from_floor() {
        let mut scale = TimeScale::new(1.0, 1.0, 6.0);
        scale.apply_delta(0.30);
        assert!((scale.value() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_saturates_at_ceiling() {
        let mut scale = TimeScale::new(3.9, 0.6, 4.0);
        assert_eq!(scale.apply_delta(0.25), ScaleOutcome::Saturated);
        assert_eq!(scale.value(), 4.0);
    }

    #[test]
    fn test_danger_fraction() {
        let scale = TimeScale::new(2.3, 0.6, 4.0);
        assert!((scale.danger() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_nan_delta_ignored() {
        let mut scale = TimeScale::new(1.5, 1.0, 6.0);
        scale.apply_delta(f32::NAN);
        assert_eq!(scale.value(), 1.5);
    }

    proptest! {
        #[test]
        fn prop_stays_in_bounds(deltas in prop::collection::vec(-10.0f32..10.0, 0..64)) {
            let mut scale = TimeScale::new(1.0, 0.6, 4.0);
            for d in deltas {
                let outcome = scale.apply_delta(d);
                prop_assert!(scale.value() >= 0.6 && scale.value() <= 4.0);
                prop_assert_eq!(outcome == ScaleOutcome::Saturated, scale.value() >= 4.0);
            }
        }

        #[test]
        fn prop_extreme_negatives_never_undershoot(n in 1usize..200) {
            let mut scale = TimeScale::new(2.0, 1.0, 6.0);
            for _ in 0..n {
                scale.apply_delta(-1.0e6);
            }
            prop_assert_eq!(scale.value(), 1.0);
        }
    }
}
