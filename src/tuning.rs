//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. The three
//! historical game variants (free-aim arena, side-scrolling runner, runner
//! with ammo and gates) are one engine selected by the mode triple
//! {movement, resource, obstacles}.

use serde::{Deserialize, Serialize};

use crate::consts::WAVE_COUNT;
use crate::error::TuningError;

/// How targets move and where the gun sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementModel {
    /// Static arena, targets bounce around, gun at bottom centre
    #[default]
    Arena,
    /// Targets scroll toward a stationary player on the left
    Runner,
}

/// Whether shots are limited
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResourceModel {
    #[default]
    Unlimited,
    /// Finite magazine with a timed refill
    Magazine { max_ammo: u32, reload_ms: f64 },
}

/// Optional obstacles that must be shot open
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ObstacleModel {
    #[default]
    None,
    Gates {
        /// Correct hits needed to open a gate
        hp: u8,
        /// Scaled milliseconds between gate spawns
        spawn_interval_ms: f32,
        /// Scaled milliseconds before the first gate
        first_gate_ms: f32,
        /// Real milliseconds an opened gate lingers before despawning
        grace_ms: f64,
    },
}

/// Per-wave difficulty tables, indexed by `wave - 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTables {
    /// Elapsed seconds at which each wave begins
    pub thresholds: [f32; WAVE_COUNT],
    /// Probability a fresh target is a correct one
    pub correct_chance: [f64; WAVE_COUNT],
    /// Multiplier on the base spawn delay
    pub spawn_delay_factor: [f32; WAVE_COUNT],
    /// Arena: maximum horizontal target speed (px/s, before time scale)
    pub target_speed: [f32; WAVE_COUNT],
    /// Arena: milliseconds before an untouched target despawns
    pub target_lifetime_ms: [f64; WAVE_COUNT],
    /// Runner: multiplier on the base scroll speed
    pub run_speed_factor: [f32; WAVE_COUNT],
}

impl Default for WaveTables {
    fn default() -> Self {
        Self {
            thresholds: [0.0, 15.0, 30.0, 45.0],
            correct_chance: [0.75, 0.65, 0.55, 0.55],
            spawn_delay_factor: [1.0, 0.85, 0.72, 0.62],
            target_speed: [60.0, 120.0, 170.0, 170.0],
            target_lifetime_ms: [2600.0, 2300.0, 2000.0, 2000.0],
            run_speed_factor: [1.0, 1.15, 1.3, 1.45],
        }
    }
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MovementModel,
    pub resource: ResourceModel,
    pub obstacles: ObstacleModel,

    // === Time scale ===
    pub initial_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Applied on a correct hit (negative: slows time)
    pub correct_hit_delta: f32,
    /// Applied on a wrong hit
    pub wrong_hit_delta: f32,
    /// Applied on a miss, bullet timeout or escaped correct target
    pub miss_delta: f32,
    /// Extra slow-down at a saturated combo
    pub max_combo_bonus: f32,

    // === Session ===
    /// Scaled seconds the player must survive to win
    pub survive_secs: f32,
    /// Scaled milliseconds between target spawns at wave 1
    pub spawn_base_delay_ms: f32,
    /// Targets spawned on the first tick of a session
    pub initial_targets: u32,

    // === Projectiles ===
    pub bullet_speed: f32,
    pub bullet_lifetime_ms: f64,

    // === Target motion ===
    /// Runner: leftward scroll speed at scale 1.0 (px/s)
    pub base_run_speed: f32,
    /// Runner: vertical bob speed (px/s, before time scale)
    pub bob_speed: f32,
    /// Runner: chance a target bobs up and down while scrolling
    pub bob_chance: f64,
    /// Arena: chance a target sweeps sideways instead of bouncing
    pub sweep_chance: f64,

    pub waves: WaveTables,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::arena()
    }
}

impl Tuning {
    /// Free-aim arena with unlimited shots
    pub fn arena() -> Self {
        Self {
            movement: MovementModel::Arena,
            resource: ResourceModel::Unlimited,
            obstacles: ObstacleModel::None,
            initial_scale: 1.0,
            min_scale: 0.6,
            max_scale: 4.0,
            correct_hit_delta: -0.15,
            wrong_hit_delta: 0.25,
            miss_delta: 0.10,
            max_combo_bonus: 0.18,
            survive_secs: 60.0,
            spawn_base_delay_ms: 900.0,
            initial_targets: 3,
            bullet_speed: 720.0,
            bullet_lifetime_ms: 900.0,
            base_run_speed: 220.0,
            bob_speed: 90.0,
            bob_chance: 0.35,
            sweep_chance: 0.2,
            waves: WaveTables::default(),
        }
    }

    /// Side-scroller with a magazine
    pub fn runner() -> Self {
        Self {
            movement: MovementModel::Runner,
            resource: ResourceModel::Magazine {
                max_ammo: 8,
                reload_ms: 1200.0,
            },
            min_scale: 1.0,
            max_scale: 6.0,
            correct_hit_delta: -0.20,
            wrong_hit_delta: 0.30,
            miss_delta: 0.15,
            spawn_base_delay_ms: 1100.0,
            ..Self::arena()
        }
    }

    /// Side-scroller with a magazine and gates
    pub fn runner_gates() -> Self {
        Self {
            obstacles: ObstacleModel::Gates {
                hp: 2,
                spawn_interval_ms: 7000.0,
                first_gate_ms: 4000.0,
                grace_ms: 250.0,
            },
            ..Self::runner()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Result<Self, TuningError> {
        match name.to_lowercase().as_str() {
            "arena" => Ok(Self::arena()),
            "runner" => Ok(Self::runner()),
            "runner-gates" | "gates" => Ok(Self::runner_gates()),
            _ => Err(TuningError::UnknownPreset(name.to_string())),
        }
    }

    /// Parse and validate a JSON tuning file; missing fields take arena defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {:?} / {:?} / {:?}",
            tuning.movement,
            tuning.resource,
            tuning.obstacles
        );
        Ok(tuning)
    }

    /// Magazine size, if shots are limited
    pub fn max_ammo(&self) -> Option<u32> {
        match self.resource {
            ResourceModel::Magazine { max_ammo, .. } => Some(max_ammo),
            ResourceModel::Unlimited => None,
        }
    }

    pub fn has_gates(&self) -> bool {
        matches!(self.obstacles, ObstacleModel::Gates { .. })
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.min_scale < self.max_scale) {
            return Err(TuningError::ScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if !(self.initial_scale >= self.min_scale && self.initial_scale < self.max_scale) {
            return Err(TuningError::InitialScale {
                initial: self.initial_scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }

        // wrong, miss > 0 > correct
        if !(self.correct_hit_delta < 0.0) {
            return Err(TuningError::DeltaSign {
                name: "correct_hit_delta",
                value: self.correct_hit_delta,
            });
        }
        if !(self.wrong_hit_delta > 0.0) {
            return Err(TuningError::DeltaSign {
                name: "wrong_hit_delta",
                value: self.wrong_hit_delta,
            });
        }
        if !(self.miss_delta > 0.0) {
            return Err(TuningError::DeltaSign {
                name: "miss_delta",
                value: self.miss_delta,
            });
        }
        if !(self.max_combo_bonus >= 0.0) {
            return Err(TuningError::DeltaSign {
                name: "max_combo_bonus",
                value: self.max_combo_bonus,
            });
        }

        positive("survive_secs", self.survive_secs as f64)?;
        positive("spawn_base_delay_ms", self.spawn_base_delay_ms as f64)?;
        positive("bullet_speed", self.bullet_speed as f64)?;
        positive("bullet_lifetime_ms", self.bullet_lifetime_ms)?;
        positive("base_run_speed", self.base_run_speed as f64)?;
        non_negative("bob_speed", self.bob_speed as f64)?;
        probability("bob_chance", self.bob_chance)?;
        probability("sweep_chance", self.sweep_chance)?;

        self.validate_waves()?;

        if let ResourceModel::Magazine {
            max_ammo,
            reload_ms,
        } = self.resource
        {
            if max_ammo == 0 {
                return Err(TuningError::EmptyMagazine);
            }
            positive("reload_ms", reload_ms)?;
        }

        if let ObstacleModel::Gates {
            hp,
            spawn_interval_ms,
            first_gate_ms,
            grace_ms,
        } = self.obstacles
        {
            if self.movement != MovementModel::Runner {
                return Err(TuningError::GatesWithoutRunner);
            }
            positive("gate hp", hp as f64)?;
            positive("spawn_interval_ms", spawn_interval_ms as f64)?;
            positive("first_gate_ms", first_gate_ms as f64)?;
            positive("grace_ms", grace_ms)?;
        }

        Ok(())
    }

    fn validate_waves(&self) -> Result<(), TuningError> {
        let w = &self.waves;
        let thresholds_ok =
            w.thresholds[0] == 0.0 && w.thresholds.windows(2).all(|p| p[0] < p[1]);
        if !thresholds_ok {
            return Err(TuningError::WaveThresholds(w.thresholds));
        }

        // Higher wave => harder
        if !w.correct_chance.windows(2).all(|p| p[0] >= p[1])
            || !w.correct_chance.iter().all(|c| (0.0..=1.0).contains(c))
        {
            return Err(TuningError::WaveTable("correct_chance"));
        }
        if !w.spawn_delay_factor.windows(2).all(|p| p[0] >= p[1])
            || !w.spawn_delay_factor.iter().all(|f| *f > 0.0)
        {
            return Err(TuningError::WaveTable("spawn_delay_factor"));
        }
        if !w.target_speed.windows(2).all(|p| p[0] <= p[1])
            || !w.target_speed.iter().all(|s| *s >= 0.0)
        {
            return Err(TuningError::WaveTable("target_speed"));
        }
        if !w.target_lifetime_ms.windows(2).all(|p| p[0] >= p[1])
            || !w.target_lifetime_ms.iter().all(|t| *t > 0.0)
        {
            return Err(TuningError::WaveTable("target_lifetime_ms"));
        }
        // Runner targets must reach the player to be scored
        if !w.run_speed_factor.windows(2).all(|p| p[0] <= p[1])
            || !w.run_speed_factor.iter().all(|f| *f > 0.0)
        {
            return Err(TuningError::WaveTable("run_speed_factor"));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::Probability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in ["arena", "runner", "runner-gates"] {
            let tuning = Tuning::preset(name).unwrap();
            tuning.validate().unwrap();
        }
        assert!(matches!(
            Tuning::preset("tetris"),
            Err(TuningError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_runner_gates_mode_triple() {
        let t = Tuning::runner_gates();
        assert_eq!(t.movement, MovementModel::Runner);
        assert_eq!(t.max_ammo(), Some(8));
        assert!(t.has_gates());
        assert_eq!(Tuning::arena().max_ammo(), None);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"{
            "movement": "runner",
            "resource": { "kind": "magazine", "max_ammo": 4, "reload_ms": 500.0 },
            "max_scale": 5.0
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.movement, MovementModel::Runner);
        assert_eq!(tuning.max_ammo(), Some(4));
        assert_eq!(tuning.max_scale, 5.0);
        // Untouched fields come from the arena preset
        assert_eq!(tuning.survive_secs, 60.0);
        assert_eq!(tuning.waves.thresholds, [0.0, 15.0, 30.0, 45.0]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_delta_signs() {
        let mut t = Tuning::arena();
        t.correct_hit_delta = 0.1;
        assert!(matches!(
            t.validate(),
            Err(TuningError::DeltaSign { name: "correct_hit_delta", .. })
        ));

        let mut t = Tuning::arena();
        t.miss_delta = 0.0;
        assert!(matches!(
            t.validate(),
            Err(TuningError::DeltaSign { name: "miss_delta", .. })
        ));
    }

    #[test]
    fn test_rejects_easier_later_waves() {
        let mut t = Tuning::arena();
        t.waves.correct_chance = [0.5, 0.6, 0.55, 0.55];
        assert!(matches!(
            t.validate(),
            Err(TuningError::WaveTable("correct_chance"))
        ));

        let mut t = Tuning::arena();
        t.waves.thresholds = [0.0, 15.0, 15.0, 45.0];
        assert!(matches!(t.validate(), Err(TuningError::WaveThresholds(_))));
    }

    #[test]
    fn test_rejects_bad_bounds_and_modes() {
        let mut t = Tuning::arena();
        t.min_scale = 5.0;
        assert!(matches!(t.validate(), Err(TuningError::ScaleBounds { .. })));

        let mut t = Tuning::runner_gates();
        t.movement = MovementModel::Arena;
        assert!(matches!(t.validate(), Err(TuningError::GatesWithoutRunner)));

        let mut t = Tuning::runner();
        t.resource = ResourceModel::Magazine {
            max_ammo: 0,
            reload_ms: 100.0,
        };
        assert!(matches!(t.validate(), Err(TuningError::EmptyMagazine)));
    }

    #[test]
    fn test_rejects_out_of_range_chances() {
        let mut t = Tuning::arena();
        t.sweep_chance = 1.5;
        assert!(matches!(
            t.validate(),
            Err(TuningError::Probability { name: "sweep_chance", .. })
        ));

        let mut t = Tuning::runner();
        t.bob_chance = -0.1;
        assert!(matches!(
            t.validate(),
            Err(TuningError::Probability { name: "bob_chance", .. })
        ));

        assert!(matches!(
            Tuning::from_json(r#"{ "sweep_chance": 1.5 }"#),
            Err(TuningError::Probability { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_bob_speed() {
        let mut t = Tuning::runner();
        t.bob_speed = -1.0;
        assert!(matches!(
            t.validate(),
            Err(TuningError::Negative { name: "bob_speed", .. })
        ));
        t.bob_speed = 0.0;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_target_speed() {
        let mut t = Tuning::arena();
        t.waves.target_speed = [-10.0; 4];
        assert!(matches!(
            t.validate(),
            Err(TuningError::WaveTable("target_speed"))
        ));
    }

    #[test]
    fn test_rejects_stalled_runner_scroll() {
        let mut t = Tuning::runner();
        t.waves.run_speed_factor = [0.0; 4];
        assert!(matches!(
            t.validate(),
            Err(TuningError::WaveTable("run_speed_factor"))
        ));

        t.waves.run_speed_factor = [-1.0, -1.0, 0.5, 1.0];
        assert!(matches!(
            t.validate(),
            Err(TuningError::WaveTable("run_speed_factor"))
        ));
    }
}
