//! Game state and core simulation types
//!
//! One [`GameState`] owns everything scene-wide: the time scale, wave, combo,
//! ammo, every entity registry and the deferred-task scheduler. Subsystems
//! receive it by `&mut` and never keep copies.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ammo::Ammo;
use super::clock::{ScaleOutcome, TimeScale};
use super::collision::{self, Body, Overlap};
use super::combo::Combo;
use super::entity::{Bullet, EntityView, Gate, MotionContext, Target};
use super::gates;
use super::hud::{Feedback, HudSnapshot};
use super::scheduler::{Deferred, Scheduler, TimerHandle};
use super::wave::Wave;
use crate::consts::*;
use crate::error::TuningError;
use crate::tuning::{MovementModel, ResourceModel, Tuning};
use crate::{Bounds, aim_direction};

pub type EntityId = u32;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Playing,
    /// Survived long enough
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Playing
    }
}

/// Why a session was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossCause {
    /// Time scale hit its ceiling
    TimeOverload,
    /// Ran into a gate that was still closed
    GateCrash,
}

/// Discrete notifications for audio / effects collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GameEvent {
    CorrectHit { pos: Vec2, combo: u32 },
    WrongHit { pos: Vec2 },
    /// A correct target escaped or a bullet ran out of range
    Miss { pos: Option<Vec2> },
    ShotFired { origin: Vec2, dir: Vec2 },
    ReloadStarted,
    ReloadFinished,
    WaveChanged { wave: u8 },
    GateSpawned { id: EntityId },
    GateDamaged { id: EntityId, hp: u8 },
    GateOpened { id: EntityId },
    Won,
    Lost { cause: LossCause },
}

/// Running totals for the session summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub correct_hits: u32,
    pub wrong_hits: u32,
    pub misses: u32,
    pub targets_spawned: u32,
    pub gates_opened: u32,
}

impl SessionStats {
    /// Correct hits over shots fired
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.correct_hits as f32 / self.shots_fired as f32
        }
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Only mutated through [`GameState::apply_time_delta`]
    scale: TimeScale,
    /// Scaled seconds survived
    pub elapsed_secs: f32,
    /// Derived from `elapsed_secs` every tick
    pub wave: Wave,
    pub combo: Combo,
    pub ammo: Ammo,
    /// Live targets (ascending id)
    pub targets: Vec<Target>,
    /// Live bullets (ascending id)
    pub bullets: Vec<Bullet>,
    /// Live gates (ascending id, so the first unopened one is the oldest)
    pub gates: Vec<Gate>,
    pub scheduler: Scheduler,
    /// Scaled milliseconds since the last target spawn
    pub spawn_timer_ms: f32,
    /// Scaled milliseconds since the last gate spawn
    pub gate_timer_ms: f32,
    /// Initial targets still to be spawned on the first tick
    pub(crate) opening_burst: u32,
    /// Crosshair position
    pub aim: Vec2,
    pub feedback: Option<Feedback>,
    feedback_timer: Option<TimerHandle>,
    /// Camera shake intensity (decays per tick)
    pub screen_shake: f32,
    pub loss_cause: Option<LossCause>,
    pub stats: SessionStats,
    pub hud: HudSnapshot,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Build a session from already-validated tuning
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::build(tuning, seed, Scheduler::new(), 1)
    }

    /// Validate `tuning`, then build a session
    pub fn try_new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(tuning, seed))
    }

    fn build(tuning: Tuning, seed: u64, scheduler: Scheduler, next_id: EntityId) -> Self {
        let ammo = match tuning.resource {
            ResourceModel::Unlimited => Ammo::unlimited(),
            ResourceModel::Magazine { max_ammo, .. } => Ammo::magazine(max_ammo),
        };
        let scale = TimeScale::new(tuning.initial_scale, tuning.min_scale, tuning.max_scale);
        let opening_burst = tuning.initial_targets;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            scale,
            elapsed_secs: 0.0,
            wave: Wave::FIRST,
            combo: Combo::default(),
            ammo,
            targets: Vec::new(),
            bullets: Vec::new(),
            gates: Vec::new(),
            scheduler,
            spawn_timer_ms: 0.0,
            gate_timer_ms: 0.0,
            opening_burst,
            aim: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            feedback: None,
            feedback_timer: None,
            screen_shake: 0.0,
            loss_cause: None,
            stats: SessionStats::default(),
            hud: HudSnapshot {
                phase: GamePhase::Playing,
                time_scale: 0.0,
                survive_secs_left: 0,
                wave: 1,
                combo: 0,
                ammo: None,
                max_ammo: None,
                reloading: false,
                danger: 0.0,
                danger_level: super::hud::DangerLevel::Calm,
                feedback: None,
            },
            time_ticks: 0,
            events: Vec::new(),
            next_id,
            tuning,
        };
        state.gate_timer_ms = gates::initial_gate_timer(&state.tuning);
        state.refresh_hud();
        state
    }

    /// Tear everything down and start a fresh session.
    ///
    /// Pending timers are cancelled and every registry emptied *before* any
    /// scalar is rebuilt. Entity ids keep counting up so nothing from the old
    /// session can alias a new entity.
    pub fn reset(&mut self) {
        let dropped = self.scheduler.cancel_all();
        self.targets.clear();
        self.bullets.clear();
        self.gates.clear();

        let seed = self.rng.random::<u64>();
        let scheduler = Scheduler::with_epoch(self.scheduler.epoch());
        let tuning = self.tuning.clone();
        *self = Self::build(tuning, seed, scheduler, self.next_id);
        log::info!(
            "Session reset (seed {}, {} timers cancelled)",
            seed,
            dropped
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    /// Scaled seconds left until the win
    pub fn remaining_secs(&self) -> f32 {
        (self.tuning.survive_secs - self.elapsed_secs).max(0.0)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::field()
    }

    pub fn motion_context(&self, dt_secs: f32) -> MotionContext {
        MotionContext {
            dt_secs,
            scale: self.scale.value(),
            base_run_speed: self.tuning.base_run_speed,
            bounds: self.bounds(),
        }
    }

    /// Where bullets leave the gun
    pub fn emission_point(&self) -> Vec2 {
        match self.tuning.movement {
            MovementModel::Arena => Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - ARENA_GUN_OFFSET),
            MovementModel::Runner => Vec2::new(RUNNER_PLAYER_X, RUNNER_PLAYER_Y),
        }
    }

    /// The runner's body; the arena has no player body
    pub fn player_body(&self) -> Option<Body> {
        match self.tuning.movement {
            MovementModel::Arena => None,
            MovementModel::Runner => Some(Body::Rect {
                center: Vec2::new(RUNNER_PLAYER_X, RUNNER_PLAYER_Y),
                half: Vec2::new(RUNNER_PLAYER_SIZE.0 / 2.0, RUNNER_PLAYER_SIZE.1 / 2.0),
            }),
        }
    }

    // === Time scale and phase ===

    /// The single entry point for changing the time scale.
    ///
    /// Returns `Some(GamePhase::Lost)` when this delta caused an overload.
    /// Once the session is over every call is a no-op.
    pub fn apply_time_delta(&mut self, delta: f32) -> Option<GamePhase> {
        if !self.is_playing() {
            return None;
        }
        match self.scale.apply_delta(delta) {
            ScaleOutcome::Nominal => None,
            ScaleOutcome::Saturated => {
                self.lose(LossCause::TimeOverload);
                Some(GamePhase::Lost)
            }
        }
    }

    /// Enter `Lost` (first terminal transition wins)
    pub fn lose(&mut self, cause: LossCause) {
        if !self.is_playing() {
            return;
        }
        self.phase = GamePhase::Lost;
        self.loss_cause = Some(cause);
        self.push_event(GameEvent::Lost { cause });
        log::info!(
            "Session lost ({:?}) after {:.1}s at {:.2}x",
            cause,
            self.elapsed_secs,
            self.scale.value()
        );
    }

    /// Enter `Won` (first terminal transition wins)
    pub fn win(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.phase = GamePhase::Won;
        self.push_event(GameEvent::Won);
        log::info!(
            "Session won at {:.2}x, best combo {}",
            self.scale.value(),
            self.combo.best()
        );
    }

    // === Scoring outcomes ===

    /// A correct target was shot
    pub fn score_correct(&mut self, pos: Vec2) {
        self.combo.on_correct();
        self.stats.correct_hits += 1;
        let bonus = self.combo.bonus(self.tuning.max_combo_bonus);
        self.push_event(GameEvent::CorrectHit {
            pos,
            combo: self.combo.count(),
        });
        self.pulse(Feedback::Good);
        self.apply_time_delta(self.tuning.correct_hit_delta - bonus);
        gates::damage_oldest(self);
    }

    /// A wrong target was shot
    pub fn score_wrong(&mut self, pos: Vec2) {
        self.combo.on_wrong_or_miss();
        self.stats.wrong_hits += 1;
        self.screen_shake = 1.0;
        self.push_event(GameEvent::WrongHit { pos });
        self.pulse(Feedback::Bad);
        self.apply_time_delta(self.tuning.wrong_hit_delta);
    }

    /// A bullet timed out or a correct target escaped
    pub fn score_miss(&mut self, pos: Option<Vec2>) {
        self.combo.on_wrong_or_miss();
        self.stats.misses += 1;
        self.push_event(GameEvent::Miss { pos });
        self.pulse(Feedback::Bad);
        self.apply_time_delta(self.tuning.miss_delta);
    }

    /// Flash the HUD; a newer pulse replaces an older one
    fn pulse(&mut self, feedback: Feedback) {
        if let Some(handle) = self.feedback_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.feedback = Some(feedback);
        self.feedback_timer = Some(
            self.scheduler
                .schedule(FEEDBACK_PULSE_MS, Deferred::FeedbackPulseEnd),
        );
    }

    pub(crate) fn end_pulse(&mut self) {
        self.feedback = None;
        self.feedback_timer = None;
    }

    // === Registries ===

    pub fn has_target(&self, id: EntityId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn has_bullet(&self, id: EntityId) -> bool {
        self.bullets.iter().any(|b| b.id == id)
    }

    pub fn has_gate(&self, id: EntityId) -> bool {
        self.gates.iter().any(|g| g.id == id)
    }

    /// Remove a target and its expiry timer
    pub fn remove_target(&mut self, id: EntityId) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        let mut target = self.targets.remove(idx);
        target.consumed = true;
        if let Some(handle) = target.expiry.take() {
            self.scheduler.cancel(handle);
        }
        Some(target)
    }

    /// Remove a bullet and its timeout timer
    pub fn remove_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let idx = self.bullets.iter().position(|b| b.id == id)?;
        let mut bullet = self.bullets.remove(idx);
        if let Some(handle) = bullet.timeout.take() {
            self.scheduler.cancel(handle);
        }
        Some(bullet)
    }

    /// Remove a gate and its despawn timer
    pub fn remove_gate(&mut self, id: EntityId) -> Option<Gate> {
        let idx = self.gates.iter().position(|g| g.id == id)?;
        let mut gate = self.gates.remove(idx);
        if let Some(handle) = gate.despawn.take() {
            self.scheduler.cancel(handle);
        }
        Some(gate)
    }

    pub fn live_entity_count(&self) -> usize {
        self.targets.len() + self.bullets.len() + self.gates.len()
    }

    /// Everything a renderer needs to draw this frame
    pub fn entity_views(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(self.live_entity_count());
        views.extend(self.gates.iter().map(|g| EntityView::of(g, Vec2::ZERO)));
        views.extend(self.targets.iter().map(|t| {
            let vel = t.motion.velocity(self.scale.value(), self.tuning.base_run_speed);
            EntityView::of(t, vel.normalize_or_zero())
        }));
        views.extend(self.bullets.iter().map(|b| EntityView::of(b, b.dir)));
        views
    }

    /// Hand an overlap from an external physics engine to the core
    pub fn on_overlap(&mut self, overlap: Overlap) {
        collision::resolve(self, overlap);
    }

    /// Unit direction a shot at `aim` would take
    pub fn shot_direction(&self, aim: Vec2) -> Vec2 {
        aim_direction(self.emission_point(), aim)
    }

    // === Events and HUD ===

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first.
    ///
    /// The queue only empties here and on reset; hosts drain it every frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn refresh_hud(&mut self) {
        self.hud = HudSnapshot::capture(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_clean() {
        let state = GameState::new(Tuning::arena(), 42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.scale().value(), 1.0);
        assert_eq!(state.wave, Wave::FIRST);
        assert_eq!(state.live_entity_count(), 0);
        assert_eq!(state.opening_burst, 3);
        assert_eq!(state.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_try_new_rejects_bad_tuning() {
        let mut tuning = Tuning::arena();
        tuning.max_scale = 0.1;
        assert!(GameState::try_new(tuning, 1).is_err());
    }

    #[test]
    fn test_overload_loses_exactly_once() {
        let mut state = GameState::new(Tuning::arena(), 1);
        assert_eq!(state.apply_time_delta(10.0), Some(GamePhase::Lost));
        assert_eq!(state.loss_cause, Some(LossCause::TimeOverload));
        assert_eq!(state.apply_time_delta(10.0), None);
        assert_eq!(state.apply_time_delta(-10.0), None);
        assert_eq!(state.scale().value(), state.tuning.max_scale);

        let losses = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Lost { .. }))
            .count();
        assert_eq!(losses, 1);
    }

    #[test]
    fn test_first_terminal_transition_wins() {
        let mut state = GameState::new(Tuning::arena(), 1);
        state.win();
        state.lose(LossCause::GateCrash);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.loss_cause, None);
    }

    #[test]
    fn test_correct_hit_uses_combo_bonus() {
        let mut state = GameState::new(Tuning::arena(), 1);
        state.apply_time_delta(1.0); // 2.0x
        state.score_correct(Vec2::ZERO); // combo 1: -0.15 - 0.018
        let expected = 2.0 - 0.15 - 0.018;
        assert!((state.scale().value() - expected).abs() < 1e-5);
        assert_eq!(state.feedback, Some(Feedback::Good));
    }

    #[test]
    fn test_wrong_and_miss_reset_combo() {
        let mut state = GameState::new(Tuning::arena(), 1);
        state.score_correct(Vec2::ZERO);
        state.score_correct(Vec2::ZERO);
        assert_eq!(state.combo.count(), 2);
        let before = state.scale().value();
        state.score_wrong(Vec2::ZERO);
        assert_eq!(state.combo.count(), 0);
        assert!((state.scale().value() - (before + 0.25)).abs() < 1e-5);
        state.score_correct(Vec2::ZERO);
        state.score_miss(None);
        assert_eq!(state.combo.count(), 0);
        assert_eq!(state.stats.misses, 1);
    }

    #[test]
    fn test_pulse_replaces_previous_timer() {
        let mut state = GameState::new(Tuning::arena(), 1);
        state.score_correct(Vec2::ZERO);
        state.score_wrong(Vec2::ZERO);
        // Only the newest pulse timer survives
        assert_eq!(state.scheduler.pending_count(), 1);
        assert_eq!(state.feedback, Some(Feedback::Bad));
    }

    #[test]
    fn test_reset_is_total() {
        let mut state = GameState::new(Tuning::runner_gates(), 5);
        state.score_wrong(Vec2::ZERO);
        state.combo.on_correct();
        state.elapsed_secs = 33.0;
        state.wave = Wave::at(33.0, &state.tuning.waves.thresholds);
        let old_epoch = state.scheduler.epoch();
        let id_before = state.next_entity_id();

        state.reset();

        assert!(state.is_playing());
        assert_eq!(state.live_entity_count(), 0);
        assert_eq!(state.scheduler.pending_count(), 0);
        assert!(state.scheduler.epoch() > old_epoch);
        assert_eq!(state.combo.count(), 0);
        assert_eq!(state.elapsed_secs, 0.0);
        assert_eq!(state.wave, Wave::FIRST);
        assert_eq!(state.ammo.rounds(), Some(8));
        assert_eq!(state.scale().value(), state.tuning.initial_scale);
        assert!(state.next_entity_id() > id_before);
        assert!(state.pending_events().is_empty());
    }
}
