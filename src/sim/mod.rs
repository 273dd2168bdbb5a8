//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ammo;
pub mod clock;
pub mod collision;
pub mod combo;
pub mod entity;
pub mod gates;
pub mod hud;
pub mod scheduler;
pub mod shooting;
pub mod state;
pub mod targets;
pub mod tick;
pub mod wave;

pub use ammo::{Ammo, ShotPermit};
pub use clock::{ScaleOutcome, TimeScale};
pub use collision::{Body, Overlap, detect_overlaps};
pub use combo::Combo;
pub use entity::{Bullet, Entity, EntityKind, EntityView, Gate, Motion, Target};
pub use hud::{DangerLevel, Feedback, HudSnapshot};
pub use scheduler::{Deferred, Scheduler, TimerHandle};
pub use shooting::ShotOutcome;
pub use state::{EntityId, GameEvent, GamePhase, GameState, LossCause, SessionStats};
pub use tick::{TickInput, tick};
pub use wave::Wave;
