//! Transient entities: targets, bullets and gates
//!
//! Each kind owns its motion rule and reports a collision body through the
//! [`Entity`] trait; the registry never needs to know which kind it holds to
//! move or overlap-test it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Body;
use super::scheduler::TimerHandle;
use super::state::EntityId;
use crate::Bounds;

/// Everything a motion rule may read for one step
#[derive(Debug, Clone, Copy)]
pub struct MotionContext {
    /// Real (unscaled) seconds since the last tick
    pub dt_secs: f32,
    /// Current time scale
    pub scale: f32,
    /// Runner scroll speed at scale 1.0
    pub base_run_speed: f32,
    /// Playfield
    pub bounds: Bounds,
}

impl MotionContext {
    /// Leftward world speed for runner-mode entities
    #[inline]
    pub fn scroll_speed(&self, factor: f32) -> f32 {
        self.base_run_speed * factor * self.scale
    }
}

/// Per-tick behaviour shared by all entity kinds
pub trait Entity {
    fn id(&self) -> EntityId;
    fn advance(&mut self, ctx: &MotionContext);
    fn body(&self) -> Body;
    fn kind(&self) -> EntityKind;
}

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntityKind {
    Target { correct: bool },
    Bullet,
    Gate { open: bool },
}

/// Render-facing snapshot of one live entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Half extents of the body (radius on both axes for circles)
    pub half_size: Vec2,
    /// Unit heading, `Vec2::ZERO` for things without one
    pub heading: Vec2,
}

impl EntityView {
    pub fn of<E: Entity>(entity: &E, heading: Vec2) -> Self {
        let body = entity.body();
        Self {
            id: entity.id(),
            kind: entity.kind(),
            pos: body.center(),
            half_size: body.half_extents(),
            heading,
        }
    }
}

/// Vertical bob layered on top of a runner scroll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub speed: f32,
    /// +1.0 down, -1.0 up
    pub dir: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Target movement behaviours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Arena: straight line, reflecting off the playfield edges
    Bounce { vel: Vec2 },
    /// Arena: side to side between two x bounds
    Sweep {
        speed: f32,
        dir: f32,
        min_x: f32,
        max_x: f32,
    },
    /// Runner: scroll left with the world, optionally bobbing
    Scroll { speed_factor: f32, bob: Option<Bob> },
}

impl Motion {
    /// Instantaneous velocity (px/s of real time)
    pub fn velocity(&self, scale: f32, base_run_speed: f32) -> Vec2 {
        match *self {
            Motion::Bounce { vel } => vel,
            Motion::Sweep { speed, dir, .. } => Vec2::new(speed * dir, 0.0),
            Motion::Scroll { speed_factor, bob } => {
                let vy = bob.map_or(0.0, |b| b.speed * b.dir * scale);
                Vec2::new(-base_run_speed * speed_factor * scale, vy)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    /// Scoring polarity, fixed at spawn
    pub is_correct: bool,
    pub motion: Motion,
    /// Set once the target has been scored (hit, expired or passed)
    pub consumed: bool,
    /// Arena auto-expiry timer
    #[serde(skip)]
    pub expiry: Option<TimerHandle>,
}

impl Entity for Target {
    fn id(&self) -> EntityId {
        self.id
    }

    fn advance(&mut self, ctx: &MotionContext) {
        let dt = ctx.dt_secs;
        match &mut self.motion {
            Motion::Bounce { vel } => {
                self.pos += *vel * dt;
                let lo = ctx.bounds.min + Vec2::splat(self.radius);
                let hi = ctx.bounds.max - Vec2::splat(self.radius);
                if self.pos.x < lo.x {
                    self.pos.x = lo.x;
                    vel.x = vel.x.abs();
                } else if self.pos.x > hi.x {
                    self.pos.x = hi.x;
                    vel.x = -vel.x.abs();
                }
                if self.pos.y < lo.y {
                    self.pos.y = lo.y;
                    vel.y = vel.y.abs();
                } else if self.pos.y > hi.y {
                    self.pos.y = hi.y;
                    vel.y = -vel.y.abs();
                }
            }
            Motion::Sweep {
                speed,
                dir,
                min_x,
                max_x,
            } => {
                self.pos.x += *speed * *dir * dt;
                if self.pos.x <= *min_x {
                    self.pos.x = *min_x;
                    *dir = 1.0;
                } else if self.pos.x >= *max_x {
                    self.pos.x = *max_x;
                    *dir = -1.0;
                }
            }
            Motion::Scroll { speed_factor, bob } => {
                self.pos.x -= ctx.scroll_speed(*speed_factor) * dt;
                if let Some(bob) = bob {
                    self.pos.y += bob.speed * bob.dir * ctx.scale * dt;
                    if self.pos.y <= bob.min_y {
                        self.pos.y = bob.min_y;
                        bob.dir = 1.0;
                    } else if self.pos.y >= bob.max_y {
                        self.pos.y = bob.max_y;
                        bob.dir = -1.0;
                    }
                }
            }
        }
    }

    fn body(&self) -> Body {
        Body::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Target {
            correct: self.is_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    /// Unit direction, fixed at spawn
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    #[serde(skip)]
    pub timeout: Option<TimerHandle>,
}

impl Entity for Bullet {
    fn id(&self) -> EntityId {
        self.id
    }

    fn advance(&mut self, ctx: &MotionContext) {
        self.pos += self.dir * self.speed * ctx.dt_secs;
    }

    fn body(&self) -> Body {
        Body::Circle {
            center: self.pos,
            radius: self.radius,
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Bullet
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: EntityId,
    /// Centre of the gate body
    pub pos: Vec2,
    pub half: Vec2,
    pub hp: u8,
    /// Open gates no longer collide and are about to despawn
    pub is_open: bool,
    #[serde(skip)]
    pub despawn: Option<TimerHandle>,
}

impl Gate {
    /// Right edge has scrolled past the left side of the playfield
    pub fn is_past(&self, bounds: &Bounds) -> bool {
        self.pos.x + self.half.x < bounds.min.x
    }
}

impl Entity for Gate {
    fn id(&self) -> EntityId {
        self.id
    }

    fn advance(&mut self, ctx: &MotionContext) {
        self.pos.x -= ctx.scroll_speed(1.0) * ctx.dt_secs;
    }

    fn body(&self) -> Body {
        Body::Rect {
            center: self.pos,
            half: self.half,
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Gate { open: self.is_open }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(dt_secs: f32, scale: f32) -> MotionContext {
        MotionContext {
            dt_secs,
            scale,
            base_run_speed: 200.0,
            bounds: Bounds::field(),
        }
    }

    fn target(pos: Vec2, motion: Motion) -> Target {
        Target {
            id: 1,
            pos,
            radius: 20.0,
            is_correct: true,
            motion,
            consumed: false,
            expiry: None,
        }
    }

    #[test]
    fn test_bounce_reflects_off_left_wall() {
        let mut t = target(
            Vec2::new(25.0, 200.0),
            Motion::Bounce {
                vel: Vec2::new(-100.0, 0.0),
            },
        );
        t.advance(&ctx(0.1, 1.0));
        assert_eq!(t.pos.x, 20.0);
        assert!(matches!(t.motion, Motion::Bounce { vel } if vel.x > 0.0));
    }

    #[test]
    fn test_scroll_speed_follows_time_scale() {
        let mut slow = target(
            Vec2::new(500.0, 200.0),
            Motion::Scroll {
                speed_factor: 1.0,
                bob: None,
            },
        );
        let mut fast = slow.clone();
        slow.advance(&ctx(0.5, 1.0));
        fast.advance(&ctx(0.5, 2.0));
        assert_eq!(slow.pos.x, 400.0);
        assert_eq!(fast.pos.x, 300.0);
    }

    #[test]
    fn test_bob_reverses_at_bounds() {
        let mut t = target(
            Vec2::new(500.0, 199.0),
            Motion::Scroll {
                speed_factor: 1.0,
                bob: Some(Bob {
                    speed: 100.0,
                    dir: 1.0,
                    min_y: 100.0,
                    max_y: 200.0,
                }),
            },
        );
        t.advance(&ctx(0.1, 1.0));
        assert_eq!(t.pos.y, 200.0);
        assert!(matches!(t.motion, Motion::Scroll { bob: Some(b), .. } if b.dir < 0.0));
    }

    #[test]
    fn test_sweep_reverses() {
        let mut t = target(
            Vec2::new(110.0, 200.0),
            Motion::Sweep {
                speed: 100.0,
                dir: -1.0,
                min_x: 100.0,
                max_x: 300.0,
            },
        );
        t.advance(&ctx(0.2, 1.0));
        assert_eq!(t.pos.x, 100.0);
        assert!(matches!(t.motion, Motion::Sweep { dir, .. } if dir > 0.0));
    }

    #[test]
    fn test_gate_scrolls_and_passes() {
        let mut gate = Gate {
            id: 9,
            pos: Vec2::new(10.0, 270.0),
            half: Vec2::new(20.0, 270.0),
            hp: 2,
            is_open: false,
            despawn: None,
        };
        assert!(!gate.is_past(&Bounds::field()));
        gate.advance(&ctx(0.25, 1.0));
        assert_eq!(gate.pos.x, -40.0);
        assert!(gate.is_past(&Bounds::field()));
    }
}
