//! Overlap detection and hit resolution
//!
//! Detection is a plain O(bullets x targets) sweep over circles and
//! rectangles, good enough for the few dozen bodies alive at once. Hosts
//! running their own physics can skip it and hand overlaps straight to
//! [`resolve`] through `GameState::on_overlap`.

use glam::Vec2;

use super::entity::Entity;
use super::state::{EntityId, GameState, LossCause};

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    Circle { center: Vec2, radius: f32 },
    Rect { center: Vec2, half: Vec2 },
}

impl Body {
    pub fn center(&self) -> Vec2 {
        match *self {
            Body::Circle { center, .. } | Body::Rect { center, .. } => center,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Body::Circle { radius, .. } => Vec2::splat(radius),
            Body::Rect { half, .. } => half,
        }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        match (*self, *other) {
            (Body::Circle { center: a, radius: ra }, Body::Circle { center: b, radius: rb }) => {
                a.distance_squared(b) <= (ra + rb) * (ra + rb)
            }
            (Body::Rect { center: a, half: ha }, Body::Rect { center: b, half: hb }) => {
                let d = (a - b).abs();
                d.x <= ha.x + hb.x && d.y <= ha.y + hb.y
            }
            (Body::Circle { center, radius }, Body::Rect { center: rc, half })
            | (Body::Rect { center: rc, half }, Body::Circle { center, radius }) => {
                circle_rect_overlap(center, radius, rc, half)
            }
        }
    }
}

/// Closest-point test between a circle and an axis-aligned rectangle
fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) <= radius * radius
}

/// A reported contact between two registered bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    BulletTarget { bullet: EntityId, target: EntityId },
    PlayerGate { gate: EntityId },
}

/// Find every contact this tick, in ascending entity id order.
///
/// A target is claimed by at most one bullet; later bullets fly on.
pub fn detect_overlaps(state: &GameState) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    let mut claimed: Vec<EntityId> = Vec::new();

    for bullet in &state.bullets {
        let bullet_body = bullet.body();
        let hit = state
            .targets
            .iter()
            .filter(|t| !t.consumed && !claimed.contains(&t.id))
            .find(|t| t.body().overlaps(&bullet_body));
        if let Some(target) = hit {
            claimed.push(target.id);
            overlaps.push(Overlap::BulletTarget {
                bullet: bullet.id,
                target: target.id,
            });
        }
    }

    if let Some(player) = state.player_body() {
        for gate in state.gates.iter().filter(|g| !g.is_open) {
            if gate.body().overlaps(&player) {
                overlaps.push(Overlap::PlayerGate { gate: gate.id });
            }
        }
    }

    overlaps
}

/// Apply the gameplay consequences of one contact.
///
/// Contacts naming an entity that is already gone are ignored.
pub fn resolve(state: &mut GameState, overlap: Overlap) {
    if !state.is_playing() {
        return;
    }
    match overlap {
        Overlap::BulletTarget { bullet, target } => {
            if !state.has_bullet(bullet) || !state.has_target(target) {
                log::trace!("Stale overlap {:?} ignored", overlap);
                return;
            }
            state.remove_bullet(bullet);
            let Some(target) = state.remove_target(target) else {
                return;
            };
            if target.is_correct {
                state.score_correct(target.pos);
            } else {
                state.score_wrong(target.pos);
            }
        }
        Overlap::PlayerGate { gate } => {
            let closed = state.gates.iter().any(|g| g.id == gate && !g.is_open);
            if closed {
                state.lose(LossCause::GateCrash);
            }
        }
    }
}
