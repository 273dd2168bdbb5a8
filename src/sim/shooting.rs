//! Firing, reloading and bullet timeouts

use glam::Vec2;

use super::ammo::ShotPermit;
use super::entity::Bullet;
use super::scheduler::Deferred;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::BULLET_RADIUS;
use crate::tuning::ResourceModel;

/// What a fire request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Fired(EntityId),
    /// Magazine was empty; a reload was started instead
    ReloadTriggered,
    /// Reload in flight or the session is over
    Rejected,
}

/// Fire toward `aim` if the magazine allows it
pub fn try_shoot(state: &mut GameState, aim: Vec2) -> ShotOutcome {
    if !state.is_playing() {
        return ShotOutcome::Rejected;
    }
    match state.ammo.take_shot() {
        ShotPermit::Reloading => ShotOutcome::Rejected,
        ShotPermit::Empty => {
            start_reload(state);
            ShotOutcome::ReloadTriggered
        }
        ShotPermit::Granted { emptied } => {
            let id = fire_bullet(state, aim);
            if emptied {
                start_reload(state);
            }
            ShotOutcome::Fired(id)
        }
    }
}

fn fire_bullet(state: &mut GameState, aim: Vec2) -> EntityId {
    let id = state.next_entity_id();
    let origin = state.emission_point();
    let dir = state.shot_direction(aim);
    let timeout = state
        .scheduler
        .schedule(state.tuning.bullet_lifetime_ms, Deferred::BulletTimeout(id));

    state.bullets.push(Bullet {
        id,
        pos: origin,
        dir,
        speed: state.tuning.bullet_speed,
        radius: BULLET_RADIUS,
        timeout: Some(timeout),
    });
    state.stats.shots_fired += 1;
    state.push_event(GameEvent::ShotFired { origin, dir });
    id
}

/// Begin refilling the magazine. Idempotent while a reload is running.
pub fn start_reload(state: &mut GameState) -> bool {
    let ResourceModel::Magazine { reload_ms, .. } = state.tuning.resource else {
        return false;
    };
    if !state.ammo.begin_reload() {
        return false;
    }
    state.scheduler.schedule(reload_ms, Deferred::ReloadComplete);
    state.push_event(GameEvent::ReloadStarted);
    log::debug!("Reload started ({:.0}ms)", reload_ms);
    true
}

/// Player pressed reload; ignored on a full magazine
pub fn manual_reload(state: &mut GameState) -> bool {
    if state.ammo.is_full() {
        return false;
    }
    start_reload(state)
}

pub(crate) fn finish_reload(state: &mut GameState) {
    if state.ammo.finish_reload() {
        state.push_event(GameEvent::ReloadFinished);
        log::debug!("Reload finished");
    }
}

/// Bullet lifetime elapsed. A bullet still alive never hit anything: miss.
pub fn bullet_timeout(state: &mut GameState, id: EntityId) {
    let Some(bullet) = state.remove_bullet(id) else {
        return;
    };
    state.score_miss(Some(bullet.pos));
}
