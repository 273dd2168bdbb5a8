//! Gates: obstacles that scroll toward the runner and must be shot open

use glam::Vec2;

use super::entity::Gate;
use super::scheduler::Deferred;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::*;
use crate::tuning::{ObstacleModel, Tuning};

/// Gate spawn accumulator value at session start, primed so the first gate
/// arrives after `first_gate_ms`
pub fn initial_gate_timer(tuning: &Tuning) -> f32 {
    match tuning.obstacles {
        ObstacleModel::Gates {
            spawn_interval_ms,
            first_gate_ms,
            ..
        } => spawn_interval_ms - first_gate_ms,
        ObstacleModel::None => 0.0,
    }
}

/// Spawn a closed gate just past the right edge, spanning the playfield height
pub fn spawn_gate(state: &mut GameState) -> Option<EntityId> {
    let ObstacleModel::Gates { hp, .. } = state.tuning.obstacles else {
        return None;
    };
    let id = state.next_entity_id();
    let half = Vec2::new(GATE_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    state.gates.push(Gate {
        id,
        pos: Vec2::new(FIELD_WIDTH + RUNNER_SPAWN_OFFSET + half.x, FIELD_HEIGHT / 2.0),
        half,
        hp,
        is_open: false,
        despawn: None,
    });
    state.push_event(GameEvent::GateSpawned { id });
    log::debug!("Gate {} spawned with {} hp", id, hp);
    Some(id)
}

pub fn update_spawner(state: &mut GameState, scaled_ms: f32) {
    let ObstacleModel::Gates {
        spawn_interval_ms, ..
    } = state.tuning.obstacles
    else {
        return;
    };
    state.gate_timer_ms += scaled_ms;
    if state.gate_timer_ms >= spawn_interval_ms {
        state.gate_timer_ms = 0.0;
        spawn_gate(state);
    }
}

/// A correct hit landed somewhere: chip the oldest closed gate
pub fn damage_oldest(state: &mut GameState) {
    let ObstacleModel::Gates { grace_ms, .. } = state.tuning.obstacles else {
        return;
    };
    let Some(gate) = state.gates.iter_mut().find(|g| !g.is_open) else {
        return;
    };
    gate.hp = gate.hp.saturating_sub(1);
    let (id, hp) = (gate.id, gate.hp);
    state.push_event(GameEvent::GateDamaged { id, hp });

    if hp == 0 {
        let handle = state.scheduler.schedule(grace_ms, Deferred::GateDespawn(id));
        if let Some(gate) = state.gates.iter_mut().find(|g| g.id == id) {
            gate.is_open = true;
            gate.despawn = Some(handle);
        }
        state.stats.gates_opened += 1;
        state.push_event(GameEvent::GateOpened { id });
        log::debug!("Gate {} opened", id);
    }
}

/// Grace period after opening is over
pub fn despawn(state: &mut GameState, id: EntityId) {
    if state.remove_gate(id).is_some() {
        log::trace!("Gate {} despawned", id);
    }
}

/// Drop gates that have scrolled off the left edge; no penalty either way
pub fn cull_passed(state: &mut GameState) {
    let bounds = state.bounds();
    let gone: Vec<EntityId> = state
        .gates
        .iter()
        .filter(|g| g.is_past(&bounds))
        .map(|g| g.id)
        .collect();
    for id in gone {
        state.remove_gate(id);
    }
}
