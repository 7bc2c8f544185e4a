//! Entity lifecycle: the alive -> dead -> dead2 -> defunct progression.
//!
//! `sweep` runs at the head of each round, before any physics update, so an
//! entity that died two rounds ago has vacated the store before fresh
//! collisions are computed. `age` runs at the tail of each round; together
//! they guarantee every killed entity remains observable (inert) for one
//! full grace round.

use hecs::{Entity, World};

use depthwatch_core::enums::LifeState;

/// Remove every entity whose life state is `Defunct`.
/// Uses a pre-allocated buffer to avoid per-step allocation.
pub fn sweep(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    for (entity, life) in world.query_mut::<&LifeState>() {
        if !life.is_reference_safe() {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        log::debug!("sweeping defunct entity {entity:?}");
        let _ = world.despawn(entity);
    }
}

/// Advance every non-alive entity one stage toward removal.
pub fn age(world: &mut World) {
    for (_entity, life) in world.query_mut::<&mut LifeState>() {
        *life = life.aged();
    }
}

/// Kill an entity (idempotent; never regresses a later state).
/// Returns true if this call performed the transition.
pub fn kill(world: &mut World, entity: Entity) -> bool {
    if let Ok(life) = world.query_one_mut::<&mut LifeState>(entity) {
        if life.is_alive() {
            *life = LifeState::Dead;
            return true;
        }
    }
    false
}
