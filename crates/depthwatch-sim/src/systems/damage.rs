//! Hull damage accounting.

use hecs::{Entity, World};

use depthwatch_core::components::{Damage, HullProfile, Kind};
use depthwatch_core::enums::{EntityKind, LifeState};
use depthwatch_core::events::SimEvent;
use depthwatch_core::types::Position;

/// Apply `amount` damage points to an entity. Kills it (and emits the
/// appropriate event) once accumulated damage exceeds hull strength.
/// Non-alive targets absorb nothing.
pub fn apply(world: &mut World, target: Entity, amount: f64, events: &mut Vec<SimEvent>) {
    let mut sunk_at: Option<(EntityKind, Position)> = None;

    if let Ok((damage, hull, life, kind, pos)) = world.query_one_mut::<(
        &mut Damage,
        &HullProfile,
        &mut LifeState,
        &Kind,
        &Position,
    )>(target)
    {
        if !life.is_alive() {
            return;
        }
        damage.points += amount;
        if damage.points >= hull.hull_strength {
            *life = LifeState::Dead;
            sunk_at = Some((kind.0, *pos));
        }
    }

    if let Some((kind, position)) = sunk_at {
        log::info!("{kind:?} {target:?} destroyed at ({:.0}, {:.0})", position.x, position.y);
        if matches!(kind, EntityKind::Ship | EntityKind::Submarine) {
            events.push(SimEvent::ShipSunk { position });
        }
    }
}
