//! Snapshot system: queries the ECS world and builds a complete
//! `WorldSnapshot`. Read-only; never modifies the world.

use hecs::World;

use depthwatch_core::components::Kind;
use depthwatch_core::enums::{LifeState, RunState};
use depthwatch_core::events::SimEvent;
use depthwatch_core::state::{ObjectView, WorldSnapshot};
use depthwatch_core::types::{Orientation, Position, SimTime, Velocity};

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    run_state: RunState,
    events: Vec<SimEvent>,
    nearest_hostile_m: Option<f64>,
) -> WorldSnapshot {
    let mut objects: Vec<ObjectView> = world
        .query::<(&Kind, &Position, &Velocity, &Orientation, &LifeState)>()
        .iter()
        .map(|(entity, (kind, pos, vel, orient, life))| ObjectView {
            id: entity.to_bits().get(),
            kind: kind.0,
            position: *pos,
            velocity: *vel,
            heading: orient.heading(),
            life_state: *life,
        })
        .collect();

    objects.sort_by_key(|o| o.id);

    WorldSnapshot {
        time: *time,
        run_state,
        objects,
        events,
        nearest_hostile_m,
    }
}
