//! Convoy aggregates.
//!
//! A convoy entity is a bookkeeping object: it tracks its surviving member
//! ships and drifts its own position toward the next waypoint (member ships
//! steer themselves). The periodic compaction job drops members that have
//! died, so stale references never outlive the grace round.

use hecs::{Entity, World};

use depthwatch_core::components::ConvoyRoute;
use depthwatch_core::enums::LifeState;
use depthwatch_core::types::{Position, Velocity};

/// Member handles held by a convoy. Lives in the sim crate because it
/// stores ECS entities.
#[derive(Debug, Clone, Default)]
pub struct ConvoyMembers {
    pub members: Vec<Entity>,
}

/// Move each convoy's reference point toward its waypoint.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (route, members, pos, vel, life)) in world.query_mut::<(
        &ConvoyRoute,
        &ConvoyMembers,
        &mut Position,
        &mut Velocity,
        &LifeState,
    )>() {
        if !life.is_alive() || members.members.is_empty() {
            *vel = Velocity::default();
            continue;
        }

        let bearing = pos.bearing_to(&route.waypoint);
        let distance = pos.horizontal_range_to(&route.waypoint);
        let speed = route.cruise_speed_mps.min(distance / dt.max(1e-9));
        let v = Velocity::from_heading(bearing, speed);
        vel.x = v.x;
        vel.y = v.y;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
    }
}

/// Drop members that are no longer alive. Run periodically by the
/// compaction job.
pub fn compact(world: &mut World) {
    let convoys: Vec<Entity> = world
        .query::<&ConvoyMembers>()
        .iter()
        .map(|(e, _)| e)
        .collect();

    for convoy in convoys {
        let survivors: Vec<Entity> = {
            let members = match world.get::<&ConvoyMembers>(convoy) {
                Ok(m) => m.members.clone(),
                Err(_) => continue,
            };
            members
                .into_iter()
                .filter(|&m| {
                    world
                        .get::<&LifeState>(m)
                        .map(|life| life.is_alive())
                        .unwrap_or(false)
                })
                .collect()
        };

        if let Ok(mut members) = world.get::<&mut ConvoyMembers>(convoy) {
            if members.members.len() != survivors.len() {
                log::debug!(
                    "convoy {convoy:?} compacted {} -> {} members",
                    members.members.len(),
                    survivors.len()
                );
            }
            members.members = survivors;
        }
    }
}
