//! Global pairwise collision pass and impulse response.
//!
//! Every pair of live bodies is tested once per step, skipping
//! weapon-vs-weapon pairs. Weapon-vs-target intersections route to the
//! damage model; body-vs-body intersections get an impulse-based response
//! with restitution that falls off with closing speed, so violent impacts
//! behave inelastically.
//!
//! The collect scan doubles as the nearest-hostile tracker so the stepper
//! never needs a second full pass over the store.

use glam::{DQuat, DVec3};
use hecs::{Entity, World};

use depthwatch_core::components::{HullProfile, Kind, TorpedoState};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{Allegiance, EntityKind, LifeState};
use depthwatch_core::events::SimEvent;
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::bv::{self, BoundingHull, BvTransform};
use crate::systems::weapons;

struct Body {
    entity: Entity,
    kind: EntityKind,
    pos: DVec3,
    rot: DQuat,
    vel: DVec3,
    mass: f64,
    root_radius: f64,
    armed_weapon: bool,
    hostile: bool,
    /// Set when a weapon expends itself mid-pass; later pairs skip it.
    spent: bool,
}

/// Run the pairwise pass. Returns the distance from the player to the
/// nearest hostile body, if any hostile remains.
pub fn run(
    world: &mut World,
    events: &mut Vec<SimEvent>,
    player: Option<Entity>,
) -> Option<f64> {
    let mut bodies: Vec<Body> = Vec::new();
    let mut player_pos: Option<DVec3> = None;

    for (entity, (kind, pos, orient, vel, life, hull, bounding, torpedo, allegiance)) in world
        .query::<(
            &Kind,
            &Position,
            &Orientation,
            &Velocity,
            &LifeState,
            &HullProfile,
            &BoundingHull,
            Option<&TorpedoState>,
            Option<&Allegiance>,
        )>()
        .iter()
    {
        if !life.is_alive() {
            continue;
        }
        if Some(entity) == player {
            player_pos = Some(pos.to_dvec3());
        }
        let armed_weapon = match kind.0 {
            EntityKind::Torpedo => torpedo.map(|t| t.is_armed()).unwrap_or(false),
            EntityKind::DepthCharge | EntityKind::GunShell => true,
            _ => false,
        };
        bodies.push(Body {
            entity,
            kind: kind.0,
            pos: pos.to_dvec3(),
            rot: orient.quat(),
            vel: vel.to_dvec3(),
            mass: hull.displacement_kg.max(1.0),
            root_radius: bounding.tree.root_radius(),
            armed_weapon,
            hostile: matches!(allegiance, Some(Allegiance::Hostile)),
            spent: false,
        });
    }

    let nearest_hostile = player_pos.map(|pp| {
        bodies
            .iter()
            .filter(|b| b.hostile)
            .map(|b| b.pos.distance(pp))
            .fold(f64::INFINITY, f64::min)
    });

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (kind_i, kind_j) = (bodies[i].kind, bodies[j].kind);
            if kind_i.is_weapon() && kind_j.is_weapon() {
                continue;
            }
            if bodies[i].spent || bodies[j].spent {
                continue;
            }
            // An unarmed torpedo is still inside its safety run; it passes
            // clear of everything, including the boat that fired it.
            let unarmed_torpedo = |b: &Body| b.kind == EntityKind::Torpedo && !b.armed_weapon;
            if unarmed_torpedo(&bodies[i]) || unarmed_torpedo(&bodies[j]) {
                continue;
            }

            // Broad phase on the root spheres.
            let reach = bodies[i].root_radius + bodies[j].root_radius;
            if bodies[i].pos.distance_squared(bodies[j].pos) > reach * reach {
                continue;
            }

            let contact = {
                let tree_i = match world.get::<&BoundingHull>(bodies[i].entity) {
                    Ok(t) => t,
                    Err(_) => continue,
                };
                let tree_j = match world.get::<&BoundingHull>(bodies[j].entity) {
                    Ok(t) => t,
                    Err(_) => continue,
                };
                let xf_i = BvTransform {
                    position: bodies[i].pos,
                    rotation: bodies[i].rot,
                };
                let xf_j = BvTransform {
                    position: bodies[j].pos,
                    rotation: bodies[j].rot,
                };
                bv::test_pair(&tree_i.tree, &xf_i, &tree_j.tree, &xf_j)
            };
            let contact = match contact {
                Some(c) => c,
                None => continue,
            };
            let contact_pos = Position::from_dvec3(contact.point);

            if kind_i.is_weapon() || kind_j.is_weapon() {
                let (w, t) = if kind_i.is_weapon() { (i, j) } else { (j, i) };
                weapons::impact(
                    world,
                    bodies[w].entity,
                    bodies[w].kind,
                    bodies[t].entity,
                    contact_pos,
                    events,
                );
                bodies[w].spent = true;
                continue;
            }

            respond(world, &mut bodies, i, j, contact.normal, events);
        }
    }

    nearest_hostile.filter(|d| d.is_finite())
}

/// Impulse response between two physical bodies. `normal` points from
/// body `j` toward body `i`.
fn respond(
    world: &mut World,
    bodies: &mut [Body],
    i: usize,
    j: usize,
    normal: DVec3,
    events: &mut Vec<SimEvent>,
) {
    let relative = bodies[i].vel - bodies[j].vel;
    let closing_rate = relative.dot(normal);
    // Positive along the normal means already separating.
    if closing_rate >= 0.0 {
        return;
    }
    let closing = -closing_rate;

    let restitution = RESTITUTION_MIN
        + (RESTITUTION_BASE - RESTITUTION_MIN) / (1.0 + closing / RESTITUTION_HALF_SPEED);

    let inv_mass = 1.0 / bodies[i].mass + 1.0 / bodies[j].mass;
    let impulse = -(1.0 + restitution) * closing_rate / inv_mass;

    let dv_i = normal * (impulse / bodies[i].mass);
    let dv_j = normal * (impulse / bodies[j].mass);
    bodies[i].vel += dv_i;
    bodies[j].vel -= dv_j;

    for (idx, dv) in [(i, dv_i), (j, -dv_j)] {
        if let Ok(vel) = world.query_one_mut::<&mut Velocity>(bodies[idx].entity) {
            vel.x += dv.x;
            vel.y += dv.y;
            vel.z += dv.z;
        }
        // Propulsion re-derives velocity from hull speed each step, so the
        // impulse must also land in the hull's speed along its bow axis.
        let bow = bodies[idx].rot * glam::DVec3::Y;
        let along_bow = bodies[idx].vel.dot(bow);
        if let Ok(dynamics) =
            world.query_one_mut::<&mut depthwatch_core::components::ShipDynamics>(bodies[idx].entity)
        {
            dynamics.speed_mps = along_bow;
        }
    }

    log::debug!(
        "collision {:?} / {:?}, closing {:.1} m/s",
        bodies[i].entity,
        bodies[j].entity,
        closing
    );

    if closing > RAM_DAMAGE_THRESHOLD {
        let points = (closing - RAM_DAMAGE_THRESHOLD) * RAM_DAMAGE_PER_MPS;
        let (a, b) = (bodies[i].entity, bodies[j].entity);
        crate::systems::damage::apply(world, a, points, events);
        crate::systems::damage::apply(world, b, points, events);
    }
}
