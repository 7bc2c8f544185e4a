//! Surface ship propulsion and steering.
//!
//! Speed chases the commanded throttle, the rudder yaws the hull in
//! proportion to speed, and the hull is pinned to the surface. Empty fuel
//! tanks force the throttle to zero.

use hecs::World;

use depthwatch_core::components::{Kind, ShipDynamics};
use depthwatch_core::enums::{EntityKind, LifeState};
use depthwatch_core::types::{Orientation, Position, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (kind, dynamics, pos, vel, orient, life)) in world.query_mut::<(
        &Kind,
        &mut ShipDynamics,
        &mut Position,
        &mut Velocity,
        &mut Orientation,
        &LifeState,
    )>() {
        if kind.0 != EntityKind::Ship {
            continue;
        }
        if !life.is_alive() {
            *vel = Velocity::default();
            continue;
        }

        integrate_hull(dynamics, pos, vel, orient, dt);
        pos.z = 0.0;
        vel.z = 0.0;
    }
}

/// Shared hull integration for ships and submarines (horizontal plane).
pub fn integrate_hull(
    dynamics: &mut ShipDynamics,
    pos: &mut Position,
    vel: &mut Velocity,
    orient: &mut Orientation,
    dt: f64,
) {
    let throttle = if dynamics.fuel_kg > 0.0 {
        dynamics.throttle
    } else {
        0.0
    };

    let target_speed = throttle.clamp(-0.25, 1.0) * dynamics.max_speed_mps;
    let delta = (target_speed - dynamics.speed_mps).clamp(
        -dynamics.accel_mps2 * dt,
        dynamics.accel_mps2 * dt,
    );
    dynamics.speed_mps += delta;

    let speed_fraction = (dynamics.speed_mps.abs() / dynamics.max_speed_mps).min(1.0);
    let yaw_rate = dynamics.rudder.clamp(-1.0, 1.0) * dynamics.max_turn_rate * speed_fraction;
    let heading = (orient.heading() + yaw_rate * dt).rem_euclid(std::f64::consts::TAU);
    *orient = Orientation::from_heading(heading);

    let horizontal = Velocity::from_heading(heading, dynamics.speed_mps);
    vel.x = horizontal.x;
    vel.y = horizontal.y;
    pos.x += vel.x * dt;
    pos.y += vel.y * dt;

    dynamics.fuel_kg = (dynamics.fuel_kg - dynamics.fuel_burn_kgps * throttle.abs() * dt).max(0.0);
}
