//! Aircraft cruise flight: hold altitude and heading.

use hecs::World;

use depthwatch_core::components::AirplaneState;
use depthwatch_core::enums::LifeState;
use depthwatch_core::types::{Orientation, Position, Velocity};

/// Vertical rate an aircraft corrects altitude errors with (m/s).
const CLIMB_RATE: f64 = 10.0;

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (state, pos, vel, orient, life)) in world.query_mut::<(
        &AirplaneState,
        &mut Position,
        &mut Velocity,
        &Orientation,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            // A dead airplane falls.
            vel.z -= depthwatch_core::constants::GRAVITY * dt;
            pos.z += vel.z * dt;
            continue;
        }

        let horizontal = Velocity::from_heading(orient.heading(), state.cruise_speed_mps);
        vel.x = horizontal.x;
        vel.y = horizontal.y;
        vel.z = (state.cruise_altitude_m - pos.z).clamp(-CLIMB_RATE, CLIMB_RATE);

        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
