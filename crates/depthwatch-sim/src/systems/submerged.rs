//! Submarine depth control, battery management, and propulsion.
//!
//! Horizontal motion reuses the surface hull integration; the planes close
//! on the commanded depth at the dive rate. Submerged running drains the
//! battery with speed; surfaced running recharges it.

use hecs::World;

use depthwatch_core::components::{Kind, ShipDynamics, SubDepthControl};
use depthwatch_core::enums::{EntityKind, LifeState};
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::systems::surface::integrate_hull;

/// Seconds of flank-speed running a full battery provides.
const BATTERY_FLANK_SECS: f64 = 4.0 * 3600.0;

/// Seconds of surfaced running to recharge from empty.
const BATTERY_RECHARGE_SECS: f64 = 2.0 * 3600.0;

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (kind, dynamics, depth_control, pos, vel, orient, life)) in world.query_mut::<(
        &Kind,
        &mut ShipDynamics,
        &mut SubDepthControl,
        &mut Position,
        &mut Velocity,
        &mut Orientation,
        &LifeState,
    )>() {
        debug_assert_eq!(kind.0, EntityKind::Submarine);
        if !life.is_alive() {
            *vel = Velocity::default();
            continue;
        }

        let submerged = pos.depth() > 0.5;
        if submerged && depth_control.battery <= 0.0 {
            // Dead battery: drifting until the boat surfaces.
            dynamics.throttle = 0.0;
        }

        integrate_hull(dynamics, pos, vel, orient, dt);

        // Planes close on the commanded keel depth.
        let target_z = -depth_control.target_depth_m;
        let dz = (target_z - pos.z).clamp(
            -depth_control.dive_rate_mps * dt,
            depth_control.dive_rate_mps * dt,
        );
        pos.z = (pos.z + dz).min(0.0);
        vel.z = if dt > 0.0 { dz / dt } else { 0.0 };

        let speed_fraction = (dynamics.speed_mps.abs() / dynamics.max_speed_mps).min(1.0);
        if submerged {
            depth_control.battery =
                (depth_control.battery - speed_fraction * dt / BATTERY_FLANK_SECS).max(0.0);
        } else if dynamics.throttle.abs() > 0.0 && dynamics.fuel_kg > 0.0 {
            depth_control.battery = (depth_control.battery + dt / BATTERY_RECHARGE_SECS).min(1.0);
        }
    }
}
