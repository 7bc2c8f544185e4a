//! Scenario builders: class presets and a demo convoy action.

use hecs::Entity;

use depthwatch_core::components::{HullProfile, SensorSuite, ShipDynamics, SubDepthControl};
use depthwatch_core::enums::{Allegiance, SensorKind};
use depthwatch_core::errors::SimResult;
use depthwatch_core::types::Position;

use crate::engine::WorldEngine;
use crate::noise;
use crate::spawn::{ConvoySpec, ShipSpec, SubmarineSpec};

// --- Class presets ---

pub fn merchant_hull() -> HullProfile {
    HullProfile {
        length_m: 135.0,
        width_m: 17.0,
        draft_m: 8.0,
        displacement_kg: 7.0e6,
        hull_strength: 220.0,
    }
}

pub fn merchant_dynamics() -> ShipDynamics {
    ShipDynamics {
        throttle: 0.6,
        rudder: 0.0,
        speed_mps: 4.0,
        max_speed_mps: 6.5,
        accel_mps2: 0.05,
        max_turn_rate: 0.01,
        fuel_kg: 600_000.0,
        fuel_burn_kgps: 0.5,
    }
}

pub fn escort_hull() -> HullProfile {
    HullProfile {
        length_m: 93.0,
        width_m: 11.0,
        draft_m: 4.5,
        displacement_kg: 1.4e6,
        hull_strength: 140.0,
    }
}

pub fn escort_dynamics() -> ShipDynamics {
    ShipDynamics {
        throttle: 0.6,
        rudder: 0.0,
        speed_mps: 6.0,
        max_speed_mps: 12.0,
        accel_mps2: 0.15,
        max_turn_rate: 0.04,
        fuel_kg: 250_000.0,
        fuel_burn_kgps: 0.8,
    }
}

pub fn uboat_hull() -> HullProfile {
    HullProfile {
        length_m: 67.0,
        width_m: 6.2,
        draft_m: 4.7,
        displacement_kg: 0.77e6,
        hull_strength: 90.0,
    }
}

pub fn uboat_dynamics() -> ShipDynamics {
    ShipDynamics {
        throttle: 0.3,
        rudder: 0.0,
        speed_mps: 2.0,
        max_speed_mps: 9.0,
        accel_mps2: 0.1,
        max_turn_rate: 0.03,
        fuel_kg: 110_000.0,
        fuel_burn_kgps: 0.3,
    }
}

pub fn merchant_spec(position: Position, heading: f64, allegiance: Allegiance) -> ShipSpec {
    ShipSpec {
        position,
        heading,
        allegiance,
        hull: merchant_hull(),
        dynamics: merchant_dynamics(),
        signature: noise::merchant_signature(),
        sensors: SensorSuite::with(&[SensorKind::Lookout]),
    }
}

pub fn escort_spec(position: Position, heading: f64, allegiance: Allegiance) -> ShipSpec {
    ShipSpec {
        position,
        heading,
        allegiance,
        hull: escort_hull(),
        dynamics: escort_dynamics(),
        signature: noise::warship_signature(),
        sensors: SensorSuite::with(&[
            SensorKind::Lookout,
            SensorKind::Radar,
            SensorKind::ActiveSonar,
            SensorKind::PassiveSonar,
        ]),
    }
}

pub fn uboat_spec(position: Position, heading: f64, allegiance: Allegiance) -> SubmarineSpec {
    SubmarineSpec {
        ship: ShipSpec {
            position,
            heading,
            allegiance,
            hull: uboat_hull(),
            dynamics: uboat_dynamics(),
            signature: noise::submarine_signature(),
            sensors: SensorSuite::with(&[SensorKind::Lookout, SensorKind::PassiveSonar]),
        },
        depth_control: SubDepthControl {
            target_depth_m: 12.0,
            dive_rate_mps: 1.0,
            periscope_raised: true,
            battery: 1.0,
        },
    }
}

/// The demo action: a player U-boat at periscope depth ahead of a hostile
/// convoy (four merchants in two columns, two escorts) bound north-east.
pub fn convoy_action(engine: &mut WorldEngine) -> SimResult<Entity> {
    let convoy_heading = 0.7;
    let mut members: Vec<Entity> = Vec::new();

    for (i, offset) in [(-300.0, 0.0), (300.0, 0.0), (-300.0, -600.0), (300.0, -600.0)]
        .iter()
        .enumerate()
    {
        let ship = engine.spawn_ship(merchant_spec(
            Position::new(4_000.0 + offset.0, 5_000.0 + offset.1, 0.0),
            convoy_heading,
            Allegiance::Hostile,
        ));
        log::debug!("convoy merchant {i} is {ship:?}");
        members.push(ship);
    }

    for offset in [(-1_200.0, 600.0), (1_200.0, 600.0)] {
        let escort = engine.spawn_ship(escort_spec(
            Position::new(4_000.0 + offset.0, 5_000.0 + offset.1, 0.0),
            convoy_heading,
            Allegiance::Hostile,
        ));
        members.push(escort);
    }

    let convoy = engine.spawn_convoy(ConvoySpec {
        position: Position::new(4_000.0, 5_000.0, 0.0),
        waypoint: Position::new(24_000.0, 28_000.0, 0.0),
        cruise_speed_mps: 5.0,
        allegiance: Allegiance::Hostile,
        members,
    });

    let boat = engine.spawn_submarine(uboat_spec(
        Position::new(0.0, 0.0, 0.0),
        convoy_heading,
        Allegiance::Friendly,
    ));
    engine.set_player(boat)?;

    Ok(convoy)
}
