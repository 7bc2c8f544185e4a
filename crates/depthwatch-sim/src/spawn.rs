//! Entity spawn factories.
//!
//! Each kind gets a spec struct and a factory that assembles the full
//! component bundle. The engine wraps these with identifier bookkeeping
//! and launch events; scenarios and the loader call through the engine.

use hecs::{Entity, World};

use depthwatch_core::components::*;
use depthwatch_core::enums::*;
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::bv::BoundingHull;
use crate::noise;
use crate::systems::convoy::ConvoyMembers;

#[derive(Debug, Clone)]
pub struct ShipSpec {
    pub position: Position,
    pub heading: f64,
    pub allegiance: Allegiance,
    pub hull: HullProfile,
    pub dynamics: ShipDynamics,
    pub signature: NoiseSignature,
    pub sensors: SensorSuite,
}

#[derive(Debug, Clone)]
pub struct SubmarineSpec {
    pub ship: ShipSpec,
    pub depth_control: SubDepthControl,
}

#[derive(Debug, Clone)]
pub struct TorpedoSpec {
    pub position: Position,
    pub heading: f64,
    pub allegiance: Allegiance,
    pub set_speed_mps: f64,
    pub run_length_m: f64,
    pub arming_distance_m: f64,
    pub warhead: f64,
}

#[derive(Debug, Clone)]
pub struct DepthChargeSpec {
    pub position: Position,
    pub allegiance: Allegiance,
    pub detonation_depth_m: f64,
    pub sink_rate_mps: f64,
    pub warhead: f64,
}

#[derive(Debug, Clone)]
pub struct ShellSpec {
    pub position: Position,
    pub velocity: Velocity,
    pub allegiance: Allegiance,
    pub caliber: ShellCaliber,
    pub warhead: f64,
}

#[derive(Debug, Clone)]
pub struct AirplaneSpec {
    pub position: Position,
    pub heading: f64,
    pub allegiance: Allegiance,
    pub hull: HullProfile,
    pub cruise_altitude_m: f64,
    pub cruise_speed_mps: f64,
    pub sensors: SensorSuite,
}

#[derive(Debug, Clone)]
pub struct ConvoySpec {
    pub position: Position,
    pub waypoint: Position,
    pub cruise_speed_mps: f64,
    pub allegiance: Allegiance,
    pub members: Vec<Entity>,
}

pub fn spawn_ship(world: &mut World, spec: ShipSpec) -> Entity {
    let bounding = BoundingHull::for_hull(&spec.hull);
    world.spawn((
        Kind(EntityKind::Ship),
        LifeState::Alive,
        spec.position,
        Orientation::from_heading(spec.heading),
        Velocity::from_heading(spec.heading, spec.dynamics.speed_mps),
        spec.hull,
        Damage::default(),
        spec.dynamics,
        spec.signature,
        spec.sensors,
        bounding,
        spec.allegiance,
    ))
}

pub fn spawn_submarine(world: &mut World, spec: SubmarineSpec) -> Entity {
    let ship = spec.ship;
    let bounding = BoundingHull::for_hull(&ship.hull);
    world.spawn((
        Kind(EntityKind::Submarine),
        LifeState::Alive,
        ship.position,
        Orientation::from_heading(ship.heading),
        Velocity::from_heading(ship.heading, ship.dynamics.speed_mps),
        ship.hull,
        Damage::default(),
        ship.dynamics,
        spec.depth_control,
        ship.signature,
        ship.sensors,
        bounding,
        ship.allegiance,
    ))
}

/// Hull stand-in for a 7 m torpedo body.
fn torpedo_hull() -> HullProfile {
    HullProfile {
        length_m: 7.0,
        width_m: 0.55,
        draft_m: 0.55,
        displacement_kg: 1_500.0,
        hull_strength: 1.0,
    }
}

pub fn spawn_torpedo(world: &mut World, spec: TorpedoSpec) -> Entity {
    let hull = torpedo_hull();
    let bounding = BoundingHull::for_hull(&hull);
    world.spawn((
        Kind(EntityKind::Torpedo),
        LifeState::Alive,
        spec.position,
        Orientation::from_heading(spec.heading),
        Velocity::from_heading(spec.heading, spec.set_speed_mps),
        hull,
        Damage::default(),
        TorpedoState {
            run_length_m: spec.run_length_m,
            arming_distance_m: spec.arming_distance_m,
            set_speed_mps: spec.set_speed_mps,
            warhead: spec.warhead,
        },
        noise::torpedo_signature(),
        bounding,
        spec.allegiance,
    ))
}

fn depth_charge_hull() -> HullProfile {
    HullProfile {
        length_m: 0.8,
        width_m: 0.5,
        draft_m: 0.5,
        displacement_kg: 200.0,
        hull_strength: 1.0,
    }
}

pub fn spawn_depth_charge(world: &mut World, spec: DepthChargeSpec) -> Entity {
    let hull = depth_charge_hull();
    let bounding = BoundingHull::for_hull(&hull);
    world.spawn((
        Kind(EntityKind::DepthCharge),
        LifeState::Alive,
        spec.position,
        Orientation::default(),
        Velocity::new(0.0, 0.0, -spec.sink_rate_mps),
        hull,
        Damage::default(),
        DepthChargeState {
            detonation_depth_m: spec.detonation_depth_m,
            sink_rate_mps: spec.sink_rate_mps,
            warhead: spec.warhead,
        },
        bounding,
        spec.allegiance,
    ))
}

fn shell_hull() -> HullProfile {
    HullProfile {
        length_m: 0.5,
        width_m: 0.15,
        draft_m: 0.15,
        displacement_kg: 30.0,
        hull_strength: 1.0,
    }
}

pub fn spawn_shell(world: &mut World, spec: ShellSpec) -> Entity {
    let hull = shell_hull();
    let bounding = BoundingHull::for_hull(&hull);
    world.spawn((
        Kind(EntityKind::GunShell),
        LifeState::Alive,
        spec.position,
        Orientation::from_heading(spec.velocity.heading()),
        spec.velocity,
        hull,
        Damage::default(),
        ShellState {
            caliber: spec.caliber,
            warhead: spec.warhead,
        },
        bounding,
        spec.allegiance,
    ))
}

pub fn spawn_airplane(world: &mut World, spec: AirplaneSpec) -> Entity {
    let bounding = BoundingHull::for_hull(&spec.hull);
    world.spawn((
        Kind(EntityKind::Airplane),
        LifeState::Alive,
        spec.position,
        Orientation::from_heading(spec.heading),
        Velocity::from_heading(spec.heading, spec.cruise_speed_mps),
        spec.hull,
        Damage::default(),
        AirplaneState {
            cruise_altitude_m: spec.cruise_altitude_m,
            cruise_speed_mps: spec.cruise_speed_mps,
        },
        spec.sensors,
        bounding,
        spec.allegiance,
    ))
}

pub fn spawn_convoy(world: &mut World, spec: ConvoySpec) -> Entity {
    world.spawn((
        Kind(EntityKind::Convoy),
        LifeState::Alive,
        spec.position,
        Orientation::default(),
        Velocity::default(),
        ConvoyRoute {
            waypoint: spec.waypoint,
            cruise_speed_mps: spec.cruise_speed_mps,
        },
        ConvoyMembers {
            members: spec.members,
        },
        spec.allegiance,
    ))
}

pub fn spawn_splash(world: &mut World, position: Position, lifetime_secs: f64) -> Entity {
    world.spawn((
        Kind(EntityKind::WaterSplash),
        LifeState::Alive,
        position,
        Orientation::default(),
        Velocity::default(),
        EffectState {
            age_secs: 0.0,
            lifetime_secs,
            rise_rate_mps: 6.0,
        },
    ))
}

pub fn spawn_particle(world: &mut World, position: Position, lifetime_secs: f64) -> Entity {
    world.spawn((
        Kind(EntityKind::Particle),
        LifeState::Alive,
        position,
        Orientation::default(),
        Velocity::default(),
        EffectState {
            age_secs: 0.0,
            lifetime_secs,
            rise_rate_mps: 1.0,
        },
    ))
}
