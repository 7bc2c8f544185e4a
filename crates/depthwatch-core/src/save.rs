//! Persisted world state.
//!
//! A save is a self-describing serde document. The core's obligation is to
//! round-trip every attribute it owns losslessly and to reconstruct entity
//! cross-references by stable identifier. The transient `Dead2` grace state
//! is persisted as `Dead`; `Defunct` entities are not persisted at all.

use serde::{Deserialize, Serialize};

use crate::components::{
    HullProfile, NoiseSignature, SensorSuite, ShipDynamics, SubDepthControl,
};
use crate::enums::*;
use crate::types::{Position, Velocity};

/// Attributes every persisted entity carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// The entity's stable identifier at save time. Only used to stitch
    /// cross-references back together at load; fresh identifiers are
    /// assigned to the reconstructed entities.
    pub id: u64,
    pub position: Position,
    pub heading: f64,
    pub velocity: Velocity,
    pub life_state: LifeState,
    pub allegiance: Allegiance,
    pub damage_points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipRecord {
    pub entity: EntityRecord,
    pub hull: HullProfile,
    pub dynamics: ShipDynamics,
    pub signature: NoiseSignature,
    pub sensors: SensorSuite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmarineRecord {
    pub ship: ShipRecord,
    pub depth_control: SubDepthControl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorpedoRecord {
    pub entity: EntityRecord,
    pub run_length_m: f64,
    pub arming_distance_m: f64,
    pub set_speed_mps: f64,
    pub warhead: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthChargeRecord {
    pub entity: EntityRecord,
    pub detonation_depth_m: f64,
    pub sink_rate_mps: f64,
    pub warhead: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellRecord {
    pub entity: EntityRecord,
    pub caliber: ShellCaliber,
    pub warhead: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirplaneRecord {
    pub entity: EntityRecord,
    pub hull: HullProfile,
    pub cruise_altitude_m: f64,
    pub cruise_speed_mps: f64,
    pub sensors: SensorSuite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyRecord {
    pub entity: EntityRecord,
    pub waypoint: Position,
    pub cruise_speed_mps: f64,
    /// Saved identifiers of member ships.
    pub members: Vec<u64>,
}

/// The complete save document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    /// Must equal `constants::SAVE_VERSION`; anything else is rejected at
    /// load before any world is constructed.
    pub version: u32,
    pub seed: u64,
    pub clock_secs: f64,
    pub elapsed_secs: f64,
    pub step: u64,
    pub sea_state: f64,
    pub wind_speed_mps: f64,
    /// Saved identifier of the player entity.
    pub player: Option<u64>,
    pub ships: Vec<ShipRecord>,
    pub submarines: Vec<SubmarineRecord>,
    pub torpedoes: Vec<TorpedoRecord>,
    pub depth_charges: Vec<DepthChargeRecord>,
    pub shells: Vec<ShellRecord>,
    pub airplanes: Vec<AirplaneRecord>,
    pub convoys: Vec<ConvoyRecord>,
}
