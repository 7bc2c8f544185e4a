//! ECS components for simulation entities.
//!
//! Components are plain data structs with no game logic; systems in the
//! sim crate do the work. Every entity carries `Kind`, `LifeState`,
//! `Position`, `Orientation`, `Velocity`, plus kind-specific state.

use serde::{Deserialize, Serialize};

use crate::constants::{CAVITATION_SPEED, CAVITATION_SUPPRESSION_DEPTH, NOISE_BAND_COUNT};
use crate::enums::*;
use crate::types::Position;

/// Kind tag, read wherever collision or detection policy branches per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kind(pub EntityKind);

/// Marks the entity the player controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerFlag;

/// Hull geometry and strength. Drives bounding-volume parameterization,
/// visual cross-section, and the damage model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HullProfile {
    pub length_m: f64,
    pub width_m: f64,
    pub draft_m: f64,
    /// Displacement in kilograms; the mass used by collision impulses.
    pub displacement_kg: f64,
    /// Damage points the hull absorbs before the entity is killed.
    pub hull_strength: f64,
}

/// Accumulated damage points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Damage {
    pub points: f64,
}

/// Steering and propulsion state shared by ships and submarines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipDynamics {
    /// Commanded throttle, -0.25 (astern) .. 1.0 (flank).
    pub throttle: f64,
    /// Rudder angle, -1.0 (full port) .. 1.0 (full starboard).
    pub rudder: f64,
    /// Current speed through the water (m/s, signed).
    pub speed_mps: f64,
    pub max_speed_mps: f64,
    /// Acceleration toward the commanded speed (m/s²).
    pub accel_mps2: f64,
    /// Turn rate at full rudder and full speed (rad/s).
    pub max_turn_rate: f64,
    /// Remaining fuel (kg). Empty tanks force the throttle to zero.
    pub fuel_kg: f64,
    /// Fuel burn at flank speed (kg/s).
    pub fuel_burn_kgps: f64,
}

/// Depth control and battery state carried by submarines in addition to
/// `ShipDynamics`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubDepthControl {
    /// Commanded keel depth (meters, positive down).
    pub target_depth_m: f64,
    /// Vertical rate the planes can sustain (m/s).
    pub dive_rate_mps: f64,
    pub periscope_raised: bool,
    /// Battery charge 0..1. Drains submerged, recharges on the surface.
    pub battery: f64,
}

/// Torpedo run state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TorpedoState {
    /// Meters of run remaining before the fish expires.
    pub run_length_m: f64,
    /// Safety distance remaining before the fuse arms.
    pub arming_distance_m: f64,
    pub set_speed_mps: f64,
    /// Damage dealt on a fused hit.
    pub warhead: f64,
}

impl TorpedoState {
    pub fn is_armed(&self) -> bool {
        self.arming_distance_m <= 0.0
    }
}

/// Depth charge sink-and-burst state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepthChargeState {
    /// Depth the hydrostatic fuse is set to (meters, positive down).
    pub detonation_depth_m: f64,
    pub sink_rate_mps: f64,
    pub warhead: f64,
}

/// Gun shell in ballistic flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShellState {
    pub caliber: ShellCaliber,
    pub warhead: f64,
}

/// Aircraft cruise state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirplaneState {
    pub cruise_altitude_m: f64,
    pub cruise_speed_mps: f64,
}

/// Transient visual effect (water splash, particle) with a bounded lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EffectState {
    pub age_secs: f64,
    pub lifetime_secs: f64,
    /// Initial vertical rate; decays over the lifetime.
    pub rise_rate_mps: f64,
}

/// One acoustic frequency band of a noise signature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoiseBand {
    /// Source level at rest (dB).
    pub base_db: f64,
    /// Source level growth per m/s of speed (dB).
    pub speed_db_per_mps: f64,
}

/// Per-class acoustic emission description. Combined with speed and
/// cavitation state by the noise model; constant for an entity's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoiseSignature {
    pub bands: [NoiseBand; NOISE_BAND_COUNT],
}

/// Whether a propeller at `depth` turning for `speed` cavitates.
pub fn is_cavitating(speed_mps: f64, depth_m: f64) -> bool {
    speed_mps > CAVITATION_SPEED && depth_m < CAVITATION_SUPPRESSION_DEPTH
}

/// One sensor instance mounted on an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sensor {
    pub kind: SensorKind,
    /// Current pointing bearing for directional arrays (radians, relative
    /// to the hull's bow). The only mutable sensor state.
    pub bearing: f64,
    pub mode: SweepMode,
}

impl Sensor {
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            bearing: 0.0,
            mode: SweepMode::default(),
        }
    }
}

/// The set of sensors an entity carries. Entities without a given sensor
/// kind simply detect nothing on that channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSuite {
    pub sensors: Vec<Sensor>,
}

impl SensorSuite {
    pub fn with(kinds: &[SensorKind]) -> Self {
        Self {
            sensors: kinds.iter().map(|&k| Sensor::new(k)).collect(),
        }
    }

    pub fn get(&self, kind: SensorKind) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.kind == kind)
    }

    pub fn get_mut(&mut self, kind: SensorKind) -> Option<&mut Sensor> {
        self.sensors.iter_mut().find(|s| s.kind == kind)
    }
}

/// Waypoint steering state for a convoy aggregate entity. The member list
/// lives in the sim crate because it holds ECS handles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConvoyRoute {
    pub waypoint: Position,
    pub cruise_speed_mps: f64,
}
