//! Read-only views of world state handed to UI/AI consumers, and the
//! per-step world snapshot.
//!
//! Accessors in the engine return these by value; none of them borrow the
//! ECS world.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime, Velocity};

/// Common view of any simulated object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObjectView {
    /// Stable identifier (never reused within a running world).
    pub id: u64,
    pub kind: EntityKind,
    pub position: Position,
    pub velocity: Velocity,
    pub heading: f64,
    pub life_state: LifeState,
}

/// Ship/submarine view with propulsion state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipView {
    pub object: ObjectView,
    pub throttle: f64,
    pub rudder: f64,
    pub speed_mps: f64,
    pub fuel_kg: f64,
}

/// Convoy aggregate view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvoyView {
    pub object: ObjectView,
    pub waypoint: Position,
    /// Stable identifiers of the surviving members.
    pub members: Vec<u64>,
}

/// A contact fixed by an active sonar ping. The reported position carries
/// deliberate error; `id` still names the real entity for AI bookkeeping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveContact {
    pub id: u64,
    /// Reported (not true) position of the echo.
    pub reported_position: Position,
    pub range_m: f64,
    pub bearing: f64,
}

/// A contact heard on passive sonar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PassiveContact {
    pub id: u64,
    pub bearing: f64,
    /// Quantized signal excess over the background (dB). Positive means
    /// the contact stands out of the noise.
    pub strength_db: f64,
    pub class: ContactClass,
}

/// Complete world snapshot built after each step; the determinism tests
/// serialize these, and the demo app renders from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub run_state: RunState,
    pub objects: Vec<ObjectView>,
    pub events: Vec<SimEvent>,
    /// Distance from the player to the nearest hostile, if any hostile
    /// remains (meters).
    pub nearest_hostile_m: Option<f64>,
}
