//! Events emitted by the simulation for the presentation and audio layers.
//!
//! Events live exactly one step: the queue is cleared at the top of each
//! `advance` call and holds only what that call produced. They carry no
//! identity beyond the step they occurred in.

use serde::{Deserialize, Serialize};

use crate::enums::ShellCaliber;
use crate::types::Position;

/// A notable occurrence during one simulation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A warhead went off (torpedo hit, depth charge burst, shell impact).
    Explosion { position: Position },
    /// A deck gun fired.
    GunFire {
        position: Position,
        caliber: ShellCaliber,
    },
    /// An active sonar array transmitted.
    Ping { position: Position, bearing: f64 },
    /// A shell or falling object struck the water.
    Splash { position: Position },
    /// A torpedo left its tube.
    TorpedoLaunch { position: Position },
    /// A ship or submarine was destroyed.
    ShipSunk { position: Position },
}
