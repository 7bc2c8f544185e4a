//! Sensor engine: four independent detection channels.
//!
//! Every channel answers "can this observer perceive that candidate right
//! now" as a pure function of the environment and the two entities' current
//! state; the only mutable sensor state is the pointing bearing of
//! directional arrays. An observer without a given sensor type detects
//! nothing on that channel, and candidates that are not `Alive` are never
//! reported.

pub mod active;
pub mod passive;
pub mod radar;
pub mod visual;

use depthwatch_core::components::SubDepthControl;
use depthwatch_core::constants::{PERISCOPE_CROSS_SECTION_FACTOR, VISUAL_MAX_HULL_DEPTH};

/// Smallest signed difference between two bearings, in [-pi, pi].
pub fn bearing_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(std::f64::consts::TAU);
    if diff > std::f64::consts::PI {
        diff - std::f64::consts::TAU
    } else {
        diff
    }
}

/// Depth the scope head of a raised periscope still breaks the surface from.
const PERISCOPE_DEPTH_M: f64 = 12.0;

/// Fraction of a hull's above-water profile currently exposed.
///
/// Surface ships and aircraft are fully exposed. A diving submarine fades
/// out linearly over the first few meters, then shows only a periscope
/// head (if raised and shallow enough), then nothing.
pub fn exposed_fraction(depth_m: f64, depth_control: Option<&SubDepthControl>) -> f64 {
    if depth_m <= 0.0 {
        return 1.0;
    }
    if depth_m < VISUAL_MAX_HULL_DEPTH {
        return 1.0 - depth_m / VISUAL_MAX_HULL_DEPTH;
    }
    match depth_control {
        Some(dc) if dc.periscope_raised && depth_m <= PERISCOPE_DEPTH_M => {
            PERISCOPE_CROSS_SECTION_FACTOR
        }
        _ => 0.0,
    }
}
