//! Surface-search radar channel.
//!
//! Range- and aspect-limited binary detection, independent of ambient
//! light. The return follows the fourth-power law, so detection range
//! grows with the fourth root of the target's radar cross-section.

use hecs::{Entity, World};

use depthwatch_core::components::{HullProfile, Kind, SensorSuite, SubDepthControl};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{EntityKind, LifeState, SensorKind};
use depthwatch_core::types::{Orientation, Position};

use crate::sensors::{bearing_difference, exposed_fraction};
use crate::sensors::visual::apparent_cross_section;

/// Fraction of the geometric profile a steel hull returns as RCS.
const RADAR_REFLECTIVITY: f64 = 0.08;

/// Normalized radar return for a target of `rcs_m2` at `range_m`.
pub fn radar_return(rcs_m2: f64, range_m: f64) -> f64 {
    let r = range_m.max(1.0);
    let r4 = (r * r) * (r * r);
    RADAR_K * rcs_m2 / r4
}

/// Scalar detection decision.
pub fn is_return_detected(rcs_m2: f64, range_m: f64) -> bool {
    range_m <= RADAR_MAX_RANGE && radar_return(rcs_m2, range_m) >= RADAR_DETECTION_THRESHOLD
}

/// Channel query: does `observer`'s radar paint `target`?
pub fn is_detected(world: &World, observer: Entity, target: Entity) -> bool {
    if observer == target {
        return false;
    }
    let obs_pos = match observer_with_radar(world, observer) {
        Some(p) => p,
        None => return false,
    };

    let mut q = match world.query_one::<(
        &Kind,
        &Position,
        &Orientation,
        &HullProfile,
        &LifeState,
        Option<&SubDepthControl>,
    )>(target)
    {
        Ok(q) => q,
        Err(_) => return false,
    };
    let (kind, pos, orient, hull, life, depth_control) = match q.get() {
        Some(item) => item,
        None => return false,
    };

    if !life.is_alive() || !is_radar_target(kind.0) {
        return false;
    }

    // Submerged hulls return nothing; a periscope head is too small for
    // this radar generation.
    let exposed = if kind.0 == EntityKind::Airplane {
        1.0
    } else {
        let e = exposed_fraction(pos.depth(), depth_control);
        if e <= PERISCOPE_CROSS_SECTION_FACTOR {
            0.0
        } else {
            e
        }
    };
    if exposed <= 0.0 {
        return false;
    }

    let aspect = bearing_difference(orient.heading(), pos.bearing_to(&obs_pos));
    let profile = apparent_cross_section(hull.length_m, hull.width_m, hull.draft_m, aspect, exposed);
    is_return_detected(profile * RADAR_REFLECTIVITY, obs_pos.range_to(pos))
}

/// All radar contacts for `observer`.
pub fn scan(world: &World, observer: Entity) -> Vec<Entity> {
    if observer_with_radar(world, observer).is_none() {
        return Vec::new();
    }
    let mut contacts = Vec::new();
    for (entity, kind) in world.query::<&Kind>().iter() {
        if entity != observer && is_radar_target(kind.0) && is_detected(world, observer, entity) {
            contacts.push(entity);
        }
    }
    contacts
}

fn is_radar_target(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Ship | EntityKind::Submarine | EntityKind::Airplane
    )
}

fn observer_with_radar(world: &World, observer: Entity) -> Option<Position> {
    let has_radar = world
        .get::<&SensorSuite>(observer)
        .map(|s| s.get(SensorKind::Radar).is_some())
        .unwrap_or(false);
    if !has_radar {
        return None;
    }
    world.get::<&Position>(observer).ok().map(|p| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_root_law() {
        // Doubling RCS at range * 2^(1/4) gives the same return.
        let base = radar_return(1.0, 10_000.0);
        let scaled = radar_return(2.0, 10_000.0 * 2.0_f64.powf(0.25));
        assert!((base - scaled).abs() / base < 1e-9);
    }

    #[test]
    fn test_return_threshold_vs_range() {
        // A destroyer-sized profile paints well inside max range and not
        // far beyond it.
        let rcs = 500.0;
        assert!(is_return_detected(rcs, 5_000.0));
        assert!(!is_return_detected(rcs, RADAR_MAX_RANGE + 1.0));
    }

    #[test]
    fn test_small_target_detected_closer() {
        let big = 1_000.0;
        let small = 1.0;
        let range = 9_000.0;
        assert!(radar_return(big, range) > radar_return(small, range));
    }
}
