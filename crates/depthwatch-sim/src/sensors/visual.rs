//! Visual lookout channel.
//!
//! Detectability is a function of ambient brightness, the candidate's
//! visible cross-section (aspect-dependent, reduced by submersion), and
//! range. The maximum range is implicit in the brightness-scaled
//! visibility distance; there is no separate cutoff.

use hecs::{Entity, World};

use depthwatch_core::components::{HullProfile, Kind, SensorSuite, SubDepthControl};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{EntityKind, LifeState, SensorKind};
use depthwatch_core::types::{Orientation, Position};

use crate::environment::SeaEnvironment;
use crate::sensors::{bearing_difference, exposed_fraction};

/// Cached lookout result, refreshed by the periodic scan job for AI use.
#[derive(Debug, Clone, Default)]
pub struct SightingReport {
    pub sighted: Vec<Entity>,
}

/// Broadside-ish visible cross-section in m².
///
/// `aspect` is the angle between the candidate's heading and the line of
/// sight: bow-on shows the beam, abeam shows the full length.
pub fn apparent_cross_section(
    length_m: f64,
    width_m: f64,
    draft_m: f64,
    aspect: f64,
    exposed: f64,
) -> f64 {
    let breadth = width_m + (length_m - width_m) * aspect.sin().abs();
    // Freeboard roughly tracks draft for the hull classes simulated here.
    breadth * draft_m * exposed.clamp(0.0, 1.0)
}

/// Sea spray and haze shorten sighting distance as the sea state rises.
pub fn weather_factor(sea_state: f64) -> f64 {
    1.0 / (1.0 + 2.0 * sea_state.clamp(0.0, 1.0))
}

/// Distance at which a target of `cross_section` m² becomes visible under
/// `brightness` ambient light.
pub fn visibility_range(brightness: f64, cross_section_m2: f64, sea_state: f64) -> f64 {
    if cross_section_m2 <= 0.0 {
        return 0.0;
    }
    let size = (cross_section_m2 / VISUAL_REFERENCE_CROSS_SECTION).sqrt();
    VISUAL_BASE_RANGE * brightness.clamp(0.0, 1.0).sqrt() * size * weather_factor(sea_state)
}

/// Channel query: can `observer` see `target`?
pub fn is_detected(world: &World, env: &SeaEnvironment, observer: Entity, target: Entity) -> bool {
    if observer == target {
        return false;
    }
    let (obs_pos, has_lookout) = match observer_state(world, observer) {
        Some(s) => s,
        None => return false,
    };
    if !has_lookout {
        return false;
    }
    target_visible_from(world, env, &obs_pos, target)
}

/// Scan every sightable candidate from `observer`. Used by the lookout job
/// and the engine's visibility query.
pub fn run_scan(world: &World, env: &SeaEnvironment, observer: Entity) -> Vec<Entity> {
    let (obs_pos, has_lookout) = match observer_state(world, observer) {
        Some(s) => s,
        None => return Vec::new(),
    };
    if !has_lookout {
        return Vec::new();
    }

    let mut sighted = Vec::new();
    for (entity, (kind, _, _, _)) in world
        .query::<(&Kind, &Position, &Orientation, &HullProfile)>()
        .iter()
    {
        if entity == observer || !is_sightable_kind(kind.0) {
            continue;
        }
        if target_visible_from(world, env, &obs_pos, entity) {
            sighted.push(entity);
        }
    }
    sighted
}

fn is_sightable_kind(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Ship | EntityKind::Submarine | EntityKind::Airplane
    )
}

fn observer_state(world: &World, observer: Entity) -> Option<(Position, bool)> {
    let pos = *world.get::<&Position>(observer).ok()?;
    let has_lookout = world
        .get::<&SensorSuite>(observer)
        .map(|s| s.get(SensorKind::Lookout).is_some())
        .unwrap_or(false);
    Some((pos, has_lookout))
}

fn target_visible_from(
    world: &World,
    env: &SeaEnvironment,
    obs_pos: &Position,
    target: Entity,
) -> bool {
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

    if !life.is_alive() || !is_sightable_kind(kind.0) {
        return false;
    }

    let exposed = if kind.0 == EntityKind::Airplane {
        1.0
    } else {
        exposed_fraction(pos.depth(), depth_control)
    };
    let aspect = bearing_difference(orient.heading(), pos.bearing_to(obs_pos));
    let cs = apparent_cross_section(hull.length_m, hull.width_m, hull.draft_m, aspect, exposed);

    let range = obs_pos.range_to(pos);
    range <= visibility_range(env.brightness(), cs, env.sea_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_section_aspect() {
        // Abeam (aspect pi/2) shows more than bow-on (aspect 0).
        let bow_on = apparent_cross_section(130.0, 12.0, 7.0, 0.0, 1.0);
        let abeam = apparent_cross_section(130.0, 12.0, 7.0, std::f64::consts::FRAC_PI_2, 1.0);
        assert!(abeam > bow_on * 5.0);
    }

    #[test]
    fn test_submersion_shrinks_cross_section() {
        let surfaced = apparent_cross_section(60.0, 6.0, 4.0, 1.0, 1.0);
        let awash = apparent_cross_section(60.0, 6.0, 4.0, 1.0, 0.3);
        assert!(awash < surfaced);
        assert_eq!(apparent_cross_section(60.0, 6.0, 4.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_visibility_range_scales_with_light() {
        let day = visibility_range(1.0, VISUAL_REFERENCE_CROSS_SECTION, 0.0);
        let night = visibility_range(0.01, VISUAL_REFERENCE_CROSS_SECTION, 0.0);
        assert!((day - VISUAL_BASE_RANGE).abs() < 1e-6);
        assert!(night < day * 0.2);
    }

    #[test]
    fn test_rough_sea_shortens_sighting() {
        let calm = visibility_range(1.0, VISUAL_REFERENCE_CROSS_SECTION, 0.0);
        let storm = visibility_range(1.0, VISUAL_REFERENCE_CROSS_SECTION, 1.0);
        assert!(storm < calm * 0.5);
    }
}
