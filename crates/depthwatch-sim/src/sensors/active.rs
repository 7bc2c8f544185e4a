//! Active sonar (pinging) channel.
//!
//! A ping transmits from the array's current bearing (stepping the array
//! around between activations in rotating mode), reports every candidate
//! inside the cone and range with a deliberately blurred position fix, and
//! always records a ping event, detections or not.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use depthwatch_core::components::{Kind, SensorSuite};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{EntityKind, LifeState, SensorKind, SweepMode};
use depthwatch_core::events::SimEvent;
use depthwatch_core::state::ActiveContact;
use depthwatch_core::types::{Orientation, Position};

use crate::sensors::bearing_difference;

/// Fire one ping from `observer`'s active sonar.
///
/// Returns the (possibly empty) contact list. An observer without an
/// active sonar array transmits nothing: no contacts, no event.
pub fn ping(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
    observer: Entity,
) -> Vec<ActiveContact> {
    let (obs_pos, heading, array_bearing) = {
        let obs_pos = match world.get::<&Position>(observer) {
            Ok(p) => *p,
            Err(_) => return Vec::new(),
        };
        let heading = world
            .get::<&Orientation>(observer)
            .map(|o| o.heading())
            .unwrap_or(0.0);

        let mut suite = match world.get::<&mut SensorSuite>(observer) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };
        let sensor = match suite.get_mut(SensorKind::ActiveSonar) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let bearing = sensor.bearing;
        // Rotating arrays step around the compass one increment per ping.
        if sensor.mode == SweepMode::Rotating {
            sensor.bearing = (sensor.bearing + ACTIVE_SONAR_SWEEP_STEP)
                .rem_euclid(std::f64::consts::TAU);
        }
        (obs_pos, heading, bearing)
    };

    let beam = (heading + array_bearing).rem_euclid(std::f64::consts::TAU);
    events.push(SimEvent::Ping {
        position: obs_pos,
        bearing: beam,
    });

    let mut contacts = Vec::new();
    for (entity, (kind, pos, life)) in world.query::<(&Kind, &Position, &LifeState)>().iter() {
        if entity == observer || !life.is_alive() || !is_echo_source(kind.0) {
            continue;
        }
        let range = obs_pos.range_to(pos);
        if range > ACTIVE_SONAR_MAX_RANGE {
            continue;
        }
        let bearing = obs_pos.bearing_to(pos);
        if bearing_difference(bearing, beam).abs() > ACTIVE_SONAR_CONE_HALF_ANGLE {
            continue;
        }

        // Real sonar fixes are imprecise; blur the reported position
        // proportionally to range.
        let blur = range * ACTIVE_SONAR_FIX_ERROR;
        let reported = Position::new(
            pos.x + rng.gen_range(-blur..=blur),
            pos.y + rng.gen_range(-blur..=blur),
            pos.z,
        );
        contacts.push(ActiveContact {
            id: entity.to_bits().get(),
            reported_position: reported,
            range_m: range,
            bearing,
        });
    }

    log::debug!(
        "ping from {:?}: beam {:.2} rad, {} contact(s)",
        observer,
        beam,
        contacts.len()
    );
    contacts
}

fn is_echo_source(kind: EntityKind) -> bool {
    matches!(kind, EntityKind::Ship | EntityKind::Submarine)
}
