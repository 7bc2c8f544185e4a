//! Passive sonar channel.
//!
//! Every candidate on the shortlist contributes per-band noise through the
//! hydrophone array's bearing-dependent gain. Contributions, ambient sea
//! noise and the observer's self-noise are summed in the linear domain;
//! the total is converted to decibels and quantized by flooring after
//! subtracting (then re-adding) the receiver sensitivity offset. The
//! quantization is what lets strong or ambient noise mask weak signals,
//! so the loudest contact in range dominates perception.

use hecs::{Entity, World};

use depthwatch_core::components::{
    is_cavitating, Kind, NoiseSignature, SensorSuite, ShipDynamics,
};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{ContactClass, EntityKind, LifeState, SensorKind};
use depthwatch_core::state::PassiveContact;
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::environment::SeaEnvironment;
use crate::noise;
use crate::sensors::bearing_difference;

/// Fixed-capacity nearest-first set. Insertion keeps the entries sorted by
/// key; anything past the capacity falls off the far end. This is the
/// whole extent of sorting the sonar shortlist needs.
#[derive(Debug, Clone)]
pub struct NearestSet<T> {
    cap: usize,
    entries: Vec<(f64, T)>,
}

impl<T> NearestSet<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: Vec::with_capacity(cap + 1),
        }
    }

    pub fn insert(&mut self, key: f64, value: T) {
        let idx = self
            .entries
            .iter()
            .position(|(k, _)| *k > key)
            .unwrap_or(self.entries.len());
        if idx >= self.cap {
            return;
        }
        self.entries.insert(idx, (key, value));
        self.entries.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f64, T)> {
        self.entries.iter()
    }
}

/// Cached shortlist of the nearest noise sources around a listening
/// platform, refreshed by the sonar job.
#[derive(Debug, Clone, Default)]
pub struct ContactShortlist {
    pub entries: Vec<Entity>,
}

/// Bearing-dependent gain of a directional hydrophone array: full forward,
/// a small back lobe behind.
pub fn array_gain(offset: f64) -> f64 {
    let forward = offset.cos().max(0.0);
    HYDROPHONE_BACK_LOBE + (1.0 - HYDROPHONE_BACK_LOBE) * forward * forward
}

/// The deliberate gameplay quantization: floor after subtracting the
/// receiver sensitivity offset, then re-add it.
pub fn quantize_db(db: f64) -> f64 {
    (db - RECEIVER_SENSITIVITY_DB).floor() + RECEIVER_SENSITIVITY_DB
}

/// Quantized signal excess of one candidate over everything else the
/// array hears (dB). Positive means the candidate stands out.
pub fn signal_excess_db(candidate_linear: f64, background_linear: f64) -> f64 {
    let total = quantize_db(noise::linear_to_db(background_linear + candidate_linear));
    let floor = quantize_db(noise::linear_to_db(background_linear));
    total - floor
}

/// Build the nearest-candidate shortlist for one listening platform.
pub fn build_shortlist(world: &World, observer: Entity, obs_pos: &Position) -> ContactShortlist {
    let mut nearest: NearestSet<Entity> = NearestSet::new(SONAR_SHORTLIST_CAP);
    for (entity, (pos, life, _sig)) in world
        .query::<(&Position, &LifeState, &NoiseSignature)>()
        .iter()
    {
        if entity == observer || !life.is_alive() {
            continue;
        }
        let range = obs_pos.range_to(pos);
        if range <= PASSIVE_SONAR_MAX_RANGE {
            nearest.insert(range, entity);
        }
    }
    ContactShortlist {
        entries: nearest.iter().map(|&(_, e)| e).collect(),
    }
}

/// Listen on `observer`'s passive array over the given shortlist.
///
/// Returns one contact per candidate whose quantized excess over the rest
/// of the soundscape is positive.
pub fn listen(
    world: &World,
    env: &SeaEnvironment,
    observer: Entity,
    shortlist: &ContactShortlist,
) -> Vec<PassiveContact> {
    let (obs_pos, heading, array_bearing) = {
        let pos = match world.get::<&Position>(observer) {
            Ok(p) => *p,
            Err(_) => return Vec::new(),
        };
        let heading = world
            .get::<&Orientation>(observer)
            .map(|o| o.heading())
            .unwrap_or(0.0);
        let array = match world.get::<&SensorSuite>(observer) {
            Ok(suite) => match suite.get(SensorKind::PassiveSonar) {
                Some(s) => s.bearing,
                None => return Vec::new(),
            },
            Err(_) => return Vec::new(),
        };
        (pos, heading, array)
    };
    let axis = (heading + array_bearing).rem_euclid(std::f64::consts::TAU);

    let own_speed = world
        .get::<&ShipDynamics>(observer)
        .map(|d| d.speed_mps)
        .unwrap_or(0.0);
    let background = noise::db_to_linear(env.ambient_noise_db())
        + noise::db_to_linear(noise::self_noise_db(own_speed));

    // Per-candidate received strength, linear domain.
    let mut heard: Vec<(Entity, f64, f64, ContactClass)> = Vec::new();
    for &candidate in &shortlist.entries {
        let mut q = match world.query_one::<(
            &Kind,
            &Position,
            &Velocity,
            &LifeState,
            &NoiseSignature,
        )>(candidate)
        {
            Ok(q) => q,
            Err(_) => continue,
        };
        let (kind, pos, vel, life, sig) = match q.get() {
            Some(item) => item,
            None => continue,
        };
        if !life.is_alive() {
            continue;
        }

        let range = obs_pos.range_to(pos);
        if range > PASSIVE_SONAR_MAX_RANGE {
            continue;
        }
        let bearing = obs_pos.bearing_to(pos);
        let gain = array_gain(bearing_difference(bearing, axis));
        let speed = vel.speed();
        let cavitating = is_cavitating(speed, pos.depth());
        let linear = noise::received_linear(sig, speed, cavitating, range, gain);
        heard.push((candidate, linear, bearing, classify(kind.0)));
    }

    let all_linear: f64 = heard.iter().map(|(_, lin, _, _)| lin).sum();

    let mut contacts = Vec::new();
    for (entity, linear, bearing, class) in heard {
        // Everything except this candidate masks it: ambient, own noise,
        // and every other source the array hears.
        let rest = background + (all_linear - linear);
        let strength = signal_excess_db(linear, rest);
        if strength > 0.0 {
            contacts.push(PassiveContact {
                id: entity.to_bits().get(),
                bearing,
                strength_db: strength,
                class,
            });
        }
    }
    contacts
}

fn classify(kind: EntityKind) -> ContactClass {
    match kind {
        EntityKind::Submarine => ContactClass::Submarine,
        EntityKind::Torpedo => ContactClass::Torpedo,
        _ => ContactClass::Surface,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{db_to_linear, merchant_signature, received_linear};

    #[test]
    fn test_nearest_set_bounded_and_sorted() {
        let mut set = NearestSet::new(3);
        for (k, v) in [(5.0, 'e'), (1.0, 'a'), (4.0, 'd'), (2.0, 'b'), (3.0, 'c')] {
            set.insert(k, v);
        }
        let keys: Vec<f64> = set.iter().map(|&(k, _)| k).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_nearest_set_rejects_far_when_full() {
        let mut set = NearestSet::new(2);
        set.insert(1.0, 'a');
        set.insert(2.0, 'b');
        set.insert(10.0, 'z');
        let keys: Vec<f64> = set.iter().map(|&(k, _)| k).collect();
        assert_eq!(keys, vec![1.0, 2.0]);
    }

    #[test]
    fn test_array_gain_forward_vs_back() {
        assert!((array_gain(0.0) - 1.0).abs() < 1e-9);
        let abeam = array_gain(std::f64::consts::FRAC_PI_2);
        let astern = array_gain(std::f64::consts::PI);
        assert!((abeam - HYDROPHONE_BACK_LOBE).abs() < 1e-9);
        assert!((astern - HYDROPHONE_BACK_LOBE).abs() < 1e-9);
    }

    #[test]
    fn test_quantize_floors_onto_offset_grid() {
        // 57.3 dB with a 10 dB offset floors to 57.
        assert_eq!(quantize_db(57.3), 57.0);
        assert_eq!(quantize_db(57.0), 57.0);
        assert_eq!(quantize_db(57.999), 57.0);
    }

    #[test]
    fn test_signal_excess_monotonic_in_speed() {
        let sig = merchant_signature();
        let background = db_to_linear(20.0);
        let mut last = f64::NEG_INFINITY;
        for speed in [2.0, 4.0, 6.0, 8.0, 10.0, 12.0] {
            let lin = received_linear(&sig, speed, false, 6_000.0, 1.0);
            let excess = signal_excess_db(lin, background);
            assert!(
                excess >= last,
                "excess fell from {last} to {excess} at {speed} m/s"
            );
            last = excess;
        }
    }

    #[test]
    fn test_weak_signal_masked_by_ambient_floor() {
        // A signal far below the background vanishes inside one
        // quantization step.
        let background = db_to_linear(70.0);
        let weak = db_to_linear(40.0);
        assert_eq!(signal_excess_db(weak, background), 0.0);
        // A commanding signal stands clear of it.
        let strong = db_to_linear(80.0);
        assert!(signal_excess_db(strong, background) > 0.0);
    }
}
