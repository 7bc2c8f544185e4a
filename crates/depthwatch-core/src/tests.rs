use crate::components::{is_cavitating, NoiseBand, NoiseSignature, Sensor, SensorSuite};
use crate::enums::*;
use crate::types::{Orientation, Position, Velocity};

#[test]
fn test_life_state_monotonic_aging() {
    assert_eq!(LifeState::Alive.aged(), LifeState::Alive);
    assert_eq!(LifeState::Dead.aged(), LifeState::Dead2);
    assert_eq!(LifeState::Dead2.aged(), LifeState::Defunct);
    assert_eq!(LifeState::Defunct.aged(), LifeState::Defunct);
}

#[test]
fn test_life_state_predicates() {
    assert!(LifeState::Alive.is_alive());
    assert!(!LifeState::Dead.is_alive());
    assert!(!LifeState::Dead2.is_alive());

    assert!(LifeState::Alive.is_reference_safe());
    assert!(LifeState::Dead.is_reference_safe());
    assert!(LifeState::Dead2.is_reference_safe());
    assert!(!LifeState::Defunct.is_reference_safe());
}

#[test]
fn test_life_state_serde() {
    let variants = vec![
        LifeState::Alive,
        LifeState::Dead,
        LifeState::Dead2,
        LifeState::Defunct,
    ];
    for v in variants {
        let json = serde_json::to_string(&v).unwrap();
        let back: LifeState = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}

#[test]
fn test_entity_kind_weapon_partition() {
    assert!(EntityKind::Torpedo.is_weapon());
    assert!(EntityKind::DepthCharge.is_weapon());
    assert!(EntityKind::GunShell.is_weapon());
    assert!(!EntityKind::Ship.is_weapon());
    assert!(!EntityKind::Submarine.is_weapon());
    assert!(!EntityKind::Convoy.is_weapon());
}

#[test]
fn test_bearing_to_cardinal_directions() {
    let origin = Position::default();
    let north = Position::new(0.0, 1000.0, 0.0);
    let east = Position::new(1000.0, 0.0, 0.0);
    let south = Position::new(0.0, -1000.0, 0.0);

    assert!((origin.bearing_to(&north) - 0.0).abs() < 1e-9);
    assert!((origin.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    assert!((origin.bearing_to(&south) - std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn test_velocity_heading_round_trip() {
    for heading in [0.0, 0.7, 2.1, 4.5, 6.0] {
        let v = Velocity::from_heading(heading, 8.0);
        assert!((v.heading() - heading).abs() < 1e-9, "heading {heading}");
        assert!((v.speed() - 8.0).abs() < 1e-9);
    }
}

#[test]
fn test_orientation_heading_round_trip() {
    for heading in [0.0, 1.0, 3.0, 5.5] {
        let o = Orientation::from_heading(heading);
        assert!(
            (o.heading() - heading).abs() < 1e-9,
            "heading {heading} came back as {}",
            o.heading()
        );
    }
}

#[test]
fn test_position_depth() {
    assert_eq!(Position::new(0.0, 0.0, -50.0).depth(), 50.0);
    assert_eq!(Position::new(0.0, 0.0, 100.0).depth(), 0.0);
}

#[test]
fn test_cavitation_thresholds() {
    // Fast and shallow cavitates; deep or slow does not.
    assert!(is_cavitating(8.0, 10.0));
    assert!(!is_cavitating(3.0, 10.0));
    assert!(!is_cavitating(8.0, 100.0));
}

#[test]
fn test_sensor_suite_lookup() {
    let suite = SensorSuite::with(&[SensorKind::Lookout, SensorKind::PassiveSonar]);
    assert!(suite.get(SensorKind::Lookout).is_some());
    assert!(suite.get(SensorKind::PassiveSonar).is_some());
    assert!(suite.get(SensorKind::Radar).is_none());
    assert!(suite.get(SensorKind::ActiveSonar).is_none());
}

#[test]
fn test_sensor_suite_serde() {
    let mut suite = SensorSuite::with(&[SensorKind::ActiveSonar]);
    suite.get_mut(SensorKind::ActiveSonar).unwrap().bearing = 1.25;
    let json = serde_json::to_string(&suite).unwrap();
    let back: SensorSuite = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get(SensorKind::ActiveSonar).unwrap().bearing, 1.25);
}

#[test]
fn test_noise_signature_serde() {
    let sig = NoiseSignature {
        bands: [NoiseBand {
            base_db: 60.0,
            speed_db_per_mps: 1.5,
        }; 4],
    };
    let json = serde_json::to_string(&sig).unwrap();
    let back: NoiseSignature = serde_json::from_str(&json).unwrap();
    assert_eq!(back.bands[0].base_db, 60.0);
    assert_eq!(back.bands[3].speed_db_per_mps, 1.5);
}

#[test]
fn test_sensor_default_mode() {
    let s = Sensor::new(SensorKind::ActiveSonar);
    assert_eq!(s.mode, SweepMode::Rotating);
    assert_eq!(s.bearing, 0.0);
}
