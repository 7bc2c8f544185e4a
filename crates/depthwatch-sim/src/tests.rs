//! Tests for the stepper, lifecycle, collision response, sensor channels,
//! and persistence round-trip.

use depthwatch_core::components::{SensorSuite, ShipDynamics, SubDepthControl};
use depthwatch_core::constants::*;
use depthwatch_core::enums::*;
use depthwatch_core::errors::SimError;
use depthwatch_core::events::SimEvent;
use depthwatch_core::types::{Position, Velocity};

use crate::engine::{SimConfig, WorldEngine};
use crate::persistence;
use crate::scenario;
use crate::sensors::passive::ContactShortlist;
use crate::sensors::visual::SightingReport;
use crate::spawn::{DepthChargeSpec, ShellSpec, ShipSpec, SubmarineSpec, TorpedoSpec};
use crate::systems;

fn engine() -> WorldEngine {
    WorldEngine::new(SimConfig::default())
}

/// A ship that holds exactly `speed` m/s on `heading` with no acceleration
/// and no rudder, for kinematics-sensitive tests.
fn steady_ship(position: Position, heading: f64, speed: f64) -> ShipSpec {
    let mut spec = scenario::merchant_spec(position, heading, Allegiance::Hostile);
    spec.dynamics = ShipDynamics {
        throttle: 1.0,
        rudder: 0.0,
        speed_mps: speed,
        max_speed_mps: speed.max(0.1),
        accel_mps2: 0.0,
        max_turn_rate: 0.0,
        fuel_kg: 1.0e9,
        fuel_burn_kgps: 0.0,
    };
    spec
}

/// A stationary listening platform with only a passive array.
fn hydrophone_platform(position: Position) -> ShipSpec {
    let mut spec = scenario::escort_spec(position, 0.0, Allegiance::Friendly);
    spec.dynamics.throttle = 0.0;
    spec.dynamics.speed_mps = 0.0;
    spec.sensors = SensorSuite::with(&[SensorKind::PassiveSonar]);
    spec
}

// ---- Lifecycle ----

#[test]
fn test_life_state_two_round_removal() {
    let mut eng = engine();
    let ship = eng.spawn_ship(steady_ship(Position::default(), 0.0, 0.0));
    let id = WorldEngine::id_of(ship);

    systems::lifecycle::kill(eng.world_mut(), ship);
    assert_eq!(eng.get_object(id).unwrap().life_state, LifeState::Dead);

    // Round 1: still present, aged into the grace state.
    eng.advance(0.05).unwrap();
    assert_eq!(eng.get_object(id).unwrap().life_state, LifeState::Dead2);

    // Round 2: present but defunct; references to it are now invalid.
    eng.advance(0.05).unwrap();
    assert!(eng.world().contains(ship));
    assert!(matches!(
        eng.get_object(id),
        Err(SimError::InvalidReference(_))
    ));

    // Round 3: swept from the store before anything runs.
    eng.advance(0.05).unwrap();
    assert!(!eng.world().contains(ship));
}

#[test]
fn test_dead_entity_never_reported_by_sensors() {
    let mut eng = engine();
    let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
    let target = eng.spawn_ship(steady_ship(Position::new(0.0, 6_000.0, 0.0), 0.0, 10.0));

    assert!(!eng.sonar_contacts_of(observer).is_empty());

    systems::lifecycle::kill(eng.world_mut(), target);
    assert!(eng.sonar_contacts_of(observer).is_empty());
}

// ---- Event queue ----

#[test]
fn test_event_queue_holds_one_advance_only() {
    let mut eng = engine();
    eng.spawn_shell(ShellSpec {
        position: Position::new(0.0, 0.0, 10.0),
        velocity: Velocity::new(0.0, 100.0, 200.0),
        allegiance: Allegiance::Friendly,
        caliber: ShellCaliber::Medium,
        warhead: 40.0,
    });
    assert!(matches!(eng.events()[0], SimEvent::GunFire { .. }));

    // The next advance clears the muzzle report; the climbing shell
    // produces nothing new.
    eng.advance(0.05).unwrap();
    assert!(eng.events().is_empty());
}

#[test]
fn test_events_from_every_substep_survive_one_advance() {
    let mut eng = engine();
    // Two charges fused two meters apart in depth burst on different
    // sub-steps of the same oversized delta.
    for fuse in [10.0, 12.0] {
        eng.spawn_depth_charge(DepthChargeSpec {
            position: Position::new(0.0, 0.0, -5.0),
            allegiance: Allegiance::Friendly,
            detonation_depth_m: fuse,
            sink_rate_mps: 10.0,
            warhead: 80.0,
        });
    }
    eng.advance(1.0).unwrap();
    let explosions = eng
        .events()
        .iter()
        .filter(|e| matches!(e, SimEvent::Explosion { .. }))
        .count();
    assert_eq!(explosions, 2, "both sub-step bursts must be in the queue");
}

// ---- Sub-stepping ----

#[test]
fn test_large_delta_subdivision_equivalence() {
    let mut eng_a = engine();
    let mut eng_b = engine();
    let ship_a = eng_a.spawn_ship(steady_ship(Position::default(), 0.3, 5.0));
    let ship_b = eng_b.spawn_ship(steady_ship(Position::default(), 0.3, 5.0));

    eng_a.advance(0.25).unwrap();
    for _ in 0..5 {
        eng_b.advance(0.05).unwrap();
    }

    let pa = eng_a.get_object(WorldEngine::id_of(ship_a)).unwrap().position;
    let pb = eng_b.get_object(WorldEngine::id_of(ship_b)).unwrap().position;
    assert!((pa.x - pb.x).abs() < 1e-2, "x diverged: {} vs {}", pa.x, pb.x);
    assert!((pa.y - pb.y).abs() < 1e-2, "y diverged: {} vs {}", pa.y, pb.y);
    assert_eq!(eng_a.time().step, eng_b.time().step);
    assert!((eng_a.time().elapsed_secs - eng_b.time().elapsed_secs).abs() < 1e-9);
}

#[test]
fn test_zero_and_negative_delta_are_no_ops() {
    let mut eng = engine();
    let ship = eng.spawn_ship(steady_ship(Position::default(), 0.0, 5.0));
    eng.advance(0.0).unwrap();
    eng.advance(-1.0).unwrap();
    let pos = eng.get_object(WorldEngine::id_of(ship)).unwrap().position;
    assert_eq!(pos.y, 0.0);
    assert_eq!(eng.time().step, 0);
}

// ---- Collision ----

#[test]
fn test_closing_ships_collide_and_stop_closing() {
    let mut eng = engine();
    // Bow-on with 50 m of water between the stems, closing at 5 m/s.
    // Merchant hulls are 135 m long, so the centers sit 185 m apart.
    let a = eng.spawn_ship(steady_ship(Position::new(0.0, 0.0, 0.0), 0.0, 2.5));
    let b = eng.spawn_ship(steady_ship(
        Position::new(0.0, 185.0, 0.0),
        std::f64::consts::PI,
        2.5,
    ));

    // One call; the oversized delta is subdivided internally and the bows
    // meet partway through.
    eng.advance(12.0).unwrap();

    let va = eng.get_object(WorldEngine::id_of(a)).unwrap().velocity;
    let vb = eng.get_object(WorldEngine::id_of(b)).unwrap().velocity;
    // A's velocity toward B (north) and B's toward A (south) must be
    // non-positive: separating or stationary, not still closing.
    assert!(va.y <= 1e-9, "ship A still closing: vy = {}", va.y);
    assert!(vb.y >= -1e-9, "ship B still closing: vy = {}", vb.y);
}

#[test]
fn test_separated_ships_do_not_interact() {
    let mut eng = engine();
    let a = eng.spawn_ship(steady_ship(Position::new(0.0, 0.0, 0.0), 0.0, 2.5));
    let b = eng.spawn_ship(steady_ship(Position::new(2_000.0, 0.0, 0.0), 0.0, 2.5));

    eng.advance(0.05).unwrap();

    let va = eng.get_object(WorldEngine::id_of(a)).unwrap().velocity;
    let vb = eng.get_object(WorldEngine::id_of(b)).unwrap().velocity;
    assert!((va.y - 2.5).abs() < 1e-9);
    assert!((vb.y - 2.5).abs() < 1e-9);
}

#[test]
fn test_torpedo_hit_damages_target() {
    let mut eng = engine();
    let target = eng.spawn_ship(steady_ship(Position::new(0.0, 1_000.0, 0.0), 0.0, 0.0));
    eng.spawn_torpedo(TorpedoSpec {
        position: Position::new(0.0, 0.0, 0.0),
        heading: 0.0,
        allegiance: Allegiance::Friendly,
        set_speed_mps: 15.0,
        run_length_m: 3_000.0,
        arming_distance_m: TORPEDO_ARMING_DISTANCE,
        warhead: 120.0,
    });

    let mut exploded = false;
    for _ in 0..1_600 {
        eng.advance(0.05).unwrap();
        if eng
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::Explosion { .. }))
        {
            exploded = true;
            break;
        }
    }
    assert!(exploded, "torpedo should reach and strike the target");

    let damage = eng
        .world()
        .get::<&depthwatch_core::components::Damage>(target)
        .unwrap()
        .points;
    assert!((damage - 120.0).abs() < 1e-9);
}

#[test]
fn test_unarmed_torpedo_passes_through() {
    let mut eng = engine();
    // Target inside the safety run: the fish passes clean through.
    let target = eng.spawn_ship(steady_ship(Position::new(0.0, 100.0, 0.0), 0.0, 0.0));
    let fish = eng.spawn_torpedo(TorpedoSpec {
        position: Position::new(0.0, 0.0, 0.0),
        heading: 0.0,
        allegiance: Allegiance::Friendly,
        set_speed_mps: 15.0,
        run_length_m: 3_000.0,
        arming_distance_m: TORPEDO_ARMING_DISTANCE,
        warhead: 120.0,
    });

    for _ in 0..200 {
        eng.advance(0.05).unwrap();
    }
    assert!(eng.is_alive(fish), "unarmed fish must survive the pass");
    let damage = eng
        .world()
        .get::<&depthwatch_core::components::Damage>(target)
        .unwrap()
        .points;
    assert_eq!(damage, 0.0);
}

#[test]
fn test_depth_charge_bursts_at_fuse_depth() {
    let mut eng = engine();
    let boat = eng.spawn_submarine(submerged_boat(Position::new(20.0, 0.0, -30.0), 30.0));
    eng.spawn_depth_charge(DepthChargeSpec {
        position: Position::new(0.0, 0.0, 0.0),
        allegiance: Allegiance::Hostile,
        detonation_depth_m: 28.0,
        sink_rate_mps: 3.0,
        warhead: 60.0,
    });

    let mut burst = false;
    for _ in 0..250 {
        eng.advance(0.05).unwrap();
        if eng
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::Explosion { .. }))
        {
            burst = true;
            break;
        }
    }
    assert!(burst, "charge must burst at its fuse depth");

    let damage = eng
        .world()
        .get::<&depthwatch_core::components::Damage>(boat)
        .unwrap()
        .points;
    assert!(damage > 0.0, "nearby submerged boat must take burst damage");
}

fn submerged_boat(position: Position, depth: f64) -> SubmarineSpec {
    let mut spec = scenario::uboat_spec(position, 0.0, Allegiance::Friendly);
    spec.ship.dynamics.throttle = 0.0;
    spec.ship.dynamics.speed_mps = 0.0;
    spec.depth_control = SubDepthControl {
        target_depth_m: depth,
        dive_rate_mps: 1.0,
        periscope_raised: false,
        battery: 1.0,
    };
    spec
}

// ---- Passive sonar ----

#[test]
fn test_passive_detection_range_flip() {
    // In range: detected.
    let mut near = engine();
    let observer = near.spawn_ship(hydrophone_platform(Position::default()));
    near.spawn_ship(steady_ship(Position::new(0.0, 6_000.0, 0.0), 0.0, 10.0));
    let contacts = near.sonar_contacts_of(observer);
    assert_eq!(contacts.len(), 1, "merchant at 6 km must be heard");
    assert!(contacts[0].strength_db > 0.0);
    assert_eq!(contacts[0].class, ContactClass::Surface);

    // Far out: the received level falls under the quantization floor.
    let mut far = engine();
    let observer = far.spawn_ship(hydrophone_platform(Position::default()));
    far.spawn_ship(steady_ship(Position::new(0.0, 20_000.0, 0.0), 0.0, 10.0));
    assert!(
        far.sonar_contacts_of(observer).is_empty(),
        "merchant at 20 km must be masked"
    );
}

#[test]
fn test_passive_detection_masked_by_heavy_sea() {
    let mut eng = WorldEngine::new(SimConfig {
        sea_state: 0.95,
        ..Default::default()
    });
    let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
    eng.spawn_ship(steady_ship(Position::new(0.0, 6_000.0, 0.0), 0.0, 10.0));
    assert!(
        eng.sonar_contacts_of(observer).is_empty(),
        "storm ambient noise must mask the contact at a range where calm \
         water detected it"
    );
}

#[test]
fn test_passive_strength_monotonic_in_target_speed() {
    let mut last = -1.0;
    for speed in [6.0, 8.0, 10.0, 12.0] {
        let mut eng = engine();
        let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
        eng.spawn_ship(steady_ship(Position::new(0.0, 6_000.0, 0.0), 0.0, speed));
        let strength = eng
            .sonar_contacts_of(observer)
            .first()
            .map(|c| c.strength_db)
            .unwrap_or(0.0);
        assert!(
            strength >= last,
            "strength fell from {last} to {strength} at {speed} m/s"
        );
        last = strength;
    }
    assert!(last > 0.0, "fastest target must end up detected");
}

#[test]
fn test_loudest_contact_dominates() {
    let mut eng = engine();
    let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
    eng.spawn_ship(steady_ship(Position::new(0.0, 4_000.0, 0.0), 0.0, 12.0));
    // A quiet submarine in the merchant's shadow.
    eng.spawn_submarine(submerged_boat(Position::new(200.0, 4_000.0, -40.0), 40.0));

    let contacts = eng.sonar_contacts_of(observer);
    assert_eq!(contacts.len(), 1, "only the merchant should stand out");
    assert_eq!(contacts[0].class, ContactClass::Surface);
}

#[test]
fn test_sonar_shortlist_refreshed_by_job() {
    let mut eng = engine();
    let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
    eng.spawn_ship(steady_ship(Position::new(0.0, 5_000.0, 0.0), 0.0, 8.0));

    assert!(eng.world().get::<&ContactShortlist>(observer).is_err());
    eng.advance(0.05).unwrap();
    let shortlist = eng.world().get::<&ContactShortlist>(observer).unwrap();
    assert_eq!(shortlist.entries.len(), 1);
}

// ---- Active sonar ----

#[test]
fn test_ping_with_no_candidates_still_pings() {
    let mut eng = engine();
    let mut spec = scenario::escort_spec(Position::default(), 0.0, Allegiance::Friendly);
    spec.sensors = SensorSuite::with(&[SensorKind::ActiveSonar]);
    let observer = eng.spawn_ship(spec);

    let contacts = eng.ping_active_sonar(observer);
    assert!(contacts.is_empty());
    let pings = eng
        .events()
        .iter()
        .filter(|e| matches!(e, SimEvent::Ping { .. }))
        .count();
    assert_eq!(pings, 1, "exactly one ping event per activation");
}

#[test]
fn test_ping_without_sensor_is_silent() {
    let mut eng = engine();
    let observer = eng.spawn_ship(hydrophone_platform(Position::default()));
    let contacts = eng.ping_active_sonar(observer);
    assert!(contacts.is_empty());
    assert!(eng.events().is_empty(), "no array, no ping event");
}

#[test]
fn test_ping_fixes_carry_positional_error() {
    let mut eng = engine();
    let mut spec = scenario::escort_spec(Position::default(), 0.0, Allegiance::Friendly);
    spec.sensors = SensorSuite::with(&[SensorKind::ActiveSonar]);
    // Keep the array on the bow so the target sits inside the first cone.
    spec.sensors.sensors[0].mode = SweepMode::Fixed;
    let observer = eng.spawn_ship(spec);
    let true_pos = Position::new(0.0, 2_000.0, -20.0);
    eng.spawn_submarine(submerged_boat(true_pos, 20.0));

    let contacts = eng.ping_active_sonar(observer);
    assert_eq!(contacts.len(), 1);
    let fix = contacts[0].reported_position;
    let error = true_pos.horizontal_range_to(&fix);
    let max_error = 2.0 * 2_000.0 * ACTIVE_SONAR_FIX_ERROR * 2.0_f64.sqrt();
    assert!(error <= max_error, "fix error {error} larger than the blur allows");
    assert!((contacts[0].range_m - 2_000.0).abs() < 1.0);
}

#[test]
fn test_rotating_array_steps_between_pings() {
    let mut eng = engine();
    let mut spec = scenario::escort_spec(Position::default(), 0.0, Allegiance::Friendly);
    spec.sensors = SensorSuite::with(&[SensorKind::ActiveSonar]);
    let observer = eng.spawn_ship(spec);

    eng.ping_active_sonar(observer);
    eng.ping_active_sonar(observer);
    let bearings: Vec<f64> = eng
        .events()
        .iter()
        .filter_map(|e| match e {
            SimEvent::Ping { bearing, .. } => Some(*bearing),
            _ => None,
        })
        .collect();
    assert_eq!(bearings.len(), 2);
    assert!(
        (bearings[1] - bearings[0] - ACTIVE_SONAR_SWEEP_STEP).abs() < 1e-9,
        "second ping should step one sweep increment"
    );
}

// ---- Visual and radar ----

#[test]
fn test_lookout_sees_surface_ship_in_daylight() {
    let mut eng = engine();
    let observer = eng.spawn_ship(scenario::escort_spec(
        Position::default(),
        0.0,
        Allegiance::Friendly,
    ));
    let target = eng.spawn_ship(steady_ship(Position::new(0.0, 5_000.0, 0.0), 1.5, 5.0));

    let seen = eng.visible_objects_of(observer);
    assert!(seen.iter().any(|o| o.id == WorldEngine::id_of(target)));
}

#[test]
fn test_lookout_blind_at_night() {
    let mut eng = WorldEngine::new(SimConfig {
        start_clock_secs: 0.0,
        ..Default::default()
    });
    let observer = eng.spawn_ship(scenario::escort_spec(
        Position::default(),
        0.0,
        Allegiance::Friendly,
    ));
    eng.spawn_ship(steady_ship(Position::new(0.0, 5_000.0, 0.0), 1.5, 5.0));

    assert!(
        eng.visible_objects_of(observer).is_empty(),
        "a ship 5 km out must be invisible at midnight"
    );
}

#[test]
fn test_deep_submarine_invisible_but_radar_free() {
    let mut eng = engine();
    let observer = eng.spawn_ship(scenario::escort_spec(
        Position::default(),
        0.0,
        Allegiance::Friendly,
    ));
    eng.spawn_submarine(submerged_boat(Position::new(0.0, 3_000.0, -40.0), 40.0));

    assert!(eng.visible_objects_of(observer).is_empty());
    assert!(eng.radar_contacts_of(observer).is_empty());
}

#[test]
fn test_radar_paints_surfaced_ship_day_or_night() {
    let mut eng = WorldEngine::new(SimConfig {
        start_clock_secs: 0.0,
        ..Default::default()
    });
    let observer = eng.spawn_ship(scenario::escort_spec(
        Position::default(),
        0.0,
        Allegiance::Friendly,
    ));
    let target = eng.spawn_ship(steady_ship(Position::new(0.0, 5_000.0, 0.0), 1.5, 5.0));

    let painted = eng.radar_contacts_of(observer);
    assert!(painted.iter().any(|o| o.id == WorldEngine::id_of(target)));
}

#[test]
fn test_observer_without_sensor_detects_nothing() {
    let mut eng = engine();
    let mut blind = scenario::merchant_spec(Position::default(), 0.0, Allegiance::Friendly);
    blind.sensors = SensorSuite::default();
    let observer = eng.spawn_ship(blind);
    eng.spawn_ship(steady_ship(Position::new(0.0, 2_000.0, 0.0), 0.0, 8.0));

    assert!(eng.visible_objects_of(observer).is_empty());
    assert!(eng.radar_contacts_of(observer).is_empty());
    assert!(eng.sonar_contacts_of(observer).is_empty());
}

#[test]
fn test_lookout_job_caches_sightings() {
    let mut eng = engine();
    let observer = eng.spawn_ship(scenario::escort_spec(
        Position::default(),
        0.0,
        Allegiance::Friendly,
    ));
    eng.spawn_ship(steady_ship(Position::new(0.0, 4_000.0, 0.0), 1.5, 5.0));

    eng.advance(0.05).unwrap();
    let report = eng.world().get::<&SightingReport>(observer).unwrap();
    assert_eq!(report.sighted.len(), 1);
}

// ---- Run state ----

#[test]
fn test_player_destroyed_ends_run() {
    let mut eng = engine();
    scenario::convoy_action(&mut eng).unwrap();
    let player = eng.player().unwrap();

    let mut sink = Vec::new();
    systems::damage::apply(eng.world_mut(), player, 1.0e6, &mut sink);
    eng.advance(0.05).unwrap();
    assert_eq!(eng.run_state(), RunState::PlayerLost);
}

#[test]
fn test_contact_loss_ends_run() {
    let mut eng = engine();
    let boat = eng.spawn_submarine(submerged_boat(Position::default(), 12.0));
    eng.set_player(boat).unwrap();
    // The only hostile is far beyond the contact-loss radius.
    eng.spawn_ship(steady_ship(
        Position::new(0.0, CONTACT_LOSS_RANGE + 10_000.0, 0.0),
        0.0,
        5.0,
    ));

    eng.advance(0.05).unwrap();
    assert_eq!(eng.run_state(), RunState::ContactLost);
}

#[test]
fn test_convoy_in_range_keeps_running() {
    let mut eng = engine();
    scenario::convoy_action(&mut eng).unwrap();
    for _ in 0..20 {
        eng.advance(0.1).unwrap();
    }
    assert_eq!(eng.run_state(), RunState::Running);
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut eng_a = engine();
    let mut eng_b = engine();
    scenario::convoy_action(&mut eng_a).unwrap();
    scenario::convoy_action(&mut eng_b).unwrap();

    for _ in 0..100 {
        eng_a.advance(0.1).unwrap();
        eng_b.advance(0.1).unwrap();
    }
    let json_a = serde_json::to_string(&eng_a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&eng_b.snapshot()).unwrap();
    assert_eq!(json_a, json_b, "same seed must give identical worlds");
}

#[test]
fn test_ping_error_depends_on_seed() {
    let fix_for_seed = |seed: u64| {
        let mut eng = WorldEngine::new(SimConfig {
            seed,
            ..Default::default()
        });
        let mut spec = scenario::escort_spec(Position::default(), 0.0, Allegiance::Friendly);
        spec.sensors = SensorSuite::with(&[SensorKind::ActiveSonar]);
        spec.sensors.sensors[0].mode = SweepMode::Fixed;
        let observer = eng.spawn_ship(spec);
        eng.spawn_submarine(submerged_boat(Position::new(0.0, 2_000.0, -20.0), 20.0));
        eng.ping_active_sonar(observer)[0].reported_position
    };

    let fix_a = fix_for_seed(111);
    let fix_b = fix_for_seed(111);
    assert_eq!(fix_a, fix_b, "same seed, same blur");

    let fix_c = fix_for_seed(222);
    assert!(
        fix_a.x != fix_c.x || fix_a.y != fix_c.y,
        "different seeds should blur differently"
    );
}

// ---- Convoy ----

#[test]
fn test_convoy_compaction_drops_dead_members() {
    let mut eng = engine();
    let convoy = scenario::convoy_action(&mut eng).unwrap();
    let convoy_id = WorldEngine::id_of(convoy);
    let before = eng.get_convoy(convoy_id).unwrap().members.len();
    assert_eq!(before, 6);

    let victim_id = eng.get_convoy(convoy_id).unwrap().members[0];
    let victim = eng.resolve(victim_id).unwrap();
    let mut sink = Vec::new();
    systems::damage::apply(eng.world_mut(), victim, 1.0e6, &mut sink);

    // Past the compaction period the roster shrinks.
    eng.advance(JOB_CONVOY_COMPACT_SECS + 0.1).unwrap();
    let after = eng.get_convoy(convoy_id).unwrap().members.len();
    assert_eq!(after, 5);
}

// ---- Persistence ----

#[test]
fn test_save_load_round_trip() {
    let mut eng = engine();
    let convoy = scenario::convoy_action(&mut eng).unwrap();
    for _ in 0..50 {
        eng.advance(0.1).unwrap();
    }

    let save = persistence::save_game(&eng).unwrap();
    let json = persistence::to_json(&save).unwrap();
    let restored = persistence::load_game(&persistence::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.time().step, eng.time().step);
    assert!((restored.time().elapsed_secs - eng.time().elapsed_secs).abs() < 1e-9);

    let orig = eng.snapshot();
    let back = restored.snapshot();
    // Transient effects are not persisted; everything else must survive.
    let persisted = |o: &depthwatch_core::state::ObjectView| {
        !matches!(o.kind, EntityKind::WaterSplash | EntityKind::Particle)
    };
    assert_eq!(
        orig.objects.iter().filter(|o| persisted(o)).count(),
        back.objects.len()
    );

    // The player cross-reference survives by stable identifier.
    let player = restored.player().expect("player must be reconstructed");
    assert!(restored.is_alive(player));

    // Convoy membership survives.
    let convoy_members = eng
        .get_convoy(WorldEngine::id_of(convoy))
        .unwrap()
        .members
        .len();
    let restored_convoy = back
        .objects
        .iter()
        .find(|o| o.kind == EntityKind::Convoy)
        .expect("convoy must be restored");
    assert_eq!(
        restored.get_convoy(restored_convoy.id).unwrap().members.len(),
        convoy_members
    );
}

#[test]
fn test_save_round_trips_ship_fuel_and_torpedo_run() {
    let mut eng = engine();
    let ship = eng.spawn_ship(steady_ship(Position::new(10.0, 20.0, 0.0), 0.5, 4.0));
    {
        let mut dynamics = eng
            .world_mut()
            .get::<&mut ShipDynamics>(ship)
            .unwrap();
        dynamics.fuel_kg = 123_456.0;
    }
    eng.spawn_torpedo(TorpedoSpec {
        position: Position::new(0.0, 0.0, -3.0),
        heading: 1.0,
        allegiance: Allegiance::Friendly,
        set_speed_mps: 15.0,
        run_length_m: 2_345.0,
        arming_distance_m: 100.0,
        warhead: 120.0,
    });

    let save = persistence::save_game(&eng).unwrap();
    assert_eq!(save.ships.len(), 1);
    assert_eq!(save.ships[0].dynamics.fuel_kg, 123_456.0);
    assert_eq!(save.torpedoes.len(), 1);
    assert_eq!(save.torpedoes[0].run_length_m, 2_345.0);

    let restored = persistence::load_game(&save).unwrap();
    let back = persistence::save_game(&restored).unwrap();
    assert_eq!(back.ships[0].dynamics.fuel_kg, 123_456.0);
    assert_eq!(back.torpedoes[0].run_length_m, 2_345.0);
}

#[test]
fn test_save_version_mismatch_rejected() {
    let mut eng = engine();
    scenario::convoy_action(&mut eng).unwrap();
    let mut save = persistence::save_game(&eng).unwrap();
    save.version = SAVE_VERSION + 1;
    assert!(matches!(
        persistence::load_game(&save),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_malformed_save_rejected() {
    assert!(matches!(
        persistence::from_json("{ not json"),
        Err(SimError::InvalidConfig(_))
    ));
    assert!(matches!(
        persistence::from_json("{\"version\": 3}"),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_dead2_persisted_as_dead() {
    let mut eng = engine();
    let ship = eng.spawn_ship(steady_ship(Position::default(), 0.0, 0.0));
    systems::lifecycle::kill(eng.world_mut(), ship);
    eng.advance(0.05).unwrap();
    assert_eq!(
        eng.get_object(WorldEngine::id_of(ship)).unwrap().life_state,
        LifeState::Dead2
    );

    let save = persistence::save_game(&eng).unwrap();
    assert_eq!(save.ships.len(), 1);
    assert_eq!(save.ships[0].entity.life_state, LifeState::Dead);
}

#[test]
fn test_get_object_unknown_id_fails() {
    let eng = engine();
    assert!(matches!(
        eng.get_object(0xDEAD_BEEF),
        Err(SimError::InvalidReference(_))
    ));
}

#[test]
fn test_get_ship_rejects_wrong_kind() {
    let mut eng = engine();
    let convoy = scenario::convoy_action(&mut eng).unwrap();
    assert!(matches!(
        eng.get_ship(WorldEngine::id_of(convoy)),
        Err(SimError::InvalidReference(_))
    ));
    assert!(eng.get_convoy(WorldEngine::id_of(convoy)).is_ok());
}

#[test]
fn test_for_each_of_kind_partitions_the_store() {
    let mut eng = engine();
    scenario::convoy_action(&mut eng).unwrap();

    let mut ships = 0;
    eng.for_each_of_kind(EntityKind::Ship, |_| ships += 1);
    let mut subs = 0;
    eng.for_each_of_kind(EntityKind::Submarine, |_| subs += 1);
    let mut convoys = 0;
    eng.for_each_of_kind(EntityKind::Convoy, |_| convoys += 1);

    assert_eq!(ships, 6);
    assert_eq!(subs, 1);
    assert_eq!(convoys, 1);
}

// ---- Invariants ----

#[test]
fn test_player_of_unrecognized_kind_rejected() {
    let mut eng = engine();
    let splash = eng.spawn_splash(Position::default(), 3.0);
    assert!(matches!(
        eng.set_player(splash),
        Err(SimError::InvariantViolation(_))
    ));
}
