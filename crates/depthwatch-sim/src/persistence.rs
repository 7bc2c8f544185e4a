//! Save/load: serialize the world to a `SaveGame` document and rebuild a
//! world from one.
//!
//! Round-trips every attribute the core owns. The transient `Dead2` grace
//! state is written as `Dead` (a loaded world re-runs the grace round);
//! `Defunct` entities are not written at all. Cross-references (player,
//! convoy membership) are stitched back together through the saved stable
//! identifiers; any dangling identifier aborts the load before a world is
//! returned.

use std::collections::HashMap;

use hecs::Entity;

use depthwatch_core::components::*;
use depthwatch_core::constants::SAVE_VERSION;
use depthwatch_core::enums::{Allegiance, EntityKind, LifeState};
use depthwatch_core::errors::{SimError, SimResult};
use depthwatch_core::save::*;
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::engine::{SimConfig, WorldEngine};
use crate::spawn::*;
use crate::systems::convoy::ConvoyMembers;

/// Serialize a save document to JSON.
pub fn to_json(save: &SaveGame) -> SimResult<String> {
    serde_json::to_string_pretty(save)
        .map_err(|e| SimError::InvalidConfig(format!("serializing save: {e}")))
}

/// Parse a save document from JSON. Malformed documents are rejected here,
/// before any world construction begins.
pub fn from_json(json: &str) -> SimResult<SaveGame> {
    serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(format!("parsing save: {e}")))
}

/// Capture the current world into a save document.
pub fn save_game(engine: &WorldEngine) -> SimResult<SaveGame> {
    let world = engine.world();

    // The player reference must be savable before anything is written.
    let player = match engine.player() {
        Some(p) => {
            let kind = world
                .get::<&Kind>(p)
                .map_err(|_| {
                    SimError::InvariantViolation("player entity missing from store".into())
                })?
                .0;
            if !matches!(kind, EntityKind::Ship | EntityKind::Submarine) {
                return Err(SimError::InvariantViolation(format!(
                    "player entity is of no savable kind: {kind:?}"
                )));
            }
            Some(WorldEngine::id_of(p))
        }
        None => None,
    };

    let mut save = SaveGame {
        version: SAVE_VERSION,
        seed: engine.seed(),
        clock_secs: engine.environment().clock_secs,
        elapsed_secs: engine.time().elapsed_secs,
        step: engine.time().step,
        sea_state: engine.environment().sea_state,
        wind_speed_mps: engine.environment().wind_speed_mps,
        player,
        ships: Vec::new(),
        submarines: Vec::new(),
        torpedoes: Vec::new(),
        depth_charges: Vec::new(),
        shells: Vec::new(),
        airplanes: Vec::new(),
        convoys: Vec::new(),
    };

    for (entity, (kind, pos, orient, vel, life, allegiance, damage)) in world
        .query::<(
            &Kind,
            &Position,
            &Orientation,
            &Velocity,
            &LifeState,
            &Allegiance,
            &Damage,
        )>()
        .iter()
    {
        let record = match persisted_life(*life) {
            Some(life_state) => EntityRecord {
                id: WorldEngine::id_of(entity),
                position: *pos,
                heading: orient.heading(),
                velocity: *vel,
                life_state,
                allegiance: *allegiance,
                damage_points: damage.points,
            },
            None => continue,
        };

        match kind.0 {
            EntityKind::Ship => {
                let (hull, dynamics, signature, sensors) = ship_parts(world, entity)?;
                save.ships.push(ShipRecord {
                    entity: record,
                    hull,
                    dynamics,
                    signature,
                    sensors,
                });
            }
            EntityKind::Submarine => {
                let (hull, dynamics, signature, sensors) = ship_parts(world, entity)?;
                let depth_control = *world.get::<&SubDepthControl>(entity).map_err(|_| {
                    SimError::InvariantViolation("submarine without depth control".into())
                })?;
                save.submarines.push(SubmarineRecord {
                    ship: ShipRecord {
                        entity: record,
                        hull,
                        dynamics,
                        signature,
                        sensors,
                    },
                    depth_control,
                });
            }
            EntityKind::Torpedo => {
                let state = *world.get::<&TorpedoState>(entity).map_err(|_| {
                    SimError::InvariantViolation("torpedo without run state".into())
                })?;
                save.torpedoes.push(TorpedoRecord {
                    entity: record,
                    run_length_m: state.run_length_m,
                    arming_distance_m: state.arming_distance_m,
                    set_speed_mps: state.set_speed_mps,
                    warhead: state.warhead,
                });
            }
            EntityKind::DepthCharge => {
                let state = *world.get::<&DepthChargeState>(entity).map_err(|_| {
                    SimError::InvariantViolation("depth charge without fuse state".into())
                })?;
                save.depth_charges.push(DepthChargeRecord {
                    entity: record,
                    detonation_depth_m: state.detonation_depth_m,
                    sink_rate_mps: state.sink_rate_mps,
                    warhead: state.warhead,
                });
            }
            EntityKind::GunShell => {
                let state = *world.get::<&ShellState>(entity).map_err(|_| {
                    SimError::InvariantViolation("shell without state".into())
                })?;
                save.shells.push(ShellRecord {
                    entity: record,
                    caliber: state.caliber,
                    warhead: state.warhead,
                });
            }
            EntityKind::Airplane => {
                let state = *world.get::<&AirplaneState>(entity).map_err(|_| {
                    SimError::InvariantViolation("airplane without cruise state".into())
                })?;
                let hull = *world.get::<&HullProfile>(entity).map_err(|_| {
                    SimError::InvariantViolation("airplane without hull".into())
                })?;
                let sensors = world
                    .get::<&SensorSuite>(entity)
                    .map(|s| (*s).clone())
                    .unwrap_or_default();
                save.airplanes.push(AirplaneRecord {
                    entity: record,
                    hull,
                    cruise_altitude_m: state.cruise_altitude_m,
                    cruise_speed_mps: state.cruise_speed_mps,
                    sensors,
                });
            }
            // Transient effects are not persisted.
            EntityKind::WaterSplash | EntityKind::Particle | EntityKind::Convoy => {}
        }
    }

    // Convoys carry entity cross-references; saved through stable ids.
    for (entity, (kind, pos, orient, vel, life, allegiance, route, members)) in world
        .query::<(
            &Kind,
            &Position,
            &Orientation,
            &Velocity,
            &LifeState,
            &Allegiance,
            &ConvoyRoute,
            &ConvoyMembers,
        )>()
        .iter()
    {
        debug_assert_eq!(kind.0, EntityKind::Convoy);
        let life_state = match persisted_life(*life) {
            Some(l) => l,
            None => continue,
        };
        save.convoys.push(ConvoyRecord {
            entity: EntityRecord {
                id: WorldEngine::id_of(entity),
                position: *pos,
                heading: orient.heading(),
                velocity: *vel,
                life_state,
                allegiance: *allegiance,
                damage_points: 0.0,
            },
            waypoint: route.waypoint,
            cruise_speed_mps: route.cruise_speed_mps,
            members: members
                .members
                .iter()
                .map(|&m| WorldEngine::id_of(m))
                .collect(),
        });
    }

    Ok(save)
}

/// Rebuild a world from a save document.
pub fn load_game(save: &SaveGame) -> SimResult<WorldEngine> {
    if save.version != SAVE_VERSION {
        return Err(SimError::InvalidConfig(format!(
            "save version {} does not match supported version {SAVE_VERSION}",
            save.version
        )));
    }

    let mut engine = WorldEngine::new(SimConfig {
        seed: save.seed,
        sea_state: save.sea_state,
        wind_speed_mps: save.wind_speed_mps,
        start_clock_secs: save.clock_secs,
    });
    engine.time_mut().elapsed_secs = save.elapsed_secs;
    engine.time_mut().step = save.step;

    let mut id_map: HashMap<u64, Entity> = HashMap::new();

    for record in &save.ships {
        let entity = engine.spawn_ship(ShipSpec {
            position: record.entity.position,
            heading: record.entity.heading,
            allegiance: record.entity.allegiance,
            hull: record.hull,
            dynamics: record.dynamics,
            signature: record.signature,
            sensors: record.sensors.clone(),
        });
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    for record in &save.submarines {
        let entity = engine.spawn_submarine(SubmarineSpec {
            ship: ShipSpec {
                position: record.ship.entity.position,
                heading: record.ship.entity.heading,
                allegiance: record.ship.entity.allegiance,
                hull: record.ship.hull,
                dynamics: record.ship.dynamics,
                signature: record.ship.signature,
                sensors: record.ship.sensors.clone(),
            },
            depth_control: record.depth_control,
        });
        restore_entity(&mut engine, entity, &record.ship.entity);
        id_map.insert(record.ship.entity.id, entity);
    }

    for record in &save.torpedoes {
        let entity = spawn_torpedo(
            engine.world_mut(),
            TorpedoSpec {
                position: record.entity.position,
                heading: record.entity.heading,
                allegiance: record.entity.allegiance,
                set_speed_mps: record.set_speed_mps,
                run_length_m: record.run_length_m,
                arming_distance_m: record.arming_distance_m,
                warhead: record.warhead,
            },
        );
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    for record in &save.depth_charges {
        let entity = engine.spawn_depth_charge(DepthChargeSpec {
            position: record.entity.position,
            allegiance: record.entity.allegiance,
            detonation_depth_m: record.detonation_depth_m,
            sink_rate_mps: record.sink_rate_mps,
            warhead: record.warhead,
        });
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    for record in &save.shells {
        let entity = spawn_shell(
            engine.world_mut(),
            ShellSpec {
                position: record.entity.position,
                velocity: record.entity.velocity,
                allegiance: record.entity.allegiance,
                caliber: record.caliber,
                warhead: record.warhead,
            },
        );
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    for record in &save.airplanes {
        let entity = engine.spawn_airplane(AirplaneSpec {
            position: record.entity.position,
            heading: record.entity.heading,
            allegiance: record.entity.allegiance,
            hull: record.hull,
            cruise_altitude_m: record.cruise_altitude_m,
            cruise_speed_mps: record.cruise_speed_mps,
            sensors: record.sensors.clone(),
        });
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    for record in &save.convoys {
        let members = record
            .members
            .iter()
            .map(|id| {
                id_map.get(id).copied().ok_or_else(|| {
                    SimError::InvalidConfig(format!("convoy references unknown entity id {id}"))
                })
            })
            .collect::<SimResult<Vec<Entity>>>()?;
        let entity = engine.spawn_convoy(ConvoySpec {
            position: record.entity.position,
            waypoint: record.waypoint,
            cruise_speed_mps: record.cruise_speed_mps,
            allegiance: record.entity.allegiance,
            members,
        });
        restore_entity(&mut engine, entity, &record.entity);
        id_map.insert(record.entity.id, entity);
    }

    if let Some(player_id) = save.player {
        let player = id_map.get(&player_id).copied().ok_or_else(|| {
            SimError::InvalidConfig(format!("save references unknown player id {player_id}"))
        })?;
        engine.set_player(player)?;
    }

    log::info!(
        "loaded world: {} ship(s), {} submarine(s), {} convoy(s), step {}",
        save.ships.len(),
        save.submarines.len(),
        save.convoys.len(),
        save.step
    );
    Ok(engine)
}

/// `Dead2` is written as `Dead`; `Defunct` is not written at all.
fn persisted_life(life: LifeState) -> Option<LifeState> {
    match life {
        LifeState::Alive => Some(LifeState::Alive),
        LifeState::Dead | LifeState::Dead2 => Some(LifeState::Dead),
        LifeState::Defunct => None,
    }
}

/// Overwrite the freshly spawned entity's state with the saved values the
/// spawn specs do not carry.
fn restore_entity(engine: &mut WorldEngine, entity: Entity, record: &EntityRecord) {
    let world = engine.world_mut();
    let _ = world.insert_one(entity, record.life_state);
    let _ = world.insert_one(entity, record.velocity);
    let _ = world.insert_one(
        entity,
        Damage {
            points: record.damage_points,
        },
    );
}

fn ship_parts(
    world: &hecs::World,
    entity: Entity,
) -> SimResult<(HullProfile, ShipDynamics, NoiseSignature, SensorSuite)> {
    let hull = *world
        .get::<&HullProfile>(entity)
        .map_err(|_| SimError::InvariantViolation("ship without hull profile".into()))?;
    let dynamics = *world
        .get::<&ShipDynamics>(entity)
        .map_err(|_| SimError::InvariantViolation("ship without dynamics".into()))?;
    let signature = *world
        .get::<&NoiseSignature>(entity)
        .map_err(|_| SimError::InvariantViolation("ship without noise signature".into()))?;
    let sensors = world
        .get::<&SensorSuite>(entity)
        .map(|s| (*s).clone())
        .map_err(|_| SimError::InvariantViolation("ship without sensor suite".into()))?;
    Ok((hull, dynamics, signature, sensors))
}
