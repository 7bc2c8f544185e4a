//! Simulation engine — the core of the game.
//!
//! `WorldEngine` owns the hecs ECS world, advances it by bounded fixed
//! steps, runs periodic jobs, resolves collisions, and answers sensor
//! queries over the current entity snapshot. Completely headless, enabling
//! deterministic testing.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use depthwatch_core::components::{
    Kind, SensorSuite, ShipDynamics, SubDepthControl,
};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{EntityKind, LifeState, RunState, SensorKind, ShellCaliber};
use depthwatch_core::errors::{SimError, SimResult};
use depthwatch_core::events::SimEvent;
use depthwatch_core::state::{
    ActiveContact, ConvoyView, ObjectView, PassiveContact, ShipView, WorldSnapshot,
};
use depthwatch_core::types::{Orientation, Position, SimTime, Velocity};

use crate::environment::SeaEnvironment;
use crate::jobs::{self, Job, JobKind};
use crate::sensors::passive::{self, ContactShortlist};
use crate::sensors::visual::{self, SightingReport};
use crate::sensors::{active, radar};
use crate::spawn::{self, *};
use crate::systems;
use crate::systems::convoy::ConvoyMembers;

/// Configuration for starting a new simulation world.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Sea state in 0..1.
    pub sea_state: f64,
    pub wind_speed_mps: f64,
    /// World clock at start, seconds since midnight.
    pub start_clock_secs: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sea_state: 0.2,
            wind_speed_mps: 5.0,
            start_clock_secs: DAY_LENGTH_SECS * 0.5,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct WorldEngine {
    world: World,
    time: SimTime,
    env: SeaEnvironment,
    run_state: RunState,
    rng: ChaCha8Rng,
    seed: u64,
    events: Vec<SimEvent>,
    jobs: Vec<Job>,
    player: Option<Entity>,
    nearest_hostile_m: Option<f64>,
    stepping: bool,
    despawn_buffer: Vec<Entity>,
}

impl WorldEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            env: SeaEnvironment {
                sea_state: config.sea_state,
                wind_speed_mps: config.wind_speed_mps,
                clock_secs: config.start_clock_secs,
            },
            run_state: RunState::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            events: Vec::new(),
            jobs: jobs::default_jobs(),
            player: None,
            nearest_hostile_m: None,
            stepping: false,
            despawn_buffer: Vec::new(),
        }
    }

    // --- Stepping ---

    /// Advance the whole world by `delta_secs`.
    ///
    /// Deltas above the integration ceiling are subdivided into equal
    /// sub-steps and advanced recursively, bounding integration error and
    /// preventing tunnelling through thin colliders at low frame rates.
    /// Re-entering from inside a step is an invariant violation.
    pub fn advance(&mut self, delta_secs: f64) -> SimResult<()> {
        if self.stepping {
            return Err(SimError::InvariantViolation(
                "advance re-entered while a step is in progress".into(),
            ));
        }
        if !(delta_secs > 0.0) {
            return Ok(());
        }

        self.stepping = true;
        // The queue holds exactly the events of one advance call.
        self.events.clear();
        let result = self.advance_split(delta_secs);
        self.stepping = false;
        result
    }

    fn advance_split(&mut self, delta_secs: f64) -> SimResult<()> {
        if delta_secs > MAX_STEP_SECS {
            let substeps = (delta_secs / MAX_STEP_SECS).ceil() as u32;
            let sub = delta_secs / substeps as f64;
            for _ in 0..substeps {
                self.single_step(sub)?;
            }
            return Ok(());
        }
        self.single_step(delta_secs)
    }

    /// One full simulation round.
    fn single_step(&mut self, dt: f64) -> SimResult<()> {
        // 1. Periodic jobs.
        self.run_due_jobs(dt);

        // 2. Entities that finished dying in a prior round vacate the
        //    store before anything touches them again.
        systems::lifecycle::sweep(&mut self.world, &mut self.despawn_buffer);

        // 3. Per-kind physics. No kind observes another kind's same-step
        //    post-update state: cross-kind effects only flow through the
        //    collision pass and the lifecycle grace round.
        systems::surface::run(&mut self.world, dt);
        systems::submerged::run(&mut self.world, dt);
        systems::weapons::run_torpedoes(&mut self.world, dt);
        systems::weapons::run_depth_charges(&mut self.world, dt, &mut self.events);
        systems::weapons::run_shells(&mut self.world, dt, &mut self.events);
        systems::aircraft::run(&mut self.world, dt);
        systems::convoy::run(&mut self.world, dt);
        systems::effects::run(&mut self.world, dt);

        // 4. Global pairwise collision pass (also tracks the nearest
        //    hostile as a side value of its collect scan).
        self.nearest_hostile_m =
            systems::collision::run(&mut self.world, &mut self.events, self.player);

        // 5. Everyone killed this round starts the grace countdown.
        systems::lifecycle::age(&mut self.world);

        // 6. Clocks.
        self.time.advance(dt);
        self.env.advance(dt);

        // 7. Terminal conditions.
        self.evaluate_run_state();
        Ok(())
    }

    fn run_due_jobs(&mut self, dt: f64) {
        // Jobs are fired outside the borrow of the job list itself.
        let mut due: Vec<JobKind> = Vec::new();
        for job in &mut self.jobs {
            for _ in 0..job.accumulate(dt) {
                due.push(job.kind);
            }
        }
        for kind in due {
            match kind {
                JobKind::SonarContactRefresh => self.refresh_sonar_shortlists(),
                JobKind::LookoutScan => self.refresh_sighting_reports(),
                JobKind::ConvoyCompaction => systems::convoy::compact(&mut self.world),
            }
        }
    }

    fn refresh_sonar_shortlists(&mut self) {
        let listeners: Vec<(Entity, Position)> = self
            .world
            .query::<(&Position, &SensorSuite, &LifeState)>()
            .iter()
            .filter(|(_, (_, suite, life))| {
                life.is_alive() && suite.get(SensorKind::PassiveSonar).is_some()
            })
            .map(|(e, (pos, _, _))| (e, *pos))
            .collect();

        for (listener, pos) in listeners {
            let shortlist = passive::build_shortlist(&self.world, listener, &pos);
            let _ = self.world.insert_one(listener, shortlist);
        }
    }

    fn refresh_sighting_reports(&mut self) {
        let lookouts: Vec<Entity> = self
            .world
            .query::<(&SensorSuite, &LifeState)>()
            .iter()
            .filter(|(_, (suite, life))| {
                life.is_alive() && suite.get(SensorKind::Lookout).is_some()
            })
            .map(|(e, _)| e)
            .collect();

        for observer in lookouts {
            let sighted = visual::run_scan(&self.world, &self.env, observer);
            let _ = self
                .world
                .insert_one(observer, SightingReport { sighted });
        }
    }

    fn evaluate_run_state(&mut self) {
        if self.run_state != RunState::Running {
            return;
        }
        if let Some(player) = self.player {
            let player_alive = self
                .world
                .get::<&LifeState>(player)
                .map(|life| life.is_alive())
                .unwrap_or(false);
            if !player_alive {
                log::info!("player destroyed; simulation over");
                self.run_state = RunState::PlayerLost;
                return;
            }
            let nearest = self.nearest_hostile_m.unwrap_or(f64::INFINITY);
            if nearest > CONTACT_LOSS_RANGE {
                log::info!("no hostile within {CONTACT_LOSS_RANGE} m; contact lost");
                self.run_state = RunState::ContactLost;
            }
        }
    }

    // --- Spawning ---

    pub fn spawn_ship(&mut self, spec: ShipSpec) -> Entity {
        let entity = spawn::spawn_ship(&mut self.world, spec);
        log::debug!("spawned ship {entity:?}");
        entity
    }

    pub fn spawn_submarine(&mut self, spec: SubmarineSpec) -> Entity {
        let entity = spawn::spawn_submarine(&mut self.world, spec);
        log::debug!("spawned submarine {entity:?}");
        entity
    }

    /// Launch a torpedo; records the launch for presentation.
    pub fn spawn_torpedo(&mut self, spec: TorpedoSpec) -> Entity {
        let position = spec.position;
        let entity = spawn::spawn_torpedo(&mut self.world, spec);
        self.events.push(SimEvent::TorpedoLaunch { position });
        log::debug!("torpedo away: {entity:?}");
        entity
    }

    pub fn spawn_depth_charge(&mut self, spec: DepthChargeSpec) -> Entity {
        spawn::spawn_depth_charge(&mut self.world, spec)
    }

    /// Fire a gun: spawns the shell and records the muzzle report.
    pub fn spawn_shell(&mut self, spec: ShellSpec) -> Entity {
        let position = spec.position;
        let caliber = spec.caliber;
        let entity = spawn::spawn_shell(&mut self.world, spec);
        self.events.push(SimEvent::GunFire { position, caliber });
        entity
    }

    pub fn spawn_airplane(&mut self, spec: AirplaneSpec) -> Entity {
        spawn::spawn_airplane(&mut self.world, spec)
    }

    pub fn spawn_convoy(&mut self, spec: ConvoySpec) -> Entity {
        spawn::spawn_convoy(&mut self.world, spec)
    }

    pub fn spawn_splash(&mut self, position: Position, lifetime_secs: f64) -> Entity {
        spawn::spawn_splash(&mut self.world, position, lifetime_secs)
    }

    pub fn spawn_particle(&mut self, position: Position, lifetime_secs: f64) -> Entity {
        spawn::spawn_particle(&mut self.world, position, lifetime_secs)
    }

    /// Mark an entity as the player's. Only crewed kinds qualify.
    pub fn set_player(&mut self, entity: Entity) -> SimResult<()> {
        let kind = self
            .world
            .get::<&Kind>(entity)
            .map(|k| k.0)
            .map_err(|_| SimError::InvalidReference(format!("{entity:?}")))?;
        if !matches!(kind, EntityKind::Ship | EntityKind::Submarine) {
            return Err(SimError::InvariantViolation(format!(
                "player entity must be a ship or submarine, not {kind:?}"
            )));
        }
        self.player = Some(entity);
        Ok(())
    }

    // --- Accessors ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn environment(&self) -> &SeaEnvironment {
        &self.env
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Events generated by the most recent `advance` call (plus anything
    /// fired between steps). Drained by the presentation layer once per
    /// rendered frame; the next `advance` clears them.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Stable identifier of an entity handle.
    pub fn id_of(entity: Entity) -> u64 {
        entity.to_bits().get()
    }

    /// Resolve a stable identifier back to a live reference.
    ///
    /// Fails for unknown identifiers and for entities that have reached
    /// `Defunct` (the store may not have swept them yet, but references to
    /// them are already invalid).
    pub fn resolve(&self, id: u64) -> SimResult<Entity> {
        let entity = Entity::from_bits(id)
            .ok_or_else(|| SimError::InvalidReference(format!("malformed id {id}")))?;
        let life = self
            .world
            .get::<&LifeState>(entity)
            .map_err(|_| SimError::InvalidReference(format!("unknown id {id}")))?;
        if !life.is_reference_safe() {
            return Err(SimError::InvalidReference(format!("id {id} is defunct")));
        }
        Ok(entity)
    }

    /// Common view of any object, by stable identifier.
    pub fn get_object(&self, id: u64) -> SimResult<ObjectView> {
        let entity = self.resolve(id)?;
        self.object_view(entity)
            .ok_or_else(|| SimError::InvalidReference(format!("id {id} has no object state")))
    }

    /// Ship or submarine view, by stable identifier.
    pub fn get_ship(&self, id: u64) -> SimResult<ShipView> {
        let entity = self.resolve(id)?;
        let object = self
            .object_view(entity)
            .ok_or_else(|| SimError::InvalidReference(format!("id {id} has no object state")))?;
        if !matches!(object.kind, EntityKind::Ship | EntityKind::Submarine) {
            return Err(SimError::InvalidReference(format!(
                "id {id} is a {:?}, not a ship",
                object.kind
            )));
        }
        let dynamics = self
            .world
            .get::<&ShipDynamics>(entity)
            .map_err(|_| SimError::InvalidReference(format!("id {id} has no dynamics")))?;
        Ok(ShipView {
            object,
            throttle: dynamics.throttle,
            rudder: dynamics.rudder,
            speed_mps: dynamics.speed_mps,
            fuel_kg: dynamics.fuel_kg,
        })
    }

    /// Convoy view, by stable identifier.
    pub fn get_convoy(&self, id: u64) -> SimResult<ConvoyView> {
        let entity = self.resolve(id)?;
        let object = self
            .object_view(entity)
            .ok_or_else(|| SimError::InvalidReference(format!("id {id} has no object state")))?;
        if object.kind != EntityKind::Convoy {
            return Err(SimError::InvalidReference(format!(
                "id {id} is a {:?}, not a convoy",
                object.kind
            )));
        }
        let members = self
            .world
            .get::<&ConvoyMembers>(entity)
            .map_err(|_| SimError::InvalidReference(format!("id {id} has no member list")))?;
        let route = self
            .world
            .get::<&depthwatch_core::components::ConvoyRoute>(entity)
            .map_err(|_| SimError::InvalidReference(format!("id {id} has no route")))?;
        Ok(ConvoyView {
            object,
            waypoint: route.waypoint,
            members: members.members.iter().map(|&m| Self::id_of(m)).collect(),
        })
    }

    /// Visit every reference-safe entity of one kind.
    pub fn for_each_of_kind(&self, kind: EntityKind, mut f: impl FnMut(&ObjectView)) {
        for (entity, (k, pos, vel, orient, life)) in self
            .world
            .query::<(&Kind, &Position, &Velocity, &Orientation, &LifeState)>()
            .iter()
        {
            if k.0 != kind || !life.is_reference_safe() {
                continue;
            }
            f(&ObjectView {
                id: Self::id_of(entity),
                kind: k.0,
                position: *pos,
                velocity: *vel,
                heading: orient.heading(),
                life_state: *life,
            });
        }
    }

    fn object_view(&self, entity: Entity) -> Option<ObjectView> {
        let mut q = self
            .world
            .query_one::<(&Kind, &Position, &Velocity, &Orientation, &LifeState)>(entity)
            .ok()?;
        let (kind, pos, vel, orient, life) = q.get()?;
        Some(ObjectView {
            id: Self::id_of(entity),
            kind: kind.0,
            position: *pos,
            velocity: *vel,
            heading: orient.heading(),
            life_state: *life,
        })
    }

    // --- Sensor queries ---

    /// Everything the observer's lookouts can currently see.
    pub fn visible_objects_of(&self, observer: Entity) -> Vec<ObjectView> {
        visual::run_scan(&self.world, &self.env, observer)
            .into_iter()
            .filter_map(|e| self.object_view(e))
            .collect()
    }

    /// Everything the observer's radar currently paints.
    pub fn radar_contacts_of(&self, observer: Entity) -> Vec<ObjectView> {
        radar::scan(&self.world, observer)
            .into_iter()
            .filter_map(|e| self.object_view(e))
            .collect()
    }

    /// Fire one active sonar ping. Always records a ping event if the
    /// observer carries the sensor; the contact list may be empty.
    pub fn ping_active_sonar(&mut self, observer: Entity) -> Vec<ActiveContact> {
        active::ping(&mut self.world, &mut self.rng, &mut self.events, observer)
    }

    /// Listen on the observer's passive array.
    pub fn sonar_contacts_of(&self, observer: Entity) -> Vec<PassiveContact> {
        // Use the job-refreshed shortlist when present; build one on the
        // fly for observers queried before their first refresh.
        if let Ok(shortlist) = self.world.get::<&ContactShortlist>(observer) {
            return passive::listen(&self.world, &self.env, observer, &shortlist);
        }
        let pos = match self.world.get::<&Position>(observer) {
            Ok(p) => *p,
            Err(_) => return Vec::new(),
        };
        let shortlist = passive::build_shortlist(&self.world, observer, &pos);
        passive::listen(&self.world, &self.env, observer, &shortlist)
    }

    /// Build a complete snapshot of the current world state.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.run_state,
            self.events.clone(),
            self.nearest_hostile_m,
        )
    }

    // --- Persistence hooks (see persistence.rs) ---

    pub(crate) fn time_mut(&mut self) -> &mut SimTime {
        &mut self.time
    }

    /// Fire a shell with full control over the muzzle event caliber.
    /// Convenience used by AI layers; equivalent to `spawn_shell`.
    pub fn fire_gun(
        &mut self,
        position: Position,
        velocity: Velocity,
        caliber: ShellCaliber,
        warhead: f64,
        allegiance: depthwatch_core::enums::Allegiance,
    ) -> Entity {
        self.spawn_shell(ShellSpec {
            position,
            velocity,
            allegiance,
            caliber,
            warhead,
        })
    }

    /// Whether an entity currently exists and is gameplay-alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&LifeState>(entity)
            .map(|life| life.is_alive())
            .unwrap_or(false)
    }

    /// Direct periscope control for the player's boat.
    pub fn set_periscope(&mut self, entity: Entity, raised: bool) -> SimResult<()> {
        let mut dc = self
            .world
            .get::<&mut SubDepthControl>(entity)
            .map_err(|_| SimError::InvalidReference(format!("{entity:?} is not a submarine")))?;
        dc.periscope_raised = raised;
        Ok(())
    }
}
