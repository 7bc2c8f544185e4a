//! Weapon flight: torpedo runs, sinking depth charges, ballistic shells.

use hecs::{Entity, World};

use depthwatch_core::components::{DepthChargeState, Kind, ShellState, SubDepthControl, TorpedoState};
use depthwatch_core::constants::*;
use depthwatch_core::enums::{EntityKind, LifeState};
use depthwatch_core::events::SimEvent;
use depthwatch_core::types::{Orientation, Position, Velocity};

use crate::systems::{damage, lifecycle};

/// Straight-running torpedoes: constant set speed along the launch
/// heading at constant depth. The fish dies quietly when its run is spent.
pub fn run_torpedoes(world: &mut World, dt: f64) {
    for (_entity, (state, pos, vel, orient, life)) in world.query_mut::<(
        &mut TorpedoState,
        &mut Position,
        &mut Velocity,
        &Orientation,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            *vel = Velocity::default();
            continue;
        }

        let travel = state.set_speed_mps * dt;
        state.run_length_m -= travel;
        state.arming_distance_m = (state.arming_distance_m - travel).max(0.0);

        let heading = orient.heading();
        let horizontal = Velocity::from_heading(heading, state.set_speed_mps);
        vel.x = horizontal.x;
        vel.y = horizontal.y;
        vel.z = 0.0;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;

        if state.run_length_m <= 0.0 {
            log::debug!("torpedo run exhausted, sinking");
            *life = LifeState::Dead;
        }
    }
}

/// Depth charges sink at their set rate and burst at the fuse depth,
/// damaging anything submerged nearby.
pub fn run_depth_charges(world: &mut World, dt: f64, events: &mut Vec<SimEvent>) {
    let mut bursts: Vec<(Position, f64)> = Vec::new();

    for (_entity, (state, pos, vel, life)) in world.query_mut::<(
        &DepthChargeState,
        &mut Position,
        &mut Velocity,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            continue;
        }
        vel.z = -state.sink_rate_mps;
        pos.z += vel.z * dt;

        if pos.depth() >= state.detonation_depth_m {
            bursts.push((*pos, state.warhead));
            *life = LifeState::Dead;
        }
    }

    for (burst_pos, warhead) in bursts {
        events.push(SimEvent::Explosion {
            position: burst_pos,
        });
        log::debug!(
            "depth charge burst at depth {:.0} m",
            burst_pos.depth()
        );
        apply_burst_damage(world, &burst_pos, warhead, events);
    }
}

/// Inverse-square falloff damage to submerged hulls near a burst.
fn apply_burst_damage(
    world: &mut World,
    burst: &Position,
    warhead: f64,
    events: &mut Vec<SimEvent>,
) {
    let mut victims: Vec<(Entity, f64)> = Vec::new();
    for (entity, (kind, pos, life, _depth)) in world
        .query::<(&Kind, &Position, &LifeState, &SubDepthControl)>()
        .iter()
    {
        debug_assert_eq!(kind.0, EntityKind::Submarine);
        if !life.is_alive() {
            continue;
        }
        let range = burst.range_to(pos);
        let depth_miss = (burst.depth() - pos.depth()).abs();
        if range > DEPTH_CHARGE_LETHAL_RADIUS || depth_miss > DEPTH_CHARGE_DEPTH_TOLERANCE * 2.0 {
            continue;
        }
        let closeness = 1.0 - range / DEPTH_CHARGE_LETHAL_RADIUS;
        victims.push((entity, warhead * closeness * closeness));
    }
    for (entity, amount) in victims {
        damage::apply(world, entity, amount, events);
    }
}

/// Ballistic shell flight under gravity; a water impact splashes and
/// removes the shell. Direct hull hits are resolved by the collision pass.
pub fn run_shells(world: &mut World, dt: f64, events: &mut Vec<SimEvent>) {
    let mut splashes: Vec<Position> = Vec::new();

    for (_entity, (_shell, pos, vel, life)) in world.query_mut::<(
        &ShellState,
        &mut Position,
        &mut Velocity,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            continue;
        }
        vel.z -= GRAVITY * dt;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;

        if pos.z <= 0.0 && vel.z < 0.0 {
            pos.z = 0.0;
            splashes.push(*pos);
            *life = LifeState::Dead;
        }
    }

    for position in splashes {
        events.push(SimEvent::Splash { position });
    }
}

/// Detonate a weapon against a target the collision pass matched it with.
/// Unarmed torpedoes are duds.
pub fn impact(
    world: &mut World,
    weapon: Entity,
    weapon_kind: EntityKind,
    target: Entity,
    contact: Position,
    events: &mut Vec<SimEvent>,
) {
    let warhead = match weapon_kind {
        EntityKind::Torpedo => match world.get::<&TorpedoState>(weapon) {
            Ok(state) if state.is_armed() => Some(state.warhead),
            Ok(_) => None,
            Err(_) => None,
        },
        EntityKind::DepthCharge => world.get::<&DepthChargeState>(weapon).ok().map(|s| s.warhead),
        EntityKind::GunShell => world.get::<&ShellState>(weapon).ok().map(|s| s.warhead),
        _ => None,
    };

    lifecycle::kill(world, weapon);

    match warhead {
        Some(points) => {
            events.push(SimEvent::Explosion { position: contact });
            damage::apply(world, target, points, events);
        }
        None => {
            log::debug!("dud {weapon_kind:?} impact on {target:?}");
        }
    }
}
