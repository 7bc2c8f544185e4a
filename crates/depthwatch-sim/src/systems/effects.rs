//! Transient visual effects: water splashes and particles.
//!
//! Effects rise with a decaying rate and die when their lifetime runs out.

use hecs::World;

use depthwatch_core::components::EffectState;
use depthwatch_core::enums::LifeState;
use depthwatch_core::types::{Position, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (effect, pos, vel, life)) in world.query_mut::<(
        &mut EffectState,
        &mut Position,
        &mut Velocity,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            continue;
        }

        effect.age_secs += dt;
        if effect.age_secs >= effect.lifetime_secs {
            *life = LifeState::Dead;
            continue;
        }

        let progress = effect.age_secs / effect.lifetime_secs;
        vel.z = effect.rise_rate_mps * (1.0 - progress);
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
