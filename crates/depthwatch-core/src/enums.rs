//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// The closed set of entity kinds. Every spawned entity carries exactly one
/// kind tag; collision and detection policy branch on it instead of any
/// runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Submarine,
    Torpedo,
    DepthCharge,
    GunShell,
    WaterSplash,
    Airplane,
    Convoy,
    Particle,
}

impl EntityKind {
    /// Weapons never collide with each other in the pairwise pass.
    pub fn is_weapon(&self) -> bool {
        matches!(
            self,
            EntityKind::Torpedo | EntityKind::DepthCharge | EntityKind::GunShell
        )
    }
}

/// Entity life state. Transitions are monotonic:
/// `Alive -> Dead -> Dead2 -> Defunct`, one stage per full simulation round.
///
/// `Dead2` is the grace round: entities that took a reference to the victim
/// during the round it died still observe a valid, inert object. Only
/// `Defunct` entities may be removed from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
    Dead2,
    Defunct,
}

impl LifeState {
    /// Gameplay liveness — only `Alive` entities act, collide, or are
    /// reported by sensors.
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeState::Alive)
    }

    /// Reference safety — anything short of `Defunct` may still be looked up.
    pub fn is_reference_safe(&self) -> bool {
        !matches!(self, LifeState::Defunct)
    }

    /// One end-of-round aging step. `Alive` is unaffected.
    pub fn aged(&self) -> LifeState {
        match self {
            LifeState::Alive => LifeState::Alive,
            LifeState::Dead => LifeState::Dead2,
            LifeState::Dead2 => LifeState::Defunct,
            LifeState::Defunct => LifeState::Defunct,
        }
    }
}

/// Which side an entity fights for. Terminal conditions look for the
/// nearest `Hostile` relative to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allegiance {
    Friendly,
    Hostile,
    #[default]
    Neutral,
}

/// Sensor channel types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    Lookout,
    Radar,
    ActiveSonar,
    PassiveSonar,
}

/// Pointing behavior of a directional sensor array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepMode {
    /// Array stays on its commanded bearing.
    Fixed,
    /// Array steps around the compass one increment per activation.
    #[default]
    Rotating,
}

/// Gun shell caliber class, carried on gunfire events so the presentation
/// layer can pick the right report sound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellCaliber {
    Light,
    #[default]
    Medium,
    Heavy,
}

/// Rough classification a sonar contact is reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactClass {
    Surface,
    Submarine,
    Torpedo,
}

/// Top-level world run state, re-evaluated at the end of every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Running,
    /// The player entity was destroyed.
    PlayerLost,
    /// No hostile remains within the contact-loss radius of the player.
    ContactLost,
}
