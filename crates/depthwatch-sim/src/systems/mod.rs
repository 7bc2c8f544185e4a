//! Systems that operate on the simulation world each step.
//!
//! Systems are free functions taking `&mut World` (or `&World` for
//! read-only passes). They own no state; everything lives in components
//! or in the engine.

pub mod aircraft;
pub mod collision;
pub mod convoy;
pub mod damage;
pub mod effects;
pub mod lifecycle;
pub mod snapshot;
pub mod submerged;
pub mod surface;
pub mod weapons;
