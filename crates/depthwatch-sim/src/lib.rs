//! Simulation engine for DEPTHWATCH.
//!
//! Owns the hecs ECS world, advances it by bounded fixed steps, resolves
//! bounding-volume collisions, and answers sensor queries over the current
//! entity snapshot.

pub mod bv;
pub mod engine;
pub mod environment;
pub mod jobs;
pub mod noise;
pub mod persistence;
pub mod scenario;
pub mod sensors;
pub mod spawn;
pub mod systems;

pub use depthwatch_core as core;
pub use engine::{SimConfig, WorldEngine};

#[cfg(test)]
mod tests;
