//! Fundamental geometric and simulation types.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = North, z = Up. Sea surface is z = 0; submerged depth is -z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in simulation space (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rigid-body orientation. Identity faces North with the deck level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation(pub DQuat);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Completed full steps (sub-steps count individually).
    pub step: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Range to another position in meters (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal range (ignoring depth/altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position in radians (0 = North, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).rem_euclid(std::f64::consts::TAU)
    }

    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    /// Depth below the surface in meters (0 for surfaced/airborne entities).
    pub fn depth(&self) -> f64 {
        (-self.z).max(0.0)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Horizontal speed (ignoring vertical component).
    pub fn horizontal_speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Heading in radians (0 = North, clockwise). Zero for a dead stop.
    pub fn heading(&self) -> f64 {
        if self.horizontal_speed() < 1e-9 {
            return 0.0;
        }
        self.x.atan2(self.y).rem_euclid(std::f64::consts::TAU)
    }

    /// Horizontal velocity from a compass heading and speed.
    pub fn from_heading(heading: f64, speed: f64) -> Self {
        Self {
            x: heading.sin() * speed,
            y: heading.cos() * speed,
            z: 0.0,
        }
    }

    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self(DQuat::IDENTITY)
    }
}

impl Orientation {
    /// Orientation for a compass heading (radians, 0 = North, clockwise),
    /// level deck. Positive heading rotates clockwise seen from above, which
    /// is a negative rotation about +Z.
    pub fn from_heading(heading: f64) -> Self {
        Self(DQuat::from_rotation_z(-heading))
    }

    /// Compass heading of the bow in radians.
    pub fn heading(&self) -> f64 {
        let bow = self.0 * DVec3::Y;
        bow.x.atan2(bow.y).rem_euclid(std::f64::consts::TAU)
    }

    pub fn quat(&self) -> DQuat {
        self.0
    }
}

impl SimTime {
    /// Advance by one completed step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.step += 1;
        self.elapsed_secs += dt;
    }
}
