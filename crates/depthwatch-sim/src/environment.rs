//! Sea and sky environment.
//!
//! Light geometry is a pure function of the world clock; nothing here is
//! owned by a rendering layer. The environment is injected into the engine
//! at construction and advanced with the world clock each step.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use depthwatch_core::constants::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeaEnvironment {
    /// Sea state in 0..1 (0 = flat calm, 1 = full storm).
    pub sea_state: f64,
    pub wind_speed_mps: f64,
    /// Wall clock within the simulated day, seconds since midnight
    /// (keeps counting past a day; all consumers take it modulo day length).
    pub clock_secs: f64,
}

impl SeaEnvironment {
    pub fn advance(&mut self, dt: f64) {
        self.clock_secs += dt;
    }

    /// Overall ambient brightness in 0..1 at the current clock.
    pub fn brightness(&self) -> f64 {
        ambient_brightness(self.clock_secs)
    }

    pub fn ambient_noise_db(&self) -> f64 {
        crate::noise::ambient_noise_db(self.sea_state)
    }
}

/// Normalized sun elevation in -1..1 (-1 nadir, 0 horizon, 1 zenith).
/// Midnight is clock 0; the sun peaks at half a day.
pub fn sun_elevation(clock_secs: f64) -> f64 {
    let day_frac = (clock_secs / DAY_LENGTH_SECS).rem_euclid(1.0);
    (TAU * (day_frac - 0.25)).sin()
}

/// Normalized moon elevation: opposite phase to the sun.
pub fn moon_elevation(clock_secs: f64) -> f64 {
    -sun_elevation(clock_secs)
}

/// Ambient brightness from sun, moon and starlight, in 0..1.
pub fn ambient_brightness(clock_secs: f64) -> f64 {
    let sun = sun_elevation(clock_secs).max(0.0);
    let moon = moon_elevation(clock_secs).max(0.0) * MOON_BRIGHTNESS;
    (sun + moon + STARLIGHT_BRIGHTNESS).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOON: f64 = DAY_LENGTH_SECS * 0.5;
    const MIDNIGHT: f64 = 0.0;

    #[test]
    fn test_sun_peaks_at_noon() {
        assert!((sun_elevation(NOON) - 1.0).abs() < 1e-9);
        assert!((sun_elevation(MIDNIGHT) + 1.0).abs() < 1e-9);
        // Horizon at 06:00 and 18:00.
        assert!(sun_elevation(DAY_LENGTH_SECS * 0.25).abs() < 1e-9);
        assert!(sun_elevation(DAY_LENGTH_SECS * 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_brightness_day_vs_night() {
        let day = ambient_brightness(NOON);
        let night = ambient_brightness(MIDNIGHT);
        assert!(day > 0.9);
        assert!(night < 0.1);
        // Starlight keeps night above absolute zero.
        assert!(night > 0.0);
    }

    #[test]
    fn test_clock_wraps_across_days() {
        let b0 = ambient_brightness(NOON);
        let b1 = ambient_brightness(NOON + DAY_LENGTH_SECS * 3.0);
        assert!((b0 - b1).abs() < 1e-9);
    }
}
