//! Acoustic noise and signature model.
//!
//! Pure functions from an entity's speed/cavitation state and the ambient
//! sea state to per-frequency-band emission and reception strengths. All
//! combination happens in the linear power domain; decibels only appear at
//! the edges (signature definitions and the final thresholding step).

use depthwatch_core::components::{NoiseBand, NoiseSignature};
use depthwatch_core::constants::*;

/// dB -> linear power.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Linear power -> dB. Clamped away from zero so silence stays finite.
pub fn linear_to_db(linear: f64) -> f64 {
    10.0 * linear.max(1e-12).log10()
}

/// Source level of one band for an entity moving at `speed_mps`.
pub fn band_source_db(sig: &NoiseSignature, band: usize, speed_mps: f64, cavitating: bool) -> f64 {
    let b = sig.bands[band];
    let mut db = b.base_db + b.speed_db_per_mps * speed_mps.abs();
    if cavitating {
        db += CAVITATION_BONUS_DB;
    }
    db
}

/// One-way transmission loss over `range_m` in a band: spherical spreading
/// plus band-dependent absorption.
pub fn transmission_loss_db(range_m: f64, band: usize) -> f64 {
    let r = range_m.max(1.0);
    20.0 * r.log10() + BAND_ABSORPTION_DB_PER_M[band] * r
}

/// Total received strength of one source across all bands, in the linear
/// domain, after transmission loss and the receiving array's gain.
pub fn received_linear(
    sig: &NoiseSignature,
    speed_mps: f64,
    cavitating: bool,
    range_m: f64,
    array_gain: f64,
) -> f64 {
    let mut sum = 0.0;
    for band in 0..NOISE_BAND_COUNT {
        let level = band_source_db(sig, band, speed_mps, cavitating)
            - transmission_loss_db(range_m, band);
        sum += db_to_linear(level);
    }
    sum * array_gain
}

/// Ambient sea noise for a sea state in 0..1 (dB).
pub fn ambient_noise_db(sea_state: f64) -> f64 {
    AMBIENT_NOISE_BASE_DB + AMBIENT_NOISE_SEA_STATE_DB * sea_state.clamp(0.0, 1.0)
}

/// The listening platform's own flow and machinery noise (dB).
pub fn self_noise_db(own_speed_mps: f64) -> f64 {
    SELF_NOISE_BASE_DB + SELF_NOISE_DB_PER_MPS * own_speed_mps.abs()
}

// --- Class signatures ---
//
// Band order: low, mid, high, ultra. Merchants rumble in the low bands;
// turbine warships and torpedoes push the upper bands.

pub fn merchant_signature() -> NoiseSignature {
    NoiseSignature {
        bands: [
            NoiseBand { base_db: 120.0, speed_db_per_mps: 2.0 },
            NoiseBand { base_db: 112.0, speed_db_per_mps: 1.6 },
            NoiseBand { base_db: 100.0, speed_db_per_mps: 1.2 },
            NoiseBand { base_db: 85.0, speed_db_per_mps: 0.8 },
        ],
    }
}

pub fn warship_signature() -> NoiseSignature {
    NoiseSignature {
        bands: [
            NoiseBand { base_db: 112.0, speed_db_per_mps: 1.8 },
            NoiseBand { base_db: 114.0, speed_db_per_mps: 1.8 },
            NoiseBand { base_db: 108.0, speed_db_per_mps: 1.5 },
            NoiseBand { base_db: 95.0, speed_db_per_mps: 1.0 },
        ],
    }
}

pub fn submarine_signature() -> NoiseSignature {
    NoiseSignature {
        bands: [
            NoiseBand { base_db: 88.0, speed_db_per_mps: 2.2 },
            NoiseBand { base_db: 84.0, speed_db_per_mps: 2.0 },
            NoiseBand { base_db: 78.0, speed_db_per_mps: 1.6 },
            NoiseBand { base_db: 70.0, speed_db_per_mps: 1.2 },
        ],
    }
}

pub fn torpedo_signature() -> NoiseSignature {
    NoiseSignature {
        bands: [
            NoiseBand { base_db: 85.0, speed_db_per_mps: 1.0 },
            NoiseBand { base_db: 95.0, speed_db_per_mps: 1.4 },
            NoiseBand { base_db: 105.0, speed_db_per_mps: 1.8 },
            NoiseBand { base_db: 100.0, speed_db_per_mps: 1.8 },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_round_trip() {
        for db in [0.0, 10.0, 43.5, 90.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-9, "{db} came back as {back}");
        }
    }

    #[test]
    fn test_source_level_monotonic_in_speed() {
        let sig = merchant_signature();
        for band in 0..NOISE_BAND_COUNT {
            let slow = band_source_db(&sig, band, 3.0, false);
            let fast = band_source_db(&sig, band, 9.0, false);
            assert!(fast > slow, "band {band} must grow with speed");
        }
    }

    #[test]
    fn test_cavitation_adds_level() {
        let sig = submarine_signature();
        let quiet = band_source_db(&sig, 0, 8.0, false);
        let loud = band_source_db(&sig, 0, 8.0, true);
        assert!((loud - quiet - CAVITATION_BONUS_DB).abs() < 1e-9);
    }

    #[test]
    fn test_transmission_loss_grows_with_range() {
        for band in 0..NOISE_BAND_COUNT {
            let near = transmission_loss_db(500.0, band);
            let far = transmission_loss_db(8_000.0, band);
            assert!(far > near);
        }
    }

    #[test]
    fn test_higher_bands_absorb_faster() {
        let low = transmission_loss_db(10_000.0, 0);
        let ultra = transmission_loss_db(10_000.0, NOISE_BAND_COUNT - 1);
        assert!(ultra > low);
    }

    #[test]
    fn test_received_monotonic_in_speed_and_range() {
        let sig = merchant_signature();
        let base = received_linear(&sig, 5.0, false, 4_000.0, 1.0);
        let faster = received_linear(&sig, 10.0, false, 4_000.0, 1.0);
        let farther = received_linear(&sig, 5.0, false, 8_000.0, 1.0);
        assert!(faster > base);
        assert!(farther < base);
    }

    #[test]
    fn test_ambient_tracks_sea_state() {
        assert!(ambient_noise_db(0.8) > ambient_noise_db(0.1));
        // Clamped outside the 0..1 range.
        assert_eq!(ambient_noise_db(2.0), ambient_noise_db(1.0));
    }
}
