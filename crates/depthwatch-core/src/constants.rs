//! Simulation constants and tuning parameters.

/// Longest single integration step (seconds). `advance` subdivides anything
/// larger into equal sub-steps at or below this ceiling.
pub const MAX_STEP_SECS: f64 = 1.0 / 20.0;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

// --- Terminal conditions ---

/// If the nearest hostile is farther than this from the player, the
/// engagement is over (meters).
pub const CONTACT_LOSS_RANGE: f64 = 40_000.0;

// --- Periodic jobs ---

/// Passive sonar contact shortlist refresh period (seconds).
pub const JOB_SONAR_REFRESH_SECS: f64 = 0.5;

/// Lookout scan period (seconds).
pub const JOB_LOOKOUT_SCAN_SECS: f64 = 1.0;

/// Convoy membership compaction period (seconds).
pub const JOB_CONVOY_COMPACT_SECS: f64 = 5.0;

// --- Visual lookout ---

/// Visibility distance against a reference-size target in full daylight (meters).
pub const VISUAL_BASE_RANGE: f64 = 12_000.0;

/// Reference broadside cross-section the base range is calibrated to (m²).
pub const VISUAL_REFERENCE_CROSS_SECTION: f64 = 1_500.0;

/// Cross-section multiplier for a submarine at periscope depth.
pub const PERISCOPE_CROSS_SECTION_FACTOR: f64 = 0.01;

/// Depth (meters) below which a submerged hull shows nothing at all.
pub const VISUAL_MAX_HULL_DEPTH: f64 = 8.0;

// --- Radar ---

/// Maximum radar detection range (meters).
pub const RADAR_MAX_RANGE: f64 = 20_000.0;

/// Radar equation calibration constant: return == 1.0 for a 100 m² target
/// at maximum range.
pub const RADAR_K: f64 =
    RADAR_MAX_RANGE * RADAR_MAX_RANGE * RADAR_MAX_RANGE * RADAR_MAX_RANGE / 100.0;

/// Minimum normalized return treated as a detection.
pub const RADAR_DETECTION_THRESHOLD: f64 = 1.0;

// --- Active sonar ---

/// Maximum active sonar range (meters).
pub const ACTIVE_SONAR_MAX_RANGE: f64 = 3_500.0;

/// Half-angle of the active sonar cone (radians, ~15°).
pub const ACTIVE_SONAR_CONE_HALF_ANGLE: f64 = 0.26;

/// Bearing step a rotating array takes between pings (radians, ~20°).
pub const ACTIVE_SONAR_SWEEP_STEP: f64 = 0.35;

/// Positional fix error as a fraction of range, per horizontal axis.
pub const ACTIVE_SONAR_FIX_ERROR: f64 = 0.02;

// --- Passive sonar / noise model ---

/// Number of acoustic frequency bands in the noise model.
pub const NOISE_BAND_COUNT: usize = 4;

/// Per-band absorption coefficients (dB per meter). Higher bands die faster.
pub const BAND_ABSORPTION_DB_PER_M: [f64; NOISE_BAND_COUNT] =
    [0.000_02, 0.000_1, 0.000_5, 0.002_0];

/// Receiver sensitivity offset used by the dB quantization (dB).
pub const RECEIVER_SENSITIVITY_DB: f64 = 10.0;

/// Ambient noise at sea state 0 (dB).
pub const AMBIENT_NOISE_BASE_DB: f64 = 60.0;

/// Additional ambient noise across the sea-state range 0..1 (dB).
pub const AMBIENT_NOISE_SEA_STATE_DB: f64 = 30.0;

/// Observer self-noise floor (dB) plus per-m/s growth with own speed.
pub const SELF_NOISE_BASE_DB: f64 = 50.0;
pub const SELF_NOISE_DB_PER_MPS: f64 = 2.0;

/// Extra broadband source level while cavitating (dB).
pub const CAVITATION_BONUS_DB: f64 = 12.0;

/// Speed above which a shallow propeller cavitates (m/s).
pub const CAVITATION_SPEED: f64 = 6.0;

/// Depth (meters) below which ambient pressure suppresses cavitation.
pub const CAVITATION_SUPPRESSION_DEPTH: f64 = 40.0;

/// Fixed capacity of a passive sonar contact shortlist.
pub const SONAR_SHORTLIST_CAP: usize = 12;

/// Candidates beyond this range are not considered by passive sonar (meters).
pub const PASSIVE_SONAR_MAX_RANGE: f64 = 30_000.0;

/// Fraction of the forward-gain kept by a hydrophone array's back lobe.
pub const HYDROPHONE_BACK_LOBE: f64 = 0.1;

// --- Collision response ---

/// Restitution at zero closing speed.
pub const RESTITUTION_BASE: f64 = 0.5;

/// Restitution floor for violent impacts.
pub const RESTITUTION_MIN: f64 = 0.05;

/// Closing speed (m/s) at which restitution has fallen halfway to the floor.
pub const RESTITUTION_HALF_SPEED: f64 = 4.0;

/// Hull damage per m/s of closing speed above the harmless threshold.
pub const RAM_DAMAGE_PER_MPS: f64 = 8.0;

/// Closing speeds below this do no ramming damage (m/s).
pub const RAM_DAMAGE_THRESHOLD: f64 = 2.0;

// --- Weapons ---

/// Torpedo safety run before the fuse arms (meters).
pub const TORPEDO_ARMING_DISTANCE: f64 = 250.0;

/// Depth charge lethal radius (meters).
pub const DEPTH_CHARGE_LETHAL_RADIUS: f64 = 30.0;

/// Depth tolerance within which a depth charge hurts at full effect (meters).
pub const DEPTH_CHARGE_DEPTH_TOLERANCE: f64 = 15.0;

// --- Environment ---

/// Seconds in a simulated day.
pub const DAY_LENGTH_SECS: f64 = 86_400.0;

/// Brightness contribution of a full moon relative to the sun.
pub const MOON_BRIGHTNESS: f64 = 0.05;

/// Starlight floor so night is never absolute zero.
pub const STARLIGHT_BRIGHTNESS: f64 = 0.002;

// --- Persistence ---

/// Save document version accepted by the loader.
pub const SAVE_VERSION: u32 = 3;
