//! Simulation constants and tuning parameters.

// --- Earth ---

/// Earth gravitational parameter (m^3/s^2).
pub const MU_EARTH: f64 = 3.986_004_418e14;

/// Earth rotation rate (rad/s). GMST is taken as zero at t = 0.
pub const OMEGA_EARTH: f64 = 7.292_115_9e-5;

/// Mean Earth radius in meters (spherical great-circle math).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS-84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

// --- Atmosphere / flight ---

/// Standard gravity (m/s^2).
pub const G0: f64 = 9.806_65;

/// Specific gas constant for air (J/(kg·K)).
pub const R_AIR: f64 = 287.058;

/// Ratio of specific heats for air.
pub const GAMMA_AIR: f64 = 1.4;

/// Sea-level standard temperature (K).
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15;

/// Sea-level standard pressure (Pa).
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

/// Sea-level standard density (kg/m^3).
pub const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Minimum controllable airspeed — post-step clamp floor (m/s).
pub const MIN_AIRSPEED: f64 = 50.0;

/// Flight-path angle clamp (radians, ±80°).
pub const MAX_FLIGHT_PATH_ANGLE: f64 = 80.0 * std::f64::consts::PI / 180.0;

/// Mach number above which wave drag is added.
pub const WAVE_DRAG_ONSET_MACH: f64 = 0.85;

/// Wave drag scale factor: Cd += scale * (M - onset)^2.
pub const WAVE_DRAG_SCALE: f64 = 0.1;

/// Throttle setting above which afterburner thrust is used.
pub const AFTERBURNER_THROTTLE: f64 = 0.95;

/// Thrust lapse exponent: T = throttle * T_base * (rho/rho0)^exp.
pub const THRUST_LAPSE_EXPONENT: f64 = 0.7;

// --- Kepler solver ---

/// Newton iteration tolerance for Kepler's equation (radians).
pub const KEPLER_TOLERANCE: f64 = 1e-12;

/// Newton iteration cap for Kepler's equation.
pub const KEPLER_MAX_ITERATIONS: u32 = 20;

// --- Waypoint / intercept steering ---

/// Great-circle distance at which a waypoint counts as reached (meters).
pub const WAYPOINT_ARRIVAL_RADIUS: f64 = 2_000.0;

/// Bank angle command clamp (radians, ~40°).
pub const MAX_BANK_COMMAND: f64 = 0.7;

/// Angle-of-attack command clamp for altitude tracking (radians).
pub const MAX_ALPHA_COMMAND: f64 = 0.15;

/// Floor altitude an interceptor will chase a non-flight target down to (m).
pub const INTERCEPT_MIN_ALTITUDE: f64 = 500.0;

// --- SAM kill chain phase timers (seconds) ---

/// Detect phase duration.
pub const SAM_DETECT_TIME: f64 = 1.0;

/// Track phase duration.
pub const SAM_TRACK_TIME: f64 = 2.0;

/// Battle-damage-assessment phase duration.
pub const SAM_ASSESS_TIME: f64 = 3.0;

/// Targets below this altitude are not engageable by a SAM (meters).
pub const SAM_MIN_TARGET_ALTITUDE: f64 = 100.0;

// --- A2A kill chain ---

/// Battle-damage-assessment phase duration (seconds).
pub const A2A_ASSESS_TIME: f64 = 2.0;

// --- Monte-Carlo runner ---

/// Engagement-log harvest interval (ticks).
pub const HARVEST_INTERVAL_TICKS: u64 = 200;
