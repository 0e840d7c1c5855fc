//! Engine constants and tuning defaults.

// --- Geodesy ---

/// Mean Earth radius in meters (Haversine sphere).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS-84 semi-major axis in meters (spherical Web-Mercator radius).
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the Web-Mercator projection (degrees).
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Longitude limit (degrees).
pub const MAX_LNG: f64 = 180.0;

/// Zoom range accepted by the coordinate system.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 24.0;

// --- Coordinate system ---

/// Default EMA weight of a fresh GPS sample.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.15;

/// Positional delta (degrees, ~1 m) below which a fix is "unchanged".
pub const DEFAULT_CHANGE_THRESHOLD_DEG: f64 = 1e-5;

/// Default map zoom level.
pub const DEFAULT_ZOOM: f64 = 17.0;

/// Zoom level at which one world unit equals one ground meter.
pub const DEFAULT_REFERENCE_ZOOM: f64 = 17.0;

/// Distance from the map center (meters) that triggers a floating-origin recenter.
pub const DEFAULT_RECENTER_DISTANCE_M: f64 = 500.0;

// --- Physics ---

/// Fixed simulation step (seconds).
pub const DEFAULT_FIXED_STEP: f64 = 1.0 / 60.0;

/// Gravity magnitude (m/s²), applied along -Y.
pub const DEFAULT_GRAVITY: f64 = 9.81;

/// Maximum fixed steps per frame call before excess time is discarded.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Floor below which no body may fall, even with the ground clamp disabled.
pub const DEFAULT_MIN_Y: f64 = -100.0;

/// Tolerance when comparing the accumulator against the fixed step.
pub const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// Per-body force scratch capacity per fixed step.
pub const MAX_FORCES_PER_STEP: usize = 8;

// --- Character ---

pub const DEFAULT_WALK_SPEED: f64 = 4.0;
pub const DEFAULT_SPRINT_SPEED: f64 = 8.0;
pub const DEFAULT_JUMP_IMPULSE: f64 = 5.0;
pub const DEFAULT_TURN_SMOOTH_TIME: f64 = 0.12;
pub const DEFAULT_BODY_MASS: f64 = 1.0;
pub const DEFAULT_BODY_FRICTION: f64 = 0.9;
pub const DEFAULT_MAX_VELOCITY: f64 = 20.0;
pub const DEFAULT_BODY_RADIUS: f64 = 0.5;

/// Horizontal speed (m/s) above which a character counts as moving.
pub const MOVING_SPEED_THRESHOLD: f64 = 0.1;

// --- Location ---

/// Default GPS polling interval (milliseconds).
pub const DEFAULT_GPS_INTERVAL_MS: u64 = 1000;

/// Fixes with a worse accuracy radius (meters) are discarded.
pub const DEFAULT_MIN_ACCURACY_M: f64 = 100.0;

// --- Navigation ---

/// Waypoint arrival radius (meters).
pub const DEFAULT_WAYPOINT_THRESHOLD_M: f64 = 5.0;

/// Minimum interval between waypoint proximity checks (milliseconds).
pub const DEFAULT_NAV_CHECK_INTERVAL_MS: u64 = 250;

// --- Camera ---

/// Look-at blend toward the look-ahead point while moving.
pub const CAMERA_MOVING_LOOK_BLEND: f64 = 0.6;

/// Look-at blend toward the look-ahead point while stationary.
pub const CAMERA_IDLE_LOOK_BLEND: f64 = 0.3;

/// Default exponential smoothing factor per camera update.
pub const DEFAULT_CAMERA_SMOOTHING: f64 = 0.08;
