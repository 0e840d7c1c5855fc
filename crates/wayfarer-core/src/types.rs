//! Fundamental geographic, world-frame and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LNG, MERCATOR_MAX_LAT};
use crate::error::EngineError;

/// A GPS fix in WGS-84 degrees.
///
/// Only `lng`/`lat` are required; the remaining fields are whatever the
/// location source reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lng: f64,
    pub lat: f64,
    /// Altitude above the ellipsoid (meters).
    #[serde(default)]
    pub altitude: f64,
    /// Horizontal accuracy radius (meters). 0 means unknown.
    #[serde(default)]
    pub accuracy: f64,
    /// Compass heading (degrees, 0 = North, clockwise).
    #[serde(default)]
    pub heading: Option<f64>,
    /// Ground speed (m/s).
    #[serde(default)]
    pub speed: Option<f64>,
    /// Milliseconds since the Unix epoch (or since session start for simulated fixes).
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl GeoCoordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            lng,
            lat,
            ..Default::default()
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_motion(mut self, heading: Option<f64>, speed: Option<f64>) -> Self {
        self.heading = heading;
        self.speed = speed;
        self
    }

    /// True if lng/lat are finite and inside the Web-Mercator domain.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-MAX_LNG..=MAX_LNG).contains(&self.lng)
            && (-MERCATOR_MAX_LAT..=MERCATOR_MAX_LAT).contains(&self.lat)
    }

    /// Reject out-of-range or non-numeric fixes.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(EngineError::InvalidCoordinate {
                lng: self.lng,
                lat: self.lat,
            })
        }
    }

    /// `[lng, lat]` pair, GeoJSON order.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Spherical Web-Mercator projection of a GeoCoordinate (meters, y = North).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
}

/// Position in the local simulation frame (world units).
/// x = East, y = Up, z = South. Origin = current map center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Distance to another position ignoring height.
    pub fn horizontal_distance_to(&self, other: &WorldPosition) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl From<DVec3> for WorldPosition {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<WorldPosition> for DVec3 {
    fn from(p: WorldPosition) -> Self {
        p.to_vec3()
    }
}

/// World-frame scale at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomScale {
    pub zoom: f64,
    /// World units per ground meter. Doubles with every zoom level.
    pub scale: f64,
}

impl ZoomScale {
    /// Meters represented by one world unit.
    pub fn meters_per_unit(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Render-facing snapshot of a controlled body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub position: WorldPosition,
    /// Facing (radians, 0 = North / -Z, clockwise, wrapped to [0, 2π)).
    pub heading: f64,
    pub is_moving: bool,
    pub is_grounded: bool,
    /// Horizontal speed (m/s).
    pub speed: f64,
}

/// Progress along the active route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub current_waypoint_index: usize,
    pub next_waypoint_index: usize,
    /// Fraction of waypoints passed (0.0 - 1.0).
    pub progress: f64,
    pub is_navigating: bool,
}

/// Camera position and look-at target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: WorldPosition,
    pub look_at: WorldPosition,
}

/// Frame-level time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Frame counter (increments once per orchestrator frame).
    pub frame: u64,
    /// Accumulated real time fed to the engine (seconds).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.frame += 1;
        self.elapsed_secs += dt;
    }

    pub fn elapsed_ms(&self) -> u64 {
        (self.elapsed_secs * 1000.0).round() as u64
    }
}

/// Wrap an angle to [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can return TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to` in (-π, π].
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(std::f64::consts::TAU);
    if delta > std::f64::consts::PI {
        delta - std::f64::consts::TAU
    } else {
        delta
    }
}

/// Unit horizontal direction for a heading (0 = -Z, π/2 = +X).
pub fn heading_to_direction(heading: f64) -> DVec3 {
    DVec3::new(heading.sin(), 0.0, -heading.cos())
}

/// Heading of a horizontal direction vector. Zero vectors map to 0.
pub fn direction_to_heading(dir: DVec3) -> f64 {
    if dir.x == 0.0 && dir.z == 0.0 {
        return 0.0;
    }
    wrap_angle(dir.x.atan2(-dir.z))
}
