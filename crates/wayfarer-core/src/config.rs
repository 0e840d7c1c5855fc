//! Engine configuration, fixed at construction.
//!
//! Every section deserializes with defaults so a partial JSON file is valid.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::CameraPresetKind;
use crate::error::EngineError;
use crate::types::GeoCoordinate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub coordinates: CoordinateConfig,
    pub location: LocationConfig,
    pub navigation: NavigationConfig,
    pub camera: CameraConfig,
    pub character: CharacterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation step (seconds).
    pub fixed_step: f64,
    /// Gravity magnitude (m/s²), applied along -Y.
    pub gravity: f64,
    /// Catch-up cap per frame call.
    pub max_substeps: u32,
    /// Absolute floor for all bodies.
    pub min_y: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            gravity: DEFAULT_GRAVITY,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            min_y: DEFAULT_MIN_Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateConfig {
    pub smoothing_enabled: bool,
    /// Weight of the raw sample in the EMA (0, 1].
    pub smoothing_alpha: f64,
    /// Degrees below which a position counts as unchanged.
    pub change_threshold_deg: f64,
    pub initial_center: GeoCoordinate,
    pub initial_zoom: f64,
    /// Zoom at which one world unit is one ground meter.
    pub reference_zoom: f64,
    /// Floating-origin recenter distance (ground meters). 0 disables.
    pub recenter_distance_m: f64,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            smoothing_enabled: true,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            change_threshold_deg: DEFAULT_CHANGE_THRESHOLD_DEG,
            initial_center: GeoCoordinate::default(),
            initial_zoom: DEFAULT_ZOOM,
            reference_zoom: DEFAULT_REFERENCE_ZOOM,
            recenter_distance_m: DEFAULT_RECENTER_DISTANCE_M,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub update_interval_ms: u64,
    /// Fixes with accuracy worse than this (meters) are discarded.
    pub min_accuracy_m: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_GPS_INTERVAL_MS,
            min_accuracy_m: DEFAULT_MIN_ACCURACY_M,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Waypoint arrival radius (meters).
    pub waypoint_threshold_m: f64,
    /// Minimum interval between proximity checks (milliseconds).
    pub check_interval_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            waypoint_threshold_m: DEFAULT_WAYPOINT_THRESHOLD_M,
            check_interval_ms: DEFAULT_NAV_CHECK_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub preset: CameraPresetKind,
    /// Overrides the preset's smoothing speed when set.
    pub smoothing_speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub walk_speed: f64,
    pub sprint_speed: f64,
    pub jump_impulse: f64,
    /// Critically-damped turn smoothing time (seconds).
    pub turn_smooth_time: f64,
    pub mass: f64,
    /// Horizontal velocity retention per fixed step, [0, 1].
    pub friction: f64,
    pub max_velocity: f64,
    pub radius: f64,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            walk_speed: DEFAULT_WALK_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            turn_smooth_time: DEFAULT_TURN_SMOOTH_TIME,
            mass: DEFAULT_BODY_MASS,
            friction: DEFAULT_BODY_FRICTION,
            max_velocity: DEFAULT_MAX_VELOCITY,
            radius: DEFAULT_BODY_RADIUS,
        }
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), EngineError> {
    if condition {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(message.to_string()))
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let p = &self.physics;
        ensure(
            p.fixed_step.is_finite() && p.fixed_step > 0.0,
            "physics.fixed_step must be > 0",
        )?;
        ensure(p.gravity.is_finite(), "physics.gravity must be finite")?;
        ensure(p.max_substeps >= 1, "physics.max_substeps must be >= 1")?;

        let c = &self.coordinates;
        ensure(
            c.smoothing_alpha > 0.0 && c.smoothing_alpha <= 1.0,
            "coordinates.smoothing_alpha must be in (0, 1]",
        )?;
        ensure(
            c.change_threshold_deg >= 0.0,
            "coordinates.change_threshold_deg must be >= 0",
        )?;
        ensure(
            (MIN_ZOOM..=MAX_ZOOM).contains(&c.initial_zoom),
            "coordinates.initial_zoom must be in [0, 24]",
        )?;
        ensure(
            (MIN_ZOOM..=MAX_ZOOM).contains(&c.reference_zoom),
            "coordinates.reference_zoom must be in [0, 24]",
        )?;
        ensure(
            c.initial_center.is_valid(),
            "coordinates.initial_center is out of range",
        )?;
        ensure(
            c.recenter_distance_m >= 0.0,
            "coordinates.recenter_distance_m must be >= 0",
        )?;

        ensure(
            self.location.min_accuracy_m > 0.0,
            "location.min_accuracy_m must be > 0",
        )?;
        ensure(
            self.navigation.waypoint_threshold_m > 0.0,
            "navigation.waypoint_threshold_m must be > 0",
        )?;

        if let Some(speed) = self.camera.smoothing_speed {
            ensure(
                speed > 0.0 && speed <= 1.0,
                "camera.smoothing_speed must be in (0, 1]",
            )?;
        }

        let ch = &self.character;
        ensure(ch.mass > 0.0, "character.mass must be > 0")?;
        ensure(
            (0.0..=1.0).contains(&ch.friction),
            "character.friction must be in [0, 1]",
        )?;
        ensure(ch.max_velocity > 0.0, "character.max_velocity must be > 0")?;
        ensure(ch.radius >= 0.0, "character.radius must be >= 0")?;
        ensure(
            ch.walk_speed >= 0.0 && ch.sprint_speed >= ch.walk_speed,
            "character.sprint_speed must be >= walk_speed >= 0",
        )?;
        ensure(
            ch.turn_smooth_time > 0.0,
            "character.turn_smooth_time must be > 0",
        )?;
        Ok(())
    }
}
