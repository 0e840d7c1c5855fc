//! Navigation camera: follows the character and looks where it is going.
//!
//! The target pose is recomputed every frame from the character state and an
//! optional look-ahead point (the next waypoint). The actual pose chases the
//! target with exponential smoothing, position and look-at independently, so
//! preset switches and waypoint changes never cut.

use glam::DVec3;
use tracing::info;

use wayfarer_core::constants::{
    CAMERA_IDLE_LOOK_BLEND, CAMERA_MOVING_LOOK_BLEND, DEFAULT_CAMERA_SMOOTHING,
};
use wayfarer_core::enums::CameraPresetKind;
use wayfarer_core::events::CameraEvent;
use wayfarer_core::types::{heading_to_direction, CameraPose, CharacterState, WorldPosition};

/// Named camera parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub kind: CameraPresetKind,
    /// Distance behind the character along its heading.
    pub distance: f64,
    /// Height above the character.
    pub height: f64,
    /// Distance of the look-ahead point in front of the character.
    pub look_ahead: f64,
    /// Sideways offset while moving (to the character's right).
    pub lateral_offset: f64,
    /// Fraction of the remaining gap closed per update, (0, 1].
    pub smoothing_speed: f64,
}

impl CameraPreset {
    pub fn for_kind(kind: CameraPresetKind) -> Self {
        match kind {
            CameraPresetKind::FirstPerson => CameraPreset {
                kind,
                distance: 0.1,
                height: 1.7,
                look_ahead: 10.0,
                lateral_offset: 0.0,
                smoothing_speed: 0.25,
            },
            CameraPresetKind::ThirdPerson => CameraPreset {
                kind,
                distance: 8.0,
                height: 4.0,
                look_ahead: 6.0,
                lateral_offset: 1.0,
                smoothing_speed: DEFAULT_CAMERA_SMOOTHING,
            },
            CameraPresetKind::Cinematic => CameraPreset {
                kind,
                distance: 15.0,
                height: 8.0,
                look_ahead: 12.0,
                lateral_offset: 2.5,
                smoothing_speed: 0.03,
            },
            CameraPresetKind::Mobile => CameraPreset {
                kind,
                distance: 10.0,
                height: 6.0,
                look_ahead: 5.0,
                lateral_offset: 0.5,
                smoothing_speed: 0.12,
            },
        }
    }
}

pub struct NavigationCamera {
    preset: CameraPreset,
    smoothing_override: Option<f64>,
    position: DVec3,
    look_at: DVec3,
    target_position: DVec3,
    target_look_at: DVec3,
    initialized: bool,
    events: Vec<CameraEvent>,
}

impl NavigationCamera {
    pub fn new(kind: CameraPresetKind) -> Self {
        Self {
            preset: CameraPreset::for_kind(kind),
            smoothing_override: None,
            position: DVec3::ZERO,
            look_at: DVec3::ZERO,
            target_position: DVec3::ZERO,
            target_look_at: DVec3::ZERO,
            initialized: false,
            events: Vec::new(),
        }
    }

    /// Pin the smoothing speed regardless of preset.
    pub fn with_smoothing(mut self, smoothing_speed: Option<f64>) -> Self {
        self.smoothing_override = smoothing_speed.filter(|s| s.is_finite() && *s > 0.0);
        self
    }

    /// Swap parameter sets. The pose is not snapped; smoothing carries it over.
    pub fn set_preset(&mut self, kind: CameraPresetKind) -> bool {
        if kind == self.preset.kind {
            return false;
        }
        self.preset = CameraPreset::for_kind(kind);
        info!(preset = kind.as_str(), "camera preset changed");
        self.events.push(CameraEvent::PresetChanged { preset: kind });
        true
    }

    pub fn preset(&self) -> CameraPreset {
        self.preset
    }

    pub fn smoothing_speed(&self) -> f64 {
        self.smoothing_override
            .unwrap_or(self.preset.smoothing_speed)
            .clamp(f64::EPSILON, 1.0)
    }

    /// Recompute the target from `character` and move the pose toward it.
    /// `look_target` is the next waypoint in world space, if navigating.
    pub fn update(&mut self, character: &CharacterState, look_target: Option<WorldPosition>) {
        let origin = character.position.to_vec3();
        let facing = heading_to_direction(character.heading);

        let look_dir = look_target
            .map(|t| {
                let d = t.to_vec3() - origin;
                DVec3::new(d.x, 0.0, d.z)
            })
            .filter(|d| d.length_squared() > 1e-12)
            .map(|d| d.normalize())
            .unwrap_or(facing);
        let look_ahead_point = origin + look_dir * self.preset.look_ahead;

        let mut position = origin - facing * self.preset.distance + DVec3::Y * self.preset.height;
        if character.is_moving {
            let right = DVec3::new(-facing.z, 0.0, facing.x);
            position += right * self.preset.lateral_offset;
        }

        let blend = if character.is_moving {
            CAMERA_MOVING_LOOK_BLEND
        } else {
            CAMERA_IDLE_LOOK_BLEND
        };
        self.target_position = position;
        self.target_look_at = origin.lerp(look_ahead_point, blend);

        if !self.initialized {
            self.position = self.target_position;
            self.look_at = self.target_look_at;
            self.initialized = true;
            return;
        }

        let s = self.smoothing_speed();
        self.position += (self.target_position - self.position) * s;
        self.look_at += (self.target_look_at - self.look_at) * s;
    }

    /// Jump straight to the current target.
    pub fn snap(&mut self) {
        self.position = self.target_position;
        self.look_at = self.target_look_at;
        self.events.push(CameraEvent::Snapped);
    }

    /// Follow a floating-origin shift of the world.
    pub fn shift_origin(&mut self, offset: DVec3) {
        let shift = DVec3::new(offset.x, 0.0, offset.z);
        self.position -= shift;
        self.look_at -= shift;
        self.target_position -= shift;
        self.target_look_at -= shift;
    }

    /// Follow a horizontal rescale of the world (zoom change).
    pub fn rescale(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let scale = DVec3::new(factor, 1.0, factor);
        self.position *= scale;
        self.look_at *= scale;
        self.target_position *= scale;
        self.target_look_at *= scale;
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.into(),
            look_at: self.look_at.into(),
        }
    }

    pub fn target(&self) -> CameraPose {
        CameraPose {
            position: self.target_position.into(),
            look_at: self.target_look_at.into(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.events)
    }
}
