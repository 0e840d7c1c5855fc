//! Frame snapshot: the read-only state handed to the renderer/UI each frame.

use serde::{Deserialize, Serialize};

use crate::enums::{CameraPresetKind, NavigationPhase};
use crate::events::EngineEvent;
use crate::types::{CameraPose, CharacterState, GeoCoordinate, SimTime, ZoomScale};

/// Complete state broadcast after each frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub character: CharacterState,
    pub navigation: NavigationView,
    pub camera: CameraView,
    /// Latest smoothed position, if any fix was accepted.
    pub geo: Option<GeoCoordinate>,
    pub zoom: ZoomScale,
    /// Physics steps executed this frame.
    pub physics_steps: u32,
    pub events: Vec<EngineEvent>,
}

/// Navigation progress for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationView {
    pub phase: NavigationPhase,
    /// Fraction of waypoints passed (0.0 - 1.0).
    pub progress: f64,
    /// Approximation: total distance * (1 - progress).
    pub distance_remaining_m: f64,
    /// Approximation: total duration * (1 - progress).
    pub duration_remaining_s: f64,
    pub current_waypoint: usize,
    pub next_waypoint: usize,
    pub total_waypoints: usize,
    pub route_count: usize,
    pub selected_route: Option<usize>,
}

/// Camera pose plus active preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub pose: CameraPose,
    pub preset: CameraPresetKind,
}
