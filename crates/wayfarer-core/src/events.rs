//! Events emitted by the engine components and re-broadcast by the orchestrator.
//!
//! Each component owns one closed event enum. The orchestrator drains them in
//! a fixed order every frame, so the sequence within a snapshot is deterministic.

use serde::{Deserialize, Serialize};

use crate::enums::CameraPresetKind;
use crate::types::{GeoCoordinate, WorldPosition};

/// Coordinate system events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoordinateEvent {
    /// A fix was accepted. `changed` is false when the smoothed position
    /// moved less than the change threshold.
    PositionUpdated {
        geo: GeoCoordinate,
        world: WorldPosition,
        changed: bool,
    },
    /// Zoom level changed; world coordinates are rescaled.
    ZoomChanged { zoom: f64, scale: f64 },
    /// Map center moved; world coordinates shifted by `-offset`.
    Recentered {
        center: GeoCoordinate,
        offset: WorldPosition,
    },
}

/// Navigation engine events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NavigationEvent {
    /// Candidate routes stored; the first one is selected.
    RouteLoaded {
        request_id: u64,
        route_count: usize,
        distance_m: f64,
        duration_s: f64,
        waypoints: usize,
    },
    /// Routing collaborator failed; state unchanged.
    RouteFailed { request_id: u64, reason: String },
    /// A different candidate route was selected.
    RouteSelected { index: usize },
    /// Navigation started at waypoint 0.
    Started { total_waypoints: usize },
    /// A waypoint was reached and the cursor advanced.
    WaypointReached { index: usize, progress: f64 },
    /// Final waypoint reached.
    Completed,
    /// Navigation stopped before completion.
    Cancelled,
}

/// Camera events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CameraEvent {
    PresetChanged { preset: CameraPresetKind },
    Snapped,
}

/// Everything the orchestrator broadcasts to external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "event")]
pub enum EngineEvent {
    Coordinate(CoordinateEvent),
    Navigation(NavigationEvent),
    Camera(CameraEvent),
    /// Non-fatal error downgraded to a notification.
    Warning { message: String, frame: u64 },
}
