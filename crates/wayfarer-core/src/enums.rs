//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Navigation lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPhase {
    /// No route loaded.
    #[default]
    Idle,
    /// A route is loaded and selected, navigation not started.
    RouteLoaded,
    /// Actively tracking waypoints.
    Navigating,
    /// Final waypoint reached.
    Completed,
    /// Stopped by the user before completion.
    Cancelled,
}

impl NavigationPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, NavigationPhase::Completed | NavigationPhase::Cancelled)
    }
}

/// Named camera parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPresetKind {
    FirstPerson,
    #[default]
    ThirdPerson,
    Cinematic,
    Mobile,
}

impl CameraPresetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CameraPresetKind::FirstPerson => "first_person",
            CameraPresetKind::ThirdPerson => "third_person",
            CameraPresetKind::Cinematic => "cinematic",
            CameraPresetKind::Mobile => "mobile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_person" | "fps" => Some(CameraPresetKind::FirstPerson),
            "third_person" => Some(CameraPresetKind::ThirdPerson),
            "cinematic" => Some(CameraPresetKind::Cinematic),
            "mobile" => Some(CameraPresetKind::Mobile),
            _ => None,
        }
    }
}

/// Travel profile passed to the routing collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    #[default]
    Walking,
    Cycling,
    Driving,
}

impl RoutingProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProfile::Walking => "walking",
            RoutingProfile::Cycling => "cycling",
            RoutingProfile::Driving => "driving",
        }
    }
}

/// Source of the fixes feeding the coordinate system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Device GPS watch.
    #[default]
    Device,
    /// Simulation timer walking a path.
    Simulated,
}

impl LocationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationSource::Device => "device",
            LocationSource::Simulated => "simulated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "device" | "gps" => Some(LocationSource::Device),
            "simulated" | "sim" => Some(LocationSource::Simulated),
            _ => None,
        }
    }
}
