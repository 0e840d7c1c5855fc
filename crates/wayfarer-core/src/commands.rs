//! Commands sent from the UI/host to the engine.
//!
//! Commands are queued and applied at the next frame boundary.

use serde::{Deserialize, Serialize};

use crate::enums::{CameraPresetKind, RoutingProfile};
use crate::types::GeoCoordinate;

/// Four-direction input flags plus sprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl InputState {
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Options for a route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    pub profile: RoutingProfile,
    pub alternatives: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            profile: RoutingProfile::Walking,
            alternatives: true,
        }
    }
}

/// All host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineCommand {
    // --- Character ---
    /// Replace the directional input flags.
    SetInput { input: InputState },
    /// Jump if grounded.
    Jump,
    /// Rotate the input frame (radians, 0 = North), e.g. from a compass or
    /// camera orbit.
    SetViewHeading { heading: f64 },

    // --- Map ---
    /// Change the zoom level (rescales the world frame).
    SetZoom { zoom: f64 },
    /// Move the map center explicitly.
    SetCenter { lng: f64, lat: f64 },

    // --- Navigation ---
    /// Fetch routes between two points.
    RequestRoute {
        start: GeoCoordinate,
        end: GeoCoordinate,
        #[serde(default)]
        options: RouteOptions,
    },
    /// Select one of the fetched candidate routes.
    SelectRoute { index: usize },
    StartNavigation,
    StopNavigation,

    // --- Camera ---
    SetCameraPreset { preset: CameraPresetKind },
    SnapCamera,
}
