//! Immutable route model.

use serde::{Deserialize, Serialize};

use wayfarer_core::types::GeoCoordinate;
use wayfarer_geo::distance::path_length_m;

/// One leg between consecutive stops of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_m: f64,
    pub duration_s: f64,
    #[serde(default)]
    pub summary: String,
}

/// A decoded candidate route. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<GeoCoordinate>,
    distance_m: f64,
    duration_s: f64,
    legs: Vec<RouteLeg>,
}

impl Route {
    /// Build a route from its polyline. At least one waypoint is required.
    /// A missing or non-positive distance is replaced by the polyline length.
    pub fn new(
        waypoints: Vec<GeoCoordinate>,
        distance_m: f64,
        duration_s: f64,
    ) -> Result<Self, String> {
        if waypoints.is_empty() {
            return Err("route has no waypoints".into());
        }
        if let Some(bad) = waypoints.iter().find(|w| !w.is_valid()) {
            return Err(format!(
                "route waypoint out of range (lng {}, lat {})",
                bad.lng, bad.lat
            ));
        }

        let distance_m = if distance_m.is_finite() && distance_m > 0.0 {
            distance_m
        } else {
            path_length_m(&waypoints)
        };
        let duration_s = if duration_s.is_finite() {
            duration_s.max(0.0)
        } else {
            0.0
        };

        Ok(Self {
            waypoints,
            distance_m,
            duration_s,
            legs: Vec::new(),
        })
    }

    pub fn with_legs(mut self, legs: Vec<RouteLeg>) -> Self {
        self.legs = legs;
        self
    }

    pub fn waypoints(&self) -> &[GeoCoordinate] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<&GeoCoordinate> {
        self.waypoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }
}
