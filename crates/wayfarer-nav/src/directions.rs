//! Routing collaborator seam and directions-response decoding.
//!
//! Responses follow the common directions-API shape:
//! `{ "code": "Ok", "routes": [{ "distance", "duration", "geometry", "legs" }] }`
//! where `geometry` is either an encoded polyline string or a GeoJSON
//! `LineString` object.

use serde::{Deserialize, Serialize};

use wayfarer_core::commands::RouteOptions;
use wayfarer_core::types::GeoCoordinate;
use wayfarer_geo::polyline;

use crate::route::{Route, RouteLeg};

/// A route query tagged with the id used to detect stale responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub id: u64,
    pub start: GeoCoordinate,
    pub end: GeoCoordinate,
    pub options: RouteOptions,
}

/// External directions service. Implementations may block; the orchestrator
/// calls them off the frame thread.
pub trait RouteProvider: Send {
    fn fetch(&self, request: &RouteRequest) -> Result<Vec<Route>, String>;
}

/// Provider that always answers with the same result.
#[derive(Debug, Clone)]
pub struct FixedRouteProvider {
    result: Result<Vec<Route>, String>,
}

impl FixedRouteProvider {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { result: Ok(routes) }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

impl RouteProvider for FixedRouteProvider {
    fn fetch(&self, _request: &RouteRequest) -> Result<Vec<Route>, String> {
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    geometry: GeometryDto,
    #[serde(default)]
    legs: Vec<LegDto>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeometryDto {
    Encoded(String),
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Deserialize)]
struct LegDto {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    summary: String,
}

/// Decode a directions response body into candidate routes.
///
/// `precision` applies to encoded geometries only (5 or 6).
pub fn parse_directions_response(body: &str, precision: u32) -> Result<Vec<Route>, String> {
    let response: DirectionsResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed directions response: {e}"))?;

    if let Some(code) = response.code.as_deref() {
        if !code.eq_ignore_ascii_case("ok") {
            let message = response.message.unwrap_or_default();
            return Err(format!("directions service returned {code}: {message}"));
        }
    }
    if response.routes.is_empty() {
        return Err("directions response contains no routes".into());
    }

    response
        .routes
        .into_iter()
        .enumerate()
        .map(|(i, dto)| {
            let waypoints = match dto.geometry {
                GeometryDto::Encoded(encoded) => polyline::decode(&encoded, precision)?,
                GeometryDto::LineString { coordinates } => coordinates
                    .into_iter()
                    .map(|[lng, lat]| GeoCoordinate::new(lng, lat))
                    .collect(),
            };
            let legs = dto
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    distance_m: leg.distance,
                    duration_s: leg.duration,
                    summary: leg.summary,
                })
                .collect();
            Route::new(waypoints, dto.distance, dto.duration)
                .map(|route| route.with_legs(legs))
                .map_err(|e| format!("route {i}: {e}"))
        })
        .collect()
}
