//! Error taxonomy for the engine.
//!
//! None of these halt the frame loop; the orchestrator downgrades them to
//! warning events and keeps simulating.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// GPS input outside the valid lng/lat ranges or non-numeric.
    InvalidCoordinate { lng: f64, lat: f64 },
    /// Navigation start attempted with no route loaded.
    NoRouteSelected,
    /// Routing collaborator failed; current route state is unchanged.
    RouteRequestFailed { request_id: u64, reason: String },
    /// A route response arrived for a request that is no longer current.
    StaleRouteResponse { request_id: u64, expected: Option<u64> },
    /// Configuration rejected at construction.
    InvalidConfig(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidCoordinate { lng, lat } => {
                write!(f, "invalid coordinate (lng {lng}, lat {lat})")
            }
            EngineError::NoRouteSelected => write!(f, "no route selected"),
            EngineError::RouteRequestFailed { request_id, reason } => {
                write!(f, "route request {request_id} failed: {reason}")
            }
            EngineError::StaleRouteResponse {
                request_id,
                expected,
            } => match expected {
                Some(expected) => write!(
                    f,
                    "stale route response {request_id} (awaiting {expected})"
                ),
                None => write!(f, "stale route response {request_id} (nothing pending)"),
            },
            EngineError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}
