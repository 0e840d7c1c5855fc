//! Route navigation for WAYFARER.
//!
//! Route model, directions-response decoding, the routing collaborator
//! seam, and the waypoint-tracking navigation state machine.

pub mod directions;
pub mod engine;
pub mod progress;
pub mod route;

pub use wayfarer_core as core;
pub use directions::{parse_directions_response, FixedRouteProvider, RouteProvider, RouteRequest};
pub use engine::NavigationEngine;
pub use route::{Route, RouteLeg};
