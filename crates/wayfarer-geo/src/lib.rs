//! Geographic math for WAYFARER.
//!
//! Web-Mercator projection, zoom scale, great-circle distance,
//! polyline codec, and the GPS <-> world coordinate system.

pub use wayfarer_core as core;

pub mod coordinate_system;
pub mod distance;
pub mod mercator;
pub mod polyline;

// Re-export key types for convenience.
pub use coordinate_system::CoordinateSystem;
pub use distance::{bearing_deg, haversine_m};
pub use mercator::{lng_lat_to_mercator, mercator_to_lng_lat, zoom_scale};
