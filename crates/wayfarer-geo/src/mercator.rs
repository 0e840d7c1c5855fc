//! Spherical Web-Mercator projection and zoom scale.
//!
//! Mercator coordinates are meters on the WGS-84 sphere, x = East, y = North.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use wayfarer_core::constants::{MAX_ZOOM, MERCATOR_MAX_LAT, MERCATOR_RADIUS_M, MIN_ZOOM};
use wayfarer_core::types::{MercatorPoint, ZoomScale};

/// Circumference of the Mercator sphere at the equator (meters).
pub const WORLD_WIDTH_M: f64 = 2.0 * PI * MERCATOR_RADIUS_M;

/// Project lng/lat (degrees) to Mercator meters. Latitude is clamped to the
/// projection's domain.
pub fn lng_lat_to_mercator(lng: f64, lat: f64) -> MercatorPoint {
    let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
    MercatorPoint {
        x: MERCATOR_RADIUS_M * lng.to_radians(),
        y: MERCATOR_RADIUS_M * (FRAC_PI_4 + lat * 0.5).tan().ln(),
    }
}

/// Inverse projection. Longitude is wrapped to [-180, 180].
pub fn mercator_to_lng_lat(point: MercatorPoint) -> (f64, f64) {
    let lng = wrap_lng((point.x / MERCATOR_RADIUS_M).to_degrees());
    let lat = (2.0 * (point.y / MERCATOR_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees();
    (lng, lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT))
}

/// Wrap a longitude into [-180, 180].
pub fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Shortest signed x-distance across the antimeridian.
pub fn wrap_mercator_dx(dx: f64) -> f64 {
    (dx + 0.5 * WORLD_WIDTH_M).rem_euclid(WORLD_WIDTH_M) - 0.5 * WORLD_WIDTH_M
}

/// World units per ground meter at `zoom`, doubling per level.
/// At `reference_zoom` one world unit is one meter.
pub fn zoom_scale(zoom: f64, reference_zoom: f64) -> ZoomScale {
    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    ZoomScale {
        zoom,
        scale: 2f64.powf(zoom - reference_zoom),
    }
}

/// Ground meters per Mercator meter at a latitude (Mercator stretch is 1/cos).
pub fn ground_meters_per_mercator_meter(lat: f64) -> f64 {
    lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT)
        .to_radians()
        .cos()
}
