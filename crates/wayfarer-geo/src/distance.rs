//! Great-circle distance and bearing on the mean-radius sphere.

use wayfarer_core::constants::EARTH_RADIUS_M;
use wayfarer_core::types::GeoCoordinate;

/// Haversine distance in meters.
pub fn haversine_m(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial bearing from `a` to `b` in degrees (0 = North, clockwise, [0, 360)).
pub fn bearing_deg(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let x = d_lng.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Total length of a polyline in meters.
pub fn path_length_m(points: &[GeoCoordinate]) -> f64 {
    points.windows(2).map(|w| haversine_m(&w[0], &w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_latitude() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(0.0, 1.0);
        let d = haversine_m(&a, &b);
        assert!((d - 111_195.0).abs() < 1.0, "1 degree lat: {d}");
    }

    #[test]
    fn test_zero_distance() {
        let a = GeoCoordinate::new(13.4, 52.5);
        assert_eq!(haversine_m(&a, &a), 0.0);
    }

    #[test]
    fn test_known_city_pair() {
        // Paris -> London, ~343.5 km
        let paris = GeoCoordinate::new(2.3522, 48.8566);
        let london = GeoCoordinate::new(-0.1276, 51.5072);
        let d = haversine_m(&paris, &london);
        assert!((d - 343_500.0).abs() < 2_000.0, "paris-london: {d}");
    }

    #[test]
    fn test_cardinal_bearings() {
        let o = GeoCoordinate::new(0.0, 0.0);
        assert!(bearing_deg(&o, &GeoCoordinate::new(0.0, 1.0)).abs() < 1e-9);
        assert!((bearing_deg(&o, &GeoCoordinate::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(&o, &GeoCoordinate::new(0.0, -1.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(&o, &GeoCoordinate::new(-1.0, 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_length_sums_segments() {
        let path = [
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(0.0, 0.001),
            GeoCoordinate::new(0.0, 0.002),
        ];
        let total = path_length_m(&path);
        let direct = haversine_m(&path[0], &path[2]);
        assert!((total - direct).abs() < 1e-6);
        assert_eq!(path_length_m(&path[..1]), 0.0);
    }
}
