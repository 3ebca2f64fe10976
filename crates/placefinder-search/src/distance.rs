//! Great-circle distance between coordinates.

use crate::types::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between `a` and `b` in kilometres.
///
/// Symmetric and non-negative; exactly `0.0` when `a == b`.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `h` a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_KM: f64 = 0.5;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(40.7580, -73.9855);
        assert!(haversine_km(p, p).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(40.7580, -73.9855);
        let b = Coordinate::new(40.6892, -74.0445);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-9, "ab={ab} ba={ba}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(11.0, 20.0);
        let d = haversine_km(a, b);
        assert!((d - 111.19).abs() < TOLERANCE_KM, "got {d}");
    }

    #[test]
    fn berlin_to_paris_matches_reference() {
        let berlin = Coordinate::new(52.5200, 13.4050);
        let paris = Coordinate::new(48.8566, 2.3522);
        let d = haversine_km(berlin, paris);
        assert!((d - 878.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = haversine_km(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn distinct_points_are_positive() {
        let a = Coordinate::new(-33.8688, 151.2093);
        let b = Coordinate::new(-33.8700, 151.2100);
        assert!(haversine_km(a, b) > 0.0);
    }
}
