use geo::{Distance, Haversine, Point};
use heritage_core::models::LngLat;

/// Calculate the great-circle distance between two coordinates in meters.
///
/// Returns `None` if either coordinate is outside WGS 84 bounds or not finite.
pub fn geodesic_distance(from: LngLat, to: LngLat) -> Option<f64> {
    if !from.is_valid() || !to.is_valid() {
        return None;
    }

    let p1 = Point::new(from.lng, from.lat);
    let p2 = Point::new(to.lng, to.lat);
    Some(Haversine.distance(p1, p2))
}

/// Distance between two optional coordinates, `+inf` when either is missing or invalid
pub fn distance_or_infinity(from: Option<LngLat>, to: Option<LngLat>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) => geodesic_distance(from, to).unwrap_or(f64::INFINITY),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_geodesic_distance_accuracy() {
        // Paris (2.3522, 48.8566) to London (-0.1276, 51.5074) ≈ 344km
        let paris = LngLat::new(2.3522, 48.8566);
        let london = LngLat::new(-0.1276, 51.5074);

        let distance = geodesic_distance(paris, london).expect("Should compute distance");

        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_distance_uses_both_components_of_each_point() {
        // Same longitude, different latitude: a latitude-only displacement must register
        let a = LngLat::new(35.5, 33.89);
        let b = LngLat::new(35.5, 33.90);

        let distance = geodesic_distance(a, b).unwrap();
        assert!(distance > 1_000.0 && distance < 1_200.0, "got {}", distance);
    }

    #[test]
    fn test_geodesic_distance_same_point() {
        let point = LngLat::new(35.51, 33.89);

        let distance = geodesic_distance(point, point).expect("Should compute distance");

        assert!(distance < 0.001, "Distance from point to itself should be ~0, got {}", distance);
    }

    #[test]
    fn test_invalid_coordinates_yield_none() {
        let valid = LngLat::new(35.5, 33.9);
        assert!(geodesic_distance(valid, LngLat::new(f64::NAN, 33.9)).is_none());
        assert!(geodesic_distance(LngLat::new(35.5, 120.0), valid).is_none());
    }

    #[test]
    fn test_missing_location_sinks_to_infinity() {
        let valid = LngLat::new(35.5, 33.9);
        assert_eq!(distance_or_infinity(Some(valid), None), f64::INFINITY);
        assert_eq!(distance_or_infinity(None, Some(valid)), f64::INFINITY);
        assert_eq!(
            distance_or_infinity(Some(valid), Some(LngLat::new(500.0, 0.0))),
            f64::INFINITY
        );
        assert!(distance_or_infinity(Some(valid), Some(valid)).is_finite());
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            lng1 in -180.0f64..180.0, lat1 in -90.0f64..90.0,
            lng2 in -180.0f64..180.0, lat2 in -90.0f64..90.0,
        ) {
            let a = LngLat::new(lng1, lat1);
            let b = LngLat::new(lng2, lat2);
            let ab = geodesic_distance(a, b).unwrap();
            let ba = geodesic_distance(b, a).unwrap();
            prop_assert!((ab - ba).abs() < 1e-6);
            prop_assert!(ab >= 0.0);
        }
    }
}
