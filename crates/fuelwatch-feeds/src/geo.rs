//! Great-circle distance and coordinate helpers.

use fuelwatch_core::GeoPoint;

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MILES_TO_KM: f64 = 1.60934;
pub const KM_TO_MILES: f64 = 0.621_371;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometres,
    Miles,
}

impl DistanceUnit {
    /// Converts `distance` in this unit to kilometres.
    #[must_use]
    pub fn to_km(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Kilometres => distance,
            DistanceUnit::Miles => distance * MILES_TO_KM,
        }
    }

    /// Converts `km` to this unit.
    #[must_use]
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometres => km,
            DistanceUnit::Miles => km * KM_TO_MILES,
        }
    }
}

/// Haversine distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Returns `true` if `to` lies within `radius` (in `unit`) of `from`.
#[must_use]
pub fn is_within_distance(from: GeoPoint, to: GeoPoint, radius: f64, unit: DistanceUnit) -> bool {
    unit.from_km(haversine_km(from, to)) <= radius
}

/// Parses `"lat,lon"` text into a validated point.
///
/// This is the offline part of location lookup; postcode and place-name
/// geocoding happen outside this crate.
#[must_use]
pub fn parse_coordinates(text: &str) -> Option<GeoPoint> {
    let (lat, lon) = text.trim().split_once(',')?;
    let latitude = lat.trim().parse::<f64>().ok()?;
    let longitude = lon.trim().parse::<f64>().ok()?;
    GeoPoint::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    #[test]
    fn haversine_london_to_paris() {
        let london = point(51.5074, -0.1278);
        let paris = point(48.8566, 2.3522);
        let km = haversine_km(london, paris);
        assert!((km - 343.5).abs() < 1.0, "got {km}");
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let p = point(53.4808, -2.2426);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn haversine_antipodes_is_finite() {
        let km = haversine_km(point(0.0, 0.0), point(0.0, 180.0));
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn within_distance_respects_unit() {
        let london = point(51.5074, -0.1278);
        // ~9.4 km / ~5.8 miles from central London.
        let stratford = point(51.5416, -0.0036);
        assert!(is_within_distance(london, stratford, 10.0, DistanceUnit::Kilometres));
        assert!(!is_within_distance(london, stratford, 5.0, DistanceUnit::Miles));
        assert!(is_within_distance(london, stratford, 6.0, DistanceUnit::Miles));
    }

    #[test]
    fn miles_convert_to_km() {
        assert!((DistanceUnit::Miles.to_km(5.0) - 8.0467).abs() < 1e-9);
        assert!((DistanceUnit::Kilometres.to_km(5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_coordinate_text() {
        let p = parse_coordinates(" 51.5074, -0.1278 ").unwrap();
        assert!((p.latitude - 51.5074).abs() < 1e-9);
        assert!((p.longitude - (-0.1278)).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_coordinate_text() {
        assert!(parse_coordinates("SW1A 1AA").is_none());
        assert!(parse_coordinates("51.5").is_none());
        assert!(parse_coordinates("95.0,0.0").is_none());
        assert!(parse_coordinates("51.5,-0.1,3").is_none());
    }
}
