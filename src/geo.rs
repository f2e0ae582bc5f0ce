use std::fmt;

use crate::error::GeoError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance using the haversine formula.
/// Input lat/lon in degrees. Output in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `h` just past 1 near antipodes.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_meters(a.latitude, a.longitude, b.latitude, b.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let points = [
            (0.0, 0.0),
            (51.5007, -0.1246),
            (-33.8568, 151.2153),
            (90.0, 180.0),
        ];
        for &(lat, lon) in &points {
            let a = coord(lat, lon);
            assert_eq!(distance(&a, &a), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(48.8584, 2.2945);
        let b = coord(40.6892, -74.0445);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance(&coord(0.0, 0.0), &coord(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 111_195.0 * 0.01, "got {}", d);
    }

    #[test]
    fn matches_analytic_value() {
        // Along a meridian the formula reduces to R * Δlat.
        let d = distance(&coord(10.0, 20.0), &coord(11.0, 20.0));
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodes_are_half_a_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        let pairs = [
            ((10.0, 20.0), (-10.0, -160.0)),
            ((0.0, 0.0), (0.0, 180.0)),
            ((-85.75, -175.0), (85.75, 5.0)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let d = distance(&coord(lat1, lon1), &coord(lat2, lon2));
            assert!(d.is_finite(), "NaN for ({}, {}) / ({}, {})", lat1, lon1, lat2, lon2);
            assert!((d - half).abs() < 1.0, "got {}", d);
        }
        // Sweep for rounding past 1.
        for i in 0..1800 {
            let lat = -90.0 + i as f64 * 0.1;
            for j in 0..36 {
                let lon = -180.0 + j as f64 * 10.0;
                let d = haversine_meters(lat, lon, -lat, lon + 180.0);
                assert!(d.is_finite() && d >= 0.0, "({}, {}) gave {}", lat, lon, d);
            }
        }
    }

    #[test]
    fn distinct_points_are_apart() {
        assert!(distance(&coord(0.0, 0.0), &coord(0.0, 0.00001)) > 0.0);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.1),
            Err(GeoError::LongitudeOutOfRange(_))
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn displays_four_decimals() {
        assert_eq!(coord(12.345678, -98.7654321).to_string(), "12.3457, -98.7654");
    }
}
