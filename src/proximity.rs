use std::fmt;

use tracing::debug;

use crate::error::PlacementError;
use crate::geo::Coordinate;
use crate::marker::Marker;

pub const NEAR_RADIUS_M: f64 = 50.0;
pub const MIN_SPACING_M: f64 = 100.0;

/// What the operator is told about their current position.
#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    /// Within `radius_m` of the marker titled `title`.
    NearMarker { title: String, radius_m: f64 },
    /// Closest marker distance, in meters, when it is under the minimum spacing.
    TooClose(f64),
    Ready,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NearMarker { title, radius_m } => {
                write!(f, "Within {}m of marker: {}", radius_m, title)
            }
            Status::TooClose(meters) => write!(f, "Nearest marker is {:.2}m away.", meters),
            Status::Ready => write!(f, "READY"),
        }
    }
}

/// Two rules sharing the haversine distance: a soft status for live feedback
/// and a hard gate before a marker is committed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityPolicy {
    pub near_radius_m: f64,
    pub min_spacing_m: f64,
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self {
            near_radius_m: NEAR_RADIUS_M,
            min_spacing_m: MIN_SPACING_M,
        }
    }
}

impl ProximityPolicy {
    /// Stops at the first marker inside the near radius in iteration order,
    /// which is not necessarily the nearest one.
    pub fn classify(&self, candidate: &Coordinate, markers: &[Marker]) -> Status {
        let mut closest = f64::INFINITY;
        for marker in markers {
            let d = candidate.distance_to(&marker.location);
            if d < self.near_radius_m {
                debug!(marker = %marker.id, distance = d, "inside near radius");
                return Status::NearMarker {
                    title: marker.title.clone(),
                    radius_m: self.near_radius_m,
                };
            }
            closest = closest.min(d);
        }

        // No markers leaves `closest` at infinity.
        if closest >= self.min_spacing_m {
            Status::Ready
        } else {
            Status::TooClose(closest)
        }
    }

    pub fn validate_placement(
        &self,
        candidate: &Coordinate,
        markers: &[Marker],
    ) -> Result<(), PlacementError> {
        for marker in markers {
            let d = candidate.distance_to(&marker.location);
            if d < self.min_spacing_m {
                debug!(marker = %marker.id, distance = d, "placement rejected");
                return Err(PlacementError::TooClose {
                    min_spacing_m: self.min_spacing_m,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, title: &str, lat: f64, lon: f64) -> Marker {
        Marker {
            id: id.to_string(),
            location: Coordinate::new(lat, lon).unwrap(),
            title: title.to_string(),
            question: String::from("What is carved above the door?"),
            answer: String::from("1887"),
            hint: None,
            points: 10,
        }
    }

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn empty_snapshot_accepts_and_is_ready() {
        let policy = ProximityPolicy::default();
        let c = at(12.0, 77.0);
        assert_eq!(policy.validate_placement(&c, &[]), Ok(()));
        assert_eq!(policy.classify(&c, &[]), Status::Ready);
    }

    #[test]
    fn fifty_five_meters_away() {
        let policy = ProximityPolicy::default();
        let markers = vec![marker("m1", "Fountain", 0.0, 0.0)];
        let c = at(0.0, 0.0005);

        assert_eq!(
            policy.validate_placement(&c, &markers),
            Err(PlacementError::TooClose { min_spacing_m: 100.0 })
        );
        match policy.classify(&c, &markers) {
            Status::TooClose(d) => assert!((d - 55.6).abs() < 0.5, "got {}", d),
            other => panic!("expected TooClose, got {:?}", other),
        }
    }

    #[test]
    fn thirty_three_meters_away_is_near() {
        let policy = ProximityPolicy::default();
        let markers = vec![marker("m1", "Fountain", 0.0, 0.0)];
        assert_eq!(
            policy.classify(&at(0.0, 0.0003), &markers),
            Status::NearMarker {
                title: String::from("Fountain"),
                radius_m: 50.0,
            }
        );
    }

    #[test]
    fn two_hundred_meters_away_is_ready() {
        let policy = ProximityPolicy::default();
        let markers = vec![marker("m1", "Fountain", 0.0, 0.0)];
        let c = at(0.0, 0.002);
        assert_eq!(policy.classify(&c, &markers), Status::Ready);
        assert_eq!(policy.validate_placement(&c, &markers), Ok(()));
    }

    #[test]
    fn rejects_on_any_marker_in_range() {
        let policy = ProximityPolicy::default();
        let c = at(0.0, 0.0);
        let markers = vec![
            marker("m1", "Far", 1.0, 1.0),
            marker("m2", "Farther", -2.0, 3.0),
            marker("m3", "Close", 0.0, 0.0008),
        ];
        assert!(policy.validate_placement(&c, &markers).is_err());
    }

    #[test]
    fn near_marker_is_first_match_not_nearest() {
        let policy = ProximityPolicy::default();
        // ~44m then ~11m; the first one wins.
        let markers = vec![
            marker("m1", "Gate", 0.0, 0.0004),
            marker("m2", "Bench", 0.0, 0.0001),
        ];
        assert_eq!(
            policy.classify(&at(0.0, 0.0), &markers),
            Status::NearMarker {
                title: String::from("Gate"),
                radius_m: 50.0,
            }
        );
    }

    #[test]
    fn too_close_reports_the_minimum() {
        let policy = ProximityPolicy::default();
        let markers = vec![
            marker("m1", "A", 0.0, 0.0008),
            marker("m2", "B", 0.0, 0.0006),
            marker("m3", "C", 0.0, 0.05),
        ];
        let expected = at(0.0, 0.0).distance_to(&markers[1].location);
        assert_eq!(
            policy.classify(&at(0.0, 0.0), &markers),
            Status::TooClose(expected)
        );
    }

    #[test]
    fn exactly_min_spacing_is_allowed() {
        let policy = ProximityPolicy::default();
        let markers = vec![marker("m1", "A", 0.0, 0.0)];
        let c = at(0.0, 0.002);
        let wide = ProximityPolicy {
            min_spacing_m: c.distance_to(&markers[0].location),
            ..policy
        };
        assert_eq!(wide.validate_placement(&c, &markers), Ok(()));
        assert_eq!(wide.classify(&c, &markers), Status::Ready);
    }

    #[test]
    fn near_line_follows_configured_radius() {
        let policy = ProximityPolicy {
            near_radius_m: 75.0,
            ..ProximityPolicy::default()
        };
        let markers = vec![marker("m1", "Fountain", 0.0, 0.0)];
        // ~55m: outside the default radius, inside this one.
        let status = policy.classify(&at(0.0, 0.0005), &markers);
        assert_eq!(status.to_string(), "Within 75m of marker: Fountain");
    }

    #[test]
    fn status_lines() {
        assert_eq!(Status::Ready.to_string(), "READY");
        let near = Status::NearMarker {
            title: String::from("Clock Tower"),
            radius_m: NEAR_RADIUS_M,
        };
        assert_eq!(near.to_string(), "Within 50m of marker: Clock Tower");
        assert_eq!(
            Status::TooClose(55.5975).to_string(),
            "Nearest marker is 55.60m away."
        );
        assert_eq!(
            PlacementError::TooClose { min_spacing_m: 100.0 }.to_string(),
            "too close to an existing marker (less than 100m)"
        );
    }
}
