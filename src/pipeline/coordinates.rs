//! Coordinate validation against municipality bounding boxes.
//!
//! Registry coordinates are occasionally encoded against an adjacent UTM
//! zone, which shows up as a longitude offset of a whole multiple of 6
//! degrees. When a point's latitude fits its municipality but the longitude
//! does not, shifting the longitude by zone widths recovers most of these
//! without a full reprojection.

use crate::constants::{OSLO_PLACEHOLDER_COORDINATES, ZONE_SHIFTS_DEGREES};
use crate::types::MunicipalityBoundingBox;

/// Terminal outcome of the coordinate check for one facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateOutcome {
    /// Point is inside its municipality box. `imprecise` marks the known
    /// Oslo placeholder coordinates.
    Ok { imprecise: bool },
    /// Longitude was relocated by the given number of degrees.
    Fixed { shift_degrees: i32 },
    /// Point is outside the box and no zone shift recovers it.
    NotFixed,
    /// The facility has no usable coordinate pair.
    NoCoordinates,
}

/// Result of checking one facility: the coordinates to emit and how they
/// were arrived at.
#[derive(Debug, Clone)]
pub struct CheckedCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub outcome: CoordinateOutcome,
}

impl CheckedCoordinates {
    /// Human-readable note for the output record's ERROR tag, if any.
    pub fn diagnostic(&self) -> Option<String> {
        match self.outcome {
            CoordinateOutcome::Ok { imprecise: false } => None,
            CoordinateOutcome::Ok { imprecise: true } => {
                Some("Not exact coordinates (Oslo)".to_string())
            }
            CoordinateOutcome::Fixed { shift_degrees } => {
                Some(format!("Longitude relocated {shift_degrees} degrees"))
            }
            CoordinateOutcome::NotFixed => Some("Coordinates not within municipality".to_string()),
            CoordinateOutcome::NoCoordinates => Some("No coordinates".to_string()),
        }
    }
}

/// The sentinel result for a facility without coordinates. The output format
/// has no notion of a coordinate-less node, so (0, 0) is emitted.
pub fn missing() -> CheckedCoordinates {
    CheckedCoordinates {
        latitude: 0.0,
        longitude: 0.0,
        outcome: CoordinateOutcome::NoCoordinates,
    }
}

/// Checks a coordinate pair against its municipality's bounding box,
/// attempting the zone-shift correction when only the longitude is out of
/// range. Latitude misses are never shifted.
pub fn check(latitude: f64, longitude: f64, bbox: &MunicipalityBoundingBox) -> CheckedCoordinates {
    if bbox.contains(latitude, longitude) {
        let imprecise = OSLO_PLACEHOLDER_COORDINATES
            .iter()
            .any(|&(lat, lon)| latitude == lat && longitude == lon);
        return CheckedCoordinates {
            latitude,
            longitude,
            outcome: CoordinateOutcome::Ok { imprecise },
        };
    }

    if bbox.contains_latitude(latitude) {
        for shift in ZONE_SHIFTS_DEGREES {
            let candidate = longitude + f64::from(shift);
            if bbox.contains_longitude(candidate) {
                return CheckedCoordinates {
                    latitude,
                    longitude: candidate,
                    outcome: CoordinateOutcome::Fixed {
                        shift_degrees: shift,
                    },
                };
            }
        }
    }

    CheckedCoordinates {
        latitude,
        longitude,
        outcome: CoordinateOutcome::NotFixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> MunicipalityBoundingBox {
        let mut bbox = MunicipalityBoundingBox::new("5001".to_string());
        bbox.extend(58.0, 4.0);
        bbox.extend(60.0, 8.0);
        bbox
    }

    #[test]
    fn test_point_within_box_is_ok() {
        let checked = check(59.0, 6.0, &bbox());
        assert_eq!(checked.outcome, CoordinateOutcome::Ok { imprecise: false });
        assert_eq!(checked.diagnostic(), None);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let checked = check(58.0, 4.0, &bbox());
        assert_eq!(checked.outcome, CoordinateOutcome::Ok { imprecise: false });
        let checked = check(60.0, 8.0, &bbox());
        assert_eq!(checked.outcome, CoordinateOutcome::Ok { imprecise: false });
    }

    #[test]
    fn test_zone_shift_recovers_adjacent_zone_longitude() {
        // 16 - 12 = 4, the westernmost accepted longitude
        let checked = check(59.0, 16.0, &bbox());
        assert_eq!(
            checked.outcome,
            CoordinateOutcome::Fixed { shift_degrees: -12 }
        );
        assert_eq!(checked.latitude, 59.0);
        assert_eq!(checked.longitude, 4.0);
        assert_eq!(
            checked.diagnostic().as_deref(),
            Some("Longitude relocated -12 degrees")
        );
    }

    #[test]
    fn test_shift_candidates_are_tried_westmost_first() {
        // Candidates run west to east; the first shift that lands inside
        // the box wins.
        let checked = check(59.0, 10.5, &bbox());
        assert_eq!(
            checked.outcome,
            CoordinateOutcome::Fixed { shift_degrees: -6 }
        );
    }

    #[test]
    fn test_unrecoverable_longitude_is_not_fixed() {
        let checked = check(59.0, 40.0, &bbox());
        assert_eq!(checked.outcome, CoordinateOutcome::NotFixed);
        assert_eq!(checked.latitude, 59.0);
        assert_eq!(checked.longitude, 40.0);
        assert_eq!(
            checked.diagnostic().as_deref(),
            Some("Coordinates not within municipality")
        );
    }

    #[test]
    fn test_latitude_out_of_bounds_skips_shifting() {
        // Longitude 16 would be recoverable, but the latitude miss rules
        // the point out entirely.
        let checked = check(95.0, 16.0, &bbox());
        assert_eq!(checked.outcome, CoordinateOutcome::NotFixed);
        assert_eq!(checked.longitude, 16.0);
    }

    #[test]
    fn test_oslo_placeholder_is_flagged_imprecise() {
        let mut oslo = MunicipalityBoundingBox::new("0301".to_string());
        oslo.extend(59.8, 10.5);
        oslo.extend(60.1, 10.9);

        let checked = check(59.917201, 10.727413, &oslo);
        assert_eq!(checked.outcome, CoordinateOutcome::Ok { imprecise: true });
        assert_eq!(
            checked.diagnostic().as_deref(),
            Some("Not exact coordinates (Oslo)")
        );
    }

    #[test]
    fn test_missing_coordinates_emit_zero_sentinel() {
        let checked = missing();
        assert_eq!(checked.outcome, CoordinateOutcome::NoCoordinates);
        assert_eq!((checked.latitude, checked.longitude), (0.0, 0.0));
        assert_eq!(checked.diagnostic().as_deref(), Some("No coordinates"));
    }
}
