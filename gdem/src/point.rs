//! Point type shared by all lookup APIs.

use crate::error::{GdemError, Result};
use crate::locator::is_valid_coord;

/// One geographic point in a lookup request.
///
/// `elev` is `None` on input and carries the sampled elevation in meters on
/// output. Identity within a request is positional, so the engine never
/// reorders points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Elevation in meters, filled in by a lookup.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub elev: Option<f32>,
}

impl Point {
    /// Point with no elevation attached yet.
    pub fn new(lat: f64, lng: f64) -> Self {
        Point {
            lat,
            lng,
            elev: None,
        }
    }
}

/// Validate one request point, reporting its position on failure.
///
/// Finiteness is checked before range: NaN slips through interval
/// comparisons, and a NaN coordinate is a type problem, not a bounds one.
pub(crate) fn validate_point(index: usize, point: &Point) -> Result<()> {
    if !point.lat.is_finite() {
        return Err(GdemError::UnexpectedType {
            index,
            field: "lat",
        });
    }
    if !point.lng.is_finite() {
        return Err(GdemError::UnexpectedType {
            index,
            field: "lng",
        });
    }
    if !is_valid_coord(point.lat, point.lng) {
        return Err(GdemError::OutOfBounds {
            index,
            lat: point.lat,
            lng: point.lng,
        });
    }
    Ok(())
}
