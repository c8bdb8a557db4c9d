//! Strict JSON request schema for batch lookups.
//!
//! Wire requests arrive as `{"points": [{"lat": ..., "lng": ...}, ...]}`.
//! Elements are kept as raw JSON values so that schema violations surface
//! as this crate's validation errors, carrying the offending index, rather
//! than as opaque deserializer messages.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{GdemError, Result};
use crate::point::{validate_point, Point};

/// Body of a batch elevation request.
#[derive(Debug, Clone, Deserialize)]
pub struct ElevationRequest {
    pub points: Vec<Value>,
}

impl ElevationRequest {
    /// Check every element against the point contract, in request order.
    ///
    /// Fails on the first violation: a non-object or a missing `lat`/`lng`
    /// key is malformed, a non-numeric coordinate is a type error, and
    /// out-of-range coordinates are rejected the same way typed input is.
    /// Unknown extra keys are ignored.
    pub fn validate(&self) -> Result<Vec<Point>> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, value)| point_from_value(index, value))
            .collect()
    }
}

fn point_from_value(index: usize, value: &Value) -> Result<Point> {
    let object = value.as_object().ok_or_else(|| GdemError::MalformedPoint {
        index,
        reason: "expected a JSON object".into(),
    })?;

    let lat = coord_field(index, object, "lat")?;
    let lng = coord_field(index, object, "lng")?;

    let point = Point::new(lat, lng);
    validate_point(index, &point)?;
    Ok(point)
}

fn coord_field(
    index: usize,
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<f64> {
    let value = object.get(field).ok_or_else(|| GdemError::MalformedPoint {
        index,
        reason: format!("missing `{field}`"),
    })?;
    value
        .as_f64()
        .ok_or(GdemError::UnexpectedType { index, field })
}
