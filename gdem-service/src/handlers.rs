//! HTTP request handlers for the elevation service.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use gdem::error::{GdemError, ReadError};
use gdem::json::ElevationRequest;
use gdem::point::Point;

use crate::AppState;

/// Query parameters for the single-point endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ElevationQuery {
    /// Latitude in decimal degrees (-83 to 83).
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub lng: f64,
}

/// One point on the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PointBody {
    /// Latitude in decimal degrees (-83 to 83).
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub lng: f64,
    /// Elevation in meters, present in responses.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub elev: Option<f32>,
}

impl From<Point> for PointBody {
    fn from(p: Point) -> Self {
        PointBody {
            lat: p.lat,
            lng: p.lng,
            elev: p.elev,
        }
    }
}

/// Body of a batch elevation request.
///
/// Elements stay raw JSON so validation can report the offending index
/// instead of a deserializer message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchElevationRequest {
    /// Points to resolve, each `{"lat": ..., "lng": ...}`.
    #[schema(value_type = Vec<PointBody>)]
    pub points: Vec<serde_json::Value>,
}

/// Successful batch response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchElevationResponse {
    /// The request points in order, each with `elev` attached.
    pub points: Vec<PointBody>,
}

/// Successful single-point response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SingleElevationResponse {
    /// Elevation in meters.
    pub elevation: Option<f32>,
    /// Latitude queried.
    pub lat: f64,
    /// Longitude queried.
    pub lng: f64,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Resolve elevations for a batch of points.
///
/// The whole batch succeeds or fails: on any validation failure or
/// unreadable tile no elevations are returned.
///
/// # Returns
///
/// - `200 OK` with every point annotated
/// - `400 Bad Request` if a point fails validation (the message names its index)
/// - `404 Not Found` if a required tile is not in storage
/// - `500`/`504` on decode, integrity, or timeout failures
#[utoipa::path(
    post,
    path = "/elevations",
    tag = "elevation",
    request_body = BatchElevationRequest,
    responses(
        (status = 200, description = "Every point annotated with an elevation", body = BatchElevationResponse),
        (status = 400, description = "A point failed validation", body = ErrorResponse),
        (status = 404, description = "A required tile is missing from storage", body = ErrorResponse),
        (status = 500, description = "Tile decode or raster integrity failure", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn post_elevations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchElevationRequest>,
) -> impl IntoResponse {
    tracing::debug!(points = request.points.len(), "Batch elevation request");

    let request = ElevationRequest {
        points: request.points,
    };
    let points = match request.validate() {
        Ok(points) => points,
        Err(e) => return error_response(e),
    };

    match state.elevation_service.get_elevations(&points).await {
        Ok(annotated) => {
            tracing::info!(points = annotated.len(), "Batch resolved");
            (
                StatusCode::OK,
                Json(BatchElevationResponse {
                    points: annotated.into_iter().map(PointBody::from).collect(),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Get elevation for a single point.
///
/// # Query Parameters
///
/// - `lat`: Latitude in decimal degrees (-83 to 83)
/// - `lng`: Longitude in decimal degrees (-180 to 180)
///
/// # Returns
///
/// - `200 OK` with the elevation
/// - `400 Bad Request` if coordinates are invalid
/// - `404 Not Found` if the covering tile is not in storage
#[utoipa::path(
    get,
    path = "/elevations",
    tag = "elevation",
    params(ElevationQuery),
    responses(
        (status = 200, description = "Elevation at the point", body = SingleElevationResponse),
        (status = 400, description = "Coordinates failed validation", body = ErrorResponse),
        (status = 404, description = "The covering tile is missing from storage", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn get_elevation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ElevationQuery>,
) -> impl IntoResponse {
    tracing::debug!(lat = query.lat, lng = query.lng, "Elevation query");

    let points = [Point::new(query.lat, query.lng)];
    match state.elevation_service.get_elevations(&points).await {
        Ok(annotated) => {
            let elevation = annotated.into_iter().next().and_then(|p| p.elev);
            tracing::info!(
                lat = query.lat,
                lng = query.lng,
                elevation = ?elevation,
                "Elevation found"
            );
            (
                StatusCode::OK,
                Json(SingleElevationResponse {
                    elevation,
                    lat: query.lat,
                    lng: query.lng,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Create an error response for elevation requests.
fn error_response(e: GdemError) -> axum::response::Response {
    let (status, message) = match &e {
        GdemError::MalformedPoint { .. }
        | GdemError::UnexpectedType { .. }
        | GdemError::OutOfBounds { .. } => (StatusCode::BAD_REQUEST, e.to_string()),
        GdemError::TileRead {
            source: ReadError::NotFound { .. },
            ..
        } => (StatusCode::NOT_FOUND, e.to_string()),
        GdemError::ReadTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    tracing::warn!(error = %e, "Elevation request failed");

    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_query_deserialize() {
        let json = r#"{"lat": 51.9283, "lng": -3.1476}"#;
        let query: ElevationQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.lat, 51.9283);
        assert_eq!(query.lng, -3.1476);
    }

    #[test]
    fn test_point_body_serialize() {
        let body = PointBody {
            lat: 51.9283,
            lng: -3.1476,
            elev: Some(395.0),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("395"));
        assert!(json.contains("51.9283"));

        // elev is omitted entirely while unresolved
        let body = PointBody {
            lat: 51.9283,
            lng: -3.1476,
            elev: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("elev"));
    }

    #[test]
    fn test_batch_request_accepts_raw_values() {
        let json = r#"{"points": [{"lat": 1.0, "lng": 2.0}, "garbage", 42]}"#;
        let request: BatchElevationRequest = serde_json::from_str(json).unwrap();
        // Malformed elements survive deserialization; validation rejects
        // them later with their index
        assert_eq!(request.points.len(), 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }
}
