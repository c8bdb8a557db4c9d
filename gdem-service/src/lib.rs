//! gdem Service Library
//!
//! HTTP handlers and types for the batched elevation service.
//! This library is used by both the gdem-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use gdem::service::ElevationService;

/// Application state shared across handlers.
pub struct AppState {
    /// Elevation service answering all lookups.
    pub elevation_service: ElevationService,
}

/// The service's routes over the given state.
///
/// The binary layers Swagger UI, tracing, and CORS on top; tests drive
/// these routes directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/elevations",
            get(handlers::get_elevation).post(handlers::post_elevations),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    BatchElevationRequest, BatchElevationResponse, ElevationQuery, ErrorResponse, HealthResponse,
    PointBody, SingleElevationResponse,
};
