//! gdem Service - HTTP microservice for batched ASTER GDEM elevation lookups.
//!
//! A REST API resolving elevations for point batches out of local
//! `ASTGTMV003_*_dem.tif` tiles.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GDEM_TILE_DIR` | Directory containing ASTGTM `_dem.tif` tiles | Required |
//! | `GDEM_READ_TIMEOUT_SECS` | Deadline for one request's raster reads | None |
//! | `GDEM_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /elevations` - Batch elevation lookup, `{"points": [...]}`
//! - `GET /elevations?lat=X&lng=Y` - Single point lookup
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use gdem::service::ElevationServiceBuilder;
use gdem_service::{handlers, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the gdem service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gdem Elevation Service",
        version = "0.1.0",
        description = "REST API for batched elevation lookups from ASTER GDEM v3 tiles.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Pedro Sanz Martinez", url = "https://github.com/pedrosanzmtz/gdem")
    ),
    paths(
        handlers::get_elevation,
        handlers::post_elevations,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::PointBody,
            handlers::BatchElevationRequest,
            handlers::BatchElevationResponse,
            handlers::SingleElevationResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "elevation", description = "Elevation lookup endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gdem_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("GDEM_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // Build the elevation service from GDEM_TILE_DIR / GDEM_READ_TIMEOUT_SECS.
    // Tile storage is fixed at startup; without it the service cannot answer
    // anything, so refuse to start.
    let elevation_service = match ElevationServiceBuilder::from_env() {
        Ok(builder) => builder.build()?,
        Err(e) => {
            tracing::error!(error = %e, "GDEM_TILE_DIR must point at the ASTGTM tile directory");
            return Err(e.into());
        }
    };

    tracing::info!(
        tile_dir = %std::env::var("GDEM_TILE_DIR").unwrap_or_default(),
        port = port,
        "Starting gdem service"
    );

    let state = Arc::new(AppState { elevation_service });

    // Build router
    let app = gdem_service::router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
