//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use gdem::service::ElevationServiceBuilder;
use gdem_service::{router, AppState};
use serde_json::{json, Value};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};

/// Write a small Int16 tile where sample (row, col) = row * size + col.
///
/// Test points sit near each tile's NW corner so the pixel windows fit
/// these tiny rasters.
fn create_test_tile(dir: &Path, filename: &str, size: u32) {
    let file = File::create(dir.join(filename)).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    let data: Vec<i16> = (0..(size * size) as usize).map(|i| i as i16).collect();
    encoder
        .write_image::<colortype::GrayI16>(size, size, &data)
        .unwrap();
}

/// Create a test server over a tile directory.
fn create_test_server(temp_dir: &TempDir) -> TestServer {
    let elevation_service = ElevationServiceBuilder::new()
        .tile_dir(temp_dir.path())
        .build()
        .unwrap();
    let state = Arc::new(AppState { elevation_service });

    TestServer::new(router(state)).unwrap()
}

#[tokio::test]
async fn test_batch_endpoint_success() {
    let temp_dir = TempDir::new().unwrap();
    create_test_tile(temp_dir.path(), "ASTGTMV003_N51W004_dem.tif", 16);

    let server = create_test_server(&temp_dir);

    // Pixel (1, 0) -> sample 1, pixel (0, 1) -> sample 16
    let response = server
        .post("/elevations")
        .json(&json!({
            "points": [
                {"lat": 51.9999, "lng": -3.9996},
                {"lat": 51.9996, "lng": -3.9999},
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["elev"], 1.0);
    assert_eq!(points[1]["elev"], 16.0);

    // Coordinates echo back in request order
    assert_eq!(points[0]["lat"], 51.9999);
    assert_eq!(points[0]["lng"], -3.9996);
    assert_eq!(points[1]["lat"], 51.9996);
}

#[tokio::test]
async fn test_batch_endpoint_deduplicates_equal_points() {
    let temp_dir = TempDir::new().unwrap();
    create_test_tile(temp_dir.path(), "ASTGTMV003_N51W004_dem.tif", 16);

    let server = create_test_server(&temp_dir);

    let response = server
        .post("/elevations")
        .json(&json!({
            "points": [
                {"lat": 51.9999, "lng": -3.9996},
                {"lat": 51.9999, "lng": -3.9996},
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let points = body["points"].as_array().unwrap();
    assert_eq!(points[0]["elev"], points[1]["elev"]);
}

#[tokio::test]
async fn test_batch_endpoint_invalid_latitude() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/elevations")
        .json(&json!({"points": [{"lat": 87.0, "lng": 0.0}]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("out of bounds"));
    assert!(error.contains("index 0"));
}

#[tokio::test]
async fn test_batch_endpoint_non_numeric_coordinate() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/elevations")
        .json(&json!({
            "points": [
                {"lat": 51.5, "lng": -3.5},
                {"lat": 51.5, "lng": "x"},
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("index 1"));
    assert!(error.contains("`lng`"));
}

#[tokio::test]
async fn test_batch_endpoint_misnamed_key() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/elevations")
        .json(&json!({"points": [{"lat": 51.5, "lon": -3.5}]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing `lng`"));
}

#[tokio::test]
async fn test_batch_endpoint_missing_tile() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/elevations")
        .json(&json!({"points": [{"lat": 51.9999, "lng": -3.9999}]}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("ASTGTMV003_N51W004_dem.tif"));
}

#[tokio::test]
async fn test_batch_endpoint_empty_points() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.post("/elevations").json(&json!({"points": []})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["points"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_batch_endpoint_body_without_points_key() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.post("/elevations").json(&json!({})).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_single_endpoint_success() {
    let temp_dir = TempDir::new().unwrap();
    create_test_tile(temp_dir.path(), "ASTGTMV003_N51W004_dem.tif", 16);

    let server = create_test_server(&temp_dir);

    let response = server.get("/elevations?lat=51.9999&lng=-3.9996").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["elevation"], 1.0);
    assert_eq!(body["lat"], 51.9999);
    assert_eq!(body["lng"], -3.9996);
}

#[tokio::test]
async fn test_single_endpoint_invalid_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/elevations?lat=91.0&lng=0.0").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("out of bounds"));
}

#[tokio::test]
async fn test_single_endpoint_missing_tile() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/elevations?lat=51.9999&lng=-3.9999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_single_endpoint_missing_params() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    // Missing lng parameter
    let response = server.get("/elevations?lat=35.5").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // No parameters
    let response = server.get("/elevations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().is_some());
}
