use anyhow::{Context, Result};
use gdem::ElevationServiceBuilder;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lng: f64,
    elevation: Option<f32>,
}

pub async fn run(
    tile_dir: Option<PathBuf>,
    timeout: Option<u64>,
    lat: f64,
    lng: f64,
    json: bool,
) -> Result<()> {
    // Build the service
    let mut builder = match tile_dir {
        Some(dir) => ElevationServiceBuilder::new().tile_dir(dir),
        None => ElevationServiceBuilder::from_env().context(
            "GDEM_TILE_DIR environment variable not set. Use --tile-dir or set GDEM_TILE_DIR",
        )?,
    };

    if let Some(secs) = timeout {
        builder = builder.read_timeout(Duration::from_secs(secs));
    }

    let service = builder.build().context("Failed to create elevation service")?;

    // Query elevation
    let elevation = service
        .get_elevation(lat, lng)
        .await
        .context("Failed to get elevation")?;

    // Output result
    if json {
        let response = ElevationResponse {
            lat,
            lng,
            elevation,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match elevation {
            Some(elev) => println!("{}", elev),
            None => println!("no data"),
        }
    }

    Ok(())
}
