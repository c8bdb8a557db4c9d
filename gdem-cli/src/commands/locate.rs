use anyhow::{bail, Result};
use gdem::locator;
use std::path::PathBuf;

pub fn run(tile_dir: Option<PathBuf>, lat: f64, lng: f64) -> Result<()> {
    if !locator::is_valid_coord(lat, lng) {
        bail!(
            "Coordinates out of bounds: lat={}, lng={} (valid: lat ±83°, lng ±180°)",
            lat,
            lng
        );
    }

    let (key, pixel) = locator::locate(lat, lng);
    let filename = key.filename();

    let lat_prefix = if key.lat >= 0 { "N" } else { "S" };
    let lng_prefix = if key.lng >= 0 { "E" } else { "W" };

    println!("Tile: {}", filename);
    println!(
        "Coverage: {}{:02} to {}{:02}, {}{:03} to {}{:03}",
        lat_prefix,
        key.lat.abs(),
        lat_prefix,
        (key.lat + 1).abs(),
        lng_prefix,
        key.lng.abs(),
        lng_prefix,
        (key.lng + 1).abs()
    );
    println!("Pixel: col={}, row={}", pixel.col, pixel.row);

    // Report on the tile file when a directory is known
    if let Some(dir) = tile_dir {
        let path = dir.join(&filename);
        println!();
        if path.exists() {
            let size = std::fs::metadata(&path)?.len();
            println!("Path: {}", path.display());
            println!("File size: {}", format_size(size));
        } else {
            println!("Not present in: {}", dir.display());
        }
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
