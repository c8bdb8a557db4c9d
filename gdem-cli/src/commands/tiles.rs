use anyhow::{Context, Result};
use gdem::TileKey;
use std::fs;
use std::path::PathBuf;

pub fn run(tile_dir: Option<PathBuf>) -> Result<()> {
    let dir = match tile_dir {
        Some(dir) => dir,
        None => {
            let dir = std::env::var("GDEM_TILE_DIR").context(
                "GDEM_TILE_DIR environment variable not set. Use --tile-dir or set GDEM_TILE_DIR",
            )?;
            PathBuf::from(dir)
        }
    };

    if !dir.exists() {
        anyhow::bail!("Tile directory does not exist: {}", dir.display());
    }

    // Collect GeoTIFF files
    let mut tiles: Vec<_> = fs::read_dir(&dir)
        .context("Failed to read tile directory")?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|e| e == "tif")
                .unwrap_or(false)
        })
        .collect();

    if tiles.is_empty() {
        println!("No .tif files found in: {}", dir.display());
        return Ok(());
    }

    // Sort by filename
    tiles.sort_by_key(|e| e.file_name());

    let mut unknown_count = 0;
    let mut total_size: u64 = 0;

    println!("{:<28} {:>10} {:>24}", "TILE", "SIZE", "COVERAGE");
    println!("{}", "-".repeat(64));

    for entry in &tiles {
        let filename = entry.file_name();
        let filename_str = filename.to_string_lossy();
        let path = entry.path();

        let metadata = fs::metadata(&path).ok();
        let size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
        total_size += size;

        // Parse coverage from filename
        let coverage = if let Some(key) = TileKey::parse(&filename_str) {
            let lat_prefix = if key.lat >= 0 { "N" } else { "S" };
            let lng_prefix = if key.lng >= 0 { "E" } else { "W" };
            format!(
                "{}{:02} to {}{:02}, {}{:03} to {}{:03}",
                lat_prefix,
                key.lat.abs(),
                lat_prefix,
                (key.lat + 1).abs(),
                lng_prefix,
                key.lng.abs(),
                lng_prefix,
                (key.lng + 1).abs()
            )
        } else {
            unknown_count += 1;
            "Unknown".to_string()
        };

        println!(
            "{:<28} {:>10} {:>24}",
            filename_str,
            format_size(size),
            coverage
        );
    }

    // Summary
    println!();
    println!("Summary:");
    println!("  Total tiles: {}", tiles.len());
    if unknown_count > 0 {
        println!("  Unrecognized names: {}", unknown_count);
    }
    println!("  Total size: {}", format_size(total_size));
    println!("  Tile directory: {}", dir.display());

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
