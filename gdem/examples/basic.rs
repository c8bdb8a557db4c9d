//! Basic example demonstrating gdem library usage.
//!
//! Run with: cargo run --example basic -- /path/to/astgtm/tiles

use gdem::point::Point;
use gdem::service::ElevationServiceBuilder;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get tile directory from command line
    let tile_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/astgtm/tiles");
        std::process::exit(1);
    });

    let service = ElevationServiceBuilder::new().tile_dir(&tile_dir).build()?;

    // Resolve some famous summits in one batched call
    let locations = [
        ("Pen y Fan, Wales", 51.8840, -3.4360),
        ("Mount Fuji, Japan", 35.3606, 138.7274),
        ("Mount Everest, Nepal", 27.9881, 86.9250),
        ("Denali, Alaska", 63.0695, -151.0074),
    ];
    let points: Vec<Point> = locations
        .iter()
        .map(|&(_, lat, lng)| Point::new(lat, lng))
        .collect();

    println!("Batched elevation lookup ({} points):", points.len());
    println!("{:-<50}", "");

    match service.get_elevations(&points).await {
        Ok(annotated) => {
            for ((name, _, _), point) in locations.iter().zip(&annotated) {
                match point.elev {
                    Some(elev) => println!("{}: {:.0}m", name, elev),
                    None => println!("{}: no sample", name),
                }
            }
        }
        Err(e) => println!("batch failed: {}", e),
    }

    // Single-point convenience: a missing tile comes back as None
    println!("\nSingle query:");
    match service.get_elevation(27.9881, 86.9250).await? {
        Some(elevation) => println!("  Everest: {:.0}m", elevation),
        None => println!("  Everest: tile not available locally"),
    }

    Ok(())
}
