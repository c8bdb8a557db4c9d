use anyhow::{bail, Context, Result};
use gdem::{ElevationRequest, ElevationService, ElevationServiceBuilder, Point};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

pub async fn run(
    tile_dir: Option<PathBuf>,
    timeout: Option<u64>,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lng_col: String,
    chunk_size: usize,
) -> Result<()> {
    if chunk_size == 0 {
        bail!("Chunk size must be at least 1");
    }

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

    // Detect file format
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => process_csv(&service, &input, output, &lat_col, &lng_col, chunk_size).await,
        "json" => process_json(&service, &input, output, chunk_size).await,
        _ => bail!("Unsupported file format: {}. Use .csv or .json", extension),
    }
}

async fn process_csv(
    service: &ElevationService,
    input: &PathBuf,
    output: Option<PathBuf>,
    lat_col: &str,
    lng_col: &str,
    chunk_size: usize,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lng_idx = headers
        .iter()
        .position(|h| h == lng_col)
        .with_context(|| format!("Column '{}' not found in CSV", lng_col))?;

    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    // Parse every coordinate up front so a bad row fails before any tile reads
    let mut points = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let lat: f64 = record
            .get(lat_idx)
            .with_context(|| format!("Missing latitude in row {}", index + 1))?
            .parse()
            .with_context(|| format!("Invalid latitude in row {}", index + 1))?;
        let lng: f64 = record
            .get(lng_idx)
            .with_context(|| format!("Missing longitude in row {}", index + 1))?
            .parse()
            .with_context(|| format!("Invalid longitude in row {}", index + 1))?;
        points.push(Point::new(lat, lng));
    }

    let annotated = annotate_points(service, points, chunk_size).await?;

    // Prepare output
    let output_path = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        input.with_file_name(format!("{}_elevation.csv", stem))
    });
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    // Write header
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    for (record, point) in records.iter().zip(&annotated) {
        let elevation = point.elev.map(|e| e.to_string()).unwrap_or_default();
        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;
    }

    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

#[derive(Serialize)]
struct AnnotatedBatch {
    points: Vec<Point>,
}

async fn process_json(
    service: &ElevationService,
    input: &PathBuf,
    output: Option<PathBuf>,
    chunk_size: usize,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let reader = BufReader::new(file);

    let request: ElevationRequest =
        serde_json::from_reader(reader).context("Failed to parse input JSON")?;
    let points = request.validate().context("Invalid point in input JSON")?;

    let annotated = annotate_points(service, points, chunk_size).await?;

    // Write output
    let output_path = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        input.with_file_name(format!("{}_elevation.json", stem))
    });
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = BufWriter::new(output_file);
    serde_json::to_writer_pretty(&mut writer, &AnnotatedBatch { points: annotated })?;
    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

/// Run points through the service in fixed-size chunks with a progress bar.
async fn annotate_points(
    service: &ElevationService,
    points: Vec<Point>,
    chunk_size: usize,
) -> Result<Vec<Point>> {
    let pb = ProgressBar::new(points.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut annotated = Vec::with_capacity(points.len());
    for chunk in points.chunks(chunk_size) {
        let looked_up = service.get_elevations(chunk).await.with_context(|| {
            format!(
                "Failed to look up elevations for points {} to {}",
                annotated.len() + 1,
                annotated.len() + chunk.len()
            )
        })?;
        annotated.extend(looked_up);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("done");
    Ok(annotated)
}
