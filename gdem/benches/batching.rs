use std::sync::Arc;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gdem::batch::{build_batches, PixelWindow};
use gdem::error::ReadError;
use gdem::point::Point;
use gdem::reader::RasterWindowReader;
use gdem::service::ElevationServiceBuilder;

/// In-memory reader so service benchmarks measure the pipeline, not disk.
struct ConstReader;

#[async_trait]
impl RasterWindowReader for ConstReader {
    async fn read_window(
        &self,
        _filename: &str,
        window: PixelWindow,
    ) -> Result<Vec<f32>, ReadError> {
        Ok(vec![100.0; window.len()])
    }
}

/// 1000 points spread inside the N51W004 tile.
fn same_tile_points() -> Vec<Point> {
    (0..1000)
        .map(|i| {
            let lat = 51.0001 + (i % 100) as f64 * 0.0099;
            let lng = -3.9999 + (i / 100) as f64 * 0.0999;
            Point::new(lat, lng)
        })
        .collect()
}

/// 1000 points cycling through a 4 × 4 block of tiles.
fn multi_tile_points() -> Vec<Point> {
    (0..1000)
        .map(|i| {
            let lat = 50.5 + (i % 4) as f64 + (i % 7) as f64 * 0.01;
            let lng = -4.5 + ((i / 4) % 4) as f64 + (i % 11) as f64 * 0.01;
            Point::new(lat, lng)
        })
        .collect()
}

fn bench_build_batches_same_tile(c: &mut Criterion) {
    let points = same_tile_points();

    c.bench_function("build_batches_1000_same_tile", |b| {
        b.iter(|| {
            let batches = build_batches(black_box(&points)).unwrap();
            black_box(batches);
        })
    });
}

fn bench_build_batches_multi_tile(c: &mut Criterion) {
    let points = multi_tile_points();

    c.bench_function("build_batches_1000_multi_tile", |b| {
        b.iter(|| {
            let batches = build_batches(black_box(&points)).unwrap();
            black_box(batches);
        })
    });
}

fn bench_service_multi_tile(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = ElevationServiceBuilder::new()
        .reader(Arc::new(ConstReader))
        .build()
        .unwrap();
    let points = multi_tile_points();

    c.bench_function("service_1000_multi_tile", |b| {
        b.iter(|| {
            let annotated = rt
                .block_on(service.get_elevations(black_box(&points)))
                .unwrap();
            black_box(annotated);
        })
    });
}

criterion_group!(
    benches,
    bench_build_batches_same_tile,
    bench_build_batches_multi_tile,
    bench_service_multi_tile
);
criterion_main!(benches);
