//! Filesystem-backed GeoTIFF window reader.
//!
//! Reads ASTGTM `_dem.tif` tiles from a local directory with the pure-Rust
//! `tiff` decoder. Tiles come in several sample formats in the wild
//! (Int16 for elevation, Float32 for derived products), so every decoded
//! format converts to `f32` before windows are sliced out.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::batch::PixelWindow;
use crate::error::ReadError;
use crate::reader::RasterWindowReader;

/// Reads raster windows from `ASTGTMV003_*_dem.tif` files in one directory.
///
/// Decoding a tile is blocking work; it runs on the tokio blocking pool so
/// the async caller stays responsive while several tiles decode in
/// parallel.
#[derive(Debug, Clone)]
pub struct GeoTiffReader {
    tile_dir: PathBuf,
}

impl GeoTiffReader {
    /// Reader serving tiles out of `tile_dir`.
    pub fn new(tile_dir: impl Into<PathBuf>) -> Self {
        GeoTiffReader {
            tile_dir: tile_dir.into(),
        }
    }

    /// Directory the reader resolves tile filenames against.
    pub fn tile_dir(&self) -> &Path {
        &self.tile_dir
    }
}

#[async_trait]
impl RasterWindowReader for GeoTiffReader {
    async fn read_window(
        &self,
        filename: &str,
        window: PixelWindow,
    ) -> std::result::Result<Vec<f32>, ReadError> {
        let path = self.tile_dir.join(filename);
        let job_path = path.clone();

        match tokio::task::spawn_blocking(move || read_window_blocking(&job_path, window)).await {
            Ok(result) => result,
            Err(join_err) => Err(ReadError::Decode {
                path,
                source: Box::new(join_err),
            }),
        }
    }
}

/// Decoder limits sized for a full 3601 × 3601 Float32 raster with headroom.
fn tile_limits() -> Limits {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 512 * 1024 * 1024;
    limits.intermediate_buffer_size = 256 * 1024 * 1024;
    limits.ifd_value_size = 8 * 1024 * 1024;
    limits
}

fn decode_error(path: &Path, err: tiff::TiffError) -> ReadError {
    ReadError::Decode {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

/// Open, decode, and slice one window out of a tile file.
fn read_window_blocking(
    path: &Path,
    window: PixelWindow,
) -> std::result::Result<Vec<f32>, ReadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ReadError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) => {
            return Err(ReadError::Decode {
                path: path.to_path_buf(),
                source: Box::new(err),
            })
        }
    };

    let decoder = Decoder::new(file).map_err(|e| decode_error(path, e))?;
    let mut decoder = decoder.with_limits(tile_limits());

    let (width, height) = decoder.dimensions().map_err(|e| decode_error(path, e))?;
    if window.max_col > width || window.max_row > height {
        return Err(ReadError::Decode {
            path: path.to_path_buf(),
            source: format!(
                "window cols {}..{} rows {}..{} exceeds raster dimensions {}x{}",
                window.min_col, window.max_col, window.min_row, window.max_row, width, height
            )
            .into(),
        });
    }

    let samples = decode_samples(decoder.read_image().map_err(|e| decode_error(path, e))?);
    let expected = width as usize * height as usize;
    if samples.len() < expected {
        return Err(ReadError::Decode {
            path: path.to_path_buf(),
            source: format!(
                "raster holds {} samples but dimensions {}x{} require {}",
                samples.len(),
                width,
                height,
                expected
            )
            .into(),
        });
    }

    let mut out = Vec::with_capacity(window.len());
    for row in window.min_row..window.max_row {
        let start = row as usize * width as usize + window.min_col as usize;
        out.extend_from_slice(&samples[start..start + window.width() as usize]);
    }
    Ok(out)
}

/// Convert any decoded sample format to `f32`.
fn decode_samples(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
    }
}
