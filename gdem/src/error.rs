//! Error types for the gdem library.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors a [`RasterWindowReader`](crate::reader::RasterWindowReader)
/// implementation can report.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The tile file does not exist in the configured storage.
    #[error("tile file not found: {path}")]
    NotFound { path: PathBuf },

    /// The tile file exists but could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that can occur while resolving elevations.
#[derive(Error, Debug)]
pub enum GdemError {
    /// A point in the request is not a well-formed {lat, lng} record.
    #[error("malformed point at index {index}: {reason}")]
    MalformedPoint { index: usize, reason: String },

    /// A coordinate field holds a value that is not a usable number.
    #[error("unexpected type at point index {index}: `{field}` is not a number")]
    UnexpectedType { index: usize, field: &'static str },

    /// Coordinates are outside ASTGTM coverage.
    #[error("coordinates out of bounds at point index {index}: lat={lat}, lng={lng} (valid: lat ±83°, lng ±180°)")]
    OutOfBounds { index: usize, lat: f64, lng: f64 },

    /// No tile storage path was configured for the service.
    #[error("tile storage path not set (configure a tile directory or a reader)")]
    TileDirNotSet,

    /// A raster read failed for one of the batched tiles.
    #[error("failed to read tile {filename}: {source}")]
    TileRead {
        filename: String,
        #[source]
        source: ReadError,
    },

    /// A reader returned fewer samples than its window requires.
    #[error("raster for {filename} too short: got {actual} samples, window needs {expected}")]
    RasterTooShort {
        filename: String,
        expected: usize,
        actual: usize,
    },

    /// Raster reads did not complete within the configured deadline.
    #[error("raster reads timed out after {0:?}")]
    ReadTimeout(Duration),
}

/// Result type alias using [`GdemError`].
pub type Result<T> = std::result::Result<T, GdemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GdemError::OutOfBounds {
            index: 3,
            lat: 87.0,
            lng: 0.0,
        };
        assert!(err.to_string().contains("index 3"));
        assert!(err.to_string().contains("87"));

        let err = GdemError::MalformedPoint {
            index: 0,
            reason: "missing `lng`".into(),
        };
        assert!(err.to_string().contains("index 0"));
        assert!(err.to_string().contains("missing `lng`"));

        let err = GdemError::TileRead {
            filename: "ASTGTMV003_N51W004_dem.tif".into(),
            source: ReadError::NotFound {
                path: PathBuf::from("/tiles/ASTGTMV003_N51W004_dem.tif"),
            },
        };
        assert!(err.to_string().contains("ASTGTMV003_N51W004_dem.tif"));
    }

    #[test]
    fn test_read_error_source_is_preserved() {
        let err = GdemError::TileRead {
            filename: "ASTGTMV003_N00E000_dem.tif".into(),
            source: ReadError::NotFound {
                path: PathBuf::from("ASTGTMV003_N00E000_dem.tif"),
            },
        };
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("not found"));
    }
}
