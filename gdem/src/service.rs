//! Batched elevation lookups against a raster window reader.
//!
//! This module provides [`ElevationService`], which ties the pipeline
//! together: validate and batch the request, read every tile window
//! concurrently, then scatter the samples back onto an annotated copy of
//! the caller's points. A call either annotates every point or returns the
//! first error; partial results never escape.
//!
//! # Example
//!
//! ```ignore
//! use gdem::point::Point;
//! use gdem::service::ElevationServiceBuilder;
//!
//! let service = ElevationServiceBuilder::new()
//!     .tile_dir("/data/astgtm")
//!     .build()?;
//!
//! let points = vec![
//!     Point::new(51.92830, -3.14760),
//!     Point::new(51.92002, -3.14563),
//! ];
//! let annotated = service.get_elevations(&points).await?;
//! println!("{:?}", annotated[0].elev);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;

use crate::batch::{build_batches, TileBatch};
use crate::error::{GdemError, ReadError, Result};
use crate::geotiff::GeoTiffReader;
use crate::point::Point;
use crate::reader::RasterWindowReader;

/// Resolves elevations for point sequences out of ASTGTM tiles.
///
/// The service is cheap to clone and holds no per-call state; all storage
/// access goes through its [`RasterWindowReader`].
#[derive(Clone)]
pub struct ElevationService {
    reader: Arc<dyn RasterWindowReader>,
    read_timeout: Option<Duration>,
}

impl fmt::Debug for ElevationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevationService")
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl ElevationService {
    /// Service reading `ASTGTMV003_*_dem.tif` files from a directory.
    pub fn new(tile_dir: impl Into<PathBuf>) -> Self {
        ElevationService {
            reader: Arc::new(GeoTiffReader::new(tile_dir)),
            read_timeout: None,
        }
    }

    /// Annotate a copy of `points` with elevations, preserving order.
    ///
    /// Validation fails fast with the index of the first bad point before
    /// any storage is touched. One window is read per distinct tile, all
    /// reads run concurrently, and the first failure cancels the rest. On
    /// success the returned sequence has the same length and order as the
    /// input with each point's coordinates unchanged; the input itself is
    /// never written to.
    ///
    /// # Arguments
    ///
    /// * `points` - Points to resolve, in caller order
    ///
    /// # Returns
    ///
    /// A new vector with `elev` populated on every point.
    pub async fn get_elevations(&self, points: &[Point]) -> Result<Vec<Point>> {
        let mut annotated = points.to_vec();
        let batches = build_batches(&annotated)?;

        let reads = try_join_all(batches.iter().map(|batch| self.read_batch(batch)));
        let rasters = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, reads)
                .await
                .map_err(|_| GdemError::ReadTimeout(limit))??,
            None => reads.await?,
        };

        for (batch, raster) in batches.iter().zip(&rasters) {
            batch.scatter(raster, &mut annotated)?;
        }
        Ok(annotated)
    }

    /// Elevation for a single point, `None` when its tile is absent.
    pub async fn get_elevation(&self, lat: f64, lng: f64) -> Result<Option<f32>> {
        match self.get_elevations(&[Point::new(lat, lng)]).await {
            Ok(points) => Ok(points.into_iter().next().and_then(|p| p.elev)),
            Err(GdemError::TileRead {
                source: ReadError::NotFound { .. },
                ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn read_batch(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        let filename = batch.filename();
        self.reader
            .read_window(&filename, batch.window())
            .await
            .map_err(|source| GdemError::TileRead { filename, source })
    }
}

/// Builder for [`ElevationService`].
///
/// Storage is fixed at [`build`](Self::build): either a tile directory for
/// the bundled GeoTIFF reader or a custom [`RasterWindowReader`]. Building
/// with neither configured fails, so an unconfigured service cannot exist.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use gdem::service::ElevationServiceBuilder;
///
/// let service = ElevationServiceBuilder::new()
///     .tile_dir("/data/astgtm")
///     .read_timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Default)]
pub struct ElevationServiceBuilder {
    tile_dir: Option<PathBuf>,
    reader: Option<Arc<dyn RasterWindowReader>>,
    read_timeout: Option<Duration>,
}

impl fmt::Debug for ElevationServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevationServiceBuilder")
            .field("tile_dir", &self.tile_dir)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl ElevationServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder configured from environment variables.
    ///
    /// `GDEM_TILE_DIR` is required; `GDEM_READ_TIMEOUT_SECS` optionally
    /// bounds each call's raster reads.
    pub fn from_env() -> Result<Self> {
        let tile_dir = std::env::var_os("GDEM_TILE_DIR").ok_or(GdemError::TileDirNotSet)?;
        let mut builder = Self::new().tile_dir(tile_dir);

        if let Ok(secs) = std::env::var("GDEM_READ_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                builder = builder.read_timeout(Duration::from_secs(secs));
            }
        }
        Ok(builder)
    }

    /// Directory holding `ASTGTMV003_*_dem.tif` files.
    pub fn tile_dir(mut self, tile_dir: impl Into<PathBuf>) -> Self {
        self.tile_dir = Some(tile_dir.into());
        self
    }

    /// Custom raster storage; takes precedence over [`tile_dir`](Self::tile_dir).
    pub fn reader(mut self, reader: Arc<dyn RasterWindowReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Deadline for the raster reads of one call.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the service, failing when no storage was configured.
    pub fn build(self) -> Result<ElevationService> {
        let reader: Arc<dyn RasterWindowReader> = match (self.reader, self.tile_dir) {
            (Some(reader), _) => reader,
            (None, Some(dir)) => Arc::new(GeoTiffReader::new(dir)),
            (None, None) => return Err(GdemError::TileDirNotSet),
        };
        Ok(ElevationService {
            reader,
            read_timeout: self.read_timeout,
        })
    }
}
