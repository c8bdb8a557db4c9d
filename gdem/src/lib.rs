//! # gdem - ASTER GDEM Elevation Library
//!
//! Batched elevation lookups from ASTER GDEM v3 (`ASTGTMV003_*_dem.tif`)
//! GeoTIFF tiles.
//!
//! ## Features
//!
//! - **Batched**: points group by tile, duplicate pixels collapse, and only
//!   the minimal raster window per tile is read
//! - **Concurrent**: tile windows decode in parallel, first failure cancels
//!   the rest
//! - **All-or-nothing**: a call annotates every point or returns an error,
//!   never partial results
//! - **Pluggable storage**: swap the bundled filesystem GeoTIFF reader for
//!   any [`RasterWindowReader`](reader::RasterWindowReader)
//!
//! ## Quick Start
//!
//! ```ignore
//! use gdem::locator;
//! use gdem::point::Point;
//! use gdem::service::ElevationServiceBuilder;
//!
//! // Which tile covers a point, and which pixel inside it?
//! let (key, pixel) = locator::locate(51.9283, -3.1476);
//! assert_eq!(key.filename(), "ASTGTMV003_N51W004_dem.tif");
//!
//! // Resolve a whole batch against a tile directory
//! let service = ElevationServiceBuilder::new()
//!     .tile_dir("/data/astgtm")
//!     .build()?;
//! let annotated = service
//!     .get_elevations(&[Point::new(51.9283, -3.1476)])
//!     .await?;
//! println!("elevation: {:?}", annotated[0].elev);
//! ```
//!
//! ## ASTGTM Data Format
//!
//! ASTER GDEM v3 ships one GeoTIFF per 1° × 1° cell, 3601 × 3601 samples
//! with pixel centers on exact degree lines, elevation in meters as signed
//! 16-bit integers. Tiles exist for latitudes 83°S to 83°N.
//!
//! ## Data Sources
//!
//! Download ASTGTM tiles from:
//! - <https://search.earthdata.nasa.gov/>
//! - <https://lpdaac.usgs.gov/products/astgtmv003/>

pub mod batch;
pub mod error;
pub mod geotiff;
pub mod locator;
pub mod point;
pub mod reader;
pub mod service;

#[cfg(feature = "serde")]
pub mod json;

// Re-export main types at crate root for convenience
pub use batch::{build_batches, PixelWindow, TileBatch};
pub use error::{GdemError, ReadError, Result};
pub use geotiff::GeoTiffReader;
pub use locator::{locate, PixelCoord, TileKey};
pub use point::Point;
pub use reader::RasterWindowReader;
pub use service::{ElevationService, ElevationServiceBuilder};

#[cfg(feature = "serde")]
pub use json::ElevationRequest;
