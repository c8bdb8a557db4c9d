//! Pluggable raster storage behind the elevation service.

use async_trait::async_trait;

use crate::batch::PixelWindow;
use crate::error::ReadError;

/// Source of raster windows for named ASTGTM tiles.
///
/// The engine only ever asks for rectangular windows out of tiles it names
/// by filename; where the bytes live and how they are decoded is entirely
/// the implementation's concern. The bundled filesystem implementation is
/// [`GeoTiffReader`](crate::geotiff::GeoTiffReader); tests substitute
/// in-memory readers.
///
/// The returned vector must be row-major (window rows north to south,
/// columns west to east) and hold at least `window.len()` samples.
#[async_trait]
pub trait RasterWindowReader: Send + Sync {
    /// Read one window out of the named tile.
    async fn read_window(
        &self,
        filename: &str,
        window: PixelWindow,
    ) -> std::result::Result<Vec<f32>, ReadError>;
}
