//! Grouping of request points into per-tile pixel batches.
//!
//! Points are grouped by the tile that covers them, duplicate pixel hits
//! inside a tile collapse to a single raster sample, and each batch tracks
//! the minimal rectangular pixel window that has to be read from its tile.
//! After the windows are read, [`TileBatch::scatter`] writes each sample
//! back onto every point that resolved to its pixel.
//!
//! # Example
//!
//! ```
//! use gdem::batch::build_batches;
//! use gdem::point::Point;
//!
//! let points = [Point::new(51.9283, -3.1476), Point::new(51.9200, -3.1456)];
//! let batches = build_batches(&points).unwrap();
//!
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].filename(), "ASTGTMV003_N51W004_dem.tif");
//! ```

use std::collections::HashMap;

use crate::error::{GdemError, Result};
use crate::locator::{locate, PixelCoord, TileKey};
use crate::point::{validate_point, Point};

/// Half-open pixel rectangle to read from one tile raster.
///
/// `min_col`/`min_row` are inclusive, `max_col`/`max_row` exclusive, so a
/// single-pixel window has width and height 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub min_col: u32,
    pub min_row: u32,
    pub max_col: u32,
    pub max_row: u32,
}

impl PixelWindow {
    /// Columns covered by the window.
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col
    }

    /// Rows covered by the window.
    pub fn height(&self) -> u32 {
        self.max_row - self.min_row
    }

    /// Number of samples a raster for this window must hold.
    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One deduplicated pixel and the request indices that resolved to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelEntry {
    pub coord: PixelCoord,
    /// Positions in the original point sequence, in arrival order.
    pub point_indices: Vec<usize>,
}

/// All pixels a request needs from one tile.
///
/// Batches are built by [`build_batches`] and are read-only afterwards;
/// the inclusive extent fields always bound exactly the pixels held.
#[derive(Debug, Clone)]
pub struct TileBatch {
    key: TileKey,
    pixels: Vec<PixelEntry>,
    by_coord: HashMap<PixelCoord, usize>,
    min_col: u32,
    min_row: u32,
    max_col: u32,
    max_row: u32,
}

impl TileBatch {
    fn new(key: TileKey) -> Self {
        TileBatch {
            key,
            pixels: Vec::new(),
            by_coord: HashMap::new(),
            min_col: 0,
            min_row: 0,
            max_col: 0,
            max_row: 0,
        }
    }

    /// Record one point's pixel, deduplicating on exact (col, row) equality.
    fn add(&mut self, coord: PixelCoord, point_index: usize) {
        match self.by_coord.get(&coord) {
            Some(&slot) => self.pixels[slot].point_indices.push(point_index),
            None => {
                if self.pixels.is_empty() {
                    self.min_col = coord.col;
                    self.max_col = coord.col;
                    self.min_row = coord.row;
                    self.max_row = coord.row;
                } else {
                    self.min_col = self.min_col.min(coord.col);
                    self.max_col = self.max_col.max(coord.col);
                    self.min_row = self.min_row.min(coord.row);
                    self.max_row = self.max_row.max(coord.row);
                }
                self.by_coord.insert(coord, self.pixels.len());
                self.pixels.push(PixelEntry {
                    coord,
                    point_indices: vec![point_index],
                });
            }
        }
    }

    /// Tile this batch reads from.
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Filename of the tile this batch reads from.
    pub fn filename(&self) -> String {
        self.key.filename()
    }

    /// Deduplicated pixels in first-seen order.
    pub fn pixels(&self) -> &[PixelEntry] {
        &self.pixels
    }

    /// Number of distinct pixels (not points) in the batch.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// The half-open read window bounding all pixels in the batch.
    pub fn window(&self) -> PixelWindow {
        PixelWindow {
            min_col: self.min_col,
            min_row: self.min_row,
            max_col: self.max_col + 1,
            max_row: self.max_row + 1,
        }
    }

    /// Write window samples back onto the points that requested them.
    ///
    /// `raster` is the row-major window content returned by a reader; each
    /// pixel's sample lands on every point index recorded for it, so points
    /// belonging to other batches are untouched. A raster with fewer
    /// samples than [`window().len()`](PixelWindow::len) never scatters
    /// partially; it fails up front.
    ///
    /// # Arguments
    ///
    /// * `raster` - Samples for [`Self::window`], row-major
    /// * `points` - The full mutable point sequence of the request
    pub fn scatter(&self, raster: &[f32], points: &mut [Point]) -> Result<()> {
        let window = self.window();
        if raster.len() < window.len() {
            return Err(GdemError::RasterTooShort {
                filename: self.filename(),
                expected: window.len(),
                actual: raster.len(),
            });
        }

        let width = window.width() as usize;
        for entry in &self.pixels {
            let offset = (entry.coord.col - window.min_col) as usize
                + (entry.coord.row - window.min_row) as usize * width;
            let value = raster[offset];
            for &index in &entry.point_indices {
                points[index].elev = Some(value);
            }
        }
        Ok(())
    }
}

/// Group points into per-tile batches, keeping first-seen tile order.
///
/// Every point is validated before any grouping of it happens; the first
/// invalid point aborts the whole build with its index. On success each
/// point index appears in exactly one batch.
///
/// # Arguments
///
/// * `points` - The request sequence, in caller order
///
/// # Returns
///
/// One [`TileBatch`] per distinct tile, ordered by first appearance.
pub fn build_batches(points: &[Point]) -> Result<Vec<TileBatch>> {
    let mut batches: Vec<TileBatch> = Vec::new();
    let mut slots: HashMap<TileKey, usize> = HashMap::new();

    for (index, point) in points.iter().enumerate() {
        validate_point(index, point)?;
        let (key, pixel) = locate(point.lat, point.lng);

        let slot = *slots.entry(key).or_insert_with(|| {
            batches.push(TileBatch::new(key));
            batches.len() - 1
        });
        batches[slot].add(pixel, index);
    }

    Ok(batches)
}
