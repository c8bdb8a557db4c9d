//! Tile addressing for ASTER GDEM v3 rasters.
//!
//! This module maps geographic coordinates onto the global grid of 1° × 1°
//! ASTGTM tiles and onto pixel positions inside a tile's raster.
//!
//! # Filename Format
//!
//! Tiles follow the naming convention:
//! `ASTGTMV003_{N|S}{lat}{E|W}{lng}_dem.tif`
//!
//! - Latitude: 2 digits with N/S prefix (e.g., N51, S09)
//! - Longitude: 3 digits with E/W prefix (e.g., E138, W004)
//!
//! The name encodes the tile's **southwest corner** in whole degrees.
//!
//! # Pixel Grid
//!
//! Rasters hold 3601 × 3601 samples with pixel centers on exact degree
//! lines, so the grid anchor (center of the upper-left pixel) sits half a
//! pixel north-west of the tile's north-west corner.

/// Samples per degree along each raster axis.
pub const PIXELS_PER_DEGREE: u32 = 3600;

/// Angular width of one raster pixel in degrees.
pub const PIXEL_WIDTH: f64 = 1.0 / PIXELS_PER_DEGREE as f64;

/// Northernmost/southernmost latitude covered by ASTGTM tiles.
pub const MAX_LATITUDE: f64 = 83.0;

/// Longitude bound accepted for lookups.
pub const MAX_LONGITUDE: f64 = 180.0;

const FILENAME_PREFIX: &str = "ASTGTMV003_";
const FILENAME_SUFFIX: &str = "_dem.tif";

/// Whole-degree southwest corner identifying one ASTGTM tile.
///
/// Two points resolve to the same `TileKey` exactly when their elevations
/// live in the same tile file, so the key doubles as the grouping key for
/// batched lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Southwest corner latitude in whole degrees.
    pub lat: i32,
    /// Southwest corner longitude in whole degrees.
    pub lng: i32,
}

impl TileKey {
    /// Tile containing the given point.
    ///
    /// Negative whole degrees map one tile further south/west than their
    /// `floor`: `lng = -4.0` gives origin `-5`, so tile `W005` serves it
    /// (its easternmost pixel column is centered on -4.0 exactly).
    ///
    /// # Examples
    ///
    /// ```
    /// use gdem::locator::TileKey;
    ///
    /// assert_eq!(TileKey::for_point(51.9283, -3.1476), TileKey { lat: 51, lng: -4 });
    /// assert_eq!(TileKey::for_point(-0.5, -4.0), TileKey { lat: -1, lng: -5 });
    /// ```
    pub fn for_point(lat: f64, lng: f64) -> Self {
        TileKey {
            lat: tile_origin(lat),
            lng: tile_origin(lng),
        }
    }

    /// The `ASTGTMV003_*_dem.tif` filename for this tile.
    ///
    /// # Examples
    ///
    /// ```
    /// use gdem::locator::TileKey;
    ///
    /// let key = TileKey { lat: 51, lng: -4 };
    /// assert_eq!(key.filename(), "ASTGTMV003_N51W004_dem.tif");
    /// ```
    pub fn filename(&self) -> String {
        let lat_prefix = if self.lat >= 0 { 'N' } else { 'S' };
        let lng_prefix = if self.lng >= 0 { 'E' } else { 'W' };

        format!(
            "{}{}{:02}{}{:03}{}",
            FILENAME_PREFIX,
            lat_prefix,
            self.lat.abs(),
            lng_prefix,
            self.lng.abs(),
            FILENAME_SUFFIX
        )
    }

    /// Parse an ASTGTM filename back into its tile key.
    ///
    /// Accepts a bare filename or a full path; returns `None` for anything
    /// that is not a well-formed `ASTGTMV003_{N|S}xx{E|W}xxx_dem.tif` name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gdem::locator::TileKey;
    ///
    /// assert_eq!(
    ///     TileKey::parse("ASTGTMV003_N51W004_dem.tif"),
    ///     Some(TileKey { lat: 51, lng: -4 })
    /// );
    /// assert_eq!(TileKey::parse("/tiles/ASTGTMV003_S09E151_dem.tif"),
    ///     Some(TileKey { lat: -9, lng: 151 }));
    /// assert_eq!(TileKey::parse("N51W004.hgt"), None);
    /// ```
    pub fn parse(filename: &str) -> Option<Self> {
        // Extract just the filename if a path is given
        let name = filename
            .rsplit('/')
            .next()
            .unwrap_or(filename)
            .rsplit('\\')
            .next()
            .unwrap_or(filename);

        let core = name
            .strip_prefix(FILENAME_PREFIX)?
            .strip_suffix(FILENAME_SUFFIX)?;

        // Must be exactly 7 characters: N51W004
        if core.len() != 7 {
            return None;
        }

        let chars: Vec<char> = core.chars().collect();

        let lat_sign = match chars[0] {
            'N' | 'n' => 1,
            'S' | 's' => -1,
            _ => return None,
        };
        let lat: i32 = core[1..3].parse().ok()?;

        let lng_sign = match chars[3] {
            'E' | 'e' => 1,
            'W' | 'w' => -1,
            _ => return None,
        };
        let lng: i32 = core[4..7].parse().ok()?;

        Some(TileKey {
            lat: lat * lat_sign,
            lng: lng * lng_sign,
        })
    }
}

/// Integer pixel position inside one tile's raster.
///
/// `col` counts west to east, `row` north to south, both from the raster's
/// upper-left sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub col: u32,
    pub row: u32,
}

/// Resolve a point to its tile and the raster pixel covering it.
///
/// Pure tile-grid arithmetic with no failure path; callers validate range
/// and finiteness first. For in-range coordinates the pixel indices fall in
/// `0..=3600` on both axes.
///
/// # Arguments
///
/// * `lat` - Latitude in decimal degrees (±83)
/// * `lng` - Longitude in decimal degrees (±180)
///
/// # Examples
///
/// ```
/// use gdem::locator::locate;
///
/// let (key, pixel) = locate(51.92830, -3.14760);
/// assert_eq!(key.filename(), "ASTGTMV003_N51W004_dem.tif");
/// assert_eq!((pixel.col, pixel.row), (3069, 258));
/// ```
pub fn locate(lat: f64, lng: f64) -> (TileKey, PixelCoord) {
    let key = TileKey::for_point(lat, lng);

    // Center of the upper-left pixel, half a pixel outside the NW corner.
    let anchor_lng = key.lng as f64 - PIXEL_WIDTH / 2.0;
    let anchor_lat = key.lat as f64 + 1.0 + PIXEL_WIDTH / 2.0;

    let col = ((lng - anchor_lng) / PIXEL_WIDTH).trunc() as u32;
    let row = ((anchor_lat - lat) / PIXEL_WIDTH).trunc() as u32;

    (key, PixelCoord { col, row })
}

/// Check that coordinates fall inside ASTGTM coverage.
///
/// Tiles exist for latitudes −83° to +83°; longitude wraps the full globe.
pub fn is_valid_coord(lat: f64, lng: f64) -> bool {
    (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lng)
}

/// Whole-degree origin for one axis.
///
/// Not `floor`: exact negative integers step one further down, so
/// `-4.0` yields `-5` while `-4.2` yields `-5` as well and `-3.9` yields
/// `-4`. Whole-degree coordinates sit on pixel centers shared by two
/// tiles, and this rule always picks the south/west one.
fn tile_origin(v: f64) -> i32 {
    if v < 0.0 {
        (v - 1.0).trunc() as i32
    } else {
        v.trunc() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_origins() {
        assert_eq!(TileKey::for_point(51.9283, 0.5), TileKey { lat: 51, lng: 0 });
        assert_eq!(TileKey::for_point(0.0, 0.0), TileKey { lat: 0, lng: 0 });
        assert_eq!(
            TileKey::for_point(27.9881, 86.9250),
            TileKey { lat: 27, lng: 86 }
        );
        // Whole positive degrees stay in their own tile
        assert_eq!(TileKey::for_point(35.0, 138.0), TileKey { lat: 35, lng: 138 });
    }

    #[test]
    fn test_negative_origins() {
        // trunc(-3.1476 - 1) = -4
        assert_eq!(
            TileKey::for_point(51.9283, -3.1476),
            TileKey { lat: 51, lng: -4 }
        );
        // trunc(-0.5 - 1) = -1
        assert_eq!(TileKey::for_point(-0.5, -0.5), TileKey { lat: -1, lng: -1 });
    }

    #[test]
    fn test_negative_whole_degree_origins() {
        // Exact negative whole degrees step one tile further south/west:
        // trunc(-4.0 - 1) = -5, not floor(-4.0) = -4.
        assert_eq!(TileKey::for_point(0.5, -4.0), TileKey { lat: 0, lng: -5 });
        assert_eq!(TileKey::for_point(-83.0, 0.5), TileKey { lat: -84, lng: 0 });
        assert_eq!(
            TileKey::for_point(0.5, -180.0),
            TileKey { lat: 0, lng: -181 }
        );
        // Negative zero is not < 0
        assert_eq!(TileKey::for_point(-0.0, -0.0), TileKey { lat: 0, lng: 0 });
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(
            TileKey { lat: 51, lng: -4 }.filename(),
            "ASTGTMV003_N51W004_dem.tif"
        );
        assert_eq!(
            TileKey { lat: 0, lng: 0 }.filename(),
            "ASTGTMV003_N00E000_dem.tif"
        );
        assert_eq!(
            TileKey { lat: -9, lng: 151 }.filename(),
            "ASTGTMV003_S09E151_dem.tif"
        );
        assert_eq!(
            TileKey { lat: -84, lng: -181 }.filename(),
            "ASTGTMV003_S84W181_dem.tif"
        );
    }

    #[test]
    fn test_parse_filename() {
        assert_eq!(
            TileKey::parse("ASTGTMV003_N51W004_dem.tif"),
            Some(TileKey { lat: 51, lng: -4 })
        );
        assert_eq!(
            TileKey::parse("ASTGTMV003_S09E151_dem.tif"),
            Some(TileKey { lat: -9, lng: 151 })
        );
        assert_eq!(
            TileKey::parse("/data/tiles/ASTGTMV003_N00E000_dem.tif"),
            Some(TileKey { lat: 0, lng: 0 })
        );
        assert_eq!(
            TileKey::parse("C:\\tiles\\ASTGTMV003_N35E138_dem.tif"),
            Some(TileKey { lat: 35, lng: 138 })
        );
    }

    #[test]
    fn test_parse_filename_invalid() {
        assert_eq!(TileKey::parse("N51W004.hgt"), None); // Wrong scheme
        assert_eq!(TileKey::parse("ASTGTMV003_N51W04_dem.tif"), None); // Too short
        assert_eq!(TileKey::parse("ASTGTMV003_X51W004_dem.tif"), None); // Bad prefix
        assert_eq!(TileKey::parse("ASTGTMV003_N51X004_dem.tif"), None); // Bad prefix
        assert_eq!(TileKey::parse("ASTGTMV003_NAAW004_dem.tif"), None); // Non-numeric
        assert_eq!(TileKey::parse("ASTGTMV003_N51W004_num.tif"), None); // Wrong suffix
    }

    #[test]
    fn test_parse_roundtrip() {
        let keys = [
            TileKey { lat: 51, lng: -4 },
            TileKey { lat: -84, lng: -181 },
            TileKey { lat: 83, lng: 180 },
            TileKey { lat: 0, lng: 0 },
        ];
        for key in keys {
            assert_eq!(TileKey::parse(&key.filename()), Some(key));
        }
    }

    #[test]
    fn test_locate_pixel_coords() {
        let (key, pixel) = locate(51.92830, -3.14760);
        assert_eq!(key, TileKey { lat: 51, lng: -4 });
        assert_eq!(pixel, PixelCoord { col: 3069, row: 258 });

        let (key, pixel) = locate(51.92002, -3.14563);
        assert_eq!(key, TileKey { lat: 51, lng: -4 });
        assert_eq!(pixel, PixelCoord { col: 3076, row: 288 });

        // Everest
        let (key, pixel) = locate(27.9881, 86.9250);
        assert_eq!(key, TileKey { lat: 27, lng: 86 });
        assert_eq!(pixel, PixelCoord { col: 3330, row: 43 });
    }

    #[test]
    fn test_locate_grid_edges() {
        // Whole degrees land on the last (shared) sample of the SW tile
        let (key, pixel) = locate(52.0, -4.0);
        assert_eq!(key, TileKey { lat: 52, lng: -5 });
        assert_eq!(pixel, PixelCoord { col: 3600, row: 3600 });

        // Top row of a southern-hemisphere tile
        let (key, pixel) = locate(-83.0, 0.5);
        assert_eq!(key, TileKey { lat: -84, lng: 0 });
        assert_eq!(pixel.row, 0);

        // Extremes stay inside 0..=3600
        let (_, pixel) = locate(83.0, 180.0);
        assert_eq!(pixel, PixelCoord { col: 0, row: 3600 });
        let (_, pixel) = locate(-83.0, -180.0);
        assert_eq!(pixel, PixelCoord { col: 3600, row: 0 });
    }

    #[test]
    fn test_is_valid_coord() {
        assert!(is_valid_coord(0.0, 0.0));
        assert!(is_valid_coord(83.0, 180.0));
        assert!(is_valid_coord(-83.0, -180.0));
        assert!(is_valid_coord(51.9283, -3.1476));

        assert!(!is_valid_coord(83.1, 0.0)); // Lat too high
        assert!(!is_valid_coord(-87.0, 0.0)); // Lat too low
        assert!(!is_valid_coord(0.0, 180.5)); // Lng too high
        assert!(!is_valid_coord(0.0, -181.0)); // Lng too low
    }
}
