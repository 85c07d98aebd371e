//! Tile grid planning
//!
//! Converts a geographic bounding box plus zoom level into a deterministic
//! grid of tile-sized cells: the geographic step covered by one tile on each
//! axis, the number of rows and columns needed to cover the box, and the
//! center coordinate of every cell.
//!
//! The grid always overshoots the requested box: a fractional remainder on
//! either axis still yields a full extra tile, so the box is never
//! undercovered. Cell positions are logical mosaic positions — row 0 is the
//! northernmost row, column 0 the westernmost column — independent of which
//! corner was supplied as the start.

use crate::coord::{CoordError, GeoCoordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use std::fmt;

/// Degrees of longitude covered by one pixel at the reference zoom.
///
/// Empirical calibration value for the static-map tile source. Close to the
/// Web Mercator figure of 360 / (256 * 2^21) but not bit-identical; only
/// whole-tile counts matter for grid placement, so the two are
/// interchangeable here.
pub const LON_DEGREES_PER_PIXEL: f64 = 0.000000669921875;

/// Degrees of latitude covered by one pixel at the reference zoom.
///
/// Empirical calibration value, valid for mid-latitudes where the source's
/// projection stretch is moderate.
pub const LAT_DEGREES_PER_PIXEL: f64 = 0.0000004725;

/// Zoom level at which the degrees-per-pixel constants were calibrated.
pub const REFERENCE_ZOOM: u8 = 21;

/// Maximum zoom level accepted by the planner.
pub const MAX_ZOOM: u8 = 21;

/// Height in pixels of the attribution band at the bottom of each source
/// tile, removed before assembly.
pub const ATTRIBUTION_BAND_HEIGHT: u32 = 22;

/// Errors from grid planning precondition checks.
///
/// All of these are caller parameter violations and are raised before any
/// network activity takes place.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Zoom level outside the supported range
    InvalidZoom(u8),
    /// Tile width or height is zero
    InvalidTileSize { width: u32, height: u32 },
    /// Attribution band would consume the whole tile
    BandTooTall { band: u32, tile_height: u32 },
    /// Bounding-box corner outside valid geographic range
    InvalidCoordinate(CoordError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidZoom(zoom) => {
                write!(f, "zoom level {} outside supported range 0-{}", zoom, MAX_ZOOM)
            }
            GridError::InvalidTileSize { width, height } => {
                write!(f, "tile dimensions {}×{} must be positive", width, height)
            }
            GridError::BandTooTall { band, tile_height } => {
                write!(
                    f,
                    "attribution band of {} px must be shorter than the {} px tile",
                    band, tile_height
                )
            }
            GridError::InvalidCoordinate(e) => write!(f, "invalid coordinate: {}", e),
        }
    }
}

impl std::error::Error for GridError {}

impl From<CoordError> for GridError {
    fn from(e: CoordError) -> Self {
        GridError::InvalidCoordinate(e)
    }
}

/// One cell of the planned grid.
///
/// `row`/`col` are logical mosaic positions (row 0 = northernmost,
/// col 0 = westernmost); `center` is the coordinate to request the tile at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub center: GeoCoordinate,
}

/// A planned tile grid covering a geographic bounding box.
///
/// Created once per run by [`GridSpec::plan`] and never mutated. Consumed by
/// the fetch loop through [`GridSpec::cells`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    start: GeoCoordinate,
    step_lat: f64,
    step_lon: f64,
    rows: u32,
    cols: u32,
    lat_direction: i8,
    lon_direction: i8,
}

impl GridSpec {
    /// Plans the grid for the box between `start` and `end`.
    ///
    /// The box may be given in any orientation; direction flags record the
    /// per-axis sign of `end - start`. Counts are computed as
    /// `ceil(extent / step)` with a floor of one, so degenerate boxes still
    /// produce a 1×1 grid and fractional remainders a full extra tile.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when zoom, tile dimensions, band height, or
    /// either coordinate violates its precondition.
    pub fn plan(
        start: GeoCoordinate,
        end: GeoCoordinate,
        zoom: u8,
        tile_width: u32,
        tile_height: u32,
        attribution_band: u32,
    ) -> Result<Self, GridError> {
        if zoom > MAX_ZOOM {
            return Err(GridError::InvalidZoom(zoom));
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(GridError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        if attribution_band >= tile_height {
            return Err(GridError::BandTooTall {
                band: attribution_band,
                tile_height,
            });
        }
        for corner in [&start, &end] {
            if !(MIN_LAT..=MAX_LAT).contains(&corner.lat) || !corner.lat.is_finite() {
                return Err(CoordError::InvalidLatitude(corner.lat).into());
            }
            if !(MIN_LON..=MAX_LON).contains(&corner.lon) || !corner.lon.is_finite() {
                return Err(CoordError::InvalidLongitude(corner.lon).into());
            }
        }

        // One tile covers step_* degrees at this zoom. The attribution band
        // is cropped from every tile, so it contributes nothing to latitude
        // coverage.
        let scale = 2.0_f64.powi((REFERENCE_ZOOM - zoom) as i32);
        let step_lon = LON_DEGREES_PER_PIXEL * tile_width as f64 * scale;
        let step_lat = LAT_DEGREES_PER_PIXEL * (tile_height - attribution_band) as f64 * scale;

        let rows = ((end.lat - start.lat).abs() / step_lat).ceil().max(1.0) as u32;
        let cols = ((end.lon - start.lon).abs() / step_lon).ceil().max(1.0) as u32;

        let lat_direction = if end.lat >= start.lat { 1 } else { -1 };
        let lon_direction = if end.lon >= start.lon { 1 } else { -1 };

        Ok(Self {
            start,
            step_lat,
            step_lon,
            rows,
            cols,
            lat_direction,
            lon_direction,
        })
    }

    /// Number of tile rows needed to cover the box.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tile columns needed to cover the box.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of tiles to fetch. Exposed so a boundary layer can gate
    /// large runs behind a confirmation before any network activity.
    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Degrees of latitude covered by one cropped tile.
    pub fn step_lat(&self) -> f64 {
        self.step_lat
    }

    /// Degrees of longitude covered by one tile.
    pub fn step_lon(&self) -> f64 {
        self.step_lon
    }

    /// Sign of `end.lat - start.lat`: +1 if the end corner is north of the
    /// start, -1 otherwise.
    pub fn lat_direction(&self) -> i8 {
        self.lat_direction
    }

    /// Sign of `end.lon - start.lon`: +1 if the end corner is east of the
    /// start, -1 otherwise.
    pub fn lon_direction(&self) -> i8 {
        self.lon_direction
    }

    /// Latitude of the northernmost cell center.
    fn north_lat(&self) -> f64 {
        if self.lat_direction > 0 {
            self.start.lat + self.step_lat * (self.rows - 1) as f64
        } else {
            self.start.lat
        }
    }

    /// Longitude of the westernmost cell center.
    fn west_lon(&self) -> f64 {
        if self.lon_direction > 0 {
            self.start.lon
        } else {
            self.start.lon - self.step_lon * (self.cols - 1) as f64
        }
    }

    /// The cell at logical grid position (row, col).
    ///
    /// The grid is anchored at the start coordinate and advances toward the
    /// end corner in whole steps; this maps logical positions back onto that
    /// traversal so the same cell centers come out regardless of box
    /// orientation.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside the grid.
    pub fn cell(&self, row: u32, col: u32) -> GridCell {
        assert!(row < self.rows && col < self.cols, "cell outside grid");
        GridCell {
            row,
            col,
            center: GeoCoordinate {
                lat: self.north_lat() - self.step_lat * row as f64,
                lon: self.west_lon() + self.step_lon * col as f64,
            },
        }
    }

    /// Iterates every cell in row-major order, north row first.
    pub fn cells(&self) -> GridCells<'_> {
        GridCells {
            spec: self,
            index: 0,
            total: self.rows as u64 * self.cols as u64,
        }
    }
}

/// Row-major iterator over the cells of a [`GridSpec`].
pub struct GridCells<'a> {
    spec: &'a GridSpec,
    index: u64,
    total: u64,
}

impl Iterator for GridCells<'_> {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if self.index == self.total {
            return None;
        }
        let row = (self.index / self.spec.cols as u64) as u32;
        let col = (self.index % self.spec.cols as u64) as u32;
        self.index += 1;
        Some(self.spec.cell(row, col))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCells<'_> {}
