//! Mosaic assembly
//!
//! Composites a complete [`TileGrid`] into one seamless image. Grid row 0 is
//! the northernmost row, so tile (row, col) lands at pixel offset
//! `(col × tile_width, row × tile_height)` and north ends up at the top of
//! the canvas. Purely in-memory; no network or disk access.

use crate::coord::GeoCoordinate;
use crate::tile::TileGrid;
use image::RgbImage;
use std::fmt;

/// Errors from assembling a tile grid into a mosaic.
///
/// These indicate a malformed grid. If the fetch layer returned uniform
/// tiles for every cell they are unreachable, so assembly fails loudly
/// instead of attempting partial recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum MosaicError {
    /// Grid has no cells
    EmptyGrid,
    /// A cell was never filled
    MissingTile { row: u32, col: u32 },
    /// A tile's pixel dimensions differ from the rest of the grid
    TileSizeMismatch {
        row: u32,
        col: u32,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MosaicError::EmptyGrid => write!(f, "tile grid is empty"),
            MosaicError::MissingTile { row, col } => {
                write!(f, "tile grid is missing cell ({}, {})", row, col)
            }
            MosaicError::TileSizeMismatch {
                row,
                col,
                width,
                height,
                expected_width,
                expected_height,
            } => write!(
                f,
                "tile ({}, {}) is {}×{} px, expected {}×{}",
                row, col, width, height, expected_width, expected_height
            ),
        }
    }
}

impl std::error::Error for MosaicError {}

/// Assembles a complete grid of uniform tiles into one mosaic image.
///
/// The canvas measures `cols × tile_width` by `rows × tile_height` pixels.
/// Deterministic and idempotent: the same grid always produces
/// pixel-identical output.
///
/// # Errors
///
/// Fails with [`MosaicError`] when the grid is empty, has unfilled cells,
/// or holds tiles of differing pixel dimensions.
pub fn assemble(grid: &TileGrid) -> Result<RgbImage, MosaicError> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(MosaicError::EmptyGrid);
    }

    let first = grid
        .get(0, 0)
        .ok_or(MosaicError::MissingTile { row: 0, col: 0 })?;
    let (tile_width, tile_height) = first.dimensions();

    let mut canvas = RgbImage::new(grid.cols() * tile_width, grid.rows() * tile_height);

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let tile = grid
                .get(row, col)
                .ok_or(MosaicError::MissingTile { row, col })?;

            let (width, height) = tile.dimensions();
            if (width, height) != (tile_width, tile_height) {
                return Err(MosaicError::TileSizeMismatch {
                    row,
                    col,
                    width,
                    height,
                    expected_width: tile_width,
                    expected_height: tile_height,
                });
            }

            let x = (col * tile_width) as i64;
            let y = (row * tile_height) as i64;
            image::imageops::replace(&mut canvas, tile.image(), x, y);
        }
    }

    Ok(canvas)
}

/// Output filename encoding both corners and the zoom level, e.g.
/// `output-45.1800992,5.7074098-45.182037,5.712044-20.png`.
pub fn output_filename(start: &GeoCoordinate, end: &GeoCoordinate, zoom: u8) -> String {
    format!("output-{},{}-{},{}-{}.png", start.lat, start.lon, end.lat, end.lon, zoom)
}
