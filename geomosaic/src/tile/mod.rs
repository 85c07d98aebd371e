//! Fetched tiles and their grid container
//!
//! [`Tile`] is one cropped satellite image tagged with its logical grid
//! position. [`TileGrid`] holds tiles by explicit (row, col) index so
//! placement stays deterministic regardless of fetch completion order, and
//! each cell can only be written once.

use image::RgbImage;
use std::fmt;

/// Errors from placing tiles into a [`TileGrid`].
#[derive(Debug, Clone, PartialEq)]
pub enum TileGridError {
    /// Tile position outside the grid dimensions
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
    /// Cell was already written
    AlreadyFilled { row: u32, col: u32 },
}

impl fmt::Display for TileGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileGridError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "tile position ({}, {}) outside {}×{} grid",
                row, col, rows, cols
            ),
            TileGridError::AlreadyFilled { row, col } => {
                write!(f, "grid cell ({}, {}) filled twice", row, col)
            }
        }
    }
}

impl std::error::Error for TileGridError {}

/// One fetched, cropped tile and its logical grid position.
#[derive(Debug, Clone)]
pub struct Tile {
    row: u32,
    col: u32,
    image: RgbImage,
}

impl Tile {
    pub fn new(row: u32, col: u32, image: RgbImage) -> Self {
        Self { row, col, image }
    }

    /// Logical grid row (0 = northernmost).
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Logical grid column (0 = westernmost).
    pub fn col(&self) -> u32 {
        self.col
    }

    /// The cropped tile pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixel dimensions of the tile.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Index-addressed 2-D tile container with single-writer cells.
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: u32,
    cols: u32,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Creates an empty grid of the given dimensions.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Places a tile at the position it carries.
    ///
    /// # Errors
    ///
    /// Fails if the position is outside the grid or the cell has already
    /// been written.
    pub fn place(&mut self, tile: Tile) -> Result<(), TileGridError> {
        let (row, col) = (tile.row(), tile.col());
        if row >= self.rows || col >= self.cols {
            return Err(TileGridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let cell = &mut self.cells[row as usize * self.cols as usize + col as usize];
        if cell.is_some() {
            return Err(TileGridError::AlreadyFilled { row, col });
        }
        *cell = Some(tile);
        Ok(())
    }

    /// The tile at (row, col), if fetched.
    pub fn get(&self, row: u32, col: u32) -> Option<&Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize].as_ref()
    }

    /// Number of cells written so far.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when every cell has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }
}
