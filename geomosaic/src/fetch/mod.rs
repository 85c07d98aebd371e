//! Tile fetching and attribution cropping
//!
//! [`TileFetcher`] turns one planned grid cell into a decoded [`Tile`]:
//! it asks the imagery source for the rendered bytes, verifies the response
//! is genuine satellite imagery, decodes it, and crops the attribution band
//! from the bottom edge.
//!
//! The genuineness check inspects the PNG color type before decoding. The
//! static-map endpoint serves real satellite tiles as palette-indexed PNGs;
//! when it throttles or blocks a client it still answers 200 but with a
//! full-color placeholder. Anything that is not an indexed PNG therefore
//! means the source refused service, which is fatal for the whole run —
//! continuing would quietly stitch placeholders into the mosaic.

use crate::grid::GridCell;
use crate::provider::{ImageSource, SourceError};
use crate::tile::Tile;
use image::ImageReader;
use std::fmt;
use std::io::Cursor;
use tracing::debug;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG color type 3: palette-indexed.
const PALETTE_COLOR_TYPE: u8 = 3;

/// Errors from fetching and preparing a single tile.
#[derive(Debug)]
pub enum FetchError {
    /// The source answered with something other than palette-indexed
    /// imagery: it is refusing service. Fatal for the whole run.
    SourceRejected,
    /// Transport-level failure talking to the source
    Transport(SourceError),
    /// Response bytes could not be decoded into a usable image
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::SourceRejected => write!(
                f,
                "imagery source refused service: response is not palette-encoded satellite imagery"
            ),
            FetchError::Transport(e) => write!(f, "transport failure: {}", e),
            FetchError::Decode(msg) => write!(f, "image decode failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<SourceError> for FetchError {
    fn from(e: SourceError) -> Self {
        FetchError::Transport(e)
    }
}

/// Reads the color type out of a PNG IHDR without decoding the image.
///
/// Returns `None` when the bytes are not a PNG at all.
fn png_color_type(bytes: &[u8]) -> Option<u8> {
    // signature (8) + IHDR length/tag (8) + width/height (8) + bit depth (1)
    // puts the color type at offset 25
    if bytes.len() < 26 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    Some(bytes[25])
}

/// Fetches and prepares one tile per grid cell.
///
/// Generic over the imagery source so tests can substitute a stub returning
/// deterministic bytes.
pub struct TileFetcher<S: ImageSource> {
    source: S,
    zoom: u8,
    width: u32,
    height: u32,
    attribution_band: u32,
}

impl<S: ImageSource> TileFetcher<S> {
    /// Creates a fetcher for tiles of `width`×`height` pixels at `zoom`,
    /// cropping `attribution_band` rows from the bottom of each tile.
    pub fn new(source: S, zoom: u8, width: u32, height: u32, attribution_band: u32) -> Self {
        Self {
            source,
            zoom,
            width,
            height,
            attribution_band,
        }
    }

    /// Name of the underlying imagery source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Fetches the tile for one grid cell.
    ///
    /// Issues exactly one request to the imagery source. On success the
    /// returned tile is already cropped and carries the cell's grid
    /// position.
    pub fn fetch(&self, cell: GridCell) -> Result<Tile, FetchError> {
        let bytes = self.source.fetch(
            cell.center.lat,
            cell.center.lon,
            self.zoom,
            self.width,
            self.height,
        )?;

        if png_color_type(&bytes) != Some(PALETTE_COLOR_TYPE) {
            return Err(FetchError::SourceRejected);
        }

        let image = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| FetchError::Decode(format!("format detection: {}", e)))?
            .decode()
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .to_rgb8();

        let (width, height) = image.dimensions();
        if height <= self.attribution_band {
            return Err(FetchError::Decode(format!(
                "tile height {} px leaves nothing after cropping the {} px attribution band",
                height, self.attribution_band
            )));
        }

        let cropped =
            image::imageops::crop_imm(&image, 0, 0, width, height - self.attribution_band)
                .to_image();

        debug!(
            row = cell.row,
            col = cell.col,
            lat = cell.center.lat,
            lon = cell.center.lon,
            "fetched tile"
        );

        Ok(Tile::new(cell.row, cell.col, cropped))
    }
}
