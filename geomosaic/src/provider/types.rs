//! Imagery source types and traits

use std::fmt;

/// Errors that can occur while obtaining tile bytes from a source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Transport-level failure (DNS, connect, timeout, non-2xx status)
    Http(String),
    /// Zoom level not supported by this source
    UnsupportedZoom(u8),
    /// The source answered but the payload is unusable
    InvalidResponse(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Http(msg) => write!(f, "HTTP error: {}", msg),
            SourceError::UnsupportedZoom(zoom) => {
                write!(f, "zoom level {} not supported by source", zoom)
            }
            SourceError::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Trait for satellite imagery sources.
///
/// Implementors render one tile centered on the given coordinate and return
/// its raw encoded bytes. The reference implementation is
/// [`StaticMapSource`](crate::provider::StaticMapSource); tests substitute a
/// stub returning deterministic bytes.
pub trait ImageSource: Send + Sync {
    /// Fetches one rendered tile centered on (`lat`, `lon`).
    ///
    /// # Arguments
    ///
    /// * `lat`, `lon` - Center of the tile in degrees
    /// * `zoom` - Zoom level
    /// * `width`, `height` - Requested tile size in pixels
    ///
    /// # Returns
    ///
    /// Raw encoded image bytes (PNG for the reference source) or an error.
    fn fetch(
        &self,
        lat: f64,
        lon: f64,
        zoom: u8,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, SourceError>;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks whether this source supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}
