//! Geomosaic - satellite tile mosaics from a bounding box
//!
//! Downloads the rectangular grid of satellite tiles covering the box
//! between two geographic coordinates, strips the attribution band from
//! each tile, and stitches everything into one seamless image.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! - [`grid`] plans the tile grid: per-tile geographic step sizes and the
//!   row/column counts covering the box at a given zoom.
//! - [`fetch`] obtains one decoded, cropped tile per grid cell through an
//!   injectable [`provider::ImageSource`].
//! - [`mosaic`] composites a complete [`tile::TileGrid`] into the final
//!   image.
//!
//! [`service::MosaicService`] wires the stages together, adding the
//! confirmation gate and a bounded fetch worker pool.

pub mod coord;
pub mod fetch;
pub mod grid;
pub mod logging;
pub mod mosaic;
pub mod provider;
pub mod service;
pub mod tile;

pub use coord::GeoCoordinate;
pub use grid::{GridSpec, ATTRIBUTION_BAND_HEIGHT};
pub use service::{MosaicConfig, MosaicService, ServiceError};
