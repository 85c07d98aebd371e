//! Mosaic build orchestration
//!
//! [`MosaicService`] drives the whole run: plan the grid, gate large runs
//! behind a caller-supplied confirmation predicate, fetch every tile across
//! a bounded worker pool, and assemble the result. Tiles land in the
//! [`TileGrid`] by explicit (row, col) index, so the output is identical
//! whatever order fetches complete in.
//!
//! One failed fetch aborts the run: the abort flag stops pending work,
//! queued batches are skipped, and no partial mosaic is ever produced.

use crate::coord::GeoCoordinate;
use crate::fetch::{FetchError, TileFetcher};
use crate::grid::{GridCell, GridError, GridSpec, ATTRIBUTION_BAND_HEIGHT};
use crate::mosaic::{self, MosaicError};
use crate::provider::ImageSource;
use crate::tile::{Tile, TileGrid, TileGridError};
use image::RgbImage;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Tunable parameters for a mosaic run.
#[derive(Debug, Clone, Copy)]
pub struct MosaicConfig {
    /// Zoom level for every tile
    pub zoom: u8,
    /// Requested tile width in pixels
    pub tile_width: u32,
    /// Requested tile height in pixels, before attribution cropping
    pub tile_height: u32,
    /// Rows cropped from the bottom of each tile
    pub attribution_band: u32,
    /// Concurrent tile fetches. 1 reproduces the strictly sequential
    /// row-by-row traversal, which is gentlest on the upstream source.
    pub parallel_fetches: usize,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            zoom: 20,
            tile_width: 640,
            tile_height: 640,
            attribution_band: ATTRIBUTION_BAND_HEIGHT,
            parallel_fetches: 1,
        }
    }
}

/// Errors from a mosaic run.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller parameter rejected before any network activity
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] GridError),
    /// Confirmation predicate declined the run
    #[error("aborted before fetching {tile_count} tiles")]
    Aborted { tile_count: usize },
    /// A tile fetch failed; the run was aborted
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Internal invariant violation while placing tiles
    #[error("grid placement error: {0}")]
    Placement(#[from] TileGridError),
    /// Internal invariant violation during assembly
    #[error("mosaic assembly failed: {0}")]
    Assembly(#[from] MosaicError),
}

/// Orchestrates plan → fetch → assemble for one mosaic.
pub struct MosaicService<S: ImageSource> {
    fetcher: TileFetcher<S>,
    config: MosaicConfig,
}

impl<S: ImageSource> MosaicService<S> {
    pub fn new(source: S, config: MosaicConfig) -> Self {
        let fetcher = TileFetcher::new(
            source,
            config.zoom,
            config.tile_width,
            config.tile_height,
            config.attribution_band,
        );
        Self { fetcher, config }
    }

    /// Plans the tile grid for the box between `start` and `end` without
    /// fetching anything.
    pub fn plan(&self, start: GeoCoordinate, end: GeoCoordinate) -> Result<GridSpec, GridError> {
        GridSpec::plan(
            start,
            end,
            self.config.zoom,
            self.config.tile_width,
            self.config.tile_height,
            self.config.attribution_band,
        )
    }

    /// Builds the complete mosaic for the box between `start` and `end`.
    ///
    /// `proceed` is consulted once with the planned grid before any network
    /// activity; returning false aborts the run. `progress` is invoked as
    /// `(completed, total)` each time a tile finishes, possibly from worker
    /// threads.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on invalid parameters, a declined
    /// confirmation, any failed fetch, or a malformed grid. No partial
    /// mosaic is returned in any failure case.
    pub fn build_mosaic<P, F>(
        &self,
        start: GeoCoordinate,
        end: GeoCoordinate,
        proceed: P,
        progress: F,
    ) -> Result<RgbImage, ServiceError>
    where
        P: FnOnce(&GridSpec) -> bool,
        F: Fn(usize, usize) + Send + Sync,
    {
        let spec = self.plan(start, end)?;
        info!(
            rows = spec.rows(),
            cols = spec.cols(),
            tiles = spec.tile_count(),
            zoom = self.config.zoom,
            source = self.fetcher.source_name(),
            "planned tile grid"
        );

        if !proceed(&spec) {
            return Err(ServiceError::Aborted {
                tile_count: spec.tile_count(),
            });
        }

        let fetch_started = Instant::now();
        let grid = self.fetch_grid(&spec, &progress)?;
        info!(
            tiles = spec.tile_count(),
            elapsed_ms = fetch_started.elapsed().as_millis() as u64,
            "fetched tile grid"
        );

        let assemble_started = Instant::now();
        let mosaic = mosaic::assemble(&grid)?;
        info!(
            width = mosaic.width(),
            height = mosaic.height(),
            elapsed_ms = assemble_started.elapsed().as_millis() as u64,
            "assembled mosaic"
        );

        Ok(mosaic)
    }

    /// Fetches every cell of the planned grid across a bounded pool of
    /// worker threads, batch by batch.
    fn fetch_grid<F>(&self, spec: &GridSpec, progress: &F) -> Result<TileGrid, ServiceError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let cells: Vec<GridCell> = spec.cells().collect();
        let total = cells.len();
        let abort = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<Result<Tile, FetchError>>();

        thread::scope(|scope| {
            for batch in cells.chunks(self.config.parallel_fetches.max(1)) {
                if abort.load(Ordering::SeqCst) {
                    break;
                }

                let handles: Vec<_> = batch
                    .iter()
                    .map(|&cell| {
                        let tx = tx.clone();
                        let fetcher = &self.fetcher;
                        let abort = &abort;
                        let completed = &completed;
                        scope.spawn(move || {
                            if abort.load(Ordering::SeqCst) {
                                return;
                            }
                            match fetcher.fetch(cell) {
                                Ok(tile) => {
                                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                                    progress(done, total);
                                    let _ = tx.send(Ok(tile));
                                }
                                Err(e) => {
                                    abort.store(true, Ordering::SeqCst);
                                    let _ = tx.send(Err(e));
                                }
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    let _ = handle.join();
                }
            }
        });
        drop(tx);

        let mut grid = TileGrid::new(spec.rows(), spec.cols());
        let mut failure: Option<FetchError> = None;

        for result in rx {
            match result {
                Ok(tile) => grid.place(tile)?,
                Err(e) => {
                    warn!(error = %e, "tile fetch failed, aborting run");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        if let Some(e) = failure {
            return Err(e.into());
        }

        Ok(grid)
    }
}
