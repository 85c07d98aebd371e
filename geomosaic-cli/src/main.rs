//! Geomosaic CLI - download and stitch satellite tile mosaics.
//!
//! Thin boundary over the `geomosaic` library: argument parsing, the
//! large-download confirmation prompt, a progress bar, and writing the
//! finished mosaic to disk.

mod error;

use clap::{ArgAction, Parser};
use dialoguer::Confirm;
use error::CliError;
use geomosaic::coord::GeoCoordinate;
use geomosaic::grid::GridSpec;
use geomosaic::logging::init_logging;
use geomosaic::mosaic;
use geomosaic::provider::{ReqwestClient, StaticMapSource};
use geomosaic::{MosaicConfig, MosaicService, ATTRIBUTION_BAND_HEIGHT};
use image::RgbImage;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::info;

/// Tile counts above this require confirmation before downloading.
const CONFIRM_THRESHOLD: usize = 10;

#[derive(Parser)]
#[command(name = "geomosaic")]
#[command(about = "Download a rectangle of satellite tiles and stitch them into one mosaic", long_about = None)]
struct Args {
    /// First corner of the bounding box, e.g. 45.1800992,5.7074098
    #[arg(short = 'i', long = "start", value_name = "LAT,LON")]
    start: GeoCoordinate,

    /// Opposite corner of the bounding box, e.g. 45.182037,5.712044
    #[arg(short = 'f', long = "end", value_name = "LAT,LON")]
    end: GeoCoordinate,

    /// Zoom level (0-21)
    #[arg(short, long, default_value_t = 20)]
    zoom: u8,

    /// Tile width in pixels
    #[arg(short = 'w', long, default_value_t = 640)]
    width: u32,

    /// Tile height in pixels, before attribution cropping
    #[arg(short = 'e', long, default_value_t = 640)]
    height: u32,

    /// Concurrent tile downloads (1 = strictly sequential)
    #[arg(short = 'j', long, default_value_t = 1)]
    jobs: usize,

    /// Skip the large-download confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Output file (default: output-<start>-<end>-<zoom>.png)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Verbose output; specify twice for debug-level output
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let _logging = init_logging(args.verbose).map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let http_client = ReqwestClient::new().map_err(CliError::Source)?;
    let source = StaticMapSource::new(http_client);
    let config = MosaicConfig {
        zoom: args.zoom,
        tile_width: args.width,
        tile_height: args.height,
        attribution_band: ATTRIBUTION_BAND_HEIGHT,
        parallel_fetches: args.jobs,
    };
    let service = MosaicService::new(source, config);

    let bar = ProgressBar::new(0);
    let fetch_bar = bar.clone();

    let skip_confirmation = args.yes;
    let mosaic_image = service
        .build_mosaic(
            args.start,
            args.end,
            |spec| {
                if !confirm_download(spec, skip_confirmation) {
                    return false;
                }
                bar.set_length(spec.tile_count() as u64);
                true
            },
            move |done, _total| fetch_bar.set_position(done as u64),
        )
        .map_err(CliError::Build)?;
    bar.finish_and_clear();

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(mosaic::output_filename(&args.start, &args.end, args.zoom)));
    write_mosaic(&mosaic_image, &path)?;

    info!(path = %path.display(), "mosaic written");
    println!("Mosaic written to {}", path.display());
    Ok(())
}

/// Asks before fetching large grids; small grids proceed silently.
fn confirm_download(spec: &GridSpec, skip: bool) -> bool {
    let count = spec.tile_count();
    if skip || count <= CONFIRM_THRESHOLD {
        return true;
    }

    let prompt = format!(
        "About to download {} tiles ({} across, {} down). Continue?",
        count,
        spec.cols(),
        spec.rows()
    );
    Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .unwrap_or(false)
}

fn write_mosaic(image: &RgbImage, path: &Path) -> Result<(), CliError> {
    image.save(path).map_err(|error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::Rgb;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let args =
            Args::try_parse_from(["geomosaic", "-i", "45.18,5.70", "-f", "45.19,5.71"]).unwrap();
        assert_eq!(args.start.lat, 45.18);
        assert_eq!(args.end.lon, 5.71);
        assert_eq!(args.zoom, 20);
        assert_eq!(args.width, 640);
        assert_eq!(args.height, 640);
        assert_eq!(args.jobs, 1);
        assert!(!args.yes);
        assert!(args.output.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "geomosaic",
            "--start",
            "45.18,5.70",
            "--end",
            "45.19,5.71",
            "--zoom",
            "18",
            "-w",
            "512",
            "-e",
            "512",
            "-j",
            "4",
            "-y",
            "-o",
            "out.png",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.zoom, 18);
        assert_eq!(args.width, 512);
        assert_eq!(args.height, 512);
        assert_eq!(args.jobs, 4);
        assert!(args.yes);
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_parse_rejects_bad_coordinate() {
        let result = Args::try_parse_from(["geomosaic", "-i", "91.0,0.0", "-f", "0.0,0.0"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["geomosaic", "-i", "not-a-coord", "-f", "0.0,0.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_mosaic_creates_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mosaic.png");
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));

        write_mosaic(&img, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (4, 4));
        assert_eq!(reloaded.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_write_mosaic_bad_path_fails() {
        let img = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let result = write_mosaic(&img, Path::new("/nonexistent-dir/mosaic.png"));
        assert!(matches!(result, Err(CliError::FileWrite { .. })));
    }
}
