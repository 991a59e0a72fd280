//! Tile command - look up the orthophoto of a single bucket.

use std::path::PathBuf;

use orthotile::bucket::Bucket;
use orthotile::coord::Geod;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the tile command.
pub struct TileArgs {
    pub lon: f64,
    pub lat: f64,
    pub output: Option<PathBuf>,
}

/// Run the tile command.
pub fn run(global: &GlobalArgs, args: TileArgs) -> Result<(), CliError> {
    check_position(args.lon, args.lat)?;

    let runner = CliRunner::new(global)?;
    runner.log_startup("tile");
    let app = runner.app();

    let bucket = app.bucket_at(args.lon, args.lat);
    println!("Bucket {} ({})", bucket.index(), bucket.base_path());

    let Some(photo) = app.orthophoto_at(args.lon, args.lat) else {
        println!("  No orthophoto found in {} scenery path(s)", app.scenery_paths().len());
        return Ok(());
    };
    super::print_orthophoto(&photo);

    let (u, v) = photo.tex_coord(args.lon, args.lat);
    println!("  Tex coord:  ({:.4}, {:.4})", u, v);

    if let Some(output) = args.output {
        photo.save(&output)?;
        println!("  Saved to:   {}", output.display());
    }
    Ok(())
}

/// Reject positions outside the valid coordinate range.
pub(crate) fn check_position(lon: f64, lat: f64) -> Result<(), CliError> {
    Geod::try_from_deg(lon, lat)
        .map(|_| ())
        .map_err(|e| CliError::InvalidArgument(e.to_string()))
}
