//! Bucket command - show the bucket holding a position.

use orthotile::bucket::{Bucket, SgBucket};

use crate::error::CliError;

/// Run the bucket command.
pub fn run(lon: f64, lat: f64) -> Result<(), CliError> {
    super::tile::check_position(lon, lat)?;

    let bucket = SgBucket::containing(lon, lat);
    let bounds = bucket.bounds();

    println!("Bucket {}", bucket.index());
    println!("  Path:       {}", bucket.base_path());
    println!(
        "  Centre:     {:.6}, {:.6}",
        bucket.center_lon(),
        bucket.center_lat()
    );
    println!(
        "  Size:       {}° x {}°",
        bucket.width(),
        bucket.height()
    );
    println!("  Bounds:     {}", bounds);
    Ok(())
}
