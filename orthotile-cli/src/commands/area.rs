//! Area command - composite the orthophotos covering a rectangle.

use std::path::PathBuf;

use orthotile::bounds::GeoBounds;
use orthotile::config::format_size;
use serde_json::json;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Arguments for the area command.
pub struct AreaArgs {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub output: Option<PathBuf>,
    pub json: bool,
}

impl AreaArgs {
    /// The requested rectangle. `max_lon < min_lon` crosses the antimeridian.
    pub fn bounds(&self) -> Result<GeoBounds, CliError> {
        super::tile::check_position(self.min_lon, self.min_lat)?;
        super::tile::check_position(self.max_lon, self.max_lat)?;
        if self.max_lat < self.min_lat {
            return Err(CliError::InvalidArgument(format!(
                "max-lat {} is south of min-lat {}",
                self.max_lat, self.min_lat
            )));
        }
        Ok(GeoBounds::from_edges(
            self.min_lon,
            self.min_lat,
            self.max_lon,
            self.max_lat,
        ))
    }
}

/// Run the area command.
pub fn run(global: &GlobalArgs, args: AreaArgs) -> Result<(), CliError> {
    let requested = args.bounds()?;

    let runner = CliRunner::new(global)?;
    runner.log_startup("area");
    let app = runner.app();

    let photo = app.orthophoto_for_bounds(&requested)?;

    if args.json {
        let report = match &photo {
            Some(photo) => json!({
                "requested": requested,
                "found": true,
                "bounds": {
                    "min_lon": photo.bounds().min_lon(),
                    "min_lat": photo.bounds().min_lat(),
                    "max_lon": photo.bounds().max_lon(),
                    "max_lat": photo.bounds().max_lat(),
                    "hemisphere": photo.bounds().hemisphere(),
                },
                "width": photo.width(),
                "height": photo.height(),
            }),
            None => json!({ "requested": requested, "found": false }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Area {}", requested);
        match &photo {
            Some(photo) => super::print_orthophoto(photo),
            None => println!("  No orthophoto coverage"),
        }
        let stats = app.stats();
        println!(
            "  Cache:      {} of {} ({} loads, {} probes)",
            format_size(stats.size_bytes),
            format_size(runner.config().cache.max_size),
            stats.loads,
            stats.probes
        );
    }

    if let (Some(photo), Some(output)) = (&photo, args.output) {
        photo.save(&output)?;
        if !args.json {
            println!("  Saved to:   {}", output.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> AreaArgs {
        AreaArgs {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            output: None,
            json: false,
        }
    }

    #[test]
    fn test_bounds_across_antimeridian() {
        let bounds = args(179.5, 0.0, -179.5, 1.0).bounds().unwrap();
        assert!((bounds.width() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_rejects_inverted_latitude() {
        assert!(args(10.0, 2.0, 11.0, 1.0).bounds().is_err());
    }

    #[test]
    fn test_bounds_rejects_out_of_range() {
        assert!(args(10.0, 1.0, 11.0, 91.0).bounds().is_err());
    }
}
