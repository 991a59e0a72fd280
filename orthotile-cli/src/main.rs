//! Orthotile CLI - Command-line interface
//!
//! Looks up orthophoto tiles for terrain buckets and composites areas,
//! using the scenery roots from the configuration file plus any given with
//! `--scenery`.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::area::AreaArgs;
use commands::config::ConfigCommands;
use commands::tile::TileArgs;
use error::CliError;
use runner::GlobalArgs;

#[derive(Parser)]
#[command(name = "orthotile")]
#[command(version, about = "Orthophoto tile lookup and compositing", long_about = None)]
struct Cli {
    /// Scenery root searched before the configured ones (repeatable)
    #[arg(long = "scenery", value_name = "PATH", global = true)]
    scenery: Vec<PathBuf>,

    /// Configuration file (default: ~/.orthotile/config.ini)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bucket holding a position
    Bucket {
        /// Longitude in degrees (east positive)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in degrees (north positive)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },

    /// Look up the orthophoto of the bucket holding a position
    Tile {
        /// Longitude in degrees (east positive)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in degrees (north positive)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Save the image to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Composite the orthophotos covering a rectangle
    Area {
        /// Western edge in degrees
        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,

        /// Southern edge in degrees
        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,

        /// Eastern edge in degrees (less than --min-lon to cross the antimeridian)
        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,

        /// Northern edge in degrees
        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,

        /// Save the composite image to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = GlobalArgs {
        config_path: cli.config,
        scenery: cli.scenery,
    };

    match cli.command {
        Commands::Bucket { lon, lat } => commands::bucket::run(lon, lat),
        Commands::Tile { lon, lat, output } => {
            commands::tile::run(&global, TileArgs { lon, lat, output })
        }
        Commands::Area {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            output,
            json,
        } => commands::area::run(
            &global,
            AreaArgs {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
                output,
                json,
            },
        ),
        Commands::Config { command } => commands::config::run(&global, command),
    }
}
