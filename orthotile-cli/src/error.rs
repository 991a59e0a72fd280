//! CLI error types.

use std::fmt;

use orthotile::app::AppError;
use orthotile::composite::CompositeError;
use orthotile::config::ConfigError;
use orthotile::raster::RasterError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration problem (bad key, bad value, unreadable file).
    Config(String),

    /// The orthophoto service could not start or answer.
    App(AppError),

    /// Writing an output image failed.
    Output(RasterError),

    /// Invalid command-line arguments.
    InvalidArgument(String),

    /// JSON output could not be produced.
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Json(e) => write!(f, "Failed to produce JSON: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Config(_) | CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<CompositeError> for CliError {
    fn from(e: CompositeError) -> Self {
        CliError::App(AppError::Composite(e))
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        CliError::Output(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
