//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::composite::CompositeError;
use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Errors that can occur while starting or driving the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// A scenery root does not exist or is not a directory.
    #[error("Scenery path not found: {0}")]
    SceneryPathNotFound(PathBuf),

    /// An area lookup could not be completed.
    #[error("Orthophoto lookup failed: {0}")]
    Composite(#[from] CompositeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::SceneryPathNotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Scenery path not found: /missing");
    }

    #[test]
    fn test_from_config_error() {
        let err: AppError = ConfigError::UnknownKey("x.y".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
