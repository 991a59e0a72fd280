//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading, writing or interpreting the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed as INI.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A setting holds a value that cannot be interpreted.
    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A `section.key` name that does not exist.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}
