//! Tracing subscriber setup.
//!
//! Log output always goes to stderr. When a log directory is configured, a
//! second non-blocking writer appends to a daily rolling file in that
//! directory:
//!
//! ```text
//!   tracing macros ──► EnvFilter ──┬──► fmt layer ──► stderr
//!                                  └──► fmt layer ──► non-blocking worker
//!                                                     └──► <dir>/orthotile.log.YYYY-MM-DD
//! ```
//!
//! `RUST_LOG` overrides the configured level when set.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// File name prefix of rolling log files.
pub const LOG_FILE_PREFIX: &str = "orthotile.log";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging settings, the `[logging]` section of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error.
    pub level: String,
    /// Directory for rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// Errors setting up logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the file writer alive; log lines may be lost once this is dropped.
#[must_use = "dropping the guard stops the log file writer"]
pub struct LoggingGuard {
    worker: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a log file is being written.
    pub fn has_file_output(&self) -> bool {
        self.worker.is_some()
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(config)?)
            .map_err(|_| LoggingError::InvalidLevel(config.level.clone()))?,
    };

    let timer = local_timer();
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone());

    let (file_layer, worker) = match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard { worker })
}

/// Filter directive for the configured level.
fn default_directive(config: &LoggingConfig) -> Result<String, LoggingError> {
    let level = tracing::Level::from_str(config.level.trim())
        .map_err(|_| LoggingError::InvalidLevel(config.level.clone()))?;
    Ok(level.to_string().to_lowercase())
}

/// RFC 3339 timestamps in the local offset, or UTC when it is unknown.
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}
