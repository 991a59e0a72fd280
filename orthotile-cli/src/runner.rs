//! Shared setup for commands that need the orthophoto service.

use std::path::PathBuf;

use orthotile::app::{AppConfig, OrthophotoApp};
use orthotile::config::ConfigFile;
use orthotile::logging::{init_logging, LoggingGuard};
use tracing::{info, warn};

use crate::error::CliError;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file to use instead of the default location.
    pub config_path: Option<PathBuf>,
    /// Scenery roots searched before the configured ones.
    pub scenery: Vec<PathBuf>,
}

impl GlobalArgs {
    /// Load the selected config file.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        let config = match &self.config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };
        Ok(config)
    }
}

/// Owns logging and the started application for one command run.
pub struct CliRunner {
    app: OrthophotoApp,
    config: ConfigFile,
    _logging: Option<LoggingGuard>,
}

impl CliRunner {
    /// Load config, set up logging and start the service.
    pub fn new(args: &GlobalArgs) -> Result<Self, CliError> {
        let config = args.load_config()?;

        let logging = match init_logging(&config.logging) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Warning: logging disabled: {}", e);
                None
            }
        };

        let app_config =
            AppConfig::from_config_file(&config).with_priority_scenery(args.scenery.iter().cloned());
        if app_config.scenery_paths.is_empty() {
            warn!("No scenery paths configured; every lookup will find no imagery");
        }
        let app = OrthophotoApp::start(app_config)?;

        Ok(Self {
            app,
            config,
            _logging: logging,
        })
    }

    /// Log the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = orthotile::VERSION,
            scenery_paths = self.app.scenery_paths().len(),
            "orthotile starting"
        );
    }

    /// The started application.
    pub fn app(&self) -> &OrthophotoApp {
        &self.app
    }

    /// The loaded configuration file.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }
}
