//! Addressable configuration settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::size::{format_size_exact, parse_size};
use super::{ConfigError, ConfigFile};

/// Separator between entries of `[scenery] paths`.
pub const PATH_LIST_SEPARATOR: char = ';';

/// One setting of the configuration file, named `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    SceneryPaths,
    OrthophotoDirectory,
    OrthophotoPrimaryExtension,
    OrthophotoSecondaryExtension,
    CacheMaxSize,
    CacheMemoizeMissing,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SceneryPaths,
            ConfigKey::OrthophotoDirectory,
            ConfigKey::OrthophotoPrimaryExtension,
            ConfigKey::OrthophotoSecondaryExtension,
            ConfigKey::CacheMaxSize,
            ConfigKey::CacheMemoizeMissing,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SceneryPaths => "scenery",
            ConfigKey::OrthophotoDirectory
            | ConfigKey::OrthophotoPrimaryExtension
            | ConfigKey::OrthophotoSecondaryExtension => "orthophoto",
            ConfigKey::CacheMaxSize | ConfigKey::CacheMemoizeMissing => "cache",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SceneryPaths => "paths",
            ConfigKey::OrthophotoDirectory | ConfigKey::LoggingDirectory => "directory",
            ConfigKey::OrthophotoPrimaryExtension => "primary_extension",
            ConfigKey::OrthophotoSecondaryExtension => "secondary_extension",
            ConfigKey::CacheMaxSize => "max_size",
            ConfigKey::CacheMemoizeMissing => "memoize_missing",
            ConfigKey::LoggingLevel => "level",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value formatted as it is written to the file.
    ///
    /// Unset optional values yield an empty string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SceneryPaths => config
                .scenery
                .paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(&PATH_LIST_SEPARATOR.to_string()),
            ConfigKey::OrthophotoDirectory => config.orthophoto.directory.clone(),
            ConfigKey::OrthophotoPrimaryExtension => config.orthophoto.primary_extension.clone(),
            ConfigKey::OrthophotoSecondaryExtension => {
                config.orthophoto.secondary_extension.clone()
            }
            ConfigKey::CacheMaxSize => format_size_exact(config.cache.max_size),
            ConfigKey::CacheMemoizeMissing => config.cache.memoize_missing.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::SceneryPaths => {
                config.scenery.paths = value
                    .split(PATH_LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(expand_home)
                    .collect();
            }
            ConfigKey::OrthophotoDirectory => {
                config.orthophoto.directory = self.non_empty(value)?.to_string();
            }
            ConfigKey::OrthophotoPrimaryExtension => {
                config.orthophoto.primary_extension = self.extension(value)?;
            }
            ConfigKey::OrthophotoSecondaryExtension => {
                config.orthophoto.secondary_extension = self.extension(value)?;
            }
            ConfigKey::CacheMaxSize => {
                config.cache.max_size = parse_size(value)
                    .ok_or_else(|| self.invalid(value, "expected a size such as 512MB or 1GB"))?;
            }
            ConfigKey::CacheMemoizeMissing => {
                config.cache.memoize_missing = parse_bool(value)
                    .ok_or_else(|| self.invalid(value, "expected true or false"))?;
            }
            ConfigKey::LoggingLevel => {
                let level = tracing::Level::from_str(value).map_err(|_| {
                    self.invalid(value, "expected one of trace, debug, info, warn, error")
                })?;
                config.logging.level = level.to_string().to_lowercase();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(expand_home(value))
                };
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.section(),
            key: self.key_name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn non_empty<'a>(&self, value: &'a str) -> Result<&'a str, ConfigError> {
        if value.is_empty() {
            Err(self.invalid(value, "must not be empty"))
        } else {
            Ok(value)
        }
    }

    fn extension(&self, value: &str) -> Result<String, ConfigError> {
        let ext = self.non_empty(value)?.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(self.invalid(value, "expected a file extension such as png"));
        }
        Ok(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
