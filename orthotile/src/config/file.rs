//! The INI configuration file.

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::cache::{TileCacheConfig, TileLayout};
use crate::logging::LoggingConfig;

use super::{ConfigError, ConfigKey};

const CONFIG_DIR_NAME: &str = ".orthotile";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Directory holding the configuration file (`~/.orthotile`).
///
/// Falls back to a relative `.orthotile` when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
}

/// Default location of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// `[scenery]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenerySettings {
    /// Scenery roots, highest priority first.
    pub paths: Vec<PathBuf>,
}

/// `[orthophoto]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthophotoSettings {
    pub directory: String,
    pub primary_extension: String,
    pub secondary_extension: String,
}

impl Default for OrthophotoSettings {
    fn default() -> Self {
        let layout = TileLayout::default();
        Self {
            directory: layout.directory,
            primary_extension: layout.primary_extension,
            secondary_extension: layout.secondary_extension,
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Memory budget for decoded tiles, in bytes.
    pub max_size: u64,
    pub memoize_missing: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = TileCacheConfig::default();
        Self {
            max_size: defaults.max_size_bytes,
            memoize_missing: defaults.memoize_missing,
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub scenery: ScenerySettings,
    pub orthophoto: OrthophotoSettings,
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    ///
    /// Keys absent from the file keep their default values; unknown keys
    /// are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its directory if needed.
    ///
    /// Unset optional values are left out of the file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if value.is_empty() && *key != ConfigKey::SceneryPaths {
                continue;
            }
            ini.with_section(Some(key.section()))
                .set(key.key_name(), value);
        }

        ini.write_to_file(path).map_err(write_error)?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    /// Tile cache settings described by this file.
    pub fn tile_cache_config(&self) -> TileCacheConfig {
        TileCacheConfig::default()
            .with_max_size(self.cache.max_size)
            .with_memoize_missing(self.cache.memoize_missing)
            .with_layout(TileLayout {
                directory: self.orthophoto.directory.clone(),
                primary_extension: self.orthophoto.primary_extension.clone(),
                secondary_extension: self.orthophoto.secondary_extension.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.cache.max_size, 1024 * 1024 * 1024);
        assert!(config.cache.memoize_missing);
        assert_eq!(config.orthophoto.primary_extension, "png");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[scenery]\npaths = /one;/two\n\n[cache]\nmax_size = 64MB\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(
            config.scenery.paths,
            vec![PathBuf::from("/one"), PathBuf::from("/two")]
        );
        assert_eq!(config.cache.max_size, 64 * 1024 * 1024);
        assert_eq!(config.orthophoto, OrthophotoSettings::default());
    }

    #[test]
    fn test_invalid_value_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nmemoize_missing = sometimes\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "cache",
                key: "memoize_missing",
                ..
            }
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.scenery.paths = vec![PathBuf::from("/high"), PathBuf::from("/low")];
        config.cache.max_size = 3 * 1024 * 1024;
        config.cache.memoize_missing = false;
        config.orthophoto.secondary_extension = "jpg".to_string();
        config.logging.level = "debug".to_string();
        config.logging.directory = Some(PathBuf::from("/tmp/logs"));

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_tile_cache_config() {
        let mut config = ConfigFile::default();
        config.cache.max_size = 4096;
        config.orthophoto.directory = "Ortho".to_string();

        let cache = config.tile_cache_config();
        assert_eq!(cache.max_size_bytes, 4096);
        assert_eq!(cache.layout.directory, "Ortho");
        assert_eq!(cache.layout.primary_extension, "png");
    }
}
