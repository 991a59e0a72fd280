//! Application configuration for OrthophotoApp.

use std::path::PathBuf;

use crate::cache::TileCacheConfig;
use crate::config::ConfigFile;

/// Everything needed to start an [`OrthophotoApp`](super::OrthophotoApp).
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Tile cache settings.
    pub cache: TileCacheConfig,

    /// Scenery roots, highest priority first.
    pub scenery_paths: Vec<PathBuf>,
}

impl AppConfig {
    /// Create a config with the given cache settings and no scenery.
    pub fn new(cache: TileCacheConfig) -> Self {
        Self {
            cache,
            scenery_paths: Vec::new(),
        }
    }

    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            cache: config.tile_cache_config(),
            scenery_paths: config.scenery.paths.clone(),
        }
    }

    /// Add scenery roots ahead of those already listed.
    ///
    /// The first of `paths` ends up with the highest priority. Paths already
    /// present are moved to the front.
    pub fn with_priority_scenery(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut front: Vec<PathBuf> = Vec::new();
        for path in paths {
            if !front.contains(&path) {
                front.push(path);
            }
        }
        self.scenery_paths.retain(|p| !front.contains(p));
        front.append(&mut self.scenery_paths);
        self.scenery_paths = front;
        self
    }

    /// Add a scenery root below those already listed.
    pub fn with_scenery_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !self.scenery_paths.contains(&path) {
            self.scenery_paths.push(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.scenery.paths = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        file.cache.memoize_missing = false;

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.scenery_paths, file.scenery.paths);
        assert!(!config.cache.memoize_missing);
    }

    #[test]
    fn test_priority_scenery_goes_first() {
        let config = AppConfig::default()
            .with_scenery_path("/base")
            .with_scenery_path("/custom")
            .with_priority_scenery(vec![PathBuf::from("/cli"), PathBuf::from("/custom")]);

        assert_eq!(
            config.scenery_paths,
            vec![
                PathBuf::from("/cli"),
                PathBuf::from("/custom"),
                PathBuf::from("/base")
            ]
        );
    }

    #[test]
    fn test_with_scenery_path_dedupes() {
        let config = AppConfig::default()
            .with_scenery_path("/a")
            .with_scenery_path("/a");
        assert_eq!(config.scenery_paths.len(), 1);
    }
}
