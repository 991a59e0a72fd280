//! Application bootstrap implementation.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::bounds::GeoBounds;
use crate::bucket::{Bucket, SgBucket};
use crate::cache::{CacheStats, TileCache};
use crate::composite::CompositeBuilder;
use crate::orthophoto::Orthophoto;
use crate::raster::{FileImageLoader, ImageLoader};

/// The orthophoto service: a tile cache plus a builder reading from it.
///
/// Lookups use the standard [`SgBucket`] tiling; the generic
/// [`CompositeBuilder`] from [`builder`](Self::builder) accepts any other
/// [`Bucket`] implementation.
#[derive(Debug)]
pub struct OrthophotoApp {
    cache: Arc<TileCache>,
    builder: CompositeBuilder,
    config: AppConfig,
}

impl OrthophotoApp {
    /// Start with tiles decoded by the `image` crate.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        Self::start_with_loader(config, Arc::new(FileImageLoader))
    }

    /// Start with a custom image loader.
    ///
    /// Every scenery root must be an existing directory. Roots are registered
    /// so that the first in `config.scenery_paths` has the highest priority.
    pub fn start_with_loader(
        config: AppConfig,
        loader: Arc<dyn ImageLoader>,
    ) -> Result<Self, AppError> {
        if let Some(missing) = config.scenery_paths.iter().find(|p| !p.is_dir()) {
            return Err(AppError::SceneryPathNotFound(missing.clone()));
        }

        let cache = Arc::new(TileCache::new(config.cache.clone(), loader));
        // Each add goes to the front, so register lowest priority first
        for path in config.scenery_paths.iter().rev() {
            cache.add_search_path(path.clone());
        }

        info!(
            scenery_paths = config.scenery_paths.len(),
            max_cache_bytes = config.cache.max_size_bytes,
            memoize_missing = config.cache.memoize_missing,
            "Orthophoto service started"
        );

        let builder = CompositeBuilder::new(Arc::clone(&cache));
        Ok(Self {
            cache,
            builder,
            config,
        })
    }

    /// The shared tile cache.
    pub fn cache(&self) -> &Arc<TileCache> {
        &self.cache
    }

    /// The composite builder.
    pub fn builder(&self) -> &CompositeBuilder {
        &self.builder
    }

    /// The configuration the app was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register another scenery root with the highest priority.
    ///
    /// Returns `Ok(false)` if it was already registered.
    pub fn add_scenery_path(&self, path: impl Into<PathBuf>) -> Result<bool, AppError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(AppError::SceneryPathNotFound(path));
        }
        Ok(self.cache.add_search_path(path))
    }

    /// Remove every scenery root.
    pub fn clear_scenery_paths(&self) {
        self.cache.clear_search_paths();
    }

    /// Scenery roots currently searched, highest priority first.
    pub fn scenery_paths(&self) -> Vec<PathBuf> {
        self.cache.search_paths()
    }

    /// The bucket holding a position.
    pub fn bucket_at(&self, lon: f64, lat: f64) -> SgBucket {
        SgBucket::containing(lon, lat)
    }

    /// Orthophoto of the bucket holding a position.
    pub fn orthophoto_at(&self, lon: f64, lat: f64) -> Option<Orthophoto> {
        self.builder.orthophoto_for_bucket(&self.bucket_at(lon, lat))
    }

    /// Composite orthophoto covering a rectangle.
    pub fn orthophoto_for_bounds(&self, bounds: &GeoBounds) -> Result<Option<Orthophoto>, AppError> {
        Ok(self.builder.orthophoto_for_bounds::<SgBucket>(bounds)?)
    }

    /// Tile cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
