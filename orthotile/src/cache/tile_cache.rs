//! Concurrent bucket → image cache backed by moka.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;
use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::bucket::{Bucket, BucketIndex};
use crate::raster::{ImageLoader, TileImage};

use super::{CacheStats, TileCacheConfig};

/// A cached lookup result: the decoded tile, or `None` when no root has it.
type Entry = Option<Arc<TileImage>>;

/// Thread-safe cache of orthophoto tiles keyed by bucket index.
///
/// Cached images are immutable and shared by reference count; callers that
/// hold an `Arc<TileImage>` keep it alive after eviction.
pub struct TileCache {
    entries: Cache<BucketIndex, Entry>,
    search_paths: RwLock<VecDeque<PathBuf>>,
    loader: Arc<dyn ImageLoader>,
    config: TileCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    probes: AtomicU64,
    loads: AtomicU64,
}

impl TileCache {
    /// Create an empty cache with no search paths.
    pub fn new(config: TileCacheConfig, loader: Arc<dyn ImageLoader>) -> Self {
        let entries = Cache::builder()
            // Weight by decoded size; remembered misses still count one unit
            .weigher(|_key: &BucketIndex, value: &Entry| -> u32 {
                value.as_ref().map_or(1, |image| {
                    image.byte_size().clamp(1, u32::MAX as usize) as u32
                })
            })
            .max_capacity(config.max_size_bytes)
            .build();

        Self {
            entries,
            search_paths: RwLock::new(VecDeque::new()),
            loader,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            probes: AtomicU64::new(0),
            loads: AtomicU64::new(0),
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &TileCacheConfig {
        &self.config
    }

    /// Get the orthophoto for a bucket, loading it from disk on first use.
    ///
    /// Concurrent calls for the same bucket perform the disk lookup once;
    /// the other callers block until that result is available.
    pub fn get_image<B: Bucket>(&self, bucket: &B) -> Option<Arc<TileImage>> {
        let key = bucket.index();

        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return entry;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let entry = self.entries.get_with(key, || self.fetch(bucket));

        if entry.is_none() && !self.config.memoize_missing {
            self.entries.invalidate(&key);
        }

        entry
    }

    /// Whether a result for this bucket is currently held in memory.
    pub fn contains<B: Bucket>(&self, bucket: &B) -> bool {
        self.entries.contains_key(&bucket.index())
    }

    /// Add a scenery root with the highest priority.
    ///
    /// Returns `false` if the path was already registered. Adding a path
    /// drops every cached result, since a previously missing tile may now
    /// be found, or a different file may now take precedence.
    pub fn add_search_path(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        {
            let mut paths = self.search_paths.write();
            if paths.contains(&path) {
                debug!(path = %path.display(), "Search path already registered");
                return false;
            }
            paths.push_front(path.clone());
        }

        self.entries.invalidate_all();
        info!(path = %path.display(), "Added orthophoto search path");
        true
    }

    /// Remove all scenery roots and drop every cached result.
    pub fn clear_search_paths(&self) {
        self.search_paths.write().clear();
        self.entries.invalidate_all();
        info!("Cleared orthophoto search paths");
    }

    /// Registered scenery roots, highest priority first.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search_paths.read().iter().cloned().collect()
    }

    /// Drop every cached result, keeping the search paths.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            entry_count: self.entries.entry_count(),
            size_bytes: self.entries.weighted_size(),
        }
    }

    /// Probe the search paths for a bucket's file and decode the first hit.
    fn fetch<B: Bucket>(&self, bucket: &B) -> Entry {
        // Copy the list so no lock is held during disk I/O
        let roots = self.search_paths();
        let base_path = bucket.base_path();
        let index = bucket.index();

        for root in &roots {
            for candidate in self.config.layout.candidates(root, &base_path, index) {
                if let Some(image) = self.try_load(&candidate) {
                    debug!(
                        bucket = index,
                        path = %candidate.display(),
                        width = image.width(),
                        height = image.height(),
                        "Loaded orthophoto tile"
                    );
                    return Some(Arc::new(image));
                }
            }
        }

        trace!(bucket = index, roots = roots.len(), "No orthophoto for bucket");
        None
    }

    fn try_load(&self, candidate: &Path) -> Option<TileImage> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        if !candidate.is_file() {
            return None;
        }
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.loader.load(candidate)
    }
}

impl std::fmt::Debug for TileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileCache")
            .field("search_paths", &self.search_paths())
            .field("config", &self.config)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::SgBucket;
    use crate::raster::FileImageLoader;
    use image::{Rgb, RgbImage};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Loader that counts calls and can be slowed down to widen races.
    struct CountingLoader {
        calls: AtomicU64,
        delay: Duration,
    }

    impl CountingLoader {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU64::new(0),
                delay,
            })
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageLoader for CountingLoader {
        fn load(&self, path: &Path) -> Option<TileImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            FileImageLoader.load(path)
        }
    }

    fn write_tile(root: &Path, bucket: &SgBucket, ext: &str, color: [u8; 3]) -> PathBuf {
        let dir = root.join("Orthophotos").join(bucket.base_path());
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.{}", bucket.index(), ext));
        RgbImage::from_pixel(8, 8, Rgb(color)).save(&path).unwrap();
        path
    }

    fn pixel(image: &TileImage) -> [u8; 3] {
        image.image().to_rgb8().get_pixel(0, 0).0
    }

    fn bucket() -> SgBucket {
        SgBucket::containing(10.1, 1.1)
    }

    #[test]
    fn test_missing_tile_returns_none() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());

        assert!(cache.get_image(&bucket()).is_none());
    }

    #[test]
    fn test_loads_tile_from_search_path() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), &bucket(), "png", [255, 0, 0]);

        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());

        let image = cache.get_image(&bucket()).expect("tile should load");
        assert_eq!(image.width(), 8);
        assert_eq!(pixel(&image), [255, 0, 0]);
    }

    #[test]
    fn test_second_lookup_is_a_hit_and_shares_image() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), &bucket(), "png", [0, 255, 0]);

        let loader = CountingLoader::new(Duration::ZERO);
        let cache = TileCache::new(TileCacheConfig::default(), loader.clone());
        cache.add_search_path(dir.path());

        let first = cache.get_image(&bucket()).unwrap();
        let second = cache.get_image(&bucket()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.loads, 1);
        assert_eq!(stats.entry_count, 1);
        assert!(cache.contains(&bucket()));
    }

    #[test]
    fn test_later_search_path_takes_priority() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        write_tile(low.path(), &bucket(), "png", [255, 0, 0]);
        write_tile(high.path(), &bucket(), "png", [0, 0, 255]);

        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(low.path());
        cache.add_search_path(high.path());

        assert_eq!(
            cache.search_paths(),
            vec![high.path().to_path_buf(), low.path().to_path_buf()]
        );
        assert_eq!(pixel(&cache.get_image(&bucket()).unwrap()), [0, 0, 255]);
    }

    #[test]
    fn test_falls_back_to_lower_priority_root() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        write_tile(low.path(), &bucket(), "png", [255, 0, 0]);

        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(low.path());
        cache.add_search_path(high.path());

        assert_eq!(pixel(&cache.get_image(&bucket()).unwrap()), [255, 0, 0]);
    }

    #[test]
    fn test_secondary_extension_used_when_primary_absent() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), &bucket(), "bmp", [9, 9, 9]);

        let mut config = TileCacheConfig::default();
        config.layout.secondary_extension = "bmp".to_string();
        let cache = TileCache::new(config, Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());

        assert_eq!(pixel(&cache.get_image(&bucket()).unwrap()), [9, 9, 9]);
        let stats = cache.stats();
        assert_eq!(stats.probes, 2);
        assert_eq!(stats.loads, 1);
    }

    #[test]
    fn test_corrupt_primary_falls_through_to_next_candidate() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        let b = bucket();
        write_tile(low.path(), &b, "png", [1, 2, 3]);

        let bad_dir = high.path().join("Orthophotos").join(b.base_path());
        std::fs::create_dir_all(&bad_dir).unwrap();
        std::fs::write(bad_dir.join(format!("{}.png", b.index())), b"not a png").unwrap();

        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(low.path());
        cache.add_search_path(high.path());

        assert_eq!(pixel(&cache.get_image(&b).unwrap()), [1, 2, 3]);
    }

    #[test]
    fn test_missing_is_memoized_until_paths_change() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());

        assert!(cache.get_image(&bucket()).is_none());
        write_tile(dir.path(), &bucket(), "png", [4, 5, 6]);

        // Remembered miss
        assert!(cache.get_image(&bucket()).is_none());

        // New path invalidates all entries, so the retry finds the file
        let other = TempDir::new().unwrap();
        assert!(cache.add_search_path(other.path()));
        assert_eq!(pixel(&cache.get_image(&bucket()).unwrap()), [4, 5, 6]);
    }

    #[test]
    fn test_missing_not_memoized_when_disabled() {
        let dir = TempDir::new().unwrap();
        let config = TileCacheConfig::default().with_memoize_missing(false);
        let cache = TileCache::new(config, Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());

        assert!(cache.get_image(&bucket()).is_none());
        write_tile(dir.path(), &bucket(), "png", [7, 8, 9]);

        assert_eq!(pixel(&cache.get_image(&bucket()).unwrap()), [7, 8, 9]);
    }

    #[test]
    fn test_duplicate_search_path_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));

        assert!(cache.add_search_path(dir.path()));
        assert!(!cache.add_search_path(dir.path()));
        assert_eq!(cache.search_paths().len(), 1);
    }

    #[test]
    fn test_clear_search_paths_drops_entries() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), &bucket(), "png", [10, 20, 30]);

        let cache = TileCache::new(TileCacheConfig::default(), Arc::new(FileImageLoader));
        cache.add_search_path(dir.path());
        let held = cache.get_image(&bucket()).unwrap();

        cache.clear_search_paths();
        assert!(cache.search_paths().is_empty());
        assert!(cache.get_image(&bucket()).is_none());

        // Images already handed out stay valid
        assert_eq!(pixel(&held), [10, 20, 30]);
    }

    #[test]
    fn test_concurrent_lookups_load_once() {
        const THREADS: usize = 8;

        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), &bucket(), "png", [50, 60, 70]);

        let loader = CountingLoader::new(Duration::from_millis(50));
        let cache = Arc::new(TileCache::new(TileCacheConfig::default(), loader.clone()));
        cache.add_search_path(dir.path());

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_image(&bucket())
                })
            })
            .collect();

        let images: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().expect("tile should load"))
            .collect();

        assert_eq!(loader.calls(), 1);
        for image in &images[1..] {
            assert!(Arc::ptr_eq(&images[0], image));
        }
    }

    #[test]
    fn test_distinct_buckets_load_independently() {
        let dir = TempDir::new().unwrap();
        let a = bucket();
        let b = a.sibling(1, 0);
        write_tile(dir.path(), &a, "png", [1, 1, 1]);
        write_tile(dir.path(), &b, "png", [2, 2, 2]);

        let loader = CountingLoader::new(Duration::ZERO);
        let cache = TileCache::new(TileCacheConfig::default(), loader.clone());
        cache.add_search_path(dir.path());

        assert_eq!(pixel(&cache.get_image(&a).unwrap()), [1, 1, 1]);
        assert_eq!(pixel(&cache.get_image(&b).unwrap()), [2, 2, 2]);
        assert_eq!(loader.calls(), 2);
    }
}
