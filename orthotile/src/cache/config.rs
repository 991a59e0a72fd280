//! Tile cache configuration.

use std::path::{Path, PathBuf};

/// Default byte budget for decoded tiles held in memory (1 GB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 1024 * 1024 * 1024;

/// Where orthophoto files live beneath a scenery root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    /// Directory under each scenery root, normally `Orthophotos`.
    pub directory: String,
    /// Preferred file extension.
    pub primary_extension: String,
    /// Extension tried when the primary file is absent.
    pub secondary_extension: String,
}

impl TileLayout {
    /// Candidate files for a bucket under one root, in probe order.
    pub fn candidates(&self, root: &Path, base_path: &str, index: i64) -> [PathBuf; 2] {
        let dir = root.join(&self.directory).join(base_path);
        [
            dir.join(format!("{}.{}", index, self.primary_extension)),
            dir.join(format!("{}.{}", index, self.secondary_extension)),
        ]
    }
}

impl Default for TileLayout {
    fn default() -> Self {
        Self {
            directory: "Orthophotos".to_string(),
            primary_extension: "png".to_string(),
            secondary_extension: "dds".to_string(),
        }
    }
}

/// Configuration for [`TileCache`](super::TileCache).
#[derive(Debug, Clone)]
pub struct TileCacheConfig {
    /// Maximum size of decoded tiles kept in memory, in bytes.
    pub max_size_bytes: u64,
    /// Remember buckets without a file so they are not probed again.
    ///
    /// Negative entries are dropped whenever the search paths change.
    pub memoize_missing: bool,
    /// On-disk layout of tile files.
    pub layout: TileLayout,
}

impl TileCacheConfig {
    /// Set the memory budget.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Enable or disable memoization of missing tiles.
    pub fn with_memoize_missing(mut self, memoize_missing: bool) -> Self {
        self.memoize_missing = memoize_missing;
        self
    }

    /// Set the on-disk layout.
    pub fn with_layout(mut self, layout: TileLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for TileCacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            memoize_missing: true,
            layout: TileLayout::default(),
        }
    }
}
