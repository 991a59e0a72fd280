//! Tile cache statistics.

use std::fmt;

use serde::Serialize;

/// Snapshot of [`TileCache`](super::TileCache) activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from memory (including remembered misses).
    pub hits: u64,
    /// Lookups that had to go to disk or wait for another thread's fetch.
    pub misses: u64,
    /// Candidate file paths checked for existence.
    pub probes: u64,
    /// Files handed to the image loader.
    pub loads: u64,
    /// Buckets currently held (with or without an image).
    pub entry_count: u64,
    /// Decoded bytes currently held.
    pub size_bytes: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from memory.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} bytes, {} hits / {} misses, {} probes, {} loads",
            self.entry_count, self.size_bytes, self.hits, self.misses, self.probes, self.loads
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < 1e-12);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_display() {
        let stats = CacheStats {
            entry_count: 2,
            size_bytes: 100,
            ..Default::default()
        };
        assert!(stats.to_string().starts_with("2 entries, 100 bytes"));
    }
}
