//! Bucket → orthophoto image cache.
//!
//! [`TileCache`] maps bucket indices to decoded tile images, filling itself
//! lazily from an ordered list of scenery roots on disk.
//!
//! # Disk layout
//!
//! ```text
//! <scenery root>/Orthophotos/<bucket base path>/<bucket index>.<ext>
//!
//! e.g.  ~/scenery/Orthophotos/w130n30/w123n37/942050.png
//!       ~/scenery/Orthophotos/w130n30/w123n37/942050.dds   (fallback)
//! ```
//!
//! Roots are probed in priority order (most recently added first). Within a
//! root the primary extension is tried before the secondary one.
//!
//! # Concurrency
//!
//! The cache is shared by terrain-loading worker threads. Entries are held
//! in a `moka::sync::Cache`, whose `get_with` runs the probe-and-decode for a
//! bucket at most once: concurrent callers for the same bucket wait for the
//! first caller's result, while callers for other buckets proceed in
//! parallel. The search-path list sits behind a `parking_lot::RwLock` that is
//! only held while copying or mutating the list, never during disk I/O.

mod config;
mod stats;
mod tile_cache;

pub use config::{TileCacheConfig, TileLayout};
pub use stats::CacheStats;
pub use tile_cache::TileCache;
