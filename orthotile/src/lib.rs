//! Orthotile - orthophoto lookup and compositing for terrain rendering
//!
//! This library finds aerial/satellite orthophoto tiles for terrain buckets
//! on disk and stitches them into a single georeferenced image when an area
//! spans more than one bucket.
//!
//! # Overview
//!
//! ```text
//!   terrain vertices / rectangle
//!              │
//!              ▼
//!     ┌─────────────────┐   bucket index   ┌─────────────┐   <root>/Orthophotos/...
//!     │ CompositeBuilder│ ───────────────► │  TileCache  │ ─────────────────────────►
//!     └─────────────────┘ ◄─────────────── └─────────────┘        disk
//!              │             Arc<TileImage>
//!              ▼
//!        Orthophoto (image + GeoBounds) ──► tex_coord(lon, lat) per vertex
//! ```
//!
//! - [`bounds`] - geographic rectangles that may cross the antimeridian
//! - [`bucket`] - the terrain bucket tiling
//! - [`coord`] - geodetic coordinates and WGS84 conversion
//! - [`raster`] - decoded images, loading, scaling and blitting
//! - [`cache`] - the concurrent bucket → image cache
//! - [`composite`] - single-bucket and area lookups
//! - [`orthophoto`] - the result type
//! - [`config`], [`logging`], [`app`] - configuration, tracing setup and
//!   the composition root

pub mod app;
pub mod bounds;
pub mod bucket;
pub mod cache;
pub mod composite;
pub mod config;
pub mod coord;
pub mod logging;
pub mod orthophoto;
pub mod raster;

/// Version of the orthotile library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
