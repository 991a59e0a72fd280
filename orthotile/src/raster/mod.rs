//! Decoded raster tiles and the primitives used to composite them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │     TileCache       │
//! │                     │
//! │ Arc<dyn ImageLoader>│
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    ImageLoader      │ (trait)
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────┐
//!       ▼         ▼
//! ┌──────────┐ ┌──────────┐
//! │   File   │ │  Test    │
//! │  Loader  │ │  stubs   │
//! └──────────┘ └──────────┘
//! ```
//!
//! Loaded tiles are shared read-only as `Arc<TileImage>`. Composites are
//! built by [`scale_image`] and [`blit`] into a freshly allocated canvas.

mod error;
mod loader;
mod ops;
mod tile_image;

pub use error::RasterError;
pub use loader::{load_image, FileImageLoader, ImageLoader};
pub use ops::{blit, scale_image};
pub use tile_image::TileImage;
