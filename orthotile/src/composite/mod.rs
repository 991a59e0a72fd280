//! Orthophoto lookup and compositing.
//!
//! [`CompositeBuilder`] turns a request for imagery (one bucket, a set of
//! terrain vertices, or a geographic rectangle) into a single
//! [`Orthophoto`](crate::orthophoto::Orthophoto), stitching several bucket
//! tiles together when the area spans more than one bucket.
//!
//! # Pipeline
//!
//! ```text
//!   AreaRequest ──► resolve buckets ──► fetch tiles (TileCache, rayon)
//!                                            │
//!                      ┌─────────────────────┼──────────────────────┐
//!                      ▼                     ▼                      ▼
//!               single tile            grid composite       irregular composite
//!              (shared Arc)         (rectangle request)     (point-set request)
//!                      └─────────────────────┼──────────────────────┘
//!                                            ▼
//!                       Ok(Some(Orthophoto)) | Ok(None) | Err(UnsupportedSpan)
//! ```
//!
//! `Ok(None)` means no imagery exists for the area. This is the normal
//! outcome over most of the globe and is not logged above `debug`.
//!
//! # Grid layout
//!
//! Rectangle requests resolve to an `R × C` grid of equally sized buckets.
//! Row 0 is the southernmost and lands at the bottom of the canvas:
//!
//! ```text
//!   y = 0        ┌────────┬────────┐
//!                │ r1, c0 │ r1, c1 │
//!   y = th       ├────────┼────────┤
//!                │ r0, c0 │ r0, c1 │
//!   y = 2·th     └────────┴────────┘
//!               x = 0    x = tw   x = 2·tw
//! ```

mod builder;
mod error;
mod grid;
mod irregular;
mod request;

pub use builder::CompositeBuilder;
pub use error::CompositeError;
pub use grid::{BucketGrid, MAX_GRID_EXTENT};
pub use request::AreaRequest;
