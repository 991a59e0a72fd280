//! Terrain bucket geometry.
//!
//! Orthophoto tiles are stored per terrain bucket. The [`Bucket`] trait is the
//! seam between the compositing engine and whatever bucket scheme the terrain
//! uses; [`SgBucket`] implements the conventional scheme of 1/8° tall cells
//! whose width grows towards the poles.
//!
//! # Example
//!
//! ```
//! use orthotile::bucket::{Bucket, SgBucket};
//!
//! let bucket = SgBucket::containing(-122.375, 37.619);
//! assert_eq!(bucket.base_path(), "w130n30/w123n37");
//! assert_eq!(bucket.width(), 0.25);
//! assert_eq!(bucket.height(), 0.125);
//! ```

mod sg_bucket;

pub use sg_bucket::{bucket_span, SgBucket, BUCKET_HEIGHT};

use std::fmt;

use crate::bounds::GeoBounds;

/// Identifier of a bucket. Equal indices denote the same ground cell.
pub type BucketIndex = i64;

/// Geometry provider for one terrain bucket.
///
/// Implementations must be cheap to clone and safe to share between the
/// worker threads that load terrain.
pub trait Bucket: Clone + Send + Sync + fmt::Debug {
    /// Returns the bucket owning a geographic point.
    fn containing(lon: f64, lat: f64) -> Self
    where
        Self: Sized;

    /// Longitude of the bucket centre in degrees.
    fn center_lon(&self) -> f64;

    /// Latitude of the bucket centre in degrees.
    fn center_lat(&self) -> f64;

    /// Angular width in degrees of longitude.
    fn width(&self) -> f64;

    /// Angular height in degrees of latitude.
    fn height(&self) -> f64;

    /// Unique index of this bucket.
    fn index(&self) -> BucketIndex;

    /// Returns the bucket `dx` columns east and `dy` rows north of this one.
    fn sibling(&self, dx: i32, dy: i32) -> Self
    where
        Self: Sized;

    /// Relative directory holding this bucket's files, e.g. `e000n40/e004n41`.
    fn base_path(&self) -> String;

    /// Geographic extent of the bucket: centre ± half width/height.
    fn bounds(&self) -> GeoBounds {
        GeoBounds::from_center(
            self.center_lon(),
            self.center_lat(),
            self.width(),
            self.height(),
        )
    }
}
