//! The orthophoto lookup front end.

use std::collections::HashSet;
use std::sync::Arc;

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bounds::GeoBounds;
use crate::bucket::Bucket;
use crate::cache::TileCache;
use crate::coord::{cart_to_geod, Geod, EDGE_EPSILON_DEG};
use crate::orthophoto::Orthophoto;

use super::{irregular, AreaRequest, BucketGrid, CompositeError};

/// Builds orthophotos for buckets and areas from a shared [`TileCache`].
///
/// The builder holds no state of its own beyond the cache handle and may be
/// cloned freely or shared between threads.
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    cache: Arc<TileCache>,
}

impl CompositeBuilder {
    /// Create a builder reading tiles from `cache`.
    pub fn new(cache: Arc<TileCache>) -> Self {
        Self { cache }
    }

    /// The cache tiles are read from.
    pub fn cache(&self) -> &Arc<TileCache> {
        &self.cache
    }

    /// Orthophoto for a single bucket, sharing the cached image.
    ///
    /// The bounds are the bucket's own extent. Returns `None` when the bucket
    /// has no image.
    pub fn orthophoto_for_bucket<B: Bucket>(&self, bucket: &B) -> Option<Orthophoto> {
        let image = self.cache.get_image(bucket)?;
        Some(Orthophoto::new(image, bucket.bounds()))
    }

    /// Orthophoto for any kind of area request.
    pub fn orthophoto_for_area<B: Bucket>(
        &self,
        request: &AreaRequest<'_>,
    ) -> Result<Option<Orthophoto>, CompositeError> {
        match request {
            AreaRequest::Points { points, center } => {
                self.orthophoto_for_points::<B>(points, *center)
            }
            AreaRequest::Bounds(bounds) => self.orthophoto_for_bounds::<B>(bounds),
        }
    }

    /// Like [`orthophoto_for_area`](Self::orthophoto_for_area), with every
    /// failure reported as "no orthophoto".
    pub fn orthophoto_for_area_or_none<B: Bucket>(
        &self,
        request: &AreaRequest<'_>,
    ) -> Option<Orthophoto> {
        discard_error(self.orthophoto_for_area::<B>(request))
    }

    /// Orthophoto covering terrain vertices.
    ///
    /// `points` are offsets from `center` in earth-centred cartesian metres.
    /// Each vertex is converted to geodetic coordinates and every bucket
    /// owning a vertex contributes its image.
    pub fn orthophoto_for_points<B: Bucket>(
        &self,
        points: &[DVec3],
        center: DVec3,
    ) -> Result<Option<Orthophoto>, CompositeError> {
        let geods: Vec<Geod> = points.iter().map(|p| cart_to_geod(center + *p)).collect();
        self.orthophoto_for_geods::<B>(&geods)
    }

    /// Like [`orthophoto_for_points`](Self::orthophoto_for_points), with
    /// every failure reported as "no orthophoto".
    pub fn orthophoto_for_points_or_none<B: Bucket>(
        &self,
        points: &[DVec3],
        center: DVec3,
    ) -> Option<Orthophoto> {
        discard_error(self.orthophoto_for_points::<B>(points, center))
    }

    /// Orthophoto covering geodetic positions.
    ///
    /// The positions' bounding box is pulled in by [`EDGE_EPSILON_DEG`] and
    /// each position clamped into it, so vertices lying on a bucket border
    /// resolve to the bucket inside the area. Buckets are looked up once
    /// each, whether or not they have an image.
    pub fn orthophoto_for_geods<B: Bucket>(
        &self,
        positions: &[Geod],
    ) -> Result<Option<Orthophoto>, CompositeError> {
        let mut desired = GeoBounds::empty();
        for geod in positions {
            desired.expand(geod.lon_deg, geod.lat_deg);
        }
        if desired.is_empty() {
            return Ok(None);
        }
        let target = desired.shrunk(EDGE_EPSILON_DEG);

        let mut attempted = HashSet::new();
        let mut buckets = Vec::new();
        for geod in positions {
            let (lon, lat) = target.clamp(geod.lon_deg, geod.lat_deg);
            let bucket = B::containing(lon, lat);
            if attempted.insert(bucket.index()) {
                buckets.push(bucket);
            }
        }

        let mut photos: Vec<Orthophoto> = buckets
            .par_iter()
            .filter_map(|bucket| self.orthophoto_for_bucket(bucket))
            .collect();

        debug!(
            points = positions.len(),
            buckets = buckets.len(),
            found = photos.len(),
            area = %desired,
            "Resolved point-set buckets"
        );

        match photos.len() {
            0 => Ok(None),
            1 => Ok(photos.pop()),
            _ => {
                let result = irregular::compose(&photos)?;
                if let Some(photo) = &result {
                    info!(
                        tiles = photos.len(),
                        width = photo.width(),
                        height = photo.height(),
                        bounds = %photo.bounds(),
                        "Built point-set orthophoto"
                    );
                }
                Ok(result)
            }
        }
    }

    /// Orthophoto covering a geographic rectangle.
    ///
    /// The rectangle is covered by a regular grid of buckets whose tiles are
    /// stitched onto one canvas. The result's bounds are the union of the
    /// grid cells, which may extend past the requested rectangle.
    pub fn orthophoto_for_bounds<B: Bucket>(
        &self,
        desired: &GeoBounds,
    ) -> Result<Option<Orthophoto>, CompositeError> {
        let Some(grid) = BucketGrid::<B>::resolve(desired)? else {
            return Ok(None);
        };

        if let [bucket] = grid.cells() {
            return Ok(self.orthophoto_for_bucket(bucket));
        }

        let tiles: Vec<_> = grid
            .cells()
            .par_iter()
            .map(|bucket| self.cache.get_image(bucket))
            .collect();
        let found = tiles.iter().flatten().count();

        let Some(canvas) = grid.stitch(&tiles)? else {
            debug!(area = %desired, cells = grid.len(), "No orthophoto tiles in area");
            return Ok(None);
        };

        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            tiles = found,
            width = canvas.width(),
            height = canvas.height(),
            bounds = %grid.bounds(),
            "Built grid orthophoto"
        );

        Ok(Some(Orthophoto::new(Arc::new(canvas), *grid.bounds())))
    }

    /// Like [`orthophoto_for_bounds`](Self::orthophoto_for_bounds), with
    /// every failure reported as "no orthophoto".
    pub fn orthophoto_for_bounds_or_none<B: Bucket>(
        &self,
        desired: &GeoBounds,
    ) -> Option<Orthophoto> {
        discard_error(self.orthophoto_for_bounds::<B>(desired))
    }
}

fn discard_error(result: Result<Option<Orthophoto>, CompositeError>) -> Option<Orthophoto> {
    match result {
        Ok(photo) => photo,
        // Already reported where it was detected
        Err(CompositeError::UnsupportedSpan { .. }) => None,
        Err(e) => {
            warn!(error = %e, "Orthophoto lookup failed, continuing without overlay");
            None
        }
    }
}
