//! Area lookup requests.

use glam::DVec3;

use crate::bounds::GeoBounds;

/// The area a caller wants imagery for.
#[derive(Debug, Clone, Copy)]
pub enum AreaRequest<'a> {
    /// Terrain vertices as offsets from `center`, all in earth-centred
    /// cartesian metres. Every bucket owning a vertex contributes.
    Points { points: &'a [DVec3], center: DVec3 },
    /// An explicit rectangle, covered by a regular grid of buckets.
    Bounds(GeoBounds),
}

impl<'a> AreaRequest<'a> {
    /// Request covering terrain vertices around `center`.
    pub fn points(points: &'a [DVec3], center: DVec3) -> Self {
        AreaRequest::Points { points, center }
    }

    /// Request covering a rectangle.
    pub fn bounds(bounds: GeoBounds) -> Self {
        AreaRequest::Bounds(bounds)
    }
}

impl From<GeoBounds> for AreaRequest<'_> {
    fn from(bounds: GeoBounds) -> Self {
        AreaRequest::Bounds(bounds)
    }
}
