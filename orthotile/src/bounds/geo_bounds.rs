//! The [`GeoBounds`] rectangle and its longitude arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::Hemisphere;

/// Tolerance used for comparisons between edges, in degrees.
pub const BOUNDS_EPSILON: f64 = 1e-9;

/// Wraps a longitude into `[-180, 180)`.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to the divisor for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Distance travelled eastward from `from` to reach `to`, in `[0, 360)`.
#[inline]
fn eastward(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// A geographic rectangle that may cross the prime meridian or antimeridian.
///
/// Longitude is held as a western edge in `[-180, 180)` and an eastward span
/// in `[0, 360]`. Latitude is a plain `south..=north` interval. The empty
/// bounds use inverted sentinels (`south = 90`, `north = -90`) and act as the
/// identity for [`expand`](Self::expand) and [`absorb`](Self::absorb).
///
/// Bounds only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    west: f64,
    span: f64,
    south: f64,
    north: f64,
}

impl GeoBounds {
    /// Returns the empty bounds (nothing seen yet).
    pub const fn empty() -> Self {
        Self {
            west: 180.0,
            span: 0.0,
            south: 90.0,
            north: -90.0,
        }
    }

    /// Creates bounds from edges, measuring longitude eastward from `west`.
    ///
    /// `east` may be less than `west`, in which case the box crosses the
    /// antimeridian: `from_edges(170.0, 0.0, -170.0, 1.0)` is 20° wide.
    pub fn from_edges(west: f64, south: f64, east: f64, north: f64) -> Self {
        let mut span = east - west;
        if span < 0.0 {
            span += 360.0;
        }

        Self {
            west: normalize_lon(west),
            span: span.min(360.0),
            south: south.min(north),
            north: south.max(north),
        }
    }

    /// Creates bounds centred on a point with the given angular size.
    pub fn from_center(lon: f64, lat: f64, width: f64, height: f64) -> Self {
        let width = width.clamp(0.0, 360.0);
        let height = height.max(0.0);

        Self {
            west: normalize_lon(lon - width / 2.0),
            span: width,
            south: lat - height / 2.0,
            north: lat + height / 2.0,
        }
    }

    /// Returns true if nothing has been added to these bounds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.north < self.south
    }

    /// Western edge in `[-180, 180)`.
    #[inline]
    pub fn min_lon(&self) -> f64 {
        self.west
    }

    /// Eastern edge in `(-180, 180]`.
    ///
    /// For a box crossing the antimeridian this is less than [`min_lon`](Self::min_lon).
    #[inline]
    pub fn max_lon(&self) -> f64 {
        let east = self.west + self.span;
        if east > 180.0 {
            east - 360.0
        } else {
            east
        }
    }

    /// Eastern edge without wrapping, i.e. `min_lon() + width()`.
    #[inline]
    pub fn unwrapped_max_lon(&self) -> f64 {
        self.west + self.span
    }

    /// Southern edge.
    #[inline]
    pub fn min_lat(&self) -> f64 {
        self.south
    }

    /// Northern edge.
    #[inline]
    pub fn max_lat(&self) -> f64 {
        self.north
    }

    /// Classifies these bounds by the meridians they touch.
    pub fn hemisphere(&self) -> Hemisphere {
        if self.is_empty() {
            return Hemisphere::Invalid;
        }

        let east = self.west + self.span;
        if east > 180.0 + BOUNDS_EPSILON {
            Hemisphere::StraddlingAntimeridian
        } else if self.west >= -BOUNDS_EPSILON {
            Hemisphere::Eastern
        } else if east <= BOUNDS_EPSILON {
            Hemisphere::Western
        } else {
            Hemisphere::StraddlingPrimeMeridian
        }
    }

    /// Longitudinal extent in degrees. Empty bounds log a warning and yield 0.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            warn!("Width requested for empty orthophoto bounds");
            return 0.0;
        }
        self.span
    }

    /// Latitudinal extent in degrees. Empty bounds log a warning and yield 0.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            warn!("Height requested for empty orthophoto bounds");
            return 0.0;
        }
        self.north - self.south
    }

    /// Centre point as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            normalize_lon(self.west + self.span / 2.0),
            (self.south + self.north) / 2.0,
        )
    }

    /// Grows the bounds to include a point.
    ///
    /// When the point lies outside, the bounds grow in whichever direction
    /// gives the narrower result. On a tie the result that does not cross the
    /// antimeridian wins, so `{-90, 90}` becomes a prime-meridian box.
    pub fn expand(&mut self, lon: f64, lat: f64) {
        self.absorb_extent(normalize_lon(lon), 0.0, lat, lat);
    }

    /// Grows the bounds to include another rectangle.
    pub fn absorb(&mut self, other: &GeoBounds) {
        if other.is_empty() {
            return;
        }
        self.absorb_extent(other.west, other.span, other.south, other.north);
    }

    fn absorb_extent(&mut self, west: f64, span: f64, south: f64, north: f64) {
        if self.is_empty() {
            *self = Self {
                west,
                span,
                south,
                north,
            };
            return;
        }

        // The narrowest arc covering two arcs starts at one of their west edges.
        let keep_west = self.span.max(eastward(self.west, west) + span).min(360.0);
        let take_west = span.max(eastward(west, self.west) + self.span).min(360.0);

        let take_other = if (keep_west - take_west).abs() <= BOUNDS_EPSILON {
            prefer_second(self.west, keep_west, west, take_west)
        } else {
            take_west < keep_west
        };

        if take_other {
            self.west = west;
            self.span = take_west;
        } else {
            self.span = keep_west;
        }
        self.south = self.south.min(south);
        self.north = self.north.max(north);
    }

    /// Signed longitude of this box's western edge relative to `other`'s.
    ///
    /// Positive values are east of `other.min_lon()`. Returns 0 and logs an
    /// error if either box is empty.
    pub fn lon_offset_from(&self, other: &GeoBounds) -> f64 {
        if self.is_empty() || other.is_empty() {
            error!(
                this = %self.hemisphere(),
                other = %other.hemisphere(),
                "Longitude offset requested between incomparable bounds"
            );
            return 0.0;
        }
        other.lon_position(self.west)
    }

    /// Signed latitude of this box's southern edge relative to `other`'s.
    ///
    /// Returns 0 and logs an error if either box is empty.
    pub fn lat_offset_from(&self, other: &GeoBounds) -> f64 {
        if self.is_empty() || other.is_empty() {
            error!(
                this = %self.hemisphere(),
                other = %other.hemisphere(),
                "Latitude offset requested between incomparable bounds"
            );
            return 0.0;
        }
        self.south - other.south
    }

    /// Maps a point to normalized texture coordinates.
    ///
    /// `u` grows eastward from the western edge, `v` grows southward from
    /// the northern edge, so `(max_lon, max_lat)` maps to `(1, 0)`.
    ///
    /// A full 360° ring has its seam at the western edge. There a longitude
    /// equal to [`unwrapped_max_lon`](Self::unwrapped_max_lon) maps to
    /// `u = 1` and any other spelling of the seam maps to `u = 0`.
    pub fn tex_coord(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.is_empty() {
            warn!(lon, lat, "Texture coordinate requested for empty bounds");
            return (0.0, 0.0);
        }

        let u = if self.span <= BOUNDS_EPSILON {
            0.0
        } else {
            let d = self.lon_position(lon);
            if d <= BOUNDS_EPSILON
                && self.span >= 360.0 - BOUNDS_EPSILON
                && (lon - self.unwrapped_max_lon()).abs() <= BOUNDS_EPSILON
            {
                1.0
            } else {
                d / self.span
            }
        };

        let height = self.north - self.south;
        let v = if height <= BOUNDS_EPSILON {
            0.0
        } else {
            (self.north - lat) / height
        };

        (u, v)
    }

    /// Returns true if the point lies inside (edges included).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        if lat < self.south - BOUNDS_EPSILON || lat > self.north + BOUNDS_EPSILON {
            return false;
        }
        let d = self.lon_position(lon);
        d >= -BOUNDS_EPSILON && d <= self.span + BOUNDS_EPSILON
    }

    /// Returns true if this box reaches at least as far east as `other`.
    ///
    /// Both boxes are measured from this box's western edge.
    pub fn reaches_east_of(&self, other: &GeoBounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.lon_position(other.west) + other.span <= self.span + BOUNDS_EPSILON
    }

    /// Returns true if this box reaches at least as far north as `other`.
    pub fn reaches_north_of(&self, other: &GeoBounds) -> bool {
        !self.is_empty() && self.north + BOUNDS_EPSILON >= other.north
    }

    /// Returns true if `other` lies entirely within these bounds.
    pub fn covers(&self, other: &GeoBounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let start = self.lon_position(other.west);
        start >= -BOUNDS_EPSILON
            && self.reaches_east_of(other)
            && other.south + BOUNDS_EPSILON >= self.south
            && self.reaches_north_of(other)
    }

    /// Returns a copy moved inward by `margin` degrees on every side.
    ///
    /// An extent narrower than twice the margin collapses onto its centre line.
    pub fn shrunk(&self, margin: f64) -> GeoBounds {
        if self.is_empty() {
            return *self;
        }

        let lon_margin = margin.min(self.span / 2.0);
        let lat_margin = margin.min((self.north - self.south) / 2.0);

        Self {
            west: normalize_lon(self.west + lon_margin),
            span: self.span - 2.0 * lon_margin,
            south: self.south + lat_margin,
            north: self.north - lat_margin,
        }
    }

    /// Moves a point onto the nearest position inside these bounds.
    pub fn clamp(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.is_empty() {
            return (lon, lat);
        }

        let lat = lat.clamp(self.south, self.north);
        let d = self.lon_position(lon);
        let lon = if d < 0.0 {
            self.west
        } else if d > self.span {
            normalize_lon(self.west + self.span)
        } else {
            normalize_lon(lon)
        };
        (lon, lat)
    }

    /// Eastward position of `lon` measured from the western edge.
    ///
    /// Points outside the box resolve to whichever edge is nearer, so a point
    /// just west of the box yields a small negative value.
    fn lon_position(&self, lon: f64) -> f64 {
        let d = eastward(self.west, lon);
        if d > self.span && (360.0 - d) < (d - self.span) {
            d - 360.0
        } else {
            d
        }
    }
}

/// Tie-break between two equally wide candidate arcs.
///
/// Prefer the arc that stays off the antimeridian, then the more eastern one.
fn prefer_second(first_west: f64, first_span: f64, second_west: f64, second_span: f64) -> bool {
    let first_wraps = first_west + first_span > 180.0 + BOUNDS_EPSILON;
    let second_wraps = second_west + second_span > 180.0 + BOUNDS_EPSILON;

    match (first_wraps, second_wraps) {
        (true, false) => true,
        (false, true) => false,
        _ => second_west > first_west + BOUNDS_EPSILON,
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[empty]");
        }
        write!(
            f,
            "lon {:.6}..{:.6}, lat {:.6}..{:.6} ({})",
            self.min_lon(),
            self.max_lon(),
            self.south,
            self.north,
            self.hemisphere()
        )
    }
}
