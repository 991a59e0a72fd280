//! The 1/8-degree terrain bucket scheme.

use std::fmt;

use crate::bounds::normalize_lon;
use crate::coord::GEOMETRY_EPSILON;

use super::{Bucket, BucketIndex};

/// Height of every bucket in degrees of latitude.
pub const BUCKET_HEIGHT: f64 = 0.125;

const HALF_BUCKET_HEIGHT: f64 = BUCKET_HEIGHT / 2.0;

/// Latitude limit used when stepping between rows, keeps siblings off the pole.
const SIBLING_LAT_LIMIT: f64 = 89.99999;

/// Bucket width in degrees of longitude for the band containing `lat`.
///
/// Bands are symmetric about the equator with the lower bound inclusive.
pub fn bucket_span(lat: f64) -> f64 {
    if lat >= 89.0 {
        12.0
    } else if lat >= 86.0 {
        4.0
    } else if lat >= 83.0 {
        2.0
    } else if lat >= 76.0 {
        1.0
    } else if lat >= 62.0 {
        0.5
    } else if lat >= 22.0 {
        0.25
    } else if lat >= -22.0 {
        0.125
    } else if lat >= -62.0 {
        0.25
    } else if lat >= -76.0 {
        0.5
    } else if lat >= -83.0 {
        1.0
    } else if lat >= -86.0 {
        2.0
    } else if lat >= -89.0 {
        4.0
    } else {
        12.0
    }
}

/// Integer degree containing `value`, rounding towards negative infinity.
///
/// Values within [`GEOMETRY_EPSILON`] of a whole degree snap onto it.
fn floor_degree(value: f64) -> i32 {
    let truncated = value as i32;
    let diff = value - truncated as f64;
    if value >= 0.0 || diff.abs() < GEOMETRY_EPSILON {
        truncated
    } else {
        truncated - 1
    }
}

/// A bucket in the conventional terrain scheme.
///
/// A bucket is addressed by the integer degree cell `(lon, lat)` holding its
/// south-west corner and by sub-indices `x` (0..8, column within the degree)
/// and `y` (0..8, eighth-degree row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SgBucket {
    lon: i32,
    lat: i32,
    x: u8,
    y: u8,
}

impl SgBucket {
    /// Reconstructs a bucket from its index.
    pub fn from_index(index: BucketIndex) -> Self {
        let lon = (index >> 14) as i32 - 180;
        let lat = ((index >> 6) & 0xff) as i32 - 90;
        let y = ((index >> 3) & 0x7) as u8;
        let x = (index & 0x7) as u8;
        Self { lon, lat, x, y }
    }

    /// Integer longitude of the degree cell.
    pub fn lon_degree(&self) -> i32 {
        self.lon
    }

    /// Integer latitude of the degree cell.
    pub fn lat_degree(&self) -> i32 {
        self.lat
    }

    /// Column and row within the degree cell.
    pub fn sub_index(&self) -> (u8, u8) {
        (self.x, self.y)
    }
}

impl Bucket for SgBucket {
    fn containing(lon: f64, lat: f64) -> Self {
        let dlon = normalize_lon(lon);
        let dlat = lat.clamp(-90.0, SIBLING_LAT_LIMIT);
        let span = bucket_span(dlat);

        let mut lon_degree = floor_degree(dlon);
        let x = if span <= 1.0 {
            ((dlon - lon_degree as f64) / span) as i32
        } else {
            // wide buckets snap the degree cell onto a multiple of the span
            lon_degree = if dlon >= 0.0 {
                ((lon_degree as f64 / span) as i32 as f64 * span) as i32
            } else {
                let snapped =
                    (((lon_degree + 1) as f64 / span) as i32 as f64 * span - span) as i32;
                snapped.max(-180)
            };
            0
        };

        let lat_degree = floor_degree(dlat);
        let y = ((dlat - lat_degree as f64) * 8.0) as i32;

        Self {
            lon: lon_degree,
            lat: lat_degree,
            x: x.clamp(0, 7) as u8,
            y: y.clamp(0, 7) as u8,
        }
    }

    fn center_lon(&self) -> f64 {
        let span = self.width();
        if span >= 1.0 {
            self.lon as f64 + span / 2.0
        } else {
            self.lon as f64 + self.x as f64 * span + span / 2.0
        }
    }

    fn center_lat(&self) -> f64 {
        self.lat as f64 + self.y as f64 / 8.0 + HALF_BUCKET_HEIGHT
    }

    fn width(&self) -> f64 {
        bucket_span(self.center_lat())
    }

    fn height(&self) -> f64 {
        BUCKET_HEIGHT
    }

    fn index(&self) -> BucketIndex {
        (((self.lon + 180) as i64) << 14)
            + (((self.lat + 90) as i64) << 6)
            + ((self.y as i64) << 3)
            + self.x as i64
    }

    fn sibling(&self, dx: i32, dy: i32) -> Self {
        let lat = (self.center_lat() + dy as f64 * BUCKET_HEIGHT)
            .clamp(-SIBLING_LAT_LIMIT, SIBLING_LAT_LIMIT);
        let lon = normalize_lon(self.center_lon() + dx as f64 * bucket_span(lat));
        Self::containing(lon, lat)
    }

    fn base_path(&self) -> String {
        let (top_lon, top_lat) = (ten_degree_cell(self.lon), ten_degree_cell(self.lat));

        format!(
            "{}{:03}{}{:02}/{}{:03}{}{:02}",
            if top_lon >= 0 { 'e' } else { 'w' },
            top_lon.abs(),
            if top_lat >= 0 { 'n' } else { 's' },
            top_lat.abs(),
            if self.lon >= 0 { 'e' } else { 'w' },
            self.lon.abs(),
            if self.lat >= 0 { 'n' } else { 's' },
            self.lat.abs()
        )
    }
}

/// South-west corner of the 10° cell containing an integer degree.
fn ten_degree_cell(degree: i32) -> i32 {
    let mut cell = degree / 10;
    if degree < 0 && cell * 10 != degree {
        cell -= 1;
    }
    cell * 10
}

impl fmt::Display for SgBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_path(), self.index())
    }
}
