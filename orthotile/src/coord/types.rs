//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors for out-of-range coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside -90..=90.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A geodetic position on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geod {
    /// Longitude in degrees, east positive.
    pub lon_deg: f64,
    /// Latitude in degrees, north positive.
    pub lat_deg: f64,
    /// Height above the ellipsoid in metres.
    pub elevation_m: f64,
}

impl Geod {
    /// Creates a position from degrees without validation.
    #[inline]
    pub fn from_deg(lon_deg: f64, lat_deg: f64, elevation_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            elevation_m,
        }
    }

    /// Creates a position from radians.
    #[inline]
    pub fn from_rad(lon_rad: f64, lat_rad: f64, elevation_m: f64) -> Self {
        Self::from_deg(lon_rad.to_degrees(), lat_rad.to_degrees(), elevation_m)
    }

    /// Creates a surface position, rejecting out-of-range coordinates.
    pub fn try_from_deg(lon_deg: f64, lat_deg: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat_deg) {
            return Err(CoordError::InvalidLatitude(lat_deg));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon_deg) {
            return Err(CoordError::InvalidLongitude(lon_deg));
        }
        Ok(Self::from_deg(lon_deg, lat_deg, 0.0))
    }
}

impl fmt::Display for Geod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}°{}, {:.6}°{}, {:.1} m",
            self.lat_deg.abs(),
            if self.lat_deg >= 0.0 { 'N' } else { 'S' },
            self.lon_deg.abs(),
            if self.lon_deg >= 0.0 { 'E' } else { 'W' },
            self.elevation_m
        )
    }
}
