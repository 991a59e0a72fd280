//! Hemisphere classification of a bounding rectangle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which part of the globe a [`GeoBounds`](super::GeoBounds) occupies in longitude.
///
/// The classification is derived from the stored edges and never drives the
/// arithmetic itself. It exists for diagnostics and for callers that need to
/// know whether a box wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    /// Entirely within `0..=180` degrees east.
    Eastern,
    /// Entirely within `-180..=0` degrees.
    Western,
    /// Crosses the prime meridian (0°).
    StraddlingPrimeMeridian,
    /// Crosses the antimeridian (±180°).
    StraddlingAntimeridian,
    /// Empty bounds; nothing has been added yet.
    Invalid,
}

impl Hemisphere {
    /// Returns true if the rectangle crosses either meridian.
    pub fn is_straddling(&self) -> bool {
        matches!(
            self,
            Hemisphere::StraddlingPrimeMeridian | Hemisphere::StraddlingAntimeridian
        )
    }

    /// Returns true for the empty classification.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Hemisphere::Invalid)
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::Eastern => write!(f, "eastern"),
            Hemisphere::Western => write!(f, "western"),
            Hemisphere::StraddlingPrimeMeridian => write!(f, "straddling prime meridian"),
            Hemisphere::StraddlingAntimeridian => write!(f, "straddling antimeridian"),
            Hemisphere::Invalid => write!(f, "invalid"),
        }
    }
}
