//! Error types for orthophoto compositing.

use thiserror::Error;

use crate::raster::RasterError;

/// Errors that stop an area lookup from producing an orthophoto.
///
/// Missing imagery is not an error; lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// The requested rectangle crosses a latitude where the bucket width
    /// changes, so its buckets cannot form a regular grid.
    #[error(
        "Bucket width changes from {expected}° to {found}° at latitude {lat:.4}; \
         area spans non-uniform buckets"
    )]
    UnsupportedSpan { expected: f64, found: f64, lat: f64 },

    /// The rectangle needs more buckets along one axis than allowed.
    #[error("Area needs {count} bucket {axis}, more than the maximum of {max}")]
    GridTooLarge {
        axis: &'static str,
        count: usize,
        max: usize,
    },

    /// The composite canvas could not be built.
    #[error("Compositing failed: {0}")]
    Raster(#[from] RasterError),
}

impl CompositeError {
    /// Returns true for the non-uniform bucket width condition.
    pub fn is_unsupported_span(&self) -> bool {
        matches!(self, CompositeError::UnsupportedSpan { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_span_display() {
        let err = CompositeError::UnsupportedSpan {
            expected: 0.125,
            found: 0.25,
            lat: 22.0625,
        };
        let message = err.to_string();
        assert!(message.contains("0.125°"));
        assert!(message.contains("0.25°"));
        assert!(message.contains("22.0625"));
        assert!(err.is_unsupported_span());
    }

    #[test]
    fn test_raster_error_converts() {
        let err: CompositeError = RasterError::InvalidDimensions {
            width: 0,
            height: 0,
            reason: "zero-sized".to_string(),
        }
        .into();
        assert!(matches!(err, CompositeError::Raster(_)));
        assert!(!err.is_unsupported_span());
    }
}
