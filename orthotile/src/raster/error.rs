//! Error types for raster operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, building or writing rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The file could not be opened or decoded.
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image could not be encoded or written.
    #[error("Failed to save image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A canvas with these dimensions cannot be allocated.
    #[error("Invalid canvas dimensions {width}×{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },
}
