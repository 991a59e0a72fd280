//! Image loading seam.

use std::path::Path;

use tracing::warn;

use super::{RasterError, TileImage};

/// Decodes tile images from disk.
///
/// Implementations must be thread-safe (`Send + Sync`): the tile cache calls
/// them from whichever worker thread first asks for a bucket.
pub trait ImageLoader: Send + Sync {
    /// Loads the image at `path`.
    ///
    /// Returns `None` if the file is missing or cannot be decoded.
    fn load(&self, path: &Path) -> Option<TileImage>;
}

/// Decodes an image file, format chosen by content and extension.
pub fn load_image(path: &Path) -> Result<TileImage, RasterError> {
    image::open(path)
        .map(TileImage::new)
        .map_err(|source| RasterError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Loader backed by the `image` crate's decoders (PNG, DDS, JPEG, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Option<TileImage> {
        match load_image(path) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "Orthophoto tile unreadable, treating as missing");
                None
            }
        }
    }
}
