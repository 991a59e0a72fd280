//! The finished orthophoto: an image and the ground it covers.

use std::path::Path;
use std::sync::Arc;

use crate::bounds::GeoBounds;
use crate::raster::{RasterError, TileImage};

/// An orthophoto image paired with its geographic bounds.
///
/// Immutable once built. The image is reference counted so that a
/// single-tile result can share the cached tile instead of copying it.
#[derive(Debug, Clone)]
pub struct Orthophoto {
    image: Arc<TileImage>,
    bounds: GeoBounds,
}

impl Orthophoto {
    /// Wrap an image covering `bounds`.
    pub fn new(image: Arc<TileImage>, bounds: GeoBounds) -> Self {
        Self { image, bounds }
    }

    /// The pixel data.
    pub fn image(&self) -> &TileImage {
        &self.image
    }

    /// A shared handle to the pixel data.
    pub fn image_arc(&self) -> Arc<TileImage> {
        Arc::clone(&self.image)
    }

    /// Geographic extent of the image.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Texture coordinate of a geographic point, `(0, 0)` at the north-west
    /// corner and `(1, 1)` at the south-east corner.
    pub fn tex_coord(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.bounds.tex_coord(lon, lat)
    }

    /// Write the image to disk; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<(), RasterError> {
        self.image.save(path)
    }
}
