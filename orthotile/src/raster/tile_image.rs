//! The decoded raster type shared by the cache and the compositor.

use std::path::Path;

use image::{ColorType, DynamicImage};

use super::RasterError;

/// Largest canvas edge the compositor will allocate, in pixels.
///
/// Matches the texture size limit of common GPUs.
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// A decoded orthophoto raster.
///
/// Wraps an [`image::DynamicImage`], which carries the pixel format and
/// sample type alongside the samples themselves.
#[derive(Debug, Clone)]
pub struct TileImage {
    image: DynamicImage,
}

impl TileImage {
    /// Wraps a decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Allocates a zero-filled canvas with the given pixel format.
    pub fn blank(width: u32, height: u32, color: ColorType) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions {
                width,
                height,
                reason: "zero-sized".to_string(),
            });
        }
        if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
            return Err(RasterError::InvalidDimensions {
                width,
                height,
                reason: format!("exceeds maximum of {}", MAX_CANVAS_DIMENSION),
            });
        }
        Ok(Self::new(DynamicImage::new(width, height, color)))
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel format and sample type.
    #[inline]
    pub fn color_type(&self) -> ColorType {
        self.image.color()
    }

    /// Number of channels per pixel.
    pub fn channel_count(&self) -> u8 {
        self.color_type().channel_count()
    }

    /// Bytes per pixel across all channels.
    pub fn bytes_per_pixel(&self) -> u8 {
        self.color_type().bytes_per_pixel()
    }

    /// Size of the decoded samples in bytes.
    pub fn byte_size(&self) -> usize {
        self.image.as_bytes().len()
    }

    /// Borrows the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut DynamicImage {
        &mut self.image
    }

    /// Consumes the tile, returning the underlying image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Encodes the raster to a file, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<(), RasterError> {
        self.image.save(path).map_err(|source| RasterError::Save {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl From<DynamicImage> for TileImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}
