//! Scaling and blitting primitives.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage};

use super::TileImage;

/// Rescales an image to exactly `width`×`height`.
///
/// Returns the input unchanged (borrowed) when it already has that size.
pub fn scale_image(image: &TileImage, width: u32, height: u32) -> Cow<'_, TileImage> {
    if image.width() == width && image.height() == height {
        return Cow::Borrowed(image);
    }
    Cow::Owned(TileImage::new(image.image().resize_exact(
        width,
        height,
        FilterType::Triangle,
    )))
}

/// Copies `src` into `dest` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `dest` are clipped. `src` is first converted to the
/// pixel format of `dest`, then copied sample for sample, so 16-bit and float
/// canvases keep their full precision.
pub fn blit(dest: &mut TileImage, src: &TileImage, x: i64, y: i64) {
    let converted;
    let src = if src.color_type() == dest.color_type() {
        src.image()
    } else {
        converted = convert_to(src.image(), dest.color_type());
        &converted
    };

    match (dest.image_mut(), src) {
        (DynamicImage::ImageLuma8(d), DynamicImage::ImageLuma8(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageLumaA8(d), DynamicImage::ImageLumaA8(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageRgb8(d), DynamicImage::ImageRgb8(s)) => imageops::replace(d, s, x, y),
        (DynamicImage::ImageRgba8(d), DynamicImage::ImageRgba8(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageLuma16(d), DynamicImage::ImageLuma16(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageLumaA16(d), DynamicImage::ImageLumaA16(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageRgb16(d), DynamicImage::ImageRgb16(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageRgba16(d), DynamicImage::ImageRgba16(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageRgb32F(d), DynamicImage::ImageRgb32F(s)) => {
            imageops::replace(d, s, x, y)
        }
        (DynamicImage::ImageRgba32F(d), DynamicImage::ImageRgba32F(s)) => {
            imageops::replace(d, s, x, y)
        }
        // Formats without a typed buffer go through 8-bit RGBA
        (d, s) => imageops::replace(d, s, x, y),
    }
}

/// Converts an image to the given pixel format.
fn convert_to(image: &DynamicImage, color: ColorType) -> DynamicImage {
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.to_rgba32f()),
        _ => image.clone(),
    }
}
