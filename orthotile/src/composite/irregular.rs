//! Compositing of arbitrary, possibly unevenly sized, orthophotos.

use std::sync::Arc;

use tracing::debug;

use crate::bounds::GeoBounds;
use crate::orthophoto::Orthophoto;
use crate::raster::{blit, scale_image, TileImage};

use super::CompositeError;

/// Paint several orthophotos onto one canvas covering their union.
///
/// The pixel density is that of the first photo, measured separately along
/// longitude and latitude; every photo is rescaled to its footprint at that
/// density and placed by its offset from the union's south-west corner.
/// Areas no photo covers stay blank.
pub(crate) fn compose(photos: &[Orthophoto]) -> Result<Option<Orthophoto>, CompositeError> {
    let Some(first) = photos.first() else {
        return Ok(None);
    };
    if photos.len() == 1 {
        return Ok(Some(first.clone()));
    }

    let px_per_lon = f64::from(first.width()) / first.bounds().width();
    let px_per_lat = f64::from(first.height()) / first.bounds().height();

    let mut union = GeoBounds::empty();
    for photo in photos {
        union.absorb(photo.bounds());
    }

    let canvas_width = to_pixels(union.width() * px_per_lon);
    let canvas_height = to_pixels(union.height() * px_per_lat);
    let mut canvas = TileImage::blank(canvas_width, canvas_height, first.image().color_type())?;

    for photo in photos {
        let bounds = photo.bounds();
        let width = to_pixels(bounds.width() * px_per_lon).max(1);
        let height = to_pixels(bounds.height() * px_per_lat).max(1);
        let scaled = scale_image(photo.image(), width, height);

        let x = (bounds.lon_offset_from(&union) * px_per_lon).round() as i64;
        let from_bottom = (bounds.lat_offset_from(&union) * px_per_lat).round() as i64;
        let y = i64::from(canvas_height) - from_bottom - i64::from(height);
        blit(&mut canvas, &scaled, x, y);
    }

    debug!(
        photos = photos.len(),
        width = canvas_width,
        height = canvas_height,
        bounds = %union,
        "Composited irregular orthophoto set"
    );

    Ok(Some(Orthophoto::new(Arc::new(canvas), union)))
}

/// Rounds a pixel extent; non-finite or negative values become 0.
fn to_pixels(extent: f64) -> u32 {
    if extent.is_finite() && extent > 0.0 {
        extent.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
