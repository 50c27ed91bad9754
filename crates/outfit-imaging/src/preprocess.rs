//! Asset preprocessing: decode, fix EXIF orientation, shrink to bounds.
//!
//! Orientation handling is best-effort. Only the three pure rotations
//! (3, 6, 8) are applied; any other tag value, missing EXIF data, or an
//! unreadable EXIF block leaves the image as decoded.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::ImagingError;

/// Read the EXIF orientation tag from raw image bytes.
///
/// Returns `None` when there is no EXIF block or no orientation field.
pub fn read_orientation(bytes: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

/// Rotate an image according to an EXIF orientation value.
pub fn apply_orientation(img: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(3) => {
            debug!("EXIF orientation 3, rotating 180 degrees");
            img.rotate180()
        }
        Some(6) => {
            debug!("EXIF orientation 6, rotating 90 degrees clockwise");
            img.rotate90()
        }
        Some(8) => {
            debug!("EXIF orientation 8, rotating 270 degrees clockwise");
            img.rotate270()
        }
        _ => img,
    }
}

/// Compute the size an image of `width × height` takes when shrunk to fit
/// `max_width × max_height`.
///
/// Aspect ratio is preserved and the result is never larger than the input.
/// Both sides stay at least 1 pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    let new_width = (f64::from(width) * ratio).round() as u32;
    let new_height = (f64::from(height) * ratio).round() as u32;

    (
        new_width.clamp(1, max_width.max(1)),
        new_height.clamp(1, max_height.max(1)),
    )
}

/// Shrink an image so it fits within the given bounds.
///
/// Uses Lanczos3 filtering. Images already inside the bounds are returned
/// untouched, so calling this twice with the same bounds is a no-op.
pub fn thumbnail(img: RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();
    let (new_w, new_h) = fit_within(orig_w, orig_h, max_width, max_height);

    if (new_w, new_h) == (orig_w, orig_h) {
        debug!(orig_w, orig_h, "Image already within bounds, skipping resize");
        return img;
    }

    debug!(
        orig_w,
        orig_h, new_w, new_h, "Shrinking image to fit bounds"
    );
    image::imageops::resize(&img, new_w, new_h, FilterType::Lanczos3)
}

/// Stretch an image to exactly `width × height` without cropping.
pub fn stretch_to(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Decode raw bytes into an RGBA bitmap that fits `max_width × max_height`.
///
/// # Errors
///
/// Returns [`ImagingError::Decode`] if the bytes are not a supported image.
/// EXIF problems never produce an error.
pub fn preprocess_bytes(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<RgbaImage, ImagingError> {
    let decoded = image::load_from_memory(bytes)?;
    let oriented = apply_orientation(decoded, read_orientation(bytes));
    Ok(thumbnail(oriented.to_rgba8(), max_width, max_height))
}

/// Load an image file and preprocess it (see [`preprocess_bytes`]).
///
/// # Errors
///
/// Returns [`ImagingError::Io`] if the file cannot be read, or
/// [`ImagingError::Decode`] if it is not a supported image.
pub fn preprocess_file(
    path: &Path,
    max_width: u32,
    max_height: u32,
) -> Result<RgbaImage, ImagingError> {
    let bytes = std::fs::read(path)?;
    preprocess_bytes(&bytes, max_width, max_height)
}
