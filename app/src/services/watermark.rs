//! Watermark loading and pasting.

use std::path::Path;

use image::RgbaImage;
use outfit_imaging::{overlay, preprocess_file, stretch_to};
use outfit_layout::{CanvasGeometry, OccupiedSet, WatermarkPosition, plan_watermark, watermark_size};

/// Decode the watermark once per batch. Failures are logged and disable it.
pub fn load_watermark(path: &Path) -> Option<RgbaImage> {
    match preprocess_file(path, u32::MAX, u32::MAX) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!("Watermark {} skipped: {e}", path.display());
            None
        }
    }
}

/// Shrink and paste the watermark if its spot is free.
///
/// Returns whether it was pasted. The watermark rect is not recorded as
/// occupied.
pub fn place_watermark(
    canvas: &mut RgbaImage,
    geometry: CanvasGeometry,
    watermark: &RgbaImage,
    position: WatermarkPosition,
    occupied: &OccupiedSet,
) -> bool {
    let (width, height) = watermark.dimensions();
    let Some(size) = watermark_size(geometry.width, width, height) else {
        tracing::warn!("Watermark skipped: resized to zero");
        return false;
    };

    let rect = match plan_watermark(geometry, size, position, occupied) {
        Ok(rect) => rect,
        Err(skip) => {
            tracing::info!("Watermark skipped: {skip}");
            return false;
        }
    };

    if size == (width, height) {
        overlay(canvas, watermark, rect.x, rect.y);
    } else {
        let scaled = stretch_to(watermark, size.0, size.1);
        overlay(canvas, &scaled, rect.x, rect.y);
    }
    tracing::debug!(?rect, ?position, "Watermark pasted");
    true
}
