//! Raster utilities for outfit composition.
//!
//! Provides asset preprocessing (EXIF orientation + thumbnail), alpha
//! overlay onto the canvas, background effects, name labels, and the
//! luminance-based contrast check used to flag hard-to-read placements.

pub mod compose;
pub mod contrast;
pub mod effects;
pub mod preprocess;
pub mod text;

// Re-exports for convenience
pub use compose::{flatten_to_rgb, overlay, region};
pub use contrast::{ITEM_CONTRAST_THRESHOLD, TEXT_CONTRAST_THRESHOLD, estimate_contrast};
pub use effects::{adjust_brightness, gaussian_blur_rgba};
pub use preprocess::{preprocess_bytes, preprocess_file, stretch_to, thumbnail};

/// Error raised while turning an asset on disk into a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
