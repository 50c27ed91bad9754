//! Canvas background: flat palette fill or a stretched photo, then effects.

use image::{Rgba, RgbaImage};
use outfit_imaging::{adjust_brightness, gaussian_blur_rgba, preprocess_file, stretch_to};
use rand::Rng;
use rand::seq::SliceRandom;

use super::catalog::ImageAsset;
use super::palette::{DEFAULT_PALETTE, RgbColor};

/// Chance of a flat palette fill when both a palette and photos exist.
pub const FLAT_FILL_PROBABILITY: f64 = 0.6;

/// What the background is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSource<'a> {
    Flat(RgbColor),
    Photo(&'a ImageAsset),
}

/// Pick the background source for one image.
///
/// An empty palette always uses a photo; an empty photo pool always uses a
/// flat fill. With neither, the first default palette color is used.
pub fn choose_source<'a, R: Rng + ?Sized>(
    palette: &[RgbColor],
    pool: &'a [ImageAsset],
    rng: &mut R,
) -> BackgroundSource<'a> {
    let flat = !palette.is_empty() && rng.gen_bool(FLAT_FILL_PROBABILITY);
    if flat || pool.is_empty() {
        return BackgroundSource::Flat(fill_color(palette, rng));
    }
    match pool.choose(rng) {
        Some(asset) => BackgroundSource::Photo(asset),
        None => BackgroundSource::Flat(fill_color(palette, rng)),
    }
}

/// Build a `width × height` background.
///
/// Photos are thumbnailed to the canvas bounds and then stretched to the
/// exact size; a photo that fails to decode degrades to a flat fill. Blur
/// (when `blur > 0`) is applied before brightness.
pub fn synthesize<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    palette: &[RgbColor],
    pool: &[ImageAsset],
    blur: f32,
    brightness: i32,
    rng: &mut R,
) -> RgbaImage {
    let base = match choose_source(palette, pool, rng) {
        BackgroundSource::Flat(color) => flat_fill(width, height, color),
        BackgroundSource::Photo(asset) => match preprocess_file(&asset.path, width, height) {
            Ok(photo) => {
                tracing::debug!(background = %asset.display_name, "Using photo background");
                stretch_to(&photo, width, height)
            }
            Err(e) => {
                tracing::warn!(
                    "Background {} could not be loaded, using a flat fill: {e}",
                    asset.path.display()
                );
                flat_fill(width, height, fill_color(palette, rng))
            }
        },
    };

    let blurred = if blur > 0.0 {
        gaussian_blur_rgba(&base, blur)
    } else {
        base
    };
    adjust_brightness(&blurred, brightness)
}

fn fill_color<R: Rng + ?Sized>(palette: &[RgbColor], rng: &mut R) -> RgbColor {
    palette.choose(rng).copied().unwrap_or(DEFAULT_PALETTE[0])
}

fn flat_fill(width: u32, height: u32, [r, g, b]: RgbColor) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))
}
