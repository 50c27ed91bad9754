//! Background effects: Gaussian blur and brightness.
//!
//! The synthesizer applies blur first and brightness second, so blurred
//! halos are brightened evenly with the rest of the background.

use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

/// Gaussian blur over all four channels, alpha included.
///
/// Non-positive sigma values return the image unchanged.
#[must_use = "returns the blurred RGBA image"]
pub fn gaussian_blur_rgba(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    debug!(w = image.width(), h = image.height(), sigma, "Blurring background");
    gaussian_blur_f32(image, sigma)
}

/// Scale the RGB channels by `1 + delta / 100`.
///
/// `delta` is expected in `-100..=100`, i.e. a factor between 0× and 2×.
/// Channels saturate at 255 and the alpha channel is left as is.
#[must_use = "returns the adjusted image"]
pub fn adjust_brightness(image: &RgbaImage, delta: i32) -> RgbaImage {
    let factor = (1.0 + delta as f32 / 100.0).max(0.0);
    if (factor - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }

    let scale = |v: u8| (f32::from(v) * factor).round().clamp(0.0, 255.0) as u8;
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [scale(r), scale(g), scale(b), a];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn striped(width: u32) -> RgbaImage {
        RgbaImage::from_fn(width, 8, |x, _| {
            if x < width / 2 {
                Rgba([240, 30, 30, 255])
            } else {
                Rgba([30, 30, 240, 0])
            }
        })
    }

    #[test]
    fn test_non_positive_sigma_is_identity() {
        let img = striped(12);
        assert_eq!(gaussian_blur_rgba(&img, 0.0), img);
        assert_eq!(gaussian_blur_rgba(&img, -1.0), img);
    }

    #[test]
    fn test_blur_mixes_colors_and_alpha_at_the_seam() {
        let img = striped(12);
        let blurred = gaussian_blur_rgba(&img, 2.0);
        assert_eq!(blurred.dimensions(), (12, 8));

        let [r_left, _, b_left, a_left] = blurred.get_pixel(5, 4).0;
        let [r_right, _, b_right, a_right] = blurred.get_pixel(6, 4).0;
        assert!(r_left < 240 && b_left > 30);
        assert!(r_right > 30 && b_right < 240);
        assert!(a_left < 255 && a_right > 0);
    }

    #[test]
    fn test_flat_fill_survives_blur() {
        let img = RgbaImage::from_pixel(9, 9, Rgba([245, 245, 220, 255]));
        let blurred = gaussian_blur_rgba(&img, 3.0);
        let center = blurred.get_pixel(4, 4).0;
        for (got, want) in center.iter().zip([245u8, 245, 220, 255]) {
            assert!(got.abs_diff(want) <= 1, "expected ~{want}, got {got}");
        }
    }

    #[test]
    fn test_brightness_identity_at_zero() {
        let img = striped(4);
        assert_eq!(adjust_brightness(&img, 0), img);
    }

    #[test]
    fn test_brightness_factor_and_saturation() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 50, 77]));
        assert_eq!(
            adjust_brightness(&img, 50).get_pixel(0, 0),
            &Rgba([150, 255, 75, 77])
        );
        assert_eq!(
            adjust_brightness(&img, -30).get_pixel(0, 0),
            &Rgba([70, 140, 35, 77])
        );
        assert_eq!(
            adjust_brightness(&img, -100).get_pixel(0, 0),
            &Rgba([0, 0, 0, 77])
        );
    }
}
