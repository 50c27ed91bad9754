//! Luminance contrast between a pasted element and what lies beneath it.
//!
//! Used only for advisory warnings; nothing here blocks a placement.

use image::{Rgb, RgbaImage};

/// Minimum comfortable contrast for a pasted item.
pub const ITEM_CONTRAST_THRESHOLD: f64 = 2.0;

/// Minimum comfortable contrast for a text label.
pub const TEXT_CONTRAST_THRESHOLD: f64 = 3.0;

/// Returned by [`average_color`] when no pixel survives the alpha mask.
pub const NEUTRAL_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Pixels at or below this alpha are left out of the average.
const ALPHA_CUTOFF: u8 = 50;

/// Average color of a region, ignoring near-transparent pixels.
pub fn average_color(region: &RgbaImage) -> Rgb<u8> {
    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for pixel in region.pixels() {
        let [r, g, b, a] = pixel.0;
        if a <= ALPHA_CUTOFF {
            continue;
        }
        sum[0] += u64::from(r);
        sum[1] += u64::from(g);
        sum[2] += u64::from(b);
        count += 1;
    }

    if count == 0 {
        return NEUTRAL_GRAY;
    }

    Rgb([
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ])
}

/// Normalized luma (`0.299 R + 0.587 G + 0.114 B`, in `0.0..=1.0`).
pub fn luma(color: Rgb<u8>) -> f64 {
    let [r, g, b] = color.0;
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

/// Contrast ratio `(max + 0.05) / (min + 0.05)` between two colors.
pub fn contrast_ratio(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    let (la, lb) = (luma(a), luma(b));
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Contrast between a foreground color and the average of a background region.
pub fn estimate_contrast(foreground: Rgb<u8>, background_region: &RgbaImage) -> f64 {
    contrast_ratio(foreground, average_color(background_region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn average_ignores_transparent_pixels() {
        let mut region = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 10]));
        region.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        assert_eq!(average_color(&region), Rgb([200, 100, 50]));
    }

    #[test]
    fn average_of_fully_masked_region_is_gray() {
        let region = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 50]));
        assert_eq!(average_color(&region), NEUTRAL_GRAY);
        assert_eq!(average_color(&RgbaImage::new(0, 0)), NEUTRAL_GRAY);
    }

    #[test]
    fn black_on_white_is_maximum_contrast() {
        let ratio = contrast_ratio(Rgb([0, 0, 0]), Rgb([255, 255, 255]));
        assert!((ratio - 21.0).abs() < 1e-9, "got {ratio}");
    }

    #[test]
    fn identical_colors_have_unit_contrast() {
        let ratio = contrast_ratio(Rgb([40, 90, 160]), Rgb([40, 90, 160]));
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = Rgb([250, 10, 10]);
        let b = Rgb([10, 10, 250]);
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn white_text_on_beige_is_low_contrast() {
        let beige = RgbaImage::from_pixel(4, 4, Rgba([245, 245, 220, 255]));
        let ratio = estimate_contrast(Rgb([255, 255, 255]), &beige);
        assert!(ratio < TEXT_CONTRAST_THRESHOLD, "got {ratio}");
    }
}
