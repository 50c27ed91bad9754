//! Canvas composition helpers: alpha overlay, region copy and RGB flattening.

use image::{Rgba, RgbImage, RgbaImage};

/// Overlay `top` onto `base` with its top-left corner at `(x, y)`.
///
/// The `top` image is alpha-composited over the base. Pixels falling
/// outside the base (including negative offsets) are dropped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: i32, y: i32) {
    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = i64::from(x) + i64::from(dx);
        let target_y = i64::from(y) + i64::from(dy);
        if target_x < 0 || target_y < 0 || target_x >= base_w || target_y >= base_h {
            continue;
        }
        let (tx, ty) = (target_x as u32, target_y as u32);
        let alpha = pixel[3] as f32 / 255.0;
        if alpha > 0.99 {
            base.put_pixel(tx, ty, *pixel);
        } else if alpha > 0.01 {
            let bg = base.get_pixel(tx, ty);
            let blended = blend_pixel(bg, pixel, alpha);
            base.put_pixel(tx, ty, blended);
        }
    }
}

/// Copy the part of `canvas` covered by the given rectangle.
///
/// The rectangle is clipped to the canvas; an empty intersection yields a
/// zero-sized image.
pub fn region(canvas: &RgbaImage, x: i32, y: i32, width: u32, height: u32) -> RgbaImage {
    let left = i64::from(x).clamp(0, i64::from(canvas.width()));
    let top = i64::from(y).clamp(0, i64::from(canvas.height()));
    let right = (i64::from(x) + i64::from(width)).clamp(left, i64::from(canvas.width()));
    let bottom = (i64::from(y) + i64::from(height)).clamp(top, i64::from(canvas.height()));

    image::imageops::crop_imm(
        canvas,
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
    .to_image()
}

/// Drop the alpha channel for formats that cannot store it.
///
/// Transparency is discarded, not blended: each pixel keeps its RGB values.
pub fn flatten_to_rgb(canvas: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, _] = canvas.get_pixel(x, y).0;
        image::Rgb([r, g, b])
    })
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    let bg_alpha = bg[3] as f32 / 255.0;
    let out_alpha = alpha + bg_alpha * inv;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        (out_alpha * 255.0).round().min(255.0) as u8,
    ])
}
