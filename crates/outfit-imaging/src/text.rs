//! Single-line item labels.

use ab_glyph::{Font, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Advance width of `text` including kerning, rounded up.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let (width, _) = text
        .chars()
        .fold((0.0f32, None::<GlyphId>), |(width, prev), ch| {
            let id = scaled.glyph_id(ch);
            let kern = prev.map_or(0.0, |p| scaled.kern(p, id));
            (width + kern + scaled.h_advance(id), Some(id))
        });
    width.ceil() as u32
}

/// Draw `text` with its top-left corner at `(x, y)`. Glyphs falling off the
/// canvas are clipped.
pub fn draw_label<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    scale: PxScale,
    x: i32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    draw_text_mut(canvas, color, x, y, scale, font, text);
}
