//! Shirt-over-pants block layout.

use tracing::debug;

use crate::geometry::{CanvasGeometry, PlacementRect};
use crate::zones::PlacementMode;

/// Garment thumbnail width as a fraction of the content width.
pub const GARMENT_WIDTH_FRACTION: f64 = 0.5;

/// Garment thumbnail height as a fraction of the content height.
pub const GARMENT_HEIGHT_FRACTION: f64 = 0.35;

/// Left/right modes move the block by `content_width / MODE_SHIFT_DIVISOR`.
pub const MODE_SHIFT_DIVISOR: i32 = 7;

/// Maximum thumbnail size for either garment.
pub fn garment_bounds(canvas: CanvasGeometry, main_factor: f64) -> (u32, u32) {
    let width = f64::from(canvas.content_width()) * GARMENT_WIDTH_FRACTION * main_factor;
    let height = f64::from(canvas.content_height()) * GARMENT_HEIGHT_FRACTION * main_factor;
    ((width as u32).max(1), (height as u32).max(1))
}

/// Final positions of the two garments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarmentLayout {
    pub mode: PlacementMode,
    pub shirt: PlacementRect,
    pub pants: PlacementRect,
    /// Vertical gap between shirt and pants in pixels.
    pub spacing: i32,
}

impl GarmentLayout {
    /// Bounding box of both garments.
    pub fn block(&self) -> PlacementRect {
        self.shirt.union(&self.pants)
    }

    /// Shirt height + gap + pants height.
    pub fn block_height(&self) -> i32 {
        self.shirt.height as i32 + self.spacing + self.pants.height as i32
    }
}

/// Position shirt and pants for the given mode.
///
/// The block is centered vertically in the content area and clamped to the
/// top margin. If it would cross the bottom margin it is moved up and
/// clamped to the top margin again, so a block taller than the content
/// area still starts at the top margin and overflows at the bottom.
pub fn layout_garments(
    canvas: CanvasGeometry,
    mode: PlacementMode,
    shirt_size: (u32, u32),
    pants_size: (u32, u32),
    spacing: i32,
) -> GarmentLayout {
    let (shirt_w, shirt_h) = shirt_size;
    let (pants_w, pants_h) = pants_size;
    let margin = canvas.margin_px();

    let block_height = shirt_h as i32 + spacing + pants_h as i32;
    let mut shirt_y = margin + (canvas.content_height() as i32 - block_height) / 2;
    shirt_y = shirt_y.max(margin);
    if shirt_y + block_height > canvas.safe_bottom() {
        shirt_y = (canvas.safe_bottom() - block_height).max(margin);
    }

    let shirt = PlacementRect::new(
        horizontal_position(canvas, mode, shirt_w),
        shirt_y,
        shirt_w,
        shirt_h,
    );
    let pants = PlacementRect::new(
        horizontal_position(canvas, mode, pants_w),
        shirt_y + shirt_h as i32 + spacing,
        pants_w,
        pants_h,
    );

    debug!(?mode, ?shirt, ?pants, "Garment block laid out");
    GarmentLayout {
        mode,
        shirt,
        pants,
        spacing,
    }
}

fn horizontal_position(canvas: CanvasGeometry, mode: PlacementMode, width: u32) -> i32 {
    let content_width = canvas.content_width() as i32;
    let centered = canvas.margin_px() + (content_width - width as i32) / 2;
    let shift = content_width / MODE_SHIFT_DIVISOR;
    let x = match mode {
        PlacementMode::Center => centered,
        PlacementMode::Left => centered - shift,
        PlacementMode::Right => centered + shift,
    };
    x.min(canvas.safe_right() - width as i32)
        .max(canvas.margin_px())
}
