//! Watermark sizing and the single-shot position check.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::geometry::{CanvasGeometry, OccupiedSet, PlacementRect};

/// Watermark width never exceeds `canvas_width / MAX_WIDTH_DIVISOR`.
pub const MAX_WIDTH_DIVISOR: u32 = 4;
const ABOVE_OFFSET: i32 = 50;
const BELOW_OFFSET: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatermarkPosition {
    Above,
    #[default]
    Below,
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

impl FromStr for WatermarkPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(format!("invalid watermark position: {other} (expected above or below)")),
        }
    }
}

/// Why a watermark was left out.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkSkip {
    #[error("watermark resized to zero")]
    ZeroSize,
    #[error("watermark would overlap {0:?}")]
    Overlap(PlacementRect),
}

/// Target size for a `width × height` watermark: capped at a quarter of the
/// canvas width, never enlarged, height proportional.
///
/// `None` when either side rounds to zero.
pub fn watermark_size(canvas_width: u32, width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let max_width = canvas_width / MAX_WIDTH_DIVISOR;
    if width <= max_width {
        return Some((width, height));
    }
    let scaled_height = (u64::from(height) * u64::from(max_width) / u64::from(width)) as u32;
    if max_width == 0 || scaled_height == 0 {
        return None;
    }
    Some((max_width, scaled_height))
}

/// Position a watermark of `size`, horizontally centered.
///
/// The rect is checked once against `occupied` without padding; there is
/// no retry. The caller must not add the result to `occupied`.
pub fn plan_watermark(
    canvas: CanvasGeometry,
    size: (u32, u32),
    position: WatermarkPosition,
    occupied: &OccupiedSet,
) -> Result<PlacementRect, WatermarkSkip> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(WatermarkSkip::ZeroSize);
    }

    let x = (canvas.width as i32 - width as i32) / 2;
    let y = match position {
        WatermarkPosition::Above => canvas.margin_px() + ABOVE_OFFSET,
        WatermarkPosition::Below => canvas.safe_bottom() - height as i32 - BELOW_OFFSET,
    };
    let rect = PlacementRect::new(x, y, width, height);

    if let Some(hit) = occupied
        .as_slice()
        .iter()
        .find(|other| rect.overlaps_with_padding(other, 0))
    {
        debug!(?rect, ?hit, "Watermark overlaps placed content");
        return Err(WatermarkSkip::Overlap(*hit));
    }
    Ok(rect)
}
