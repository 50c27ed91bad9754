//! Placement geometry for outfit compositions.
//!
//! Everything in this crate works on rectangles and sizes only; no pixels
//! are touched. Randomized decisions take an injected [`rand::Rng`] so a
//! seeded generator reproduces a layout exactly.
//!
//! Flow for one image:
//! garment block ([`garments`]) -> zones ([`zones`]) -> accessory
//! selection and retry loop ([`accessories`]) -> watermark ([`watermark`]).

pub mod accessories;
pub mod garments;
pub mod geometry;
pub mod tables;
pub mod watermark;
pub mod zones;

pub use accessories::{
    AnchorContext, LabelSpec, Placement, PlacementRequest, SelectionError, accessory_bounds,
    find_position, select_categories,
};
pub use garments::{GarmentLayout, garment_bounds, layout_garments};
pub use geometry::{CanvasGeometry, OccupiedSet, PlacementRect};
pub use tables::{Anchor, CategorySpec, category_spec};
pub use watermark::{WatermarkPosition, WatermarkSkip, plan_watermark, watermark_size};
pub use zones::{PlacementMode, PreferredSide, Zone, plan_zones};

/// Uniform integer in `start..=end`, or `start` when the range is empty.
pub(crate) fn safe_range<R: rand::Rng + ?Sized>(rng: &mut R, start: i32, end: i32) -> i32 {
    if end < start {
        return start;
    }
    rng.gen_range(start..=end)
}
