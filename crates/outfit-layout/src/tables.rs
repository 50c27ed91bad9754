//! Static per-category data: priority, size, and semantic anchor.
//!
//! Categories missing from the table fall back to [`DEFAULT_SPEC`], so new
//! accessory folders work without touching the placement code.

/// Upper-body garment category.
pub const SHIRTS: &str = "shirts";
/// Lower-body garment category.
pub const PANTS: &str = "pants";
/// Photographic background category.
pub const BACKGROUNDS: &str = "backgrounds";

/// Categories that must contain at least one image before a run starts.
pub const MANDATORY_CATEGORIES: [&str; 3] = [SHIRTS, PANTS, BACKGROUNDS];

/// Accessory categories known out of the box.
pub const DEFAULT_ACCESSORY_CATEGORIES: [&str; 8] = [
    "glasses",
    "wallets",
    "perfumes",
    "bracelets",
    "watches",
    "belts",
    "shoes",
    "vehicles",
];

/// Where an accessory starts its search before random perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Centered above the shirt.
    AboveShirt,
    /// Straddling the gap between shirt and pants.
    GarmentSeam,
    /// Centered below the pants.
    BelowPants,
    /// Centered in the largest zone.
    LargestZone,
    /// Against the zone edge closest to the garment block.
    ZoneInnerEdge,
    /// Anywhere inside the zone.
    RandomInZone,
}

impl Anchor {
    /// Side-worn items pick a preferred side and try matching zones first.
    pub fn is_side_worn(self) -> bool {
        matches!(self, Self::ZoneInnerEdge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpec {
    /// Lower is placed first.
    pub priority: u32,
    /// Fraction of the content area used as the thumbnail bound.
    pub size_fraction: f64,
    pub anchor: Anchor,
}

/// Spec for any category not listed in the table.
pub const DEFAULT_SPEC: CategorySpec = CategorySpec {
    priority: 10,
    size_fraction: 0.15,
    anchor: Anchor::RandomInZone,
};

const CATEGORY_TABLE: &[(&str, CategorySpec)] = &[
    ("glasses", spec(1, 0.15, Anchor::AboveShirt)),
    ("shoes", spec(1, 0.25, Anchor::BelowPants)),
    ("belts", spec(2, 0.2, Anchor::GarmentSeam)),
    ("watches", spec(2, 0.1, Anchor::ZoneInnerEdge)),
    ("bracelets", spec(3, 0.1, Anchor::ZoneInnerEdge)),
    ("wallets", spec(4, 0.15, Anchor::RandomInZone)),
    ("perfumes", spec(4, 0.2, Anchor::RandomInZone)),
    ("vehicles", spec(5, 0.4, Anchor::LargestZone)),
];

const fn spec(priority: u32, size_fraction: f64, anchor: Anchor) -> CategorySpec {
    CategorySpec {
        priority,
        size_fraction,
        anchor,
    }
}

/// Look up a category (case-insensitive).
pub fn category_spec(name: &str) -> CategorySpec {
    CATEGORY_TABLE
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, spec)| *spec)
        .unwrap_or(DEFAULT_SPEC)
}

/// Whether the category is one of the garments or the background pool.
pub fn is_mandatory(name: &str) -> bool {
    MANDATORY_CATEGORIES
        .iter()
        .any(|key| key.eq_ignore_ascii_case(name))
}
