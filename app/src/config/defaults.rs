//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Fixed output canvas width.
pub const CANVAS_WIDTH: u32 = 1080;
/// Fixed output canvas height.
pub const CANVAS_HEIGHT: u32 = 1920;
/// Inset from every canvas edge that content must respect.
pub const MARGIN: u32 = 75;
/// Label font size in pixels.
pub const FONT_SIZE: u32 = 30;

/// Object spacing slider to pixels.
pub const OBJECT_SPACING_MULTIPLIER: u32 = 2;
/// Garment spacing slider to pixels.
pub const GARMENT_SPACING_MULTIPLIER: u32 = 3;

/// Font colors offered out of the box (white, black).
pub const DEFAULT_FONT_COLORS: [[u8; 3]; 2] = [[255, 255, 255], [0, 0, 0]];

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("QUANTITY", "1", "Number of images per batch"),
    ("BLUR", "2", "Background blur radius (0-10)"),
    ("BRIGHTNESS", "-30", "Background brightness change in percent (-100..100)"),
    ("GARMENT_SPACING", "20", "Gap between shirt and pants (slider 0-100, x3 px)"),
    ("MAIN_SCALE", "120", "Garment scale in percent (50-200)"),
    ("ACCESSORY_SCALE", "80", "Accessory width scale in percent (50-200)"),
    ("OBJECT_SPACING", "30", "Minimum gap between items (slider 0-100, x2 px)"),
    ("ACCESSORY_COUNT", "3", "Accessories per image (at least 2)"),
    ("RANDOM_ACCESSORY_COUNT", "false", "Pick a random accessory count per image"),
    ("OUTPUT_FORMAT", "png", "png or jpg"),
    ("OUTPUT_DIR", "outputs", "Directory generated images are written to"),
    ("PHOTOS_DIR", "photos", "Directory holding one sub-folder per category"),
    ("FONTS_DIR", "fonts", "Directory scanned for .ttf/.otf label fonts"),
    ("FONT", "random", "Label font file stem, or 'random'"),
    ("FONT_COLOR", "255,255,255", "Label color as r,g,b"),
    ("SHOW_NAMES", "false", "Draw item names under each item"),
    ("WATERMARK_ENABLED", "false", "Paste the watermark image"),
    ("WATERMARK_PATH", "", "Watermark image path"),
    ("WATERMARK_POSITION", "below", "above or below"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting definitions in declaration order.
pub fn definitions() -> impl Iterator<Item = SettingDef> {
    DEFS.iter().map(|&(key, default, description)| SettingDef {
        key,
        default,
        description,
    })
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Prefix of per-category folder overrides, e.g. `CATEGORY_DIR_SHOES`.
pub const CATEGORY_DIR_PREFIX: &str = "CATEGORY_DIR_";
