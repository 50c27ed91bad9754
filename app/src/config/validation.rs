//! Setting value validation.

use outfit_layout::WatermarkPosition;

use super::defaults::CATEGORY_DIR_PREFIX;
use super::{OutputFormat, parse_rgb};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "QUANTITY" => validate_int_range(value, 1, 10_000)?,
        "BLUR" => validate_int_range(value, 0, 10)?,
        "BRIGHTNESS" => validate_int_range(value, -100, 100)?,
        "GARMENT_SPACING" | "OBJECT_SPACING" => validate_int_range(value, 0, 100)?,
        "MAIN_SCALE" | "ACCESSORY_SCALE" => validate_int_range(value, 50, 200)?,
        "ACCESSORY_COUNT" => validate_int_range(value, 2, 100)?,
        "OUTPUT_FORMAT" => {
            value.parse::<OutputFormat>()?;
        }
        "WATERMARK_POSITION" => {
            value.parse::<WatermarkPosition>()?;
        }
        "FONT_COLOR" => {
            parse_rgb(value)?;
        }
        "FONT" => {
            if value.trim().is_empty() {
                return Err("must be a font name or 'random'".into());
            }
        }
        "OUTPUT_DIR" | "PHOTOS_DIR" | "FONTS_DIR" => {
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        "WATERMARK_PATH" => {}
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        k if k.starts_with(CATEGORY_DIR_PREFIX) => {
            if k.len() == CATEGORY_DIR_PREFIX.len() {
                return Err("category name missing".into());
            }
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        _ => return Err("unknown setting".into()),
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(
        key,
        "RANDOM_ACCESSORY_COUNT" | "SHOW_NAMES" | "WATERMARK_ENABLED"
    )
}
