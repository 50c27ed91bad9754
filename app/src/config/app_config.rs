//! Runtime application configuration loaded from the settings file +
//! environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use outfit_layout::{CanvasGeometry, WatermarkPosition};

use super::defaults::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CATEGORY_DIR_PREFIX, FONT_SIZE, GARMENT_SPACING_MULTIPLIER,
    MARGIN, OBJECT_SPACING_MULTIPLIER,
};
use super::validation::validate_setting;
use super::{ConfigError, OutputFormat, parse_rgb};
use crate::services::font::FontSelection;

/// Settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Environment variables `OUTFIT_<KEY>` override stored settings.
pub const ENV_PREFIX: &str = "OUTFIT_";

/// Runtime configuration, editable key by key.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub quantity: u32,
    pub blur: u32,
    pub brightness: i32,
    pub garment_spacing: u32,
    pub main_scale: u32,
    pub accessory_scale: u32,
    pub object_spacing: u32,
    pub accessory_count: u32,
    pub random_accessory_count: bool,
    pub output_format: OutputFormat,
    pub output_dir: PathBuf,
    pub photos_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub font: FontSelection,
    pub font_color: [u8; 3],
    pub show_names: bool,
    pub watermark_enabled: bool,
    pub watermark_path: Option<PathBuf>,
    pub watermark_position: WatermarkPosition,
    /// Per-category folder overrides, keyed by lowercase category name.
    pub category_dirs: BTreeMap<String, PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quantity: 1,
            blur: 2,
            brightness: -30,
            garment_spacing: 20,
            main_scale: 120,
            accessory_scale: 80,
            object_spacing: 30,
            accessory_count: 3,
            random_accessory_count: false,
            output_format: OutputFormat::Png,
            output_dir: PathBuf::from("outputs"),
            photos_dir: PathBuf::from("photos"),
            fonts_dir: PathBuf::from("fonts"),
            font: FontSelection::Random,
            font_color: [255, 255, 255],
            show_names: false,
            watermark_enabled: false,
            watermark_path: None,
            watermark_position: WatermarkPosition::Below,
            category_dirs: BTreeMap::new(),
        }
    }
}

/// Watermark settings for a run with the watermark enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkConfig {
    pub path: PathBuf,
    pub position: WatermarkPosition,
}

/// Immutable snapshot handed to the generator for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub canvas: CanvasGeometry,
    pub quantity: u32,
    pub blur: f32,
    pub brightness: i32,
    pub garment_spacing_px: i32,
    pub object_spacing_px: i32,
    pub main_factor: f64,
    pub accessory_factor: f64,
    pub accessory_count: usize,
    pub random_accessory_count: bool,
    pub output_format: OutputFormat,
    pub output_dir: PathBuf,
    pub photos_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub category_dirs: BTreeMap<String, PathBuf>,
    pub watermark: Option<WatermarkConfig>,
    pub font: FontSelection,
    pub font_color: [u8; 3],
    pub font_size: u32,
    pub show_names: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then `<data_dir>/settings.json`, then
    /// `OUTFIT_*` environment variables.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = data_dir.join(SETTINGS_FILE);
        for (key, value) in read_settings_file(&path)? {
            config.set(&key, &value)?;
        }
        config.apply_env(std::env::vars());

        Ok(config)
    }

    /// Apply `OUTFIT_<KEY>` overrides. Invalid values are logged and ignored.
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if validate_setting(key, &value).is_err() && !is_known_key(key) {
                continue;
            }
            match self.set(key, &value) {
                Ok(()) => tracing::info!("Applied environment override {name}"),
                Err(e) => tracing::warn!("Ignoring environment override {name}: {e}"),
            }
        }
    }

    /// Validate and assign a single setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        validate_setting(key, value).map_err(|message| ConfigError::InvalidSetting {
            key: key.to_string(),
            message,
        })?;
        let value = value.trim();
        let int = |v: &str| v.parse::<i64>().unwrap_or_default();

        match key {
            "QUANTITY" => self.quantity = int(value) as u32,
            "BLUR" => self.blur = int(value) as u32,
            "BRIGHTNESS" => self.brightness = int(value) as i32,
            "GARMENT_SPACING" => self.garment_spacing = int(value) as u32,
            "MAIN_SCALE" => self.main_scale = int(value) as u32,
            "ACCESSORY_SCALE" => self.accessory_scale = int(value) as u32,
            "OBJECT_SPACING" => self.object_spacing = int(value) as u32,
            "ACCESSORY_COUNT" => self.accessory_count = int(value) as u32,
            "RANDOM_ACCESSORY_COUNT" => self.random_accessory_count = value == "true",
            "OUTPUT_FORMAT" => self.output_format = value.parse().unwrap_or_default(),
            "OUTPUT_DIR" => self.output_dir = PathBuf::from(value),
            "PHOTOS_DIR" => self.photos_dir = PathBuf::from(value),
            "FONTS_DIR" => self.fonts_dir = PathBuf::from(value),
            "FONT" => self.font = FontSelection::parse(value),
            "FONT_COLOR" => self.font_color = parse_rgb(value).unwrap_or(self.font_color),
            "SHOW_NAMES" => self.show_names = value == "true",
            "WATERMARK_ENABLED" => self.watermark_enabled = value == "true",
            "WATERMARK_PATH" => {
                self.watermark_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "WATERMARK_POSITION" => {
                self.watermark_position = value.parse().unwrap_or_default();
            }
            k => {
                if let Some(category) = k.strip_prefix(CATEGORY_DIR_PREFIX) {
                    self.category_dirs
                        .insert(category.to_lowercase(), PathBuf::from(value));
                }
            }
        }
        Ok(())
    }

    /// Snapshot the settings into the values the generator works with.
    pub fn generation(&self) -> GenerationConfig {
        let watermark = match (&self.watermark_path, self.watermark_enabled) {
            (Some(path), true) => Some(WatermarkConfig {
                path: path.clone(),
                position: self.watermark_position,
            }),
            (None, true) => {
                tracing::warn!("Watermark enabled but no watermark path configured");
                None
            }
            _ => None,
        };

        GenerationConfig {
            canvas: CanvasGeometry::new(CANVAS_WIDTH, CANVAS_HEIGHT, MARGIN),
            quantity: self.quantity,
            blur: self.blur as f32,
            brightness: self.brightness,
            garment_spacing_px: (self.garment_spacing * GARMENT_SPACING_MULTIPLIER) as i32,
            object_spacing_px: (self.object_spacing * OBJECT_SPACING_MULTIPLIER) as i32,
            main_factor: f64::from(self.main_scale) / 100.0,
            accessory_factor: f64::from(self.accessory_scale) / 100.0,
            accessory_count: self.accessory_count as usize,
            random_accessory_count: self.random_accessory_count,
            output_format: self.output_format,
            output_dir: self.output_dir.clone(),
            photos_dir: self.photos_dir.clone(),
            fonts_dir: self.fonts_dir.clone(),
            category_dirs: self.category_dirs.clone(),
            watermark,
            font: self.font.clone(),
            font_color: self.font_color,
            font_size: FONT_SIZE,
            show_names: self.show_names,
        }
    }
}

fn is_known_key(key: &str) -> bool {
    super::defaults::get_default(key).is_some() || key.starts_with(CATEGORY_DIR_PREFIX)
}

/// Read `settings.json` as key/value strings. A missing file is empty.
fn read_settings_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let map: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&data).map_err(|source| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!("Loaded {} settings from {}", map.len(), path.display());

    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key.to_uppercase(), value)
        })
        .collect())
}
