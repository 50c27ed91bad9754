//! Sequential batch generation with per-image isolation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbaImage};
use outfit_imaging::flatten_to_rgb;
use outfit_layout::{OccupiedSet, PlacementMode};
use rand::Rng;
use serde::Serialize;

use super::catalog::Catalog;
use super::compose::{Composer, GenerateError, Stage, advance};
use super::font::{FontError, FontLibrary, LoadedFont};
use super::palette::{DEFAULT_PALETTE, PaletteRepository, RgbColor};
use super::placement::PlacedItem;
use super::watermark::load_watermark;
use crate::config::{ConfigError, GenerationConfig, OutputFormat};

/// File name prefix of generated images.
pub const OUTPUT_PREFIX: &str = "outfit";
/// JPEG encoder quality.
pub const JPEG_QUALITY: u8 = 95;

/// One written image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub index: u32,
    pub path: PathBuf,
    pub mode: PlacementMode,
    pub garments: Vec<PlacedItem>,
    pub accessories: Vec<PlacedItem>,
    pub skipped_accessories: Vec<String>,
    pub watermarked: bool,
    pub warnings: Vec<String>,
    pub occupied: OccupiedSet,
}

/// One image that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFailure {
    pub index: u32,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub requested: u32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub images: Vec<ImageSummary>,
    pub failures: Vec<ImageFailure>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.images.len()
    }

    /// Nothing was written although images were requested.
    pub fn is_total_failure(&self) -> bool {
        self.requested > 0 && self.images.is_empty()
    }

    /// Distinct warnings raised across the batch.
    pub fn warnings(&self) -> Vec<&str> {
        let mut warnings: Vec<&str> = self
            .images
            .iter()
            .flat_map(|i| i.warnings.iter().map(String::as_str))
            .collect();
        warnings.sort_unstable();
        warnings.dedup();
        warnings
    }
}

/// Everything a batch needs, validated up front.
pub struct BatchRunner {
    config: GenerationConfig,
    catalog: Catalog,
    palette: Vec<RgbColor>,
    fonts: FontLibrary,
    watermark: Option<RgbaImage>,
}

impl BatchRunner {
    /// Check the output directory, scan the category folders and load the
    /// palette, fonts and watermark.
    ///
    /// # Errors
    ///
    /// Fails before any image is generated when the output directory cannot
    /// be created or a mandatory category is empty.
    pub fn prepare(
        config: GenerationConfig,
        palette_repo: &dyn PaletteRepository,
    ) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| ConfigError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

        let catalog = Catalog::scan(&config.photos_dir, &config.category_dirs);
        catalog.ensure_mandatory()?;

        let palette = match palette_repo.load() {
            Ok(colors) => colors,
            Err(e) => {
                tracing::warn!("Failed to load background palette, using defaults: {e}");
                DEFAULT_PALETTE.to_vec()
            }
        };
        let fonts = FontLibrary::scan(&config.fonts_dir);
        let watermark = config
            .watermark
            .as_ref()
            .and_then(|wm| load_watermark(&wm.path));

        tracing::info!(
            accessories = ?catalog.populated_accessories(),
            palette = palette.len(),
            fonts = fonts.len(),
            watermark = watermark.is_some(),
            "Batch prepared"
        );
        Ok(Self {
            config,
            catalog,
            palette,
            fonts,
            watermark,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run the batch with an entropy-seeded generator.
    pub fn run(&self) -> BatchReport {
        self.run_with_rng(&mut rand::thread_rng())
    }

    /// Generate `quantity` images in sequence. A failing image is logged and
    /// recorded; the batch moves on to the next one.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> BatchReport {
        let labels = self.label_font(rng);
        self.run_with_labels(labels, rng)
    }

    /// The batch's label font, or `Ok(None)` when names are off.
    fn label_font<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<LoadedFont>, FontError> {
        if !self.config.show_names {
            return Ok(None);
        }
        self.fonts.resolve(&self.config.font, rng).map(Some)
    }

    fn run_with_labels<R: Rng + ?Sized>(
        &self,
        labels: Result<Option<LoadedFont>, FontError>,
        rng: &mut R,
    ) -> BatchReport {
        let started_at = Local::now();
        let (font, label_warning) = match labels {
            Ok(font) => (font, None),
            Err(e) => {
                tracing::warn!("Labels disabled: {e}");
                (None, Some(format!("labels disabled: {e}")))
            }
        };
        if let Some(font) = &font {
            tracing::info!(font = %font.name, "Label font selected");
        }
        let composer = Composer {
            config: &self.config,
            catalog: &self.catalog,
            palette: &self.palette,
            font: font.as_ref(),
            label_warning: label_warning.as_deref(),
            watermark: self.watermark.as_ref(),
        };
        let mut images = Vec::new();
        let mut failures = Vec::new();

        for index in 1..=self.config.quantity {
            match self.generate_one(&composer, index, rng) {
                Ok(summary) => {
                    tracing::info!(
                        index,
                        path = %summary.path.display(),
                        accessories = summary.accessories.len(),
                        "Image written"
                    );
                    images.push(summary);
                }
                Err(e) => {
                    tracing::error!(index, "Image generation failed: {e}");
                    failures.push(ImageFailure {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = BatchReport {
            requested: self.config.quantity,
            started_at,
            finished_at: Local::now(),
            images,
            failures,
        };
        tracing::info!(
            written = report.written(),
            failed = report.failures.len(),
            elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Batch finished"
        );
        report
    }

    fn generate_one<R: Rng + ?Sized>(
        &self,
        composer: &Composer<'_>,
        index: u32,
        rng: &mut R,
    ) -> Result<ImageSummary, GenerateError> {
        let mut composition = composer.compose(rng)?;

        advance(&mut composition.stage, Stage::Encode);
        let format = self.config.output_format;
        let path = unique_path(
            &self.config.output_dir,
            &format!("{OUTPUT_PREFIX}_{index}"),
            format.extension(),
        );
        save_image(&composition.image, &path, format)?;
        advance(&mut composition.stage, Stage::Done);

        Ok(ImageSummary {
            index,
            path,
            mode: composition.mode,
            garments: composition.garments,
            accessories: composition.accessories,
            skipped_accessories: composition.skipped_accessories,
            watermarked: composition.watermarked,
            warnings: composition.warnings,
            occupied: composition.occupied,
        })
    }
}

/// `<dir>/<stem>.<ext>`, or `<stem> (k).<ext>` with the smallest free `k`.
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|k| dir.join(format!("{stem} ({k}).{ext}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Encode the canvas. JPEG output drops the alpha channel.
pub fn save_image(
    canvas: &RgbaImage,
    path: &Path,
    format: OutputFormat,
) -> Result<(), GenerateError> {
    match format {
        OutputFormat::Png => canvas.save_with_format(path, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            let rgb = flatten_to_rgb(canvas);
            let mut writer = BufWriter::new(File::create(path)?);
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::palette::JsonPaletteRepository;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn runner_in(dir: &Path, settings: &[(&str, &str)]) -> BatchRunner {
        let photos = dir.join("photos");
        for (category, color) in [
            ("shirts", [200, 0, 0, 255]),
            ("pants", [0, 0, 200, 255]),
            ("backgrounds", [90, 90, 90, 255]),
        ] {
            let folder = photos.join(category);
            std::fs::create_dir_all(&folder).unwrap();
            RgbaImage::from_pixel(120, 160, Rgba(color))
                .save(folder.join("item.png"))
                .unwrap();
        }
        let mut config = AppConfig::default();
        config.set("PHOTOS_DIR", photos.to_str().unwrap()).unwrap();
        config.set("OUTPUT_DIR", dir.join("out").to_str().unwrap()).unwrap();
        config.set("FONTS_DIR", dir.join("fonts").to_str().unwrap()).unwrap();
        for (key, value) in settings {
            config.set(key, value).unwrap();
        }
        let repo = JsonPaletteRepository::in_data_dir(dir);
        BatchRunner::prepare(config.generation(), &repo).unwrap()
    }

    #[test]
    fn test_unavailable_font_disables_labels_for_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_in(dir.path(), &[("QUANTITY", "2"), ("SHOW_NAMES", "true")]);
        let report = runner.run_with_labels(
            Err(FontError::NoFontAvailable),
            &mut StdRng::seed_from_u64(8),
        );

        assert_eq!(report.written(), 2);
        for image in &report.images {
            assert!(image.warnings.iter().any(|w| w.starts_with("labels disabled")));
            assert!(image.garments.iter().all(|g| g.label.is_none()));
            assert_eq!(image.occupied.len(), 2);
        }
    }

    #[test]
    fn test_names_off_skips_font_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_in(dir.path(), &[]);
        let font = runner.label_font(&mut StdRng::seed_from_u64(0)).unwrap();
        assert!(font.is_none());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_in(dir.path(), &[]);
        let report = runner.run_with_rng(&mut StdRng::seed_from_u64(4));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["requested"], 1);
        let image = &json["images"][0];
        let mode = image["mode"].as_str().unwrap();
        assert!(["center", "left", "right"].contains(&mode));
        assert_eq!(image["garments"][0]["category"], "shirts");
        assert!(image["garments"][0]["label"].is_null());
        assert_eq!(image["occupied"].as_array().unwrap().len(), 2);
        assert_eq!(image["occupied"][0]["width"], 120);
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_path(dir.path(), "outfit_1", "png");
        assert_eq!(first, dir.path().join("outfit_1.png"));

        std::fs::write(&first, b"").unwrap();
        std::fs::write(dir.path().join("outfit_1 (1).png"), b"").unwrap();
        assert_eq!(
            unique_path(dir.path(), "outfit_1", "png"),
            dir.path().join("outfit_1 (2).png")
        );
    }

    #[test]
    fn test_jpeg_output_has_no_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let canvas = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 0]));
        save_image(&canvas, &path, OutputFormat::Jpeg).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_png_output_keeps_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let canvas = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        save_image(&canvas, &path, OutputFormat::Png).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgba8(), canvas);
    }

    #[test]
    fn test_report_total_failure() {
        let now = Local::now();
        let report = BatchReport {
            requested: 2,
            started_at: now,
            finished_at: now,
            images: Vec::new(),
            failures: vec![ImageFailure {
                index: 1,
                error: "boom".into(),
            }],
        };
        assert!(report.is_total_failure());
        assert_eq!(report.written(), 0);
    }
}
