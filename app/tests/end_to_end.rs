//! Full batches against real files in temporary directories.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use outfit_generator_lib::config::{AppConfig, ConfigError};
use outfit_generator_lib::services::font::load_system_font;
use outfit_generator_lib::services::{BatchRunner, JsonPaletteRepository};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
const BLUE: Rgba<u8> = Rgba([20, 20, 220, 255]);
const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

struct Fixture {
    photos: TempDir,
    output: TempDir,
    data: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            photos: tempfile::tempdir().unwrap(),
            output: tempfile::tempdir().unwrap(),
            data: tempfile::tempdir().unwrap(),
        };
        fixture.image("shirts", "tee.png", 200, 300, RED);
        fixture.image("pants", "jeans.png", 200, 350, BLUE);
        fixture.image("backgrounds", "wall.png", 108, 192, Rgba([128, 128, 128, 255]));
        fixture
    }

    fn image(&self, category: &str, name: &str, w: u32, h: u32, color: Rgba<u8>) -> PathBuf {
        let dir = self.photos.path().join(category);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, color).save(&path).unwrap();
        path
    }

    fn config(&self, settings: &[(&str, &str)]) -> AppConfig {
        let mut config = AppConfig::default();
        config.set("PHOTOS_DIR", path_str(self.photos.path())).unwrap();
        config.set("OUTPUT_DIR", path_str(self.output.path())).unwrap();
        config
            .set("FONTS_DIR", path_str(&self.data.path().join("fonts")))
            .unwrap();
        for (key, value) in settings {
            config.set(key, value).unwrap();
        }
        config
    }

    fn runner(&self, settings: &[(&str, &str)]) -> BatchRunner {
        let repo = JsonPaletteRepository::in_data_dir(self.data.path());
        BatchRunner::prepare(self.config(settings).generation(), &repo).unwrap()
    }

    fn outputs(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.output.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn near(pixel: &Rgba<u8>, expected: Rgba<u8>) -> bool {
    pixel
        .0
        .iter()
        .zip(expected.0)
        .all(|(a, b)| a.abs_diff(b) <= 2)
}

#[test]
fn single_image_with_two_accessories() {
    let fx = Fixture::new();
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));
    fx.image("perfumes", "scent.png", 50, 70, Rgba([20, 160, 20, 255]));

    let runner = fx.runner(&[
        ("QUANTITY", "1"),
        ("ACCESSORY_COUNT", "2"),
        ("BLUR", "0"),
        ("BRIGHTNESS", "0"),
    ]);
    let report = runner.run_with_rng(&mut StdRng::seed_from_u64(7));

    assert_eq!(report.written(), 1);
    assert!(report.failures.is_empty());
    assert_eq!(fx.outputs(), vec![fx.output.path().join("outfit_1.png")]);

    let summary = &report.images[0];
    assert_eq!(summary.garments.len(), 2);
    let mut categories: Vec<&str> = summary
        .accessories
        .iter()
        .map(|a| a.category.as_str())
        .collect();
    categories.sort();
    assert_eq!(categories, vec!["perfumes", "wallets"]);

    let geometry = runner.config().canvas;
    let spacing = runner.config().object_spacing_px;
    for item in summary.garments.iter().chain(&summary.accessories) {
        assert!(geometry.contains(&item.rect), "{item:?} outside margins");
    }
    for accessory in &summary.accessories {
        for other in summary.occupied.as_slice() {
            if *other == accessory.rect {
                continue;
            }
            assert!(
                !accessory.rect.overlaps_with_padding(other, spacing),
                "{accessory:?} too close to {other:?}"
            );
        }
    }

    let written = image::open(&summary.path).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (1080, 1920));
    let shirt = summary.garments[0].rect;
    assert!(near(
        written.get_pixel(shirt.x as u32 + 20, shirt.y as u32 + 20),
        RED
    ));
}

#[test]
fn one_accessory_category_warns_and_keeps_garments() {
    let fx = Fixture::new();
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));

    let report = fx
        .runner(&[("QUANTITY", "2")])
        .run_with_rng(&mut StdRng::seed_from_u64(11));

    assert_eq!(report.written(), 2);
    assert_eq!(fx.outputs().len(), 2);
    for summary in &report.images {
        assert_eq!(summary.garments.len(), 2);
        assert!(summary.accessories.is_empty());
    }
    assert!(
        report
            .warnings()
            .iter()
            .any(|w| w.contains("not enough accessories"))
    );
}

#[test]
fn names_are_drawn_with_fallback_font() {
    // A system font is needed to draw anything
    if load_system_font().is_err() {
        return;
    }
    let fx = Fixture::new();
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));
    fx.image("perfumes", "scent.png", 50, 70, Rgba([20, 160, 20, 255]));
    let fonts = fx.data.path().join("fonts");
    std::fs::create_dir_all(&fonts).unwrap();
    std::fs::write(fonts.join("Fancy.ttf"), b"not a font").unwrap();

    let runner = fx.runner(&[
        ("QUANTITY", "2"),
        ("SHOW_NAMES", "true"),
        ("FONT", "Fancy"),
    ]);
    let report = runner.run_with_rng(&mut StdRng::seed_from_u64(13));

    assert_eq!(report.written(), 2);
    assert!(report.warnings().iter().all(|w| !w.contains("labels disabled")));
    let geometry = runner.config().canvas;
    for summary in &report.images {
        for item in summary.garments.iter().chain(&summary.accessories) {
            let label = item.label.expect("every placed item is named");
            assert!(geometry.contains(&label));
            assert!(summary.occupied.as_slice().contains(&label));
        }
        let shirt_label = summary.garments[0].label.unwrap();
        assert!(!shirt_label.overlaps_with_padding(&summary.garments[1].rect, 0));
    }
}

#[test]
fn watermark_over_shirt_is_skipped() {
    let fx = Fixture::new();
    // At double scale the garment block is taller than the content area and
    // starts at the top margin, across the band reserved above
    fx.image("shirts", "tee.png", 1000, 1000, RED);
    fx.image("pants", "jeans.png", 1000, 1000, BLUE);
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));
    fx.image("perfumes", "scent.png", 50, 70, Rgba([20, 160, 20, 255]));
    let mark = fx.data.path().join("mark.png");
    RgbaImage::from_pixel(270, 300, MAGENTA).save(&mark).unwrap();

    let runner = fx.runner(&[
        ("MAIN_SCALE", "200"),
        ("GARMENT_SPACING", "0"),
        ("WATERMARK_ENABLED", "true"),
        ("WATERMARK_PATH", path_str(&mark)),
        ("WATERMARK_POSITION", "above"),
    ]);
    let report = runner.run_with_rng(&mut StdRng::seed_from_u64(5));

    assert_eq!(report.written(), 1);
    let summary = &report.images[0];
    assert!(!summary.watermarked);
    assert_eq!(summary.garments.len(), 2);
    assert_eq!(summary.garments[0].rect.y, 75);

    let written = image::open(&summary.path).unwrap().to_rgba8();
    assert!(written.pixels().all(|p| *p != MAGENTA));
    let shirt = summary.garments[0].rect;
    assert!(near(
        written.get_pixel(shirt.x as u32 + 20, shirt.y as u32 + 20),
        RED
    ));
}

#[test]
fn watermark_is_pasted_when_free() {
    let fx = Fixture::new();
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));
    fx.image("perfumes", "scent.png", 50, 70, Rgba([20, 160, 20, 255]));
    let mark = fx.data.path().join("mark.png");
    RgbaImage::from_pixel(100, 20, MAGENTA).save(&mark).unwrap();

    let report = fx
        .runner(&[
            ("WATERMARK_ENABLED", "true"),
            ("WATERMARK_PATH", path_str(&mark)),
            ("WATERMARK_POSITION", "below"),
        ])
        .run_with_rng(&mut StdRng::seed_from_u64(2));

    let summary = &report.images[0];
    if summary.watermarked {
        let written = image::open(&summary.path).unwrap().to_rgba8();
        // 100x20 centered, y = 1920 - 75 - 20 - 100
        assert_eq!(*written.get_pixel(540, 1735), MAGENTA);
    } else {
        // Only possible when an accessory landed in the watermark band
        assert!(!summary.accessories.is_empty());
    }
}

#[test]
fn same_seed_reproduces_the_batch() {
    let fx = Fixture::new();
    fx.image("wallets", "wallet.png", 60, 40, Rgba([30, 30, 30, 255]));
    fx.image("perfumes", "scent.png", 50, 70, Rgba([20, 160, 20, 255]));
    fx.image("vehicles", "car.png", 300, 150, Rgba([200, 200, 0, 255]));
    let settings = [("QUANTITY", "2"), ("RANDOM_ACCESSORY_COUNT", "true")];

    let first = fx.runner(&settings).run_with_rng(&mut StdRng::seed_from_u64(99));
    let second = fx.runner(&settings).run_with_rng(&mut StdRng::seed_from_u64(99));

    assert_eq!(first.written(), 2);
    for (a, b) in first.images.iter().zip(&second.images) {
        assert_eq!(a.mode, b.mode);
        assert_eq!(a.accessories, b.accessories);
        assert_ne!(a.path, b.path);
        let img_a = image::open(&a.path).unwrap().to_rgba8();
        let img_b = image::open(&b.path).unwrap().to_rgba8();
        assert!(img_a == img_b, "image {} differs between runs", a.index);
    }
    // Second run did not overwrite the first
    assert!(fx.output.path().join("outfit_1 (1).png").exists());
}

#[test]
fn broken_garment_file_is_skipped() {
    let fx = Fixture::new();
    std::fs::write(fx.photos.path().join("shirts").join("aaa_broken.png"), b"junk").unwrap();

    let report = fx
        .runner(&[("QUANTITY", "3")])
        .run_with_rng(&mut StdRng::seed_from_u64(4));
    assert_eq!(report.written(), 3);
    for summary in &report.images {
        assert_eq!(summary.garments[0].name, "tee");
    }
}

#[test]
fn jpeg_batch_writes_jpg_files() {
    let fx = Fixture::new();
    let report = fx
        .runner(&[("OUTPUT_FORMAT", "jpg")])
        .run_with_rng(&mut StdRng::seed_from_u64(1));
    assert_eq!(fx.outputs(), vec![fx.output.path().join("outfit_1.jpg")]);
    let decoded = image::open(&report.images[0].path).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
}

#[test]
fn empty_mandatory_category_fails_before_any_image() {
    let fx = Fixture::new();
    std::fs::remove_dir_all(fx.photos.path().join("pants")).unwrap();

    let repo = JsonPaletteRepository::in_data_dir(fx.data.path());
    let result = BatchRunner::prepare(fx.config(&[]).generation(), &repo);
    assert!(matches!(result, Err(ConfigError::EmptyCategory(c)) if c == "pants"));
    assert!(fx.outputs().is_empty());
}

#[test]
fn unwritable_output_is_reported_per_image() {
    let fx = Fixture::new();
    let runner = fx.runner(&[("QUANTITY", "2")]);
    // Output directory disappears after validation
    std::fs::remove_dir_all(fx.output.path()).unwrap();

    let report = runner.run_with_rng(&mut StdRng::seed_from_u64(3));
    assert_eq!(report.failures.len(), 2);
    assert!(report.is_total_failure());
}
