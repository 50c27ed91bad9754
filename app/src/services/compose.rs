//! Builds one outfit image: background, garments, accessories, watermark.

use image::RgbaImage;
use outfit_layout::tables::BACKGROUNDS;
use outfit_layout::{OccupiedSet, PlacementMode};
use rand::Rng;

use super::background::synthesize;
use super::catalog::Catalog;
use super::font::LoadedFont;
use super::palette::RgbColor;
use super::placement::{LabelStyle, PlacedItem, place_accessories, place_garments};
use super::watermark::place_watermark;
use crate::config::GenerationConfig;

/// Failure of a single image.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("No usable image in category '{0}'")]
    NoUsableAsset(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Steps of one composition, in order. Never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    Background,
    Garments,
    Accessories,
    Watermark,
    Encode,
    Done,
}

/// A finished canvas and what went into it.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Last completed stage; the batch runner takes it through encoding.
    pub stage: Stage,
    pub image: RgbaImage,
    pub mode: PlacementMode,
    pub garments: Vec<PlacedItem>,
    pub accessories: Vec<PlacedItem>,
    pub skipped_accessories: Vec<String>,
    pub watermarked: bool,
    pub warnings: Vec<String>,
    /// Every rect recorded during placement (items and labels).
    pub occupied: OccupiedSet,
}

/// Read-only inputs shared by every image of a batch.
pub struct Composer<'a> {
    pub config: &'a GenerationConfig,
    pub catalog: &'a Catalog,
    pub palette: &'a [RgbColor],
    /// Label font chosen for the batch; `None` draws no names.
    pub font: Option<&'a LoadedFont>,
    /// Why names were requested but cannot be drawn.
    pub label_warning: Option<&'a str>,
    pub watermark: Option<&'a RgbaImage>,
}

impl Composer<'_> {
    /// Compose one image with the given generator.
    pub fn compose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Composition, GenerateError> {
        let config = self.config;
        let geometry = config.canvas;
        let mut stage = Stage::Init;
        let mut warnings = Vec::new();
        let mut occupied = OccupiedSet::new();

        warnings.extend(self.label_warning.map(str::to_string));
        let style = self.font.map(|f| LabelStyle {
            font: &f.font,
            font_size: config.font_size,
            color: config.font_color,
        });

        advance(&mut stage, Stage::Background);
        let mut canvas = synthesize(
            geometry.width,
            geometry.height,
            self.palette,
            self.catalog.assets(BACKGROUNDS),
            config.blur,
            config.brightness,
            rng,
        );

        advance(&mut stage, Stage::Garments);
        let (layout, garments) = place_garments(
            &mut canvas,
            config,
            self.catalog,
            &mut occupied,
            style.as_ref(),
            rng,
        )?;

        advance(&mut stage, Stage::Accessories);
        let requested = self.accessory_count(rng);
        let outcome = place_accessories(
            &mut canvas,
            config,
            self.catalog,
            &layout,
            &mut occupied,
            style.as_ref(),
            requested,
            rng,
        );
        warnings.extend(outcome.warning);

        advance(&mut stage, Stage::Watermark);
        let watermarked = match (self.watermark, &config.watermark) {
            (Some(mark), Some(wm)) => {
                place_watermark(&mut canvas, geometry, mark, wm.position, &occupied)
            }
            _ => false,
        };

        Ok(Composition {
            stage,
            image: canvas,
            mode: layout.mode,
            garments,
            accessories: outcome.placed,
            skipped_accessories: outcome.skipped,
            watermarked,
            warnings,
            occupied,
        })
    }

    /// Accessories requested for one image; random in `2..=populated` when
    /// enabled.
    fn accessory_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if !self.config.random_accessory_count {
            return self.config.accessory_count;
        }
        let max = self.catalog.populated_accessories().len().max(2);
        rng.gen_range(2..=max)
    }
}

pub(crate) fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(next > *stage, "composition stages only move forward");
    tracing::debug!(from = ?*stage, to = ?next, "Composition stage");
    *stage = next;
}
