//! Pastes garments and accessories onto the canvas at positions chosen by
//! `outfit-layout`, draws their labels, and reports weak contrast.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, Rgba, RgbaImage};
use outfit_imaging::contrast::average_color;
use outfit_imaging::text::{draw_label, measure_text_width};
use outfit_imaging::{
    ITEM_CONTRAST_THRESHOLD, TEXT_CONTRAST_THRESHOLD, estimate_contrast, overlay, preprocess_file,
    region,
};
use outfit_layout::tables::{PANTS, SHIRTS};
use outfit_layout::{
    AnchorContext, CanvasGeometry, GarmentLayout, LabelSpec, OccupiedSet, PlacementMode,
    PlacementRect, PlacementRequest, accessory_bounds, category_spec, find_position,
    garment_bounds, layout_garments, plan_zones, select_categories,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::catalog::{Catalog, ImageAsset};
use super::compose::GenerateError;
use crate::config::GenerationConfig;

/// Font, size and color used for item names.
pub struct LabelStyle<'a> {
    pub font: &'a FontVec,
    pub font_size: u32,
    pub color: [u8; 3],
}

impl LabelStyle<'_> {
    fn scale(&self) -> PxScale {
        PxScale::from(self.font_size as f32)
    }

    pub fn measure(&self, text: &str) -> u32 {
        measure_text_width(self.font, self.scale(), text)
    }
}

/// An item that made it onto the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedItem {
    pub category: String,
    pub name: String,
    pub rect: PlacementRect,
    pub label: Option<PlacementRect>,
}

/// Result of the accessory phase of one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessoryOutcome {
    pub placed: Vec<PlacedItem>,
    /// Categories that were selected but could not be loaded or placed.
    pub skipped: Vec<String>,
    /// Set when the phase was abandoned.
    pub warning: Option<String>,
}

/// Decode a random asset from `assets`, trying the others in random order
/// when one fails.
pub fn load_any<'a, R: Rng + ?Sized>(
    assets: &'a [ImageAsset],
    max_width: u32,
    max_height: u32,
    rng: &mut R,
) -> Option<(&'a ImageAsset, RgbaImage)> {
    let mut order: Vec<&ImageAsset> = assets.iter().collect();
    order.shuffle(rng);
    for asset in order {
        match preprocess_file(&asset.path, max_width, max_height) {
            Ok(img) => return Some((asset, img)),
            Err(e) => tracing::warn!("Skipping {}: {e}", asset.path.display()),
        }
    }
    None
}

/// Lay out and paste shirt and pants, recording both (and their labels).
pub fn place_garments<R: Rng + ?Sized>(
    canvas: &mut RgbaImage,
    config: &GenerationConfig,
    catalog: &Catalog,
    occupied: &mut OccupiedSet,
    labels: Option<&LabelStyle<'_>>,
    rng: &mut R,
) -> Result<(GarmentLayout, Vec<PlacedItem>), GenerateError> {
    let geometry = config.canvas;
    let mode = PlacementMode::random(rng);
    let (max_w, max_h) = garment_bounds(geometry, config.main_factor);

    let (shirt_asset, shirt_img) = load_any(catalog.assets(SHIRTS), max_w, max_h, rng)
        .ok_or_else(|| GenerateError::NoUsableAsset(SHIRTS.to_string()))?;
    let (pants_asset, pants_img) = load_any(catalog.assets(PANTS), max_w, max_h, rng)
        .ok_or_else(|| GenerateError::NoUsableAsset(PANTS.to_string()))?;

    let layout = layout_garments(
        geometry,
        mode,
        shirt_img.dimensions(),
        pants_img.dimensions(),
        config.garment_spacing_px,
    );
    if layout.shirt.y + layout.block_height() > geometry.safe_bottom() {
        tracing::debug!(
            block_height = layout.block_height(),
            "Garment block taller than the content area"
        );
    }

    let mut placed = Vec::with_capacity(2);
    for (category, asset, img, rect) in [
        (SHIRTS, shirt_asset, &shirt_img, layout.shirt),
        (PANTS, pants_asset, &pants_img, layout.pants),
    ] {
        paste_item(canvas, img, &rect, &asset.display_name);
        occupied.push(rect);
        let label = labels.map(|style| {
            let label = draw_item_label(canvas, geometry, style, &rect, &asset.display_name);
            occupied.push(label);
            label
        });
        placed.push(PlacedItem {
            category: category.to_string(),
            name: asset.display_name.clone(),
            rect,
            label,
        });
    }

    Ok((layout, placed))
}

/// Select, size, position and paste accessories around the garment block.
#[allow(clippy::too_many_arguments)]
pub fn place_accessories<R: Rng + ?Sized>(
    canvas: &mut RgbaImage,
    config: &GenerationConfig,
    catalog: &Catalog,
    layout: &GarmentLayout,
    occupied: &mut OccupiedSet,
    labels: Option<&LabelStyle<'_>>,
    requested: usize,
    rng: &mut R,
) -> AccessoryOutcome {
    let geometry = config.canvas;
    let mut outcome = AccessoryOutcome::default();

    let available = catalog.populated_accessories();
    let selected = match select_categories(&available, requested, rng) {
        Ok(selected) => selected,
        Err(e) => {
            tracing::warn!("{e}");
            outcome.warning = Some(e.to_string());
            return outcome;
        }
    };

    let zones = plan_zones(geometry, &layout.block(), layout.mode, config.object_spacing_px);
    let ctx = AnchorContext::new(layout, &zones);

    for category in selected {
        let spec = category_spec(&category);
        let (max_w, max_h) =
            accessory_bounds(geometry, &spec, config.accessory_factor, config.main_factor);

        let Some(asset) = catalog.assets(&category).choose(rng) else {
            outcome.skipped.push(category);
            continue;
        };
        let img = match preprocess_file(&asset.path, max_w, max_h) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("Skipping accessory {}: {e}", asset.path.display());
                outcome.skipped.push(category);
                continue;
            }
        };

        let request = PlacementRequest {
            size: img.dimensions(),
            spec,
            label: labels.map(|style| LabelSpec {
                text_width: style.measure(&asset.display_name),
                font_size: style.font_size,
            }),
        };
        let Some(position) = find_position(
            &request,
            geometry,
            &ctx,
            occupied,
            config.object_spacing_px,
            rng,
        ) else {
            tracing::debug!(category = %category, "Accessory skipped, no free position");
            outcome.skipped.push(category);
            continue;
        };

        paste_item(canvas, &img, &position.item, &asset.display_name);
        occupied.push(position.item);
        let label = match (labels, position.label) {
            (Some(style), Some(rect)) => {
                draw_label_at(canvas, style, &rect, &asset.display_name);
                occupied.push(rect);
                Some(rect)
            }
            _ => None,
        };

        outcome.placed.push(PlacedItem {
            category,
            name: asset.display_name.clone(),
            rect: position.item,
            label,
        });
    }

    tracing::debug!(
        placed = outcome.placed.len(),
        skipped = outcome.skipped.len(),
        "Accessory phase done"
    );
    outcome
}

/// Check contrast against what is underneath, then paste.
fn paste_item(canvas: &mut RgbaImage, img: &RgbaImage, rect: &PlacementRect, name: &str) {
    let underneath = region(canvas, rect.x, rect.y, rect.width, rect.height);
    let ratio = estimate_contrast(average_color(img), &underneath);
    if ratio < ITEM_CONTRAST_THRESHOLD {
        tracing::warn!(item = name, ratio, "Low contrast between item and background");
    }
    overlay(canvas, img, rect.x, rect.y);
}

/// Draw a label centered below `item` and return its rect.
fn draw_item_label(
    canvas: &mut RgbaImage,
    geometry: CanvasGeometry,
    style: &LabelStyle<'_>,
    item: &PlacementRect,
    text: &str,
) -> PlacementRect {
    let rect = geometry.label_below(item, style.measure(text), style.font_size);
    draw_label_at(canvas, style, &rect, text);
    rect
}

fn draw_label_at(canvas: &mut RgbaImage, style: &LabelStyle<'_>, rect: &PlacementRect, text: &str) {
    let underneath = region(canvas, rect.x, rect.y, rect.width, rect.height);
    let ratio = estimate_contrast(Rgb(style.color), &underneath);
    if ratio < TEXT_CONTRAST_THRESHOLD {
        tracing::warn!(label = text, ratio, "Low contrast between label and background");
    }
    let [r, g, b] = style.color;
    draw_label(
        canvas,
        style.font,
        style.scale(),
        rect.x,
        rect.y,
        text,
        Rgba([r, g, b, 255]),
    );
}
