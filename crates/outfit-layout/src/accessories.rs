//! Accessory selection and the constrained random-walk placement search.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

use crate::garments::GarmentLayout;
use crate::geometry::{CanvasGeometry, OccupiedSet, PlacementRect};
use crate::safe_range;
use crate::tables::{Anchor, CategorySpec, category_spec};
use crate::zones::{PreferredSide, Zone};

/// Attempts spent in one zone before moving to the next.
pub const ATTEMPTS_PER_ZONE: usize = 15;
/// Attempts across all zones for a single accessory.
pub const MAX_ATTEMPTS: usize = 50;
/// Per-axis random offset applied on every attempt.
pub const JITTER: i32 = 15;
/// Below this many populated categories the accessory phase is skipped.
pub const MIN_ACCESSORY_CATEGORIES: usize = 2;

const ABOVE_SHIRT_GAP: i32 = 10;
const BELOW_PANTS_GAP: i32 = 20;
const BLOCK_SIDE_GAP: i32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error(
        "not enough accessories: {available} categories have images, at least {MIN_ACCESSORY_CATEGORIES} required"
    )]
    NotEnoughAccessories { available: usize },
}

/// Choose which accessory categories go into one image.
///
/// `available` must only contain categories with at least one image.
/// Categories are ordered by priority; equal priorities are shuffled with
/// a fresh random key per call. At least [`MIN_ACCESSORY_CATEGORIES`] are
/// taken, capped at what is available.
pub fn select_categories<S, R>(
    available: &[S],
    requested: usize,
    rng: &mut R,
) -> Result<Vec<String>, SelectionError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if available.len() < MIN_ACCESSORY_CATEGORIES {
        return Err(SelectionError::NotEnoughAccessories {
            available: available.len(),
        });
    }

    let mut keyed: Vec<(u32, f64, &str)> = available
        .iter()
        .map(|name| {
            let name = name.as_ref();
            (category_spec(name).priority, rng.gen_range(0.0..1.0), name)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let take = requested.max(MIN_ACCESSORY_CATEGORIES).min(keyed.len());
    let selected: Vec<String> = keyed
        .into_iter()
        .take(take)
        .map(|(_, _, name)| name.to_string())
        .collect();
    debug!(?selected, requested, "Selected accessory categories");
    Ok(selected)
}

/// Maximum thumbnail size for an accessory of the given category.
///
/// Width follows the accessory scale, height the main scale.
pub fn accessory_bounds(
    canvas: CanvasGeometry,
    spec: &CategorySpec,
    accessory_factor: f64,
    main_factor: f64,
) -> (u32, u32) {
    let width = f64::from(canvas.content_width()) * spec.size_fraction * accessory_factor;
    let height = f64::from(canvas.content_height()) * spec.size_fraction * main_factor;
    ((width as u32).max(1), (height as u32).max(1))
}

/// Garment geometry the semantic anchors are computed from.
#[derive(Debug, Clone, Copy)]
pub struct AnchorContext<'a> {
    pub shirt: PlacementRect,
    pub pants: PlacementRect,
    pub block: PlacementRect,
    /// Gap between shirt and pants.
    pub spacing: i32,
    pub zones: &'a [Zone],
}

impl<'a> AnchorContext<'a> {
    pub fn new(layout: &GarmentLayout, zones: &'a [Zone]) -> Self {
        Self {
            shirt: layout.shirt,
            pants: layout.pants,
            block: layout.block(),
            spacing: layout.spacing,
            zones,
        }
    }

    fn largest_zone(&self) -> Option<&Zone> {
        self.zones.iter().max_by_key(|zone| zone.area())
    }
}

/// Size of the name label drawn under an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpec {
    pub text_width: u32,
    pub font_size: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest {
    /// Final (thumbnailed) size of the accessory.
    pub size: (u32, u32),
    pub spec: CategorySpec,
    pub label: Option<LabelSpec>,
}

/// Accepted position of an accessory and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub item: PlacementRect,
    pub label: Option<PlacementRect>,
}

/// Search for a free position for one accessory.
///
/// Zones are visited in random order (side-worn items try zones on a
/// randomly chosen side first). Within a zone the candidate starts at the
/// category's anchor and performs a random walk of up to
/// [`ATTEMPTS_PER_ZONE`] steps, each clamped into the zone. A candidate is
/// accepted when it lies inside the margins and neither it nor its label
/// overlaps `occupied` grown by `object_spacing`. The search gives up after
/// [`MAX_ATTEMPTS`] attempts in total.
///
/// Nothing is recorded; the caller pushes the accepted rects.
pub fn find_position<R: Rng + ?Sized>(
    request: &PlacementRequest,
    canvas: CanvasGeometry,
    ctx: &AnchorContext<'_>,
    occupied: &OccupiedSet,
    object_spacing: i32,
    rng: &mut R,
) -> Option<Placement> {
    let (width, height) = request.size;
    let anchor = request.spec.anchor;

    let mut zones = ctx.zones.to_vec();
    zones.shuffle(rng);
    let side = if rng.gen_bool(0.5) {
        PreferredSide::Left
    } else {
        PreferredSide::Right
    };
    if anchor.is_side_worn() {
        zones.sort_by_key(|zone| zone.preferred_side != side);
    }

    let mut attempts = 0;
    for zone in &zones {
        let (start_x, start_y) = start_position(anchor, zone, ctx, side, request.size, rng);
        let (mut x, mut y) = zone.clamp(start_x, start_y, width, height);

        for _ in 0..ATTEMPTS_PER_ZONE {
            if attempts >= MAX_ATTEMPTS {
                debug!(?anchor, attempts, "Accessory placement budget exhausted");
                return None;
            }
            attempts += 1;

            (x, y) = zone.clamp(
                x + rng.gen_range(-JITTER..=JITTER),
                y + rng.gen_range(-JITTER..=JITTER),
                width,
                height,
            );
            let item = PlacementRect::new(x, y, width, height);
            if !canvas.contains(&item) || occupied.overlaps(&item, object_spacing) {
                continue;
            }

            let label = request
                .label
                .map(|spec| canvas.label_below(&item, spec.text_width, spec.font_size));
            if label.is_some_and(|label| occupied.overlaps(&label, object_spacing)) {
                continue;
            }

            debug!(?anchor, ?item, attempts, "Accessory position found");
            return Some(Placement { item, label });
        }
    }

    debug!(?anchor, attempts, "No free position for accessory");
    None
}

fn start_position<R: Rng + ?Sized>(
    anchor: Anchor,
    zone: &Zone,
    ctx: &AnchorContext<'_>,
    side: PreferredSide,
    (width, height): (u32, u32),
    rng: &mut R,
) -> (i32, i32) {
    let (w, h) = (width as i32, height as i32);
    let shirt = ctx.shirt;
    let pants = ctx.pants;
    let centered_on = |rect: &PlacementRect| rect.x + (rect.width as i32 - w) / 2;

    match anchor {
        Anchor::AboveShirt => (centered_on(&shirt), shirt.y - h - ABOVE_SHIRT_GAP),
        Anchor::GarmentSeam => (
            centered_on(&shirt),
            shirt.bottom() + ctx.spacing / 2 - h / 2,
        ),
        Anchor::BelowPants => (centered_on(&pants), pants.bottom() + BELOW_PANTS_GAP),
        Anchor::LargestZone => {
            let target = ctx.largest_zone().unwrap_or(zone);
            (
                target.x_start + (target.width() - w) / 2,
                target.y_start + (target.height() - h) / 2,
            )
        }
        Anchor::ZoneInnerEdge => {
            let x = match (zone.preferred_side, side) {
                (PreferredSide::Left, _) => zone.x_end - w,
                (PreferredSide::Right, _) => zone.x_start,
                (PreferredSide::Neither, PreferredSide::Left) => ctx.block.x - w - BLOCK_SIDE_GAP,
                (PreferredSide::Neither, _) => ctx.block.right() + BLOCK_SIDE_GAP,
            };
            (x, shirt.y + shirt.height as i32 / 2)
        }
        Anchor::RandomInZone => (
            safe_range(rng, zone.x_start, zone.x_end - w),
            safe_range(rng, zone.y_start, zone.y_end - h),
        ),
    }
}
