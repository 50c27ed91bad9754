//! Candidate regions for accessories around the garment block.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::geometry::{CanvasGeometry, PlacementRect};

/// Zones at or below this width or height are discarded.
pub const MIN_ZONE_EXTENT: i32 = 50;

/// Where the garment block sits horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    Center,
    Left,
    Right,
}

impl PlacementMode {
    pub const ALL: [PlacementMode; 3] = [Self::Center, Self::Left, Self::Right];

    /// Uniform choice among the three modes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Side hint attached to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredSide {
    Left,
    Right,
    Neither,
}

/// Rectangular region an accessory may be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
    pub preferred_side: PreferredSide,
}

impl Zone {
    pub fn width(&self) -> i32 {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> i32 {
        self.y_end - self.y_start
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width().max(0)) * i64::from(self.height().max(0))
    }

    /// Move the top-left corner of a `width × height` item so the item stays
    /// inside the zone. When the item is larger than the zone it is pinned
    /// to the zone's top-left corner.
    pub fn clamp(&self, x: i32, y: i32, width: u32, height: u32) -> (i32, i32) {
        let x = x.min(self.x_end - width as i32).max(self.x_start);
        let y = y.min(self.y_end - height as i32).max(self.y_start);
        (x, y)
    }

    fn is_usable(&self) -> bool {
        self.width() > MIN_ZONE_EXTENT && self.height() > MIN_ZONE_EXTENT
    }
}

/// Compute accessory zones beside the garment block.
///
/// A centered block gets a zone on each side; a block pushed left only
/// offers the right side and vice versa. Zones are inset from the block by
/// `object_spacing` and span the full margin-inset height. Degenerate zones
/// are dropped; if none survive, the whole safe area is returned as a
/// single fallback zone.
pub fn plan_zones(
    canvas: CanvasGeometry,
    block: &PlacementRect,
    mode: PlacementMode,
    object_spacing: i32,
) -> Vec<Zone> {
    let y_start = canvas.margin_px();
    let y_end = canvas.safe_bottom();

    let left = Zone {
        x_start: canvas.margin_px(),
        x_end: block.x - object_spacing,
        y_start,
        y_end,
        preferred_side: PreferredSide::Left,
    };
    let right = Zone {
        x_start: block.right() + object_spacing,
        x_end: canvas.safe_right(),
        y_start,
        y_end,
        preferred_side: PreferredSide::Right,
    };

    let candidates = match mode {
        PlacementMode::Center => vec![left, right],
        PlacementMode::Left => vec![right],
        PlacementMode::Right => vec![left],
    };

    let zones: Vec<Zone> = candidates.into_iter().filter(Zone::is_usable).collect();
    if !zones.is_empty() {
        debug!(?mode, count = zones.len(), "Planned accessory zones");
        return zones;
    }

    debug!(?mode, "No usable side zone, falling back to the whole safe area");
    vec![Zone {
        x_start: canvas.margin_px(),
        x_end: canvas.safe_right(),
        y_start,
        y_end,
        preferred_side: PreferredSide::Neither,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canvas() -> CanvasGeometry {
        CanvasGeometry::new(1080, 1920, 75)
    }

    #[test]
    fn test_center_block_yields_two_zones() {
        let block = PlacementRect::new(400, 300, 280, 900);
        let zones = plan_zones(canvas(), &block, PlacementMode::Center, 20);
        assert_eq!(zones.len(), 2);

        assert_eq!(zones[0].preferred_side, PreferredSide::Left);
        assert_eq!((zones[0].x_start, zones[0].x_end), (75, 380));
        assert_eq!(zones[1].preferred_side, PreferredSide::Right);
        assert_eq!((zones[1].x_start, zones[1].x_end), (700, 1005));
        for zone in &zones {
            assert_eq!((zone.y_start, zone.y_end), (75, 1845));
        }
    }

    #[test]
    fn test_left_mode_offers_right_zone_only() {
        let block = PlacementRect::new(200, 300, 300, 900);
        let zones = plan_zones(canvas(), &block, PlacementMode::Left, 10);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].preferred_side, PreferredSide::Right);
        assert_eq!(zones[0].x_start, 510);
    }

    #[test]
    fn test_right_mode_offers_left_zone_only() {
        let block = PlacementRect::new(600, 300, 300, 900);
        let zones = plan_zones(canvas(), &block, PlacementMode::Right, 10);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].preferred_side, PreferredSide::Left);
        assert_eq!(zones[0].x_end, 590);
    }

    #[test]
    fn test_narrow_zones_are_dropped() {
        // Left zone is exactly 50px wide and must be discarded.
        let block = PlacementRect::new(135, 300, 700, 900);
        let zones = plan_zones(canvas(), &block, PlacementMode::Center, 10);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].preferred_side, PreferredSide::Right);
    }

    #[test]
    fn test_fallback_zone_when_block_fills_width() {
        let block = PlacementRect::new(75, 300, 930, 900);
        let zones = plan_zones(canvas(), &block, PlacementMode::Center, 0);
        assert_eq!(
            zones,
            vec![Zone {
                x_start: 75,
                x_end: 1005,
                y_start: 75,
                y_end: 1845,
                preferred_side: PreferredSide::Neither,
            }]
        );
    }

    #[test]
    fn test_zones_keep_spacing_from_block() {
        let block = PlacementRect::new(400, 300, 280, 900);
        for spacing in [0, 17, 60] {
            for zone in plan_zones(canvas(), &block, PlacementMode::Center, spacing) {
                let as_rect = PlacementRect::new(
                    zone.x_start,
                    zone.y_start,
                    zone.width() as u32,
                    zone.height() as u32,
                );
                assert!(!as_rect.overlaps_with_padding(&block, spacing));
            }
        }
    }

    #[test]
    fn test_clamp_keeps_item_inside_zone() {
        let zone = Zone {
            x_start: 100,
            x_end: 300,
            y_start: 100,
            y_end: 500,
            preferred_side: PreferredSide::Left,
        };
        assert_eq!(zone.clamp(50, 600, 40, 40), (100, 460));
        assert_eq!(zone.clamp(290, 90, 40, 40), (260, 100));
        // Item wider than the zone is pinned to the start edge
        assert_eq!(zone.clamp(150, 150, 400, 40), (100, 150));
    }

    #[test]
    fn test_random_mode_covers_all_variants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let mode = PlacementMode::random(&mut rng);
            let idx = PlacementMode::ALL.iter().position(|m| *m == mode).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
