//! Rectangles, the canvas safe area, and the occupied set.

use serde::Serialize;

/// Gap between an item's bottom edge and its name label.
pub const LABEL_GAP: i32 = 10;

/// Axis-aligned bounding box in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PlacementRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether the two rectangles intersect once `other` is grown by
    /// `padding` pixels on every side.
    pub fn overlaps_with_padding(&self, other: &PlacementRect, padding: i32) -> bool {
        self.x < other.right() + padding
            && self.right() > other.x - padding
            && self.y < other.bottom() + padding
            && self.bottom() > other.y - padding
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &PlacementRect) -> PlacementRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        PlacementRect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }
}

/// Canvas size together with the margin every element must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl CanvasGeometry {
    pub fn new(width: u32, height: u32, margin: u32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Width of the margin-inset content area.
    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(self.margin * 2)
    }

    /// Height of the margin-inset content area.
    pub fn content_height(&self) -> u32 {
        self.height.saturating_sub(self.margin * 2)
    }

    pub fn margin_px(&self) -> i32 {
        self.margin as i32
    }

    /// Right edge of the safe area.
    pub fn safe_right(&self) -> i32 {
        self.width as i32 - self.margin as i32
    }

    /// Bottom edge of the safe area.
    pub fn safe_bottom(&self) -> i32 {
        self.height as i32 - self.margin as i32
    }

    /// The margin-inset content area as a rectangle.
    pub fn content_rect(&self) -> PlacementRect {
        PlacementRect::new(
            self.margin_px(),
            self.margin_px(),
            self.content_width(),
            self.content_height(),
        )
    }

    /// Whether `rect` lies entirely inside the margins.
    pub fn contains(&self, rect: &PlacementRect) -> bool {
        rect.x >= self.margin_px()
            && rect.y >= self.margin_px()
            && rect.right() <= self.safe_right()
            && rect.bottom() <= self.safe_bottom()
    }

    /// Rectangle of a label centered under `item`, pushed back inside the
    /// margins when it would cross the right/bottom (then left/top) edge.
    pub fn label_below(&self, item: &PlacementRect, text_width: u32, font_size: u32) -> PlacementRect {
        let mut x = item.x + (item.width as i32 - text_width as i32) / 2;
        let mut y = item.bottom() + LABEL_GAP;

        if x + text_width as i32 > self.safe_right() {
            x = self.safe_right() - text_width as i32;
        }
        if y + font_size as i32 > self.safe_bottom() {
            y = self.safe_bottom() - font_size as i32;
        }
        x = x.max(self.margin_px());
        y = y.max(self.margin_px());

        PlacementRect::new(x, y, text_width, font_size)
    }
}

/// Rectangles already committed to the current image.
///
/// Append-only; created empty for every generated image.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OccupiedSet {
    rects: Vec<PlacementRect>,
}

impl OccupiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rect: PlacementRect) {
        self.rects.push(rect);
    }

    /// Whether `candidate` overlaps any member grown by `padding`.
    pub fn overlaps(&self, candidate: &PlacementRect, padding: i32) -> bool {
        self.rects
            .iter()
            .any(|occupied| candidate.overlaps_with_padding(occupied, padding))
    }

    pub fn as_slice(&self) -> &[PlacementRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasGeometry {
        CanvasGeometry::new(1080, 1920, 75)
    }

    #[test]
    fn test_content_area() {
        let c = canvas();
        assert_eq!(c.content_width(), 930);
        assert_eq!(c.content_height(), 1770);
        assert_eq!(c.content_rect(), PlacementRect::new(75, 75, 930, 1770));
    }

    #[test]
    fn test_overlap_with_padding() {
        let a = PlacementRect::new(0, 0, 10, 10);
        let b = PlacementRect::new(15, 0, 10, 10);
        assert!(!a.overlaps_with_padding(&b, 0));
        assert!(!a.overlaps_with_padding(&b, 5));
        assert!(a.overlaps_with_padding(&b, 6));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = PlacementRect::new(0, 0, 10, 10);
        let b = PlacementRect::new(10, 10, 10, 10);
        assert!(!a.overlaps_with_padding(&b, 0));
    }

    #[test]
    fn test_contains_respects_margin() {
        let c = canvas();
        assert!(c.contains(&PlacementRect::new(75, 75, 930, 1770)));
        assert!(!c.contains(&PlacementRect::new(74, 75, 10, 10)));
        assert!(!c.contains(&PlacementRect::new(996, 75, 10, 10)));
        assert!(!c.contains(&PlacementRect::new(75, 1840, 10, 10)));
    }

    #[test]
    fn test_label_centered_below_item() {
        let c = canvas();
        let item = PlacementRect::new(300, 300, 200, 100);
        let label = c.label_below(&item, 100, 30);
        assert_eq!(label, PlacementRect::new(350, 410, 100, 30));
    }

    #[test]
    fn test_label_clamped_into_margins() {
        let c = canvas();
        let item = PlacementRect::new(900, 1800, 100, 40);
        let label = c.label_below(&item, 300, 30);
        assert!(c.contains(&label), "label {label:?} escaped the margins");
        assert_eq!(label.right(), c.safe_right());
        assert_eq!(label.bottom(), c.safe_bottom());
    }

    #[test]
    fn test_occupied_set_queries() {
        let mut set = OccupiedSet::new();
        assert!(set.is_empty());

        set.push(PlacementRect::new(100, 100, 50, 50));
        set.push(PlacementRect::new(300, 400, 20, 10));
        assert_eq!(set.len(), 2);
        assert!(set.overlaps(&PlacementRect::new(140, 140, 5, 5), 0));
        assert!(!set.overlaps(&PlacementRect::new(200, 200, 5, 5), 10));
        assert_eq!(set.as_slice()[1], PlacementRect::new(300, 400, 20, 10));
    }
}
