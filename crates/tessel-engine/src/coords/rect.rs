use super::Vec2;
use super::px::PxRectangle;

/// Axis-aligned area in fractional pixels, stored as edges (top-left origin).
///
/// Used for destination rectangles and clip rects where layout produces
/// sub-pixel positions.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Builds from origin + size. Negative sizes are normalized.
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_ltrb(x, y, x + w, y + h)
    }

    /// Builds from edges, swapping them if inverted.
    #[inline]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    #[inline]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn origin(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.left && p.y >= self.top && p.x < self.right && p.y < self.bottom
    }

    /// True if the interiors overlap. Touching edges and empty rects do not overlap.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        })
    }

    #[inline]
    pub fn translated(self, by: Vec2) -> Rect {
        Rect {
            left: self.left + by.x,
            top: self.top + by.y,
            right: self.right + by.x,
            bottom: self.bottom + by.y,
        }
    }
}

impl From<PxRectangle> for Rect {
    #[inline]
    fn from(r: PxRectangle) -> Rect {
        Rect {
            left: r.left() as f32,
            top: r.top() as f32,
            right: r.right() as f32,
            bottom: r.bottom() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn negative_size_is_normalized() {
        let n = r(10.0, 10.0, -4.0, -3.0);
        assert_eq!(n, Rect::from_ltrb(6.0, 7.0, 10.0, 10.0));
        assert_eq!(n.width(), 4.0);
    }

    #[test]
    fn from_px_rectangle() {
        let p = PxRectangle::create(1, 2, 3, 4);
        assert_eq!(Rect::from(p), Rect::from_ltrb(1.0, 2.0, 4.0, 6.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive_bottom_right_exclusive() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(Vec2::new(0.0, 0.0)));
        assert!(!a.contains(Vec2::new(10.0, 10.0)));
    }

    // ── overlap / intersect ───────────────────────────────────────────────

    #[test]
    fn overlapping_rects_intersect() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(b));
        assert_eq!(a.intersect(b), Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(b));
        assert!(a.intersect(b).is_none());
    }

    #[test]
    fn empty_rect_overlaps_nothing() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(r(5.0, 5.0, 0.0, 3.0)));
        assert!(!r(5.0, 5.0, 3.0, 0.0).overlaps(a));
        assert!(a.intersect(r(5.0, 5.0, 0.0, 3.0)).is_none());
    }
}
