//! Integer pixel-space value types.
//!
//! All types are plain `Copy` values. Arithmetic on the non-negative types
//! checks its preconditions with `debug_assert!` only: callers on hot layout
//! paths are trusted, and release builds skip the check.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

// ── PxValue ───────────────────────────────────────────────────────────────

/// Signed pixel scalar.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PxValue(pub i32);

impl PxValue {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for PxValue {
    type Output = PxValue;
    #[inline]
    fn add(self, rhs: PxValue) -> PxValue {
        PxValue(self.0 + rhs.0)
    }
}

impl Sub for PxValue {
    type Output = PxValue;
    #[inline]
    fn sub(self, rhs: PxValue) -> PxValue {
        PxValue(self.0 - rhs.0)
    }
}

impl Mul<i32> for PxValue {
    type Output = PxValue;
    #[inline]
    fn mul(self, rhs: i32) -> PxValue {
        PxValue(self.0 * rhs)
    }
}

impl Div<i32> for PxValue {
    type Output = PxValue;
    #[inline]
    fn div(self, rhs: i32) -> PxValue {
        debug_assert!(rhs != 0, "PxValue division by zero");
        PxValue(self.0 / rhs)
    }
}

impl Neg for PxValue {
    type Output = PxValue;
    #[inline]
    fn neg(self) -> PxValue {
        PxValue(-self.0)
    }
}

impl AddAssign for PxValue {
    #[inline]
    fn add_assign(&mut self, rhs: PxValue) {
        self.0 += rhs.0;
    }
}

impl SubAssign for PxValue {
    #[inline]
    fn sub_assign(&mut self, rhs: PxValue) {
        self.0 -= rhs.0;
    }
}

// ── PxSize1D ──────────────────────────────────────────────────────────────

/// Non-negative pixel length.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PxSize1D(i32);

impl PxSize1D {
    /// Checked constructor: negative input is clamped to zero.
    #[inline]
    pub fn create(v: i32) -> Self {
        Self(v.max(0))
    }

    /// Unchecked constructor for arithmetic paths. The caller guarantees `v >= 0`.
    #[inline]
    pub fn unchecked_create(v: i32) -> Self {
        debug_assert!(v >= 0, "PxSize1D can not be negative ({v})");
        Self(v)
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn value(self) -> PxValue {
        PxValue(self.0)
    }
}

impl Add for PxSize1D {
    type Output = PxSize1D;
    #[inline]
    fn add(self, rhs: PxSize1D) -> PxSize1D {
        PxSize1D(self.0 + rhs.0)
    }
}

/// The difference of two sizes may be negative, so it is a plain `PxValue`.
impl Sub for PxSize1D {
    type Output = PxValue;
    #[inline]
    fn sub(self, rhs: PxSize1D) -> PxValue {
        PxValue(self.0 - rhs.0)
    }
}

impl Mul<PxSize1D> for PxSize1D {
    type Output = PxSize1D;
    #[inline]
    fn mul(self, rhs: PxSize1D) -> PxSize1D {
        PxSize1D(self.0 * rhs.0)
    }
}

impl Div<PxSize1D> for PxSize1D {
    type Output = PxSize1D;
    #[inline]
    fn div(self, rhs: PxSize1D) -> PxSize1D {
        debug_assert!(rhs.0 != 0, "PxSize1D division by zero");
        PxSize1D(self.0 / rhs.0)
    }
}

impl AddAssign for PxSize1D {
    #[inline]
    fn add_assign(&mut self, rhs: PxSize1D) {
        self.0 += rhs.0;
    }
}

impl From<PxSize1D> for PxValue {
    #[inline]
    fn from(v: PxSize1D) -> PxValue {
        PxValue(v.0)
    }
}

// ── PxExtent2D ────────────────────────────────────────────────────────────

/// Unsigned 2D pixel extent.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PxExtent2D {
    pub width: u32,
    pub height: u32,
}

impl PxExtent2D {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checked conversion from signed values; negative components are rejected.
    pub fn try_from_signed(width: i32, height: i32) -> Option<Self> {
        if width < 0 || height < 0 {
            None
        } else {
            Some(Self::new(width as u32, height as u32))
        }
    }
}

impl Add for PxExtent2D {
    type Output = PxExtent2D;
    #[inline]
    fn add(self, rhs: PxExtent2D) -> PxExtent2D {
        PxExtent2D::new(self.width + rhs.width, self.height + rhs.height)
    }
}

/// The minuend must be at least as large as the subtrahend on both axes.
///
/// Release builds wrap instead of checking; callers must not rely on that.
impl Sub for PxExtent2D {
    type Output = PxExtent2D;
    #[inline]
    fn sub(self, rhs: PxExtent2D) -> PxExtent2D {
        debug_assert!(self.width >= rhs.width, "PxExtent2D width underflow");
        debug_assert!(self.height >= rhs.height, "PxExtent2D height underflow");
        PxExtent2D::new(
            self.width.wrapping_sub(rhs.width),
            self.height.wrapping_sub(rhs.height),
        )
    }
}

impl Mul<u32> for PxExtent2D {
    type Output = PxExtent2D;
    #[inline]
    fn mul(self, rhs: u32) -> PxExtent2D {
        PxExtent2D::new(self.width * rhs, self.height * rhs)
    }
}

impl Div<u32> for PxExtent2D {
    type Output = PxExtent2D;
    #[inline]
    fn div(self, rhs: u32) -> PxExtent2D {
        debug_assert!(rhs != 0, "PxExtent2D division by zero");
        PxExtent2D::new(self.width / rhs, self.height / rhs)
    }
}

impl AddAssign for PxExtent2D {
    #[inline]
    fn add_assign(&mut self, rhs: PxExtent2D) {
        *self = *self + rhs;
    }
}

impl SubAssign for PxExtent2D {
    #[inline]
    fn sub_assign(&mut self, rhs: PxExtent2D) {
        *self = *self - rhs;
    }
}

impl MulAssign<u32> for PxExtent2D {
    #[inline]
    fn mul_assign(&mut self, rhs: u32) {
        *self = *self * rhs;
    }
}

impl DivAssign<u32> for PxExtent2D {
    #[inline]
    fn div_assign(&mut self, rhs: u32) {
        *self = *self / rhs;
    }
}

// ── PxSize2D ──────────────────────────────────────────────────────────────

/// Non-negative 2D size stored as signed integers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PxSize2D {
    width: i32,
    height: i32,
}

impl PxSize2D {
    /// Checked constructor: negative components are clamped to zero.
    #[inline]
    pub fn create(width: i32, height: i32) -> Self {
        Self { width: width.max(0), height: height.max(0) }
    }

    #[inline]
    pub fn unchecked_create(width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0, "PxSize2D can not be negative");
        Self { width, height }
    }

    #[inline]
    pub const fn width(self) -> i32 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.height
    }
}

impl Add for PxSize2D {
    type Output = PxSize2D;
    #[inline]
    fn add(self, rhs: PxSize2D) -> PxSize2D {
        PxSize2D::unchecked_create(self.width + rhs.width, self.height + rhs.height)
    }
}

impl From<PxExtent2D> for PxSize2D {
    #[inline]
    fn from(e: PxExtent2D) -> PxSize2D {
        debug_assert!(e.width <= i32::MAX as u32 && e.height <= i32::MAX as u32);
        PxSize2D::unchecked_create(e.width as i32, e.height as i32)
    }
}

impl From<PxSize2D> for PxExtent2D {
    #[inline]
    fn from(s: PxSize2D) -> PxExtent2D {
        PxExtent2D::new(s.width as u32, s.height as u32)
    }
}

// ── PxPoint2 ──────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PxPoint2 {
    pub x: i32,
    pub y: i32,
}

impl PxPoint2 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for PxPoint2 {
    type Output = PxPoint2;
    #[inline]
    fn add(self, rhs: PxPoint2) -> PxPoint2 {
        PxPoint2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PxPoint2 {
    type Output = PxPoint2;
    #[inline]
    fn sub(self, rhs: PxPoint2) -> PxPoint2 {
        PxPoint2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for PxPoint2 {
    #[inline]
    fn add_assign(&mut self, rhs: PxPoint2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

// ── PxRectangle ───────────────────────────────────────────────────────────

/// Integer rectangle (top-left origin, non-negative size).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PxRectangle {
    pub x: i32,
    pub y: i32,
    width: i32,
    height: i32,
}

impl PxRectangle {
    /// Checked constructor: negative sizes are clamped to zero.
    #[inline]
    pub fn create(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width: width.max(0), height: height.max(0) }
    }

    #[inline]
    pub fn unchecked_create(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0, "PxRectangle size can not be negative");
        Self { x, y, width, height }
    }

    /// Builds a rectangle from edges. `right < left` yields a zero width.
    #[inline]
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::create(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn from_extent(offset: PxPoint2, extent: PxExtent2D) -> Self {
        let size = PxSize2D::from(extent);
        Self::unchecked_create(offset.x, offset.y, size.width(), size.height())
    }

    #[inline]
    pub const fn width(self) -> i32 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.height
    }

    #[inline]
    pub const fn left(self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn top(self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn offset(self) -> PxPoint2 {
        PxPoint2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(self) -> PxSize2D {
        PxSize2D::unchecked_create(self.width, self.height)
    }

    #[inline]
    pub fn extent(self) -> PxExtent2D {
        PxExtent2D::new(self.width as u32, self.height as u32)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half-open containment: [left, right) x [top, bottom).
    #[inline]
    pub fn contains(self, p: PxPoint2) -> bool {
        p.x >= self.left() && p.y >= self.top() && p.x < self.right() && p.y < self.bottom()
    }

    /// True if `other` lies entirely inside `self` (shared edges count as inside).
    #[inline]
    pub fn contains_rect(self, other: PxRectangle) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Intersection; disjoint rectangles produce an empty rectangle at the clamped origin.
    pub fn intersect(self, other: PxRectangle) -> PxRectangle {
        let l = self.left().max(other.left());
        let t = self.top().max(other.top());
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        PxRectangle::from_ltrb(l, t, r.max(l), b.max(t))
    }

    #[inline]
    pub fn translated(self, by: PxPoint2) -> PxRectangle {
        PxRectangle { x: self.x + by.x, y: self.y + by.y, ..self }
    }
}

// ── PxThicknessU ──────────────────────────────────────────────────────────

/// Per-side unsigned pixel thickness (margins, nine-slice borders).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PxThicknessU {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PxThicknessU {
    #[inline]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub const fn uniform(v: u32) -> Self {
        Self::new(v, v, v, v)
    }

    #[inline]
    pub const fn sum_x(self) -> u32 {
        self.left + self.right
    }

    #[inline]
    pub const fn sum_y(self) -> u32 {
        self.top + self.bottom
    }

    #[inline]
    pub const fn sum(self) -> PxExtent2D {
        PxExtent2D::new(self.sum_x(), self.sum_y())
    }

    /// Per-side subtraction, `None` if any side of `rhs` is larger.
    pub fn checked_sub(self, rhs: PxThicknessU) -> Option<PxThicknessU> {
        Some(PxThicknessU::new(
            self.left.checked_sub(rhs.left)?,
            self.top.checked_sub(rhs.top)?,
            self.right.checked_sub(rhs.right)?,
            self.bottom.checked_sub(rhs.bottom)?,
        ))
    }
}

impl Add for PxThicknessU {
    type Output = PxThicknessU;
    #[inline]
    fn add(self, rhs: PxThicknessU) -> PxThicknessU {
        PxThicknessU::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}

// ── float companions ──────────────────────────────────────────────────────

/// Fractional pixel size, produced by density scaling.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PxSize2DF {
    pub width: f32,
    pub height: f32,
}

impl PxSize2DF {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<PxSize2D> for PxSize2DF {
    #[inline]
    fn from(s: PxSize2D) -> Self {
        Self::new(s.width() as f32, s.height() as f32)
    }
}

/// Fractional per-side thickness, produced by density scaling.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PxThicknessF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PxThicknessF {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub fn sum_x(self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn sum_y(self) -> f32 {
        self.top + self.bottom
    }
}

impl From<PxThicknessU> for PxThicknessF {
    #[inline]
    fn from(t: PxThicknessU) -> Self {
        Self::new(t.left as f32, t.top as f32, t.right as f32, t.bottom as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(w: u32, h: u32) -> PxExtent2D {
        PxExtent2D::new(w, h)
    }

    // ── PxExtent2D ────────────────────────────────────────────────────────

    #[test]
    fn extent_add_then_sub_round_trips() {
        for (a, b) in [(e(0, 0), e(0, 0)), (e(3, 7), e(10, 1)), (e(256, 256), e(1, 2))] {
            assert_eq!((a + b) - b, a);
        }
    }

    #[test]
    fn extent_mul_by_zero_is_zero() {
        assert_eq!(e(12, 34) * 0, PxExtent2D::zero());
    }

    #[test]
    fn extent_compound_ops_mutate_self_only() {
        let rhs = e(2, 3);
        let mut a = e(10, 10);
        a += rhs;
        assert_eq!(a, e(12, 13));
        a -= rhs;
        assert_eq!(a, e(10, 10));
        a *= 3;
        assert_eq!(a, e(30, 30));
        a /= 5;
        assert_eq!(a, e(6, 6));
        assert_eq!(rhs, e(2, 3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "width underflow")]
    fn extent_sub_underflow_asserts_in_debug() {
        let _ = e(1, 5) - e(2, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn extent_div_by_zero_asserts_in_debug() {
        let _ = e(4, 4) / 0;
    }

    #[test]
    fn extent_from_signed_rejects_negative() {
        assert_eq!(PxExtent2D::try_from_signed(3, 4), Some(e(3, 4)));
        assert_eq!(PxExtent2D::try_from_signed(-1, 4), None);
    }

    // ── PxSize1D ──────────────────────────────────────────────────────────

    #[test]
    fn size1d_create_clamps_negative() {
        assert_eq!(PxSize1D::create(-5).raw(), 0);
        assert_eq!(PxSize1D::create(5).raw(), 5);
    }

    #[test]
    fn size1d_difference_may_be_negative() {
        assert_eq!(PxSize1D::create(2) - PxSize1D::create(7), PxValue(-5));
    }

    // ── PxRectangle ───────────────────────────────────────────────────────

    #[test]
    fn rect_edges() {
        let r = PxRectangle::create(10, 20, 30, 40);
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (10, 20, 40, 60));
        assert_eq!(r.extent(), e(30, 40));
    }

    #[test]
    fn rect_create_clamps_negative_size() {
        let r = PxRectangle::create(0, 0, -3, 4);
        assert_eq!(r.width(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn rect_intersect_overlapping() {
        let a = PxRectangle::create(0, 0, 10, 10);
        let b = PxRectangle::create(5, 5, 10, 10);
        assert_eq!(a.intersect(b), PxRectangle::create(5, 5, 5, 5));
    }

    #[test]
    fn rect_intersect_disjoint_is_empty() {
        let a = PxRectangle::create(0, 0, 5, 5);
        let b = PxRectangle::create(20, 20, 5, 5);
        assert!(a.intersect(b).is_empty());
    }

    #[test]
    fn rect_contains_rect_includes_shared_edges() {
        let outer = PxRectangle::create(0, 0, 64, 64);
        assert!(outer.contains_rect(PxRectangle::create(0, 0, 64, 64)));
        assert!(!outer.contains_rect(PxRectangle::create(1, 0, 64, 64)));
    }

    // ── PxThicknessU ──────────────────────────────────────────────────────

    #[test]
    fn thickness_sum() {
        let t = PxThicknessU::new(1, 2, 3, 4);
        assert_eq!(t.sum(), e(4, 6));
    }

    #[test]
    fn thickness_checked_sub() {
        let a = PxThicknessU::uniform(10);
        assert_eq!(a.checked_sub(PxThicknessU::new(1, 2, 3, 10)), Some(PxThicknessU::new(9, 8, 7, 0)));
        assert_eq!(a.checked_sub(PxThicknessU::new(0, 11, 0, 0)), None);
    }
}
