//! Density-independent pixel types.
//!
//! One dp equals one px on a 160 dpi display. Conversion to px needs a
//! [`DensityConverter`](super::DensityConverter).

use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Signed dp scalar.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DpValue(pub i32);

impl DpValue {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl Add for DpValue {
    type Output = DpValue;
    #[inline]
    fn add(self, rhs: DpValue) -> DpValue {
        DpValue(self.0 + rhs.0)
    }
}

impl Sub for DpValue {
    type Output = DpValue;
    #[inline]
    fn sub(self, rhs: DpValue) -> DpValue {
        DpValue(self.0 - rhs.0)
    }
}

impl AddAssign for DpValue {
    #[inline]
    fn add_assign(&mut self, rhs: DpValue) {
        self.0 += rhs.0;
    }
}

impl SubAssign for DpValue {
    #[inline]
    fn sub_assign(&mut self, rhs: DpValue) {
        self.0 -= rhs.0;
    }
}

/// Non-negative dp length.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DpSize1D(i32);

impl DpSize1D {
    /// Checked constructor: negative input is clamped to zero.
    #[inline]
    pub fn create(v: i32) -> Self {
        Self(v.max(0))
    }

    #[inline]
    pub fn unchecked_create(v: i32) -> Self {
        debug_assert!(v >= 0, "DpSize1D can not be negative ({v})");
        Self(v)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl Add for DpSize1D {
    type Output = DpSize1D;
    #[inline]
    fn add(self, rhs: DpSize1D) -> DpSize1D {
        DpSize1D(self.0 + rhs.0)
    }
}

impl Sub for DpSize1D {
    type Output = DpValue;
    #[inline]
    fn sub(self, rhs: DpSize1D) -> DpValue {
        DpValue(self.0 - rhs.0)
    }
}

/// Unsigned 2D dp extent.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DpExtent2D {
    pub width: u32,
    pub height: u32,
}

impl DpExtent2D {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Add for DpExtent2D {
    type Output = DpExtent2D;
    #[inline]
    fn add(self, rhs: DpExtent2D) -> DpExtent2D {
        DpExtent2D::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for DpExtent2D {
    type Output = DpExtent2D;
    #[inline]
    fn sub(self, rhs: DpExtent2D) -> DpExtent2D {
        debug_assert!(self.width >= rhs.width, "DpExtent2D width underflow");
        debug_assert!(self.height >= rhs.height, "DpExtent2D height underflow");
        DpExtent2D::new(
            self.width.wrapping_sub(rhs.width),
            self.height.wrapping_sub(rhs.height),
        )
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DpPoint2 {
    pub x: i32,
    pub y: i32,
}

impl DpPoint2 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for DpPoint2 {
    type Output = DpPoint2;
    #[inline]
    fn add(self, rhs: DpPoint2) -> DpPoint2 {
        DpPoint2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Per-side unsigned dp thickness.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DpThicknessU {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl DpThicknessU {
    #[inline]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_add_sub_round_trip() {
        let a = DpExtent2D::new(40, 12);
        let b = DpExtent2D::new(3, 8);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn size_create_clamps() {
        assert_eq!(DpSize1D::create(-1).raw(), 0);
        assert_eq!(DpSize1D::create(3) - DpSize1D::create(5), DpValue(-2));
    }
}
