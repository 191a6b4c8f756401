use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use super::px::{PxPoint2, PxSize2D};

/// 2D vector in (fractional) pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or zero for a zero-length input.
    #[inline]
    pub fn normalized_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self / len } else { Vec2::zero() }
    }

    /// Rounds to the nearest whole pixel.
    #[inline]
    pub fn round_to_px(self) -> PxPoint2 {
        PxPoint2::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl From<PxPoint2> for Vec2 {
    #[inline]
    fn from(p: PxPoint2) -> Vec2 {
        Vec2::new(p.x as f32, p.y as f32)
    }
}

impl From<PxSize2D> for Vec2 {
    #[inline]
    fn from(s: PxSize2D) -> Vec2 {
        Vec2::new(s.width() as f32, s.height() as f32)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(Vec2::zero().normalized_or_zero(), Vec2::zero());
        assert_eq!(Vec2::new(0.0, 4.0).normalized_or_zero(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn round_to_px_rounds_half_away_from_zero() {
        assert_eq!(Vec2::new(1.5, -1.5).round_to_px(), PxPoint2::new(2, -2));
    }
}
