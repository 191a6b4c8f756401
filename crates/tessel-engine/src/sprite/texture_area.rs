//! Pixel rectangle to normalized texture coordinates.
//!
//! Boundary edges are snapped: an edge touching the texture origin is exactly
//! `0.0` and an edge reaching the far side is exactly `1.0`, so atlas regions
//! at the border never pick up division noise.

use crate::coords::{PxExtent2D, PxRectangle};
use crate::error::{Error, Result};

/// Normalized texture sub-rectangle.
///
/// `(x0, y0)` is the texel corner of the rectangle's top-left pixel,
/// `(x1, y1)` the bottom-right. With a bottom-left texture origin `y0 > y1`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeTextureArea {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl NativeTextureArea {
    pub const FULL: NativeTextureArea = NativeTextureArea { x0: 0.0, y0: 0.0, x1: 1.0, y1: 1.0 };

    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Mirrors the V axis (`v -> 1 - v`). Applying it twice restores the input.
    #[inline]
    pub fn flip_y(self) -> Self {
        Self::new(self.x0, 1.0 - self.y0, self.x1, 1.0 - self.y1)
    }
}

/// Explicit texture coordinate per quad corner.
///
/// Needed when the mapping is not axis aligned (rotated sprites).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NativeQuadTextureCoords {
    pub top_left: [f32; 2],
    pub top_right: [f32; 2],
    pub bottom_left: [f32; 2],
    pub bottom_right: [f32; 2],
}

impl From<NativeTextureArea> for NativeQuadTextureCoords {
    #[inline]
    fn from(a: NativeTextureArea) -> Self {
        Self {
            top_left: [a.x0, a.y0],
            top_right: [a.x1, a.y0],
            bottom_left: [a.x0, a.y1],
            bottom_right: [a.x1, a.y1],
        }
    }
}

/// Row convention of the active backend's texture sampler.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TextureOrigin {
    /// Row 0 is the top of the image (wgpu, Vulkan, D3D).
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the image (OpenGL).
    BottomLeft,
}

/// Unchecked calculation. The caller guarantees `rect` lies inside `extent`
/// and that `extent` is not empty.
pub fn fast_calc_native_texture_area(rect: PxRectangle, extent: PxExtent2D) -> NativeTextureArea {
    debug_assert!(!extent.is_empty(), "texture extent can not be empty");
    debug_assert!(fits(rect, extent), "rectangle {rect:?} does not fit inside {extent:?}");

    let w = extent.width as f32;
    let h = extent.height as f32;
    NativeTextureArea {
        x0: if rect.left() <= 0 { 0.0 } else { rect.left() as f32 / w },
        y0: if rect.top() <= 0 { 0.0 } else { rect.top() as f32 / h },
        x1: if rect.right() as i64 >= extent.width as i64 { 1.0 } else { rect.right() as f32 / w },
        y1: if rect.bottom() as i64 >= extent.height as i64 { 1.0 } else { rect.bottom() as f32 / h },
    }
}

/// Same as [`fast_calc_native_texture_area`] with the V axis mirrored.
pub fn fast_calc_native_texture_area_y_flipped(
    rect: PxRectangle,
    extent: PxExtent2D,
) -> NativeTextureArea {
    fast_calc_native_texture_area(rect, extent).flip_y()
}

/// Checked calculation; fails if `rect` does not fit inside `extent`.
pub fn calc_native_texture_area(rect: PxRectangle, extent: PxExtent2D) -> Result<NativeTextureArea> {
    if extent.is_empty() {
        return Err(Error::invalid_argument("texture extent can not be empty"));
    }
    if !fits(rect, extent) {
        return Err(Error::invalid_argument(format!(
            "rectangle {rect:?} does not fit inside texture extent {}x{}",
            extent.width, extent.height
        )));
    }
    Ok(fast_calc_native_texture_area(rect, extent))
}

pub fn calc_native_texture_area_y_flipped(
    rect: PxRectangle,
    extent: PxExtent2D,
) -> Result<NativeTextureArea> {
    calc_native_texture_area(rect, extent).map(NativeTextureArea::flip_y)
}

/// Clamps `rect` to the texture before calculating; never fails.
///
/// An empty extent yields an all-zero area.
pub fn calc_native_texture_area_clipped(rect: PxRectangle, extent: PxExtent2D) -> NativeTextureArea {
    if extent.is_empty() {
        return NativeTextureArea::default();
    }
    let w = i32::try_from(extent.width).unwrap_or(i32::MAX);
    let h = i32::try_from(extent.height).unwrap_or(i32::MAX);
    let l = rect.left().clamp(0, w);
    let t = rect.top().clamp(0, h);
    let r = rect.right().clamp(l, w);
    let b = rect.bottom().clamp(t, h);
    fast_calc_native_texture_area(PxRectangle::from_ltrb(l, t, r, b), extent)
}

pub fn calc_native_texture_area_clipped_y_flipped(
    rect: PxRectangle,
    extent: PxExtent2D,
) -> NativeTextureArea {
    calc_native_texture_area_clipped(rect, extent).flip_y()
}

fn fits(rect: PxRectangle, extent: PxExtent2D) -> bool {
    rect.left() >= 0
        && rect.top() >= 0
        && rect.right() as i64 <= extent.width as i64
        && rect.bottom() as i64 <= extent.height as i64
}

/// Selects the plain or Y-flipped calculation for one texture origin.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderConverter {
    origin: TextureOrigin,
}

impl RenderConverter {
    #[inline]
    pub const fn new(origin: TextureOrigin) -> Self {
        Self { origin }
    }

    #[inline]
    pub const fn origin(&self) -> TextureOrigin {
        self.origin
    }

    pub fn calc(&self, rect: PxRectangle, extent: PxExtent2D) -> Result<NativeTextureArea> {
        match self.origin {
            TextureOrigin::TopLeft => calc_native_texture_area(rect, extent),
            TextureOrigin::BottomLeft => calc_native_texture_area_y_flipped(rect, extent),
        }
    }

    pub fn calc_clipped(&self, rect: PxRectangle, extent: PxExtent2D) -> NativeTextureArea {
        match self.origin {
            TextureOrigin::TopLeft => calc_native_texture_area_clipped(rect, extent),
            TextureOrigin::BottomLeft => calc_native_texture_area_clipped_y_flipped(rect, extent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> PxRectangle {
        PxRectangle::create(x, y, w, h)
    }

    const E256: PxExtent2D = PxExtent2D::new(256, 256);

    // ── fast ──────────────────────────────────────────────────────────────

    #[test]
    fn top_left_quarter() {
        let a = fast_calc_native_texture_area(rect(0, 0, 64, 64), E256);
        assert_eq!(a, NativeTextureArea::new(0.0, 0.0, 0.25, 0.25));
    }

    #[test]
    fn top_left_quarter_y_flipped() {
        let a = fast_calc_native_texture_area_y_flipped(rect(0, 0, 64, 64), E256);
        assert_eq!(a, NativeTextureArea::new(0.0, 1.0, 0.25, 0.75));
    }

    #[test]
    fn far_edges_snap_to_one() {
        let a = fast_calc_native_texture_area(rect(85, 171, 171, 85), E256);
        assert_eq!(a.x1, 1.0);
        assert_eq!(a.y1, 1.0);
        assert_eq!(a.x0, 85.0 / 256.0);
    }

    #[test]
    fn full_odd_extent_is_exact_unit_square() {
        let e = PxExtent2D::new(3, 7);
        assert_eq!(fast_calc_native_texture_area(rect(0, 0, 3, 7), e), NativeTextureArea::FULL);
    }

    // ── checked ───────────────────────────────────────────────────────────

    #[test]
    fn inside_rects_stay_in_unit_square() {
        let e = PxExtent2D::new(100, 40);
        for (x, y, w, h) in [(0, 0, 1, 1), (99, 39, 1, 1), (10, 5, 50, 30), (0, 0, 100, 40)] {
            let a = calc_native_texture_area(rect(x, y, w, h), e).unwrap();
            for v in [a.x0, a.y0, a.x1, a.y1] {
                assert!((0.0..=1.0).contains(&v), "{v} out of range for {x},{y},{w},{h}");
            }
        }
    }

    #[test]
    fn overshooting_rect_is_invalid_argument() {
        let err = calc_native_texture_area(rect(200, 0, 64, 64), E256).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = calc_native_texture_area(rect(-1, 0, 8, 8), E256).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn empty_extent_is_invalid_argument() {
        assert!(calc_native_texture_area(rect(0, 0, 0, 0), PxExtent2D::zero()).is_err());
    }

    // ── y flip ────────────────────────────────────────────────────────────

    #[test]
    fn flipping_twice_restores_v() {
        let e = PxExtent2D::new(512, 128);
        for r in [rect(0, 0, 64, 64), rect(17, 33, 90, 41), rect(500, 100, 12, 28)] {
            let plain = calc_native_texture_area(r, e).unwrap();
            let flipped = calc_native_texture_area_y_flipped(r, e).unwrap();
            assert_eq!(flipped.flip_y().y0, plain.y0);
            assert_eq!(flipped.flip_y().y1, plain.y1);
            assert_eq!(flipped.x0, plain.x0);
        }
    }

    // ── clipped ───────────────────────────────────────────────────────────

    #[test]
    fn clipped_clamps_overshoot() {
        let a = calc_native_texture_area_clipped(rect(192, -10, 128, 74), E256);
        assert_eq!(a, NativeTextureArea::new(0.75, 0.0, 1.0, 0.25));
    }

    #[test]
    fn clipped_disjoint_rect_collapses_to_edge() {
        let a = calc_native_texture_area_clipped(rect(300, 10, 10, 10), E256);
        assert_eq!(a.x0, a.x1);
        assert_eq!(a.x1, 1.0);
    }

    #[test]
    fn clipped_y_flipped() {
        let a = calc_native_texture_area_clipped_y_flipped(rect(-5, -5, 69, 69), E256);
        assert_eq!(a, NativeTextureArea::new(0.0, 1.0, 0.25, 0.75));
    }

    // ── converter ─────────────────────────────────────────────────────────

    #[test]
    fn converter_follows_origin() {
        let tl = RenderConverter::new(TextureOrigin::TopLeft);
        let bl = RenderConverter::new(TextureOrigin::BottomLeft);
        let r = rect(0, 0, 64, 64);
        assert_eq!(tl.calc(r, E256).unwrap().y0, 0.0);
        assert_eq!(bl.calc(r, E256).unwrap().y0, 1.0);
    }

    #[test]
    fn quad_coords_from_area() {
        let q = NativeQuadTextureCoords::from(NativeTextureArea::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(q.top_right, [0.3, 0.2]);
        assert_eq!(q.bottom_left, [0.1, 0.4]);
    }
}
