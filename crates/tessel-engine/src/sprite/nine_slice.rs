//! Nine-slice sprites.
//!
//! Responsibilities:
//! - validate the border against the atlas trim at construction time
//! - re-base the border into trimmed texture space for UV math
//! - split a destination rectangle into the 3x3 patch grid (plain and rotated)

use crate::coords::{
    DensityConverter, DpExtent2D, PxExtent2D, PxRectangle, PxSize2D, PxThicknessF, PxThicknessU,
    Rect, Vec2,
};
use crate::error::{Error, Result};

use super::material::SpriteMaterialInfo;
use super::texture_area::{NativeQuadTextureCoords, NativeTextureArea};

/// The four U and four V coordinates bounding the nine patches.
///
/// `x0`/`x3` are the outer edges, `x1`/`x2` the inner (stretch) edges.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NineSliceTextureArea {
    pub x0: f32,
    pub x1: f32,
    pub x2: f32,
    pub x3: f32,
    pub y0: f32,
    pub y1: f32,
    pub y2: f32,
    pub y3: f32,
}

impl NineSliceTextureArea {
    pub fn from_outer_inner(outer: NativeTextureArea, inner: NativeTextureArea) -> Self {
        Self {
            x0: outer.x0,
            x1: inner.x0,
            x2: inner.x1,
            x3: outer.x1,
            y0: outer.y0,
            y1: inner.y0,
            y2: inner.y1,
            y3: outer.y1,
        }
    }

    #[inline]
    fn xs(&self) -> [f32; 4] {
        [self.x0, self.x1, self.x2, self.x3]
    }

    #[inline]
    fn ys(&self) -> [f32; 4] {
        [self.y0, self.y1, self.y2, self.y3]
    }
}

/// Nine-slice values scaled for the display density.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NineSliceRenderInfo {
    pub size: PxSize2D,
    pub trim_margin: PxThicknessF,
    pub trimmed_nine_slice: PxThicknessF,
    pub content_margin: PxThicknessU,
    pub texture_area: NineSliceTextureArea,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NineSliceSpriteInfo {
    pub material: SpriteMaterialInfo,
    pub image_dpi: u32,
    /// Full image size before trimming.
    pub extent: PxExtent2D,
    pub dp_extent: DpExtent2D,
    pub trim_margin: PxThicknessU,
    pub trimmed_rect: PxRectangle,
    /// Border thickness relative to the full image.
    pub nine_slice: PxThicknessU,
    /// Border thickness relative to the trimmed rectangle.
    pub trimmed_nine_slice: PxThicknessU,
    pub content_margin: PxThicknessU,
    pub render: NineSliceRenderInfo,
}

impl NineSliceSpriteInfo {
    /// Validates and precomputes a nine-slice sprite.
    ///
    /// Fails with `InvalidArgument` if the border is thinner than the trim on
    /// any side, if the borders do not fit the image, if the trimmed rectangle
    /// is outside the texture, or if `image_dpi` is zero.
    pub fn new(
        material: SpriteMaterialInfo,
        trim_margin: PxThicknessU,
        trimmed_rect: PxRectangle,
        nine_slice: PxThicknessU,
        content_margin: PxThicknessU,
        image_dpi: u32,
        converter: &DensityConverter,
    ) -> Result<Self> {
        let extent = trim_margin.sum() + trimmed_rect.extent();

        let trimmed_nine_slice = nine_slice.checked_sub(trim_margin).ok_or_else(|| {
            Error::invalid_argument(format!(
                "nine slice {nine_slice:?} is thinner than the trim margin {trim_margin:?}"
            ))
        })?;

        if nine_slice.sum_x() > extent.width || nine_slice.sum_y() > extent.height {
            return Err(Error::invalid_argument(format!(
                "nine slice {nine_slice:?} does not fit inside image {}x{}",
                extent.width, extent.height
            )));
        }
        if content_margin.sum_x() > extent.width || content_margin.sum_y() > extent.height {
            return Err(Error::invalid_argument(format!(
                "content margin {content_margin:?} does not fit inside image {}x{}",
                extent.width, extent.height
            )));
        }

        let inner_rect = PxRectangle::from_ltrb(
            trimmed_rect.left() + trimmed_nine_slice.left as i32,
            trimmed_rect.top() + trimmed_nine_slice.top as i32,
            trimmed_rect.right() - trimmed_nine_slice.right as i32,
            trimmed_rect.bottom() - trimmed_nine_slice.bottom as i32,
        );
        let outer = material.calc_texture_area(trimmed_rect)?;
        let inner = material.calc_texture_area(inner_rect)?;

        let dp_extent = DensityConverter::image_dp_extent(extent, image_dpi)?;
        let scaled = converter.scaled_trimmed_nine_slice(
            extent,
            trim_margin,
            trimmed_nine_slice,
            content_margin,
            image_dpi,
        )?;

        Ok(Self {
            material,
            image_dpi,
            extent,
            dp_extent,
            trim_margin,
            trimmed_rect,
            nine_slice,
            trimmed_nine_slice,
            content_margin,
            render: NineSliceRenderInfo {
                size: scaled.size,
                trim_margin: scaled.trim_margin,
                trimmed_nine_slice: scaled.trimmed_nine_slice,
                content_margin: scaled.content_margin,
                texture_area: NineSliceTextureArea::from_outer_inner(outer, inner),
            },
        })
    }

    /// The stretchable center in full image coordinates.
    pub fn stretch_rect(&self) -> PxRectangle {
        PxRectangle::from_ltrb(
            self.nine_slice.left as i32,
            self.nine_slice.top as i32,
            (self.extent.width - self.nine_slice.right) as i32,
            (self.extent.height - self.nine_slice.bottom) as i32,
        )
    }

    /// Splits `dst` into the nine destination patches with their UVs.
    ///
    /// Patches are row major, top-left first. Patches that collapse to zero
    /// area are still returned; callers skip them.
    pub fn patches(&self, dst: Rect) -> [NineSlicePatch; 9] {
        let r = &self.render;
        let xs = axis_edges(
            dst.left,
            dst.right,
            r.trim_margin.left,
            r.trimmed_nine_slice.left,
            r.trimmed_nine_slice.right,
            r.trim_margin.right,
        );
        let ys = axis_edges(
            dst.top,
            dst.bottom,
            r.trim_margin.top,
            r.trimmed_nine_slice.top,
            r.trimmed_nine_slice.bottom,
            r.trim_margin.bottom,
        );
        let us = r.texture_area.xs();
        let vs = r.texture_area.ys();

        core::array::from_fn(|i| {
            let (row, col) = (i / 3, i % 3);
            NineSlicePatch {
                index: i as u8,
                dst: Rect::from_ltrb(xs[col], ys[row], xs[col + 1], ys[row + 1]),
                uv: NativeTextureArea::new(us[col], vs[row], us[col + 1], vs[row + 1]).into(),
            }
        })
    }

    /// Same as [`patches`](Self::patches) with the image turned 90 degrees clockwise.
    ///
    /// The image's vertical axis runs along `dst`'s horizontal axis.
    pub fn patches_rotated_90_cw(&self, dst: Rect) -> [NineSlicePatch; 9] {
        let r = &self.render;
        // dst x walks the image from bottom to top
        let xs = axis_edges(
            dst.left,
            dst.right,
            r.trim_margin.bottom,
            r.trimmed_nine_slice.bottom,
            r.trimmed_nine_slice.top,
            r.trim_margin.top,
        );
        // dst y walks the image from left to right
        let ys = axis_edges(
            dst.top,
            dst.bottom,
            r.trim_margin.left,
            r.trimmed_nine_slice.left,
            r.trimmed_nine_slice.right,
            r.trim_margin.right,
        );
        let us = r.texture_area.xs();
        let vs = r.texture_area.ys();

        core::array::from_fn(|i| {
            let (row, col) = (i / 3, i % 3);
            // image cell: column = dst row, row = mirrored dst column
            let (u0, u1) = (us[row], us[row + 1]);
            let (v_top, v_bottom) = (vs[2 - col], vs[3 - col]);
            NineSlicePatch {
                index: ((2 - col) * 3 + row) as u8,
                dst: Rect::from_ltrb(xs[col], ys[row], xs[col + 1], ys[row + 1]),
                uv: NativeQuadTextureCoords {
                    top_left: [u0, v_bottom],
                    top_right: [u0, v_top],
                    bottom_left: [u1, v_bottom],
                    bottom_right: [u1, v_top],
                },
            }
        })
    }

    /// Area available for content inside `dst`.
    pub fn content_rect(&self, dst: Rect) -> Rect {
        let m = self.render.content_margin;
        let inner = Rect::from_ltrb(
            dst.left + m.left as f32,
            dst.top + m.top as f32,
            dst.right - m.right as f32,
            dst.bottom - m.bottom as f32,
        );
        if inner.right < inner.left || inner.bottom < inner.top {
            Rect::from_origin_size(dst.origin(), Vec2::zero())
        } else {
            inner
        }
    }
}

/// One of the nine quads of a nine-slice draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NineSlicePatch {
    /// Source patch index in the image (row major, 0..9).
    pub index: u8,
    pub dst: Rect,
    pub uv: NativeQuadTextureCoords,
}

impl NineSlicePatch {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dst.is_empty()
    }
}

/// Four edges along one axis: outer trim, border, border, outer trim.
///
/// When `start..end` is shorter than the fixed parts, they shrink
/// proportionally and the stretch part collapses.
fn axis_edges(start: f32, end: f32, trim_a: f32, slice_a: f32, slice_b: f32, trim_b: f32) -> [f32; 4] {
    let len = (end - start).max(0.0);
    let fixed = trim_a + slice_a + slice_b + trim_b;
    let f = if fixed > len && fixed > 0.0 { len / fixed } else { 1.0 };

    let p0 = start + trim_a * f;
    let p1 = p0 + slice_a * f;
    let p3 = end - trim_b * f;
    let p2 = (p3 - slice_b * f).max(p1);
    [p0, p1, p2, p3]
}

// ── optimized ─────────────────────────────────────────────────────────────

/// Bit per patch (row major); a set bit marks a patch with transparent pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct NineSliceTransparency(pub u16);

impl NineSliceTransparency {
    pub const ALL_OPAQUE: NineSliceTransparency = NineSliceTransparency(0);
    pub const ALL_TRANSPARENT: NineSliceTransparency = NineSliceTransparency(0x01FF);
    /// Typical rounded frame: corners and edges blend, center is solid.
    pub const OPAQUE_CENTER: NineSliceTransparency = NineSliceTransparency(0x01FF & !(1 << 4));

    #[inline]
    pub fn is_transparent(self, patch: u8) -> bool {
        debug_assert!(patch < 9);
        self.0 & (1 << patch) != 0
    }
}

/// Nine-slice with an opaque material for the patches that need no blending.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedNineSliceSpriteInfo {
    pub info: NineSliceSpriteInfo,
    pub opaque_material: SpriteMaterialInfo,
    pub transparency: NineSliceTransparency,
}

impl OptimizedNineSliceSpriteInfo {
    /// Fails if `opaque_material` samples a different texture or blends.
    pub fn new(
        info: NineSliceSpriteInfo,
        opaque_material: SpriteMaterialInfo,
        transparency: NineSliceTransparency,
    ) -> Result<Self> {
        if !opaque_material.shares_texture_with(&info.material) {
            return Err(Error::invalid_argument(
                "opaque material must sample the nine-slice texture",
            ));
        }
        if !opaque_material.is_opaque() {
            return Err(Error::invalid_argument("opaque material must use BlendState::Opaque"));
        }
        if opaque_material.texture_origin() != info.material.texture_origin() {
            return Err(Error::invalid_argument("materials disagree on texture origin"));
        }
        Ok(Self { info, opaque_material, transparency })
    }

    pub fn material_for_patch(&self, patch: u8) -> &SpriteMaterialInfo {
        if self.transparency.is_transparent(patch) {
            &self.info.material
        } else {
            &self.opaque_material
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::sprite::{BlendState, NativeTextureHandle, NativeTextureInfo, SpriteMaterialId, TextureOrigin};

    fn material(blend: BlendState) -> SpriteMaterialInfo {
        let tex = NativeTextureInfo::new(NativeTextureHandle(3), PxExtent2D::new(100, 60));
        SpriteMaterialInfo::new(SpriteMaterialId(9), tex, blend, TextureOrigin::TopLeft).unwrap()
    }

    fn build(trim: PxThicknessU, trimmed: PxRectangle, border: PxThicknessU) -> Result<NineSliceSpriteInfo> {
        NineSliceSpriteInfo::new(
            material(BlendState::AlphaBlend),
            trim,
            trimmed,
            border,
            PxThicknessU::default(),
            160,
            &DensityConverter::default(),
        )
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn untrimmed_border_is_unchanged() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        assert_eq!(ns.extent, PxExtent2D::new(100, 60));
        assert_eq!(ns.trimmed_nine_slice, PxThicknessU::uniform(10));
        assert_eq!(ns.stretch_rect(), PxRectangle::create(10, 10, 80, 40));
    }

    #[test]
    fn trimmed_border_is_rebased() {
        let ns = build(
            PxThicknessU::new(2, 1, 3, 4),
            PxRectangle::create(0, 0, 95, 55),
            PxThicknessU::new(10, 10, 10, 10),
        )
        .unwrap();
        assert_eq!(ns.trimmed_nine_slice, PxThicknessU::new(8, 9, 7, 6));
        assert_eq!(ns.extent, PxExtent2D::new(100, 60));
    }

    #[test]
    fn border_equal_to_trim_gives_zero() {
        let ns = build(
            PxThicknessU::new(5, 0, 0, 0),
            PxRectangle::create(0, 0, 95, 60),
            PxThicknessU::new(5, 10, 10, 10),
        )
        .unwrap();
        assert_eq!(ns.trimmed_nine_slice.left, 0);
    }

    #[test]
    fn border_thinner_than_trim_is_rejected() {
        for trim in [
            PxThicknessU::new(6, 0, 0, 0),
            PxThicknessU::new(0, 6, 0, 0),
            PxThicknessU::new(0, 0, 6, 0),
            PxThicknessU::new(0, 0, 0, 6),
        ] {
            let err = build(trim, PxRectangle::create(0, 0, 90, 50), PxThicknessU::uniform(5)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn border_wider_than_image_is_rejected() {
        let err = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::new(60, 0, 41, 0),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn texture_area_brackets_inner_rect() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        let ta = ns.render.texture_area;
        assert_eq!((ta.x0, ta.x3, ta.y0, ta.y3), (0.0, 1.0, 0.0, 1.0));
        assert!(approx(ta.x1, 0.1) && approx(ta.x2, 0.9));
        assert!(approx(ta.y1, 10.0 / 60.0) && approx(ta.y2, 50.0 / 60.0));
    }

    // ── patches ───────────────────────────────────────────────────────────

    #[test]
    fn patches_keep_corners_fixed() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        let p = ns.patches(Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(p[0].dst, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(p[4].dst, Rect::new(10.0, 10.0, 280.0, 180.0));
        assert_eq!(p[8].dst, Rect::new(290.0, 190.0, 10.0, 10.0));
        assert_eq!(p[8].uv.bottom_right, [1.0, 1.0]);
    }

    #[test]
    fn patches_shrink_borders_when_too_small() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        let p = ns.patches(Rect::new(0.0, 0.0, 10.0, 60.0));
        assert_eq!(p[3].dst.width(), 5.0);
        assert!(p[4].is_empty());
        assert_eq!(p[5].dst.width(), 5.0);
    }

    #[test]
    fn rotated_patches_swap_axes() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::new(10, 20, 10, 20),
        )
        .unwrap();
        // image 100x60 turned clockwise is 60x100
        let p = ns.patches_rotated_90_cw(Rect::new(0.0, 0.0, 60.0, 100.0));
        // top-left dst patch shows the image's bottom-left patch
        assert_eq!(p[0].index, 6);
        assert_eq!(p[0].dst, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(p[0].uv.top_left, [0.0, 1.0]);
        assert_eq!(p[2].index, 0);
        assert_eq!(p[2].uv.top_right, [0.0, 0.0]);
    }

    #[test]
    fn content_rect_applies_margin() {
        let ns = NineSliceSpriteInfo::new(
            material(BlendState::AlphaBlend),
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
            PxThicknessU::new(4, 3, 2, 1),
            160,
            &DensityConverter::default(),
        )
        .unwrap();
        let c = ns.content_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(c, Rect::from_ltrb(4.0, 3.0, 48.0, 49.0));
    }

    // ── optimized ─────────────────────────────────────────────────────────

    #[test]
    fn optimized_picks_opaque_center() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        let o = OptimizedNineSliceSpriteInfo::new(
            ns,
            material(BlendState::Opaque),
            NineSliceTransparency::OPAQUE_CENTER,
        )
        .unwrap();
        assert!(o.material_for_patch(4).is_opaque());
        assert!(!o.material_for_patch(0).is_opaque());
    }

    #[test]
    fn optimized_rejects_blending_opaque_material() {
        let ns = build(
            PxThicknessU::default(),
            PxRectangle::create(0, 0, 100, 60),
            PxThicknessU::uniform(10),
        )
        .unwrap();
        let err = OptimizedNineSliceSpriteInfo::new(
            ns,
            material(BlendState::AlphaBlend),
            NineSliceTransparency::OPAQUE_CENTER,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
