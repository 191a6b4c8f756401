use crate::error::{Error, Result};

use super::dp::{DpExtent2D, DpPoint2, DpThicknessU, DpValue};
use super::px::{PxExtent2D, PxPoint2, PxSize2D, PxSize2DF, PxThicknessF, PxThicknessU, PxValue};

/// Reference density: one dp equals one px at this dpi.
pub const BASE_DPI: u32 = 160;

/// Converts between dp and px for one display density, and scales sprite
/// pixel data authored at an image dpi to the display density.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DensityConverter {
    density_dpi: u32,
    scale_dp_to_px: f32,
    scale_px_to_dp: f32,
}

/// Trimmed image rescaled to the display density.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScaledTrimmedImage {
    /// Full (untrimmed) size after rounding.
    pub size: PxSize2D,
    pub trim_margin: PxThicknessF,
    pub trimmed_size: PxSize2DF,
}

/// Trimmed nine-slice rescaled to the display density.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScaledTrimmedNineSlice {
    /// Full (untrimmed) size after rounding.
    pub size: PxSize2D,
    pub trim_margin: PxThicknessF,
    pub trimmed_nine_slice: PxThicknessF,
    pub content_margin: PxThicknessU,
}

impl DensityConverter {
    pub fn new(density_dpi: u32) -> Result<Self> {
        if density_dpi == 0 {
            return Err(Error::invalid_argument("density dpi can not be zero"));
        }
        Ok(Self {
            density_dpi,
            scale_dp_to_px: density_dpi as f32 / BASE_DPI as f32,
            scale_px_to_dp: BASE_DPI as f32 / density_dpi as f32,
        })
    }

    #[inline]
    pub fn density_dpi(&self) -> u32 {
        self.density_dpi
    }

    #[inline]
    pub fn dp_to_px_scale(&self) -> f32 {
        self.scale_dp_to_px
    }

    // ── dp <-> px ─────────────────────────────────────────────────────────

    #[inline]
    pub fn to_px_value(&self, v: DpValue) -> PxValue {
        PxValue(round_i32(v.0 as f32 * self.scale_dp_to_px))
    }

    #[inline]
    pub fn to_dp_value(&self, v: PxValue) -> DpValue {
        DpValue(round_i32(v.0 as f32 * self.scale_px_to_dp))
    }

    pub fn to_px_point(&self, p: DpPoint2) -> PxPoint2 {
        PxPoint2::new(
            round_i32(p.x as f32 * self.scale_dp_to_px),
            round_i32(p.y as f32 * self.scale_dp_to_px),
        )
    }

    pub fn to_px_extent(&self, e: DpExtent2D) -> PxExtent2D {
        PxExtent2D::new(
            round_u32(e.width as f32 * self.scale_dp_to_px),
            round_u32(e.height as f32 * self.scale_dp_to_px),
        )
    }

    pub fn to_dp_extent(&self, e: PxExtent2D) -> DpExtent2D {
        DpExtent2D::new(
            round_u32(e.width as f32 * self.scale_px_to_dp),
            round_u32(e.height as f32 * self.scale_px_to_dp),
        )
    }

    pub fn to_px_thickness(&self, t: DpThicknessU) -> PxThicknessU {
        let s = self.scale_dp_to_px;
        PxThicknessU::new(
            round_u32(t.left as f32 * s),
            round_u32(t.top as f32 * s),
            round_u32(t.right as f32 * s),
            round_u32(t.bottom as f32 * s),
        )
    }

    // ── image dpi scaling ─────────────────────────────────────────────────

    /// Scale applied to pixel data authored at `image_dpi`.
    pub fn image_density_scale(&self, image_dpi: u32) -> Result<f32> {
        if image_dpi == 0 {
            return Err(Error::invalid_argument("image dpi can not be zero"));
        }
        Ok(self.density_dpi as f32 / image_dpi as f32)
    }

    pub fn scaled_px_size(&self, extent: PxExtent2D, image_dpi: u32) -> Result<PxSize2D> {
        let scale = self.image_density_scale(image_dpi)?;
        Ok(PxSize2D::create(
            round_i32(extent.width as f32 * scale),
            round_i32(extent.height as f32 * scale),
        ))
    }

    pub fn scaled_px_thickness(&self, t: PxThicknessU, image_dpi: u32) -> Result<PxThicknessU> {
        let scale = self.image_density_scale(image_dpi)?;
        Ok(PxThicknessU::new(
            round_u32(t.left as f32 * scale),
            round_u32(t.top as f32 * scale),
            round_u32(t.right as f32 * scale),
            round_u32(t.bottom as f32 * scale),
        ))
    }

    /// Rescales a trimmed image so trim and trimmed size add up to the rounded full size.
    pub fn scaled_trimmed_image(
        &self,
        extent: PxExtent2D,
        trim_margin: PxThicknessU,
        trimmed_extent: PxExtent2D,
        image_dpi: u32,
    ) -> Result<ScaledTrimmedImage> {
        debug_assert_eq!(extent, trim_margin.sum() + trimmed_extent);
        let size = self.scaled_px_size(extent, image_dpi)?;
        if extent == trimmed_extent {
            return Ok(ScaledTrimmedImage {
                size,
                trim_margin: PxThicknessF::default(),
                trimmed_size: PxSize2DF::from(size),
            });
        }

        let (sx, sy) = final_axis_scale(extent, size);
        Ok(ScaledTrimmedImage {
            size,
            trim_margin: scale_thickness(trim_margin, sx, sy),
            trimmed_size: PxSize2DF::new(
                trimmed_extent.width as f32 * sx,
                trimmed_extent.height as f32 * sy,
            ),
        })
    }

    /// Rescales nine-slice render data; the content margin is rounded to whole pixels.
    pub fn scaled_trimmed_nine_slice(
        &self,
        extent: PxExtent2D,
        trim_margin: PxThicknessU,
        trimmed_nine_slice: PxThicknessU,
        content_margin: PxThicknessU,
        image_dpi: u32,
    ) -> Result<ScaledTrimmedNineSlice> {
        let size = self.scaled_px_size(extent, image_dpi)?;
        let (sx, sy) = final_axis_scale(extent, size);
        Ok(ScaledTrimmedNineSlice {
            size,
            trim_margin: scale_thickness(trim_margin, sx, sy),
            trimmed_nine_slice: scale_thickness(trimmed_nine_slice, sx, sy),
            content_margin: PxThicknessU::new(
                round_u32(content_margin.left as f32 * sx),
                round_u32(content_margin.top as f32 * sy),
                round_u32(content_margin.right as f32 * sx),
                round_u32(content_margin.bottom as f32 * sy),
            ),
        })
    }

    /// Size of an image in dp, independent of the display density.
    pub fn image_dp_extent(extent: PxExtent2D, image_dpi: u32) -> Result<DpExtent2D> {
        if image_dpi == 0 {
            return Err(Error::invalid_argument("image dpi can not be zero"));
        }
        if image_dpi == BASE_DPI {
            return Ok(DpExtent2D::new(extent.width, extent.height));
        }
        let s = BASE_DPI as f32 / image_dpi as f32;
        Ok(DpExtent2D::new(
            round_u32(extent.width as f32 * s),
            round_u32(extent.height as f32 * s),
        ))
    }
}

impl Default for DensityConverter {
    fn default() -> Self {
        Self {
            density_dpi: BASE_DPI,
            scale_dp_to_px: 1.0,
            scale_px_to_dp: 1.0,
        }
    }
}

/// Scale actually applied per axis once the full size was rounded.
fn final_axis_scale(extent: PxExtent2D, rounded: PxSize2D) -> (f32, f32) {
    let axis = |src: u32, dst: i32| {
        if src == 0 { 0.0 } else { dst as f32 / src as f32 }
    };
    (axis(extent.width, rounded.width()), axis(extent.height, rounded.height()))
}

fn scale_thickness(t: PxThicknessU, sx: f32, sy: f32) -> PxThicknessF {
    PxThicknessF::new(
        t.left as f32 * sx,
        t.top as f32 * sy,
        t.right as f32 * sx,
        t.bottom as f32 * sy,
    )
}

#[inline]
fn round_i32(v: f32) -> i32 {
    v.round() as i32
}

#[inline]
fn round_u32(v: f32) -> u32 {
    debug_assert!(v >= 0.0);
    v.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zero_density_is_rejected() {
        let err = DensityConverter::new(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn base_density_is_identity() {
        let c = DensityConverter::new(BASE_DPI).unwrap();
        assert_eq!(c.to_px_value(DpValue(17)), PxValue(17));
        assert_eq!(c.to_px_extent(DpExtent2D::new(3, 9)), PxExtent2D::new(3, 9));
    }

    // ── dp <-> px ─────────────────────────────────────────────────────────

    #[test]
    fn double_density_doubles() {
        let c = DensityConverter::new(320).unwrap();
        assert_eq!(c.to_px_value(DpValue(10)), PxValue(20));
        assert_eq!(c.to_dp_value(PxValue(20)), DpValue(10));
        assert_eq!(c.to_px_point(DpPoint2::new(-3, 4)), PxPoint2::new(-6, 8));
    }

    #[test]
    fn fractional_density_rounds_to_nearest() {
        // 240 dpi => 1.5x
        let c = DensityConverter::new(240).unwrap();
        assert_eq!(c.to_px_value(DpValue(3)), PxValue(5)); // 4.5 rounds away from zero
        assert_eq!(c.to_px_extent(DpExtent2D::new(1, 2)), PxExtent2D::new(2, 3));
    }

    // ── image scaling ─────────────────────────────────────────────────────

    #[test]
    fn image_dpi_zero_is_rejected() {
        let c = DensityConverter::default();
        assert!(c.scaled_px_size(PxExtent2D::new(4, 4), 0).is_err());
        assert!(DensityConverter::image_dp_extent(PxExtent2D::new(4, 4), 0).is_err());
    }

    #[test]
    fn image_authored_at_double_density_halves_on_base_display() {
        let c = DensityConverter::default();
        let s = c.scaled_px_size(PxExtent2D::new(64, 32), 320).unwrap();
        assert_eq!(s, PxSize2D::create(32, 16));
        assert_eq!(
            DensityConverter::image_dp_extent(PxExtent2D::new(64, 32), 320).unwrap(),
            DpExtent2D::new(32, 16)
        );
    }

    #[test]
    fn trimmed_image_without_trim_keeps_full_size() {
        let c = DensityConverter::default();
        let ext = PxExtent2D::new(10, 10);
        let r = c.scaled_trimmed_image(ext, PxThicknessU::default(), ext, 160).unwrap();
        assert_eq!(r.size, PxSize2D::create(10, 10));
        assert_eq!(r.trim_margin, PxThicknessF::default());
        assert_eq!(r.trimmed_size, PxSize2DF::new(10.0, 10.0));
    }

    #[test]
    fn trimmed_nine_slice_parts_sum_to_rounded_size() {
        let c = DensityConverter::new(240).unwrap();
        let ext = PxExtent2D::new(21, 21);
        let trim = PxThicknessU::new(1, 1, 1, 1);
        let r = c
            .scaled_trimmed_nine_slice(ext, trim, PxThicknessU::uniform(4), PxThicknessU::uniform(3), 160)
            .unwrap();
        // 21 * 1.5 = 31.5 -> 32
        assert_eq!(r.size, PxSize2D::create(32, 32));
        let trimmed_w = (ext.width - trim.sum_x()) as f32 * (32.0 / 21.0);
        let total = r.trim_margin.sum_x() + trimmed_w;
        assert!((total - 32.0).abs() < 1e-4);
        assert_eq!(r.content_margin, PxThicknessU::uniform(5));
    }
}
