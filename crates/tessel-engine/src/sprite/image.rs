use crate::coords::{
    DensityConverter, DpExtent2D, PxExtent2D, PxRectangle, PxSize2D, PxSize2DF, PxThicknessF,
    PxThicknessU, Rect, Vec2,
};
use crate::error::Result;

use super::material::SpriteMaterialInfo;
use super::texture_area::NativeTextureArea;

/// Image sprite scaled for the display density.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageRenderInfo {
    /// Full (untrimmed) size in display pixels.
    pub size: PxSize2D,
    pub trim_margin: PxThicknessF,
    pub trimmed_size: PxSize2DF,
    pub texture_area: NativeTextureArea,
}

/// A single (possibly trimmed) atlas image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpriteInfo {
    pub material: SpriteMaterialInfo,
    pub image_dpi: u32,
    /// Full image size before trimming.
    pub extent: PxExtent2D,
    pub dp_extent: DpExtent2D,
    pub trim_margin: PxThicknessU,
    /// Where the trimmed pixels live in the texture.
    pub trimmed_rect: PxRectangle,
    pub render: ImageRenderInfo,
}

impl ImageSpriteInfo {
    /// Fails if the trimmed rectangle does not fit in the material texture or
    /// `image_dpi` is zero.
    pub fn new(
        material: SpriteMaterialInfo,
        trim_margin: PxThicknessU,
        trimmed_rect: PxRectangle,
        image_dpi: u32,
        converter: &DensityConverter,
    ) -> Result<Self> {
        let extent = trim_margin.sum() + trimmed_rect.extent();
        let texture_area = material.calc_texture_area(trimmed_rect)?;
        let dp_extent = DensityConverter::image_dp_extent(extent, image_dpi)?;
        let scaled =
            converter.scaled_trimmed_image(extent, trim_margin, trimmed_rect.extent(), image_dpi)?;

        Ok(Self {
            material,
            image_dpi,
            extent,
            dp_extent,
            trim_margin,
            trimmed_rect,
            render: ImageRenderInfo {
                size: scaled.size,
                trim_margin: scaled.trim_margin,
                trimmed_size: scaled.trimmed_size,
                texture_area,
            },
        })
    }

    /// Untrimmed image covering the whole texture.
    pub fn full_texture(material: SpriteMaterialInfo, image_dpi: u32, converter: &DensityConverter) -> Result<Self> {
        let rect = PxRectangle::from_extent(Default::default(), material.texture.extent);
        Self::new(material, PxThicknessU::default(), rect, image_dpi, converter)
    }

    /// Where the trimmed pixels land when the full image is stretched to `dst`.
    pub fn trimmed_dst(&self, dst: Rect) -> Rect {
        let full = Vec2::from(self.render.size);
        let sx = if full.x > 0.0 { dst.width() / full.x } else { 0.0 };
        let sy = if full.y > 0.0 { dst.height() / full.y } else { 0.0 };
        let tm = self.render.trim_margin;
        Rect::from_ltrb(
            dst.left + tm.left * sx,
            dst.top + tm.top * sy,
            dst.right - tm.right * sx,
            dst.bottom - tm.bottom * sy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{BlendState, NativeTextureHandle, NativeTextureInfo, SpriteMaterialId, TextureOrigin};

    fn material() -> SpriteMaterialInfo {
        let tex = NativeTextureInfo::new(NativeTextureHandle(1), PxExtent2D::new(256, 256));
        SpriteMaterialInfo::new(SpriteMaterialId(0), tex, BlendState::AlphaBlend, TextureOrigin::TopLeft).unwrap()
    }

    #[test]
    fn trimmed_image_restores_full_extent() {
        let img = ImageSpriteInfo::new(
            material(),
            PxThicknessU::new(2, 3, 4, 5),
            PxRectangle::create(0, 0, 64, 64),
            160,
            &DensityConverter::default(),
        )
        .unwrap();
        assert_eq!(img.extent, PxExtent2D::new(70, 72));
        assert_eq!(img.render.texture_area, NativeTextureArea::new(0.0, 0.0, 0.25, 0.25));
        assert_eq!(img.render.size, PxSize2D::create(70, 72));
    }

    #[test]
    fn trimmed_dst_insets_by_trim() {
        let img = ImageSpriteInfo::new(
            material(),
            PxThicknessU::new(2, 0, 2, 0),
            PxRectangle::create(0, 0, 16, 20),
            160,
            &DensityConverter::default(),
        )
        .unwrap();
        // Drawn at natural size
        let d = img.trimmed_dst(Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(d, Rect::from_ltrb(12.0, 10.0, 28.0, 30.0));
    }

    #[test]
    fn out_of_texture_rect_fails() {
        let r = ImageSpriteInfo::new(
            material(),
            PxThicknessU::default(),
            PxRectangle::create(250, 0, 16, 16),
            160,
            &DensityConverter::default(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn zero_image_dpi_fails() {
        let r = ImageSpriteInfo::full_texture(material(), 0, &DensityConverter::default());
        assert!(r.is_err());
    }
}
