use crate::coords::{PxSize2D, Rect, Vec2};
use crate::error::{Error, Result};
use crate::sprite::{NativeTextureArea, SpriteMaterialInfo};

use super::bitmap_font::{BitmapFont, GlyphPosition, TextLayoutOptions};

/// A glyph ready for the batch: destination and texture area.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub dst: Rect,
    pub uv: NativeTextureArea,
}

/// Bitmap font bound to the material holding its glyph texture.
///
/// Glyph texture areas are computed once at construction.
#[derive(Debug, Clone)]
pub struct SpriteFont {
    material: SpriteMaterialInfo,
    font: BitmapFont,
    glyph_areas: Vec<NativeTextureArea>,
    options: TextLayoutOptions,
}

impl SpriteFont {
    pub fn new(material: SpriteMaterialInfo, font: BitmapFont, options: TextLayoutOptions) -> Result<Self> {
        if font.texture_extent() != material.texture.extent {
            return Err(Error::invalid_argument(format!(
                "font '{}' expects a {:?} texture but the material has {:?}",
                font.name(),
                font.texture_extent(),
                material.texture.extent
            )));
        }
        let glyph_areas = font
            .chars()
            .iter()
            .map(|c| material.calc_texture_area(c.src_rect))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { material, font, glyph_areas, options })
    }

    #[inline]
    pub fn material(&self) -> &SpriteMaterialInfo {
        &self.material
    }

    #[inline]
    pub fn font(&self) -> &BitmapFont {
        &self.font
    }

    #[inline]
    pub fn options(&self) -> TextLayoutOptions {
        self.options
    }

    pub fn measure(&self, text: &str) -> PxSize2D {
        self.font.measure(text, self.options)
    }

    /// Screen area `text` covers when drawn with its origin at `origin`.
    pub fn bounds(&self, text: &str, origin: Vec2) -> Rect {
        Rect::from(self.font.bounds(text, self.options)).translated(origin)
    }

    /// Appends one quad per visible glyph, offset by `origin`.
    pub fn append_quads(&self, text: &str, origin: Vec2, scratch: &mut Vec<GlyphPosition>, out: &mut Vec<GlyphQuad>) {
        self.font.layout(text, self.options, scratch);
        out.extend(scratch.iter().map(|g| GlyphQuad {
            dst: Rect::from(g.dst).translated(origin),
            uv: self.glyph_areas[g.char_index],
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PxExtent2D;
    use crate::sprite::{BlendState, NativeTextureHandle, NativeTextureInfo, SpriteMaterialId, TextureOrigin};
    use crate::text::test_font;

    fn material(extent: PxExtent2D) -> SpriteMaterialInfo {
        let tex = NativeTextureInfo::new(NativeTextureHandle(4), extent);
        SpriteMaterialInfo::new(SpriteMaterialId(2), tex, BlendState::AlphaBlend, TextureOrigin::TopLeft).unwrap()
    }

    #[test]
    fn texture_mismatch_is_rejected() {
        let r = SpriteFont::new(material(PxExtent2D::new(32, 32)), test_font(), TextLayoutOptions::default());
        assert!(r.is_err());
    }

    #[test]
    fn quads_are_offset_by_origin() {
        let f = SpriteFont::new(material(PxExtent2D::new(64, 16)), test_font(), TextLayoutOptions::default()).unwrap();
        let mut scratch = Vec::new();
        let mut quads = Vec::new();
        f.append_quads("A", Vec2::new(100.0, 50.0), &mut scratch, &mut quads);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].dst, Rect::new(101.0, 52.0, 8.0, 10.0));
        assert_eq!(quads[0].uv, NativeTextureArea::new(0.0, 0.0, 0.125, 0.625));
    }

    #[test]
    fn bounds_match_appended_quads() {
        let f = SpriteFont::new(material(PxExtent2D::new(64, 16)), test_font(), TextLayoutOptions::default()).unwrap();
        assert_eq!(f.bounds("AV", Vec2::new(100.0, 50.0)), Rect::from_ltrb(101.0, 52.0, 117.0, 62.0));
    }
}
