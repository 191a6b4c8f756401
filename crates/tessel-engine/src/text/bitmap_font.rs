use std::collections::HashMap;

use crate::coords::{PxExtent2D, PxPoint2, PxRectangle, PxSize2D};
use crate::error::{Error, Result};

/// One glyph of a bitmap font.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BitmapFontChar {
    pub id: u32,
    /// Glyph pixels inside the font texture.
    pub src_rect: PxRectangle,
    /// Offset from the pen position (x) and line top (y) to the glyph's top-left.
    pub offset: PxPoint2,
    pub x_advance: i32,
}

impl BitmapFontChar {
    #[inline]
    pub fn has_pixels(&self) -> bool {
        !self.src_rect.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BitmapFontKerning {
    pub first: u32,
    pub second: u32,
    pub amount: i32,
}

/// A laid out glyph: destination relative to the text origin, and its atlas source.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GlyphPosition {
    pub dst: PxRectangle,
    pub src: PxRectangle,
    /// Index into [`BitmapFont::chars`].
    pub char_index: usize,
}

/// Layout options for measuring and placing text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextLayoutOptions {
    pub scale: f32,
    pub kerning: bool,
}

impl Default for TextLayoutOptions {
    fn default() -> Self {
        Self { scale: 1.0, kerning: true }
    }
}

/// Parsed bitmap font.
///
/// Loading the font file is out of scope; this type receives already parsed data.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    name: String,
    size_px: u16,
    line_spacing_px: u16,
    base_line_px: u16,
    texture_extent: PxExtent2D,
    chars: Vec<BitmapFontChar>,
    kernings: Vec<BitmapFontKerning>,
    char_lookup: HashMap<u32, usize>,
    kerning_lookup: HashMap<(u32, u32), i32>,
    /// Used for characters the font does not contain.
    fallback: Option<usize>,
}

impl BitmapFont {
    pub const FALLBACK_CHAR: u32 = '?' as u32;

    pub fn new(
        name: impl Into<String>,
        size_px: u16,
        line_spacing_px: u16,
        base_line_px: u16,
        texture_extent: PxExtent2D,
        chars: Vec<BitmapFontChar>,
        kernings: Vec<BitmapFontKerning>,
    ) -> Result<Self> {
        let name = name.into();
        let bounds = PxRectangle::from_extent(PxPoint2::default(), texture_extent);

        let mut char_lookup = HashMap::with_capacity(chars.len());
        for (i, c) in chars.iter().enumerate() {
            if c.has_pixels() && !bounds.contains_rect(c.src_rect) {
                return Err(Error::invalid_argument(format!(
                    "font '{name}': glyph {} is outside the {}x{} texture",
                    c.id, texture_extent.width, texture_extent.height
                )));
            }
            if char_lookup.insert(c.id, i).is_some() {
                return Err(Error::invalid_argument(format!(
                    "font '{name}': duplicate glyph {}",
                    c.id
                )));
            }
        }

        let kerning_lookup = kernings
            .iter()
            .map(|k| ((k.first, k.second), k.amount))
            .collect();
        let fallback = char_lookup.get(&Self::FALLBACK_CHAR).copied();

        Ok(Self {
            name,
            size_px,
            line_spacing_px,
            base_line_px,
            texture_extent,
            chars,
            kernings,
            char_lookup,
            kerning_lookup,
            fallback,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_px(&self) -> u16 {
        self.size_px
    }

    pub fn line_spacing_px(&self) -> u16 {
        self.line_spacing_px
    }

    pub fn base_line_px(&self) -> u16 {
        self.base_line_px
    }

    pub fn texture_extent(&self) -> PxExtent2D {
        self.texture_extent
    }

    pub fn chars(&self) -> &[BitmapFontChar] {
        &self.chars
    }

    pub fn kernings(&self) -> &[BitmapFontKerning] {
        &self.kernings
    }

    /// Glyph index for `ch`, falling back to `'?'`, or `None` if neither exists.
    pub fn char_index(&self, ch: char) -> Option<usize> {
        self.char_lookup.get(&(ch as u32)).copied().or(self.fallback)
    }

    pub fn kerning(&self, first: u32, second: u32) -> i32 {
        self.kerning_lookup.get(&(first, second)).copied().unwrap_or(0)
    }

    /// Places every glyph of `text` relative to the text origin.
    ///
    /// Characters without a glyph (and no fallback) advance nothing and emit nothing.
    /// `out` is cleared first.
    pub fn layout(&self, text: &str, options: TextLayoutOptions, out: &mut Vec<GlyphPosition>) {
        out.clear();
        let scale = options.scale;
        if text.is_empty() || scale <= 0.0 {
            return;
        }

        let base_line = self.base_line_px as i32;
        let scaled_base_line = (base_line as f32 * scale).round();
        let mut pen_x = 0.0f32;
        let mut previous = 0u32;

        for ch in text.chars() {
            let Some(index) = self.char_index(ch) else { continue };
            let info = &self.chars[index];
            let code = ch as u32;

            if options.kerning {
                pen_x += self.kerning(previous, code) as f32 * scale;
            }

            // Measure from the baseline so rounding stays stable across scales.
            let glyph_w = info.src_rect.width();
            let glyph_h = info.src_rect.height();
            let y1 = (scaled_base_line + (info.offset.y + glyph_h - base_line) as f32 * scale).round() as i32;
            let mut y0 = (scaled_base_line + (info.offset.y - base_line) as f32 * scale).round() as i32;
            let x0 = (pen_x + info.offset.x as f32 * scale).round() as i32;
            let mut x1 = (pen_x + (info.offset.x + glyph_w) as f32 * scale).round() as i32;
            if x0 >= x1 && glyph_w > 0 {
                x1 = x0 + 1;
            }
            if y0 >= y1 && glyph_h > 0 {
                y0 = y1 - 1;
            }

            if info.has_pixels() {
                out.push(GlyphPosition {
                    dst: PxRectangle::from_ltrb(x0, y0, x1, y1),
                    src: info.src_rect,
                    char_index: index,
                });
            }

            pen_x += info.x_advance as f32 * scale;
            previous = code;
        }
    }

    /// Size of the rendered pixels of `text`, measured from the text origin.
    pub fn measure(&self, text: &str, options: TextLayoutOptions) -> PxSize2D {
        let mut glyphs = Vec::with_capacity(text.len());
        self.layout(text, options, &mut glyphs);
        let right = glyphs.iter().map(|g| g.dst.right()).max().unwrap_or(0);
        let bottom = glyphs.iter().map(|g| g.dst.bottom()).max().unwrap_or(0);
        PxSize2D::create(right, bottom)
    }

    /// Bounding box of the rendered pixels of `text`, relative to the text origin.
    ///
    /// Glyph offsets and kerning can put pixels left of or above the origin.
    /// Text without visible glyphs yields an empty rectangle at the origin.
    pub fn bounds(&self, text: &str, options: TextLayoutOptions) -> PxRectangle {
        let mut glyphs = Vec::with_capacity(text.len());
        self.layout(text, options, &mut glyphs);
        let Some(first) = glyphs.first() else { return PxRectangle::default() };
        let start = (first.dst.left(), first.dst.top(), first.dst.right(), first.dst.bottom());
        let (l, t, r, b) = glyphs.iter().fold(start, |(l, t, r, b), g| {
            (l.min(g.dst.left()), t.min(g.dst.top()), r.max(g.dst.right()), b.max(g.dst.bottom()))
        });
        PxRectangle::from_ltrb(l, t, r, b)
    }

    /// Number of glyph quads `text` needs.
    pub fn glyph_count(&self, text: &str) -> usize {
        text.chars()
            .filter_map(|c| self.char_index(c))
            .filter(|&i| self.chars[i].has_pixels())
            .count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Three glyph monospace-ish test font in a 64x16 texture.
    pub(crate) fn test_font() -> BitmapFont {
        let c = |id: char, x: i32, w: i32, adv: i32| BitmapFontChar {
            id: id as u32,
            src_rect: PxRectangle::create(x, 0, w, 10),
            offset: PxPoint2::new(1, 2),
            x_advance: adv,
        };
        BitmapFont::new(
            "test",
            12,
            14,
            10,
            PxExtent2D::new(64, 16),
            vec![
                c('A', 0, 8, 10),
                c('V', 8, 8, 10),
                c('?', 16, 6, 8),
                BitmapFontChar { id: ' ' as u32, x_advance: 5, ..Default::default() },
            ],
            vec![BitmapFontKerning { first: 'A' as u32, second: 'V' as u32, amount: -2 }],
        )
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn duplicate_glyph_is_rejected() {
        let g = BitmapFontChar { id: 1, ..Default::default() };
        let err = BitmapFont::new("f", 1, 1, 1, PxExtent2D::new(1, 1), vec![g, g], vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn glyph_outside_texture_is_rejected() {
        let g = BitmapFontChar { id: 1, src_rect: PxRectangle::create(0, 0, 9, 9), ..Default::default() };
        assert!(BitmapFont::new("f", 1, 1, 1, PxExtent2D::new(8, 8), vec![g], vec![]).is_err());
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn layout_advances_pen() {
        let f = test_font();
        let mut out = Vec::new();
        f.layout("AA", TextLayoutOptions { kerning: false, ..Default::default() }, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].dst, PxRectangle::create(1, 2, 8, 10));
        assert_eq!(out[1].dst, PxRectangle::create(11, 2, 8, 10));
    }

    #[test]
    fn kerning_pulls_pair_together() {
        let f = test_font();
        let mut out = Vec::new();
        f.layout("AV", TextLayoutOptions::default(), &mut out);
        assert_eq!(out[1].dst.left(), 9);
    }

    #[test]
    fn space_advances_without_quad() {
        let f = test_font();
        let mut out = Vec::new();
        f.layout("A A", TextLayoutOptions::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].dst.left(), 16);
        assert_eq!(f.glyph_count("A A"), 2);
    }

    #[test]
    fn unknown_char_uses_fallback() {
        let f = test_font();
        let mut out = Vec::new();
        f.layout("é", TextLayoutOptions::default(), &mut out);
        assert_eq!(out[0].src, PxRectangle::create(16, 0, 6, 10));
    }

    #[test]
    fn double_scale_doubles_measure() {
        let f = test_font();
        let one = f.measure("AV", TextLayoutOptions { kerning: false, scale: 1.0 });
        let two = f.measure("AV", TextLayoutOptions { kerning: false, scale: 2.0 });
        assert_eq!(one, PxSize2D::create(19, 12));
        assert_eq!(two, PxSize2D::create(38, 24));
    }

    #[test]
    fn bounds_cover_glyphs_left_of_origin() {
        let j = BitmapFontChar {
            id: 'j' as u32,
            src_rect: PxRectangle::create(24, 0, 8, 10),
            offset: PxPoint2::new(-6, -3),
            x_advance: 4,
        };
        let f = BitmapFont::new("neg", 12, 14, 10, PxExtent2D::new(64, 16), vec![j], vec![]).unwrap();
        let b = f.bounds("j", TextLayoutOptions::default());
        assert_eq!(b, PxRectangle::from_ltrb(-6, -3, 2, 7));
        // measure only sees the far edges
        assert_eq!(f.measure("j", TextLayoutOptions::default()), PxSize2D::create(2, 7));
    }

    #[test]
    fn bounds_follow_kerning() {
        let f = test_font();
        assert_eq!(f.bounds("AV", TextLayoutOptions::default()), PxRectangle::from_ltrb(1, 2, 17, 12));
        assert_eq!(f.bounds("   ", TextLayoutOptions::default()), PxRectangle::default());
    }

    #[test]
    fn zero_scale_lays_out_nothing() {
        let f = test_font();
        assert_eq!(f.measure("AV", TextLayoutOptions { scale: 0.0, kerning: true }), PxSize2D::default());
    }
}
