//! Rasterizes a TrueType/OpenType font into a bitmap font + RGBA atlas.
//!
//! This is a convenience for tools and demos that have a vector font but no
//! prebuilt bitmap font.

use crate::coords::{PxExtent2D, PxPoint2, PxRectangle};
use crate::error::{Error, Result};

use super::bitmap_font::{BitmapFont, BitmapFontChar, BitmapFontKerning};

const GLYPH_PADDING: u32 = 1;

/// Row-based rectangle packer for glyph atlases.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
        }
    }

    /// Reserves a `w`x`h` slot, or `None` if it can never fit the width.
    pub fn place(&mut self, w: u32, h: u32) -> Option<PxPoint2> {
        if w + 2 * GLYPH_PADDING > self.width {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.width {
            self.cursor_x = GLYPH_PADDING;
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.row_height = 0;
        }
        let at = PxPoint2::new(self.cursor_x as i32, self.cursor_y as i32);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }

    /// Height used so far, including the trailing padding.
    pub fn used_height(&self) -> u32 {
        self.cursor_y + self.row_height + GLYPH_PADDING
    }
}

/// Output of [`bake_font`].
#[derive(Debug, Clone)]
pub struct BakedFont {
    pub font: BitmapFont,
    /// Premultiplied white RGBA8 pixels, `extent.width * 4` bytes per row.
    pub pixels: Vec<u8>,
    pub extent: PxExtent2D,
}

/// Rasterizes `chars` at `size_px` into an atlas `atlas_width` pixels wide.
///
/// The atlas height is rounded up to a power of two.
pub fn bake_font(
    name: &str,
    bytes: &[u8],
    size_px: u16,
    chars: impl IntoIterator<Item = char>,
    atlas_width: u32,
) -> Result<BakedFont> {
    let face = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| Error::invalid_argument(format!("font '{name}' failed to parse: {e}")))?;
    let px = size_px as f32;
    let line = face
        .horizontal_line_metrics(px)
        .ok_or_else(|| Error::not_supported(format!("font '{name}' has no horizontal metrics")))?;
    let base_line = line.ascent.ceil().max(0.0) as i32;

    let mut packer = ShelfPacker::new(atlas_width);
    let mut glyphs: Vec<(BitmapFontChar, Vec<u8>)> = Vec::new();
    let mut codes = Vec::new();

    for ch in chars {
        if codes.contains(&ch) {
            continue;
        }
        codes.push(ch);
        let (m, coverage) = face.rasterize(ch, px);
        let (w, h) = (m.width as u32, m.height as u32);
        let origin = if w > 0 && h > 0 {
            packer.place(w, h).ok_or_else(|| {
                Error::invalid_argument(format!("glyph {ch:?} is wider than the {atlas_width}px atlas"))
            })?
        } else {
            PxPoint2::default()
        };
        glyphs.push((
            BitmapFontChar {
                id: ch as u32,
                src_rect: PxRectangle::create(origin.x, origin.y, w as i32, h as i32),
                offset: PxPoint2::new(m.xmin, base_line - (m.ymin + h as i32)),
                x_advance: m.advance_width.round() as i32,
            },
            coverage,
        ));
    }

    let extent = PxExtent2D::new(atlas_width, packer.used_height().next_power_of_two());
    let mut pixels = vec![0u8; (extent.width * extent.height * 4) as usize];
    for (g, coverage) in &glyphs {
        blit_coverage(&mut pixels, extent.width, g.src_rect, coverage);
    }

    let mut kernings = Vec::new();
    for &a in &codes {
        for &b in &codes {
            if let Some(k) = face.horizontal_kern(a, b, px) {
                let amount = k.round() as i32;
                if amount != 0 {
                    kernings.push(BitmapFontKerning { first: a as u32, second: b as u32, amount });
                }
            }
        }
    }

    let line_spacing = line.new_line_size.ceil().clamp(0.0, u16::MAX as f32) as u16;
    let font = BitmapFont::new(
        name,
        size_px,
        line_spacing,
        base_line.clamp(0, u16::MAX as i32) as u16,
        extent,
        glyphs.into_iter().map(|(g, _)| g).collect(),
        kernings,
    )?;

    log::debug!(
        "baked font '{name}' at {size_px}px: {} glyphs into {}x{}",
        font.chars().len(),
        extent.width,
        extent.height
    );
    Ok(BakedFont { font, pixels, extent })
}

/// Writes single channel coverage as premultiplied white.
fn blit_coverage(pixels: &mut [u8], stride_px: u32, dst: PxRectangle, coverage: &[u8]) {
    let w = dst.width() as usize;
    for (row, src_row) in coverage.chunks_exact(w.max(1)).enumerate().take(dst.height() as usize) {
        let y = dst.top() as usize + row;
        for (col, &c) in src_row.iter().enumerate() {
            let x = dst.left() as usize + col;
            let i = (y * stride_px as usize + x) * 4;
            pixels[i..i + 4].copy_from_slice(&[c, c, c, c]);
        }
    }
}
