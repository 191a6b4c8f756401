//! Bitmap text.
//!
//! Fonts arrive already parsed as [`BitmapFont`]; [`SpriteFont`] binds one to
//! its texture material and produces glyph quads for the batch. [`bake_font`]
//! builds a bitmap font from vector font bytes via `fontdue`.

mod bake;
mod bitmap_font;
mod sprite_font;

pub use bake::{bake_font, BakedFont, ShelfPacker};
pub use bitmap_font::{BitmapFont, BitmapFontChar, BitmapFontKerning, GlyphPosition, TextLayoutOptions};
pub use sprite_font::{GlyphQuad, SpriteFont};

#[cfg(test)]
pub(crate) use bitmap_font::tests::test_font;
