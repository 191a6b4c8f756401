//! Sprite and material descriptors.
//!
//! Responsibilities:
//! - turn atlas pixel rectangles into native texture areas (UV)
//! - validate trimmed image and nine-slice data once, at construction
//! - scale sprite geometry from image dpi to the display density
//!
//! Descriptors own no GPU resources; they carry non-owning texture handles.

mod image;
mod material;
mod nine_slice;
mod texture_area;

pub use image::{ImageRenderInfo, ImageSpriteInfo};
pub use material::{
    BlendState, NativeTextureHandle, NativeTextureInfo, SpriteMaterialId, SpriteMaterialInfo,
};
pub use nine_slice::{
    NineSlicePatch, NineSliceRenderInfo, NineSliceSpriteInfo, NineSliceTextureArea,
    NineSliceTransparency, OptimizedNineSliceSpriteInfo,
};
pub use texture_area::{
    calc_native_texture_area, calc_native_texture_area_clipped,
    calc_native_texture_area_clipped_y_flipped, calc_native_texture_area_y_flipped,
    fast_calc_native_texture_area, fast_calc_native_texture_area_y_flipped, NativeQuadTextureCoords,
    NativeTextureArea, RenderConverter, TextureOrigin,
};

use crate::coords::PxSize2D;

/// Any sprite a mesh can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Image(ImageSpriteInfo),
    NineSlice(NineSliceSpriteInfo),
    OptimizedNineSlice(OptimizedNineSliceSpriteInfo),
}

impl Sprite {
    /// Primary material (the blending one for optimized nine-slices).
    pub fn material(&self) -> &SpriteMaterialInfo {
        match self {
            Sprite::Image(s) => &s.material,
            Sprite::NineSlice(s) => &s.material,
            Sprite::OptimizedNineSlice(s) => &s.info.material,
        }
    }

    /// Natural size at the display density.
    pub fn render_size(&self) -> PxSize2D {
        match self {
            Sprite::Image(s) => s.render.size,
            Sprite::NineSlice(s) => s.render.size,
            Sprite::OptimizedNineSlice(s) => s.info.render.size,
        }
    }

    /// True if every pixel the sprite draws is fully opaque.
    pub fn is_opaque(&self) -> bool {
        match self {
            Sprite::Image(s) => s.material.is_opaque(),
            Sprite::NineSlice(s) => s.material.is_opaque(),
            Sprite::OptimizedNineSlice(s) => s.transparency == NineSliceTransparency::ALL_OPAQUE,
        }
    }
}

impl From<ImageSpriteInfo> for Sprite {
    fn from(s: ImageSpriteInfo) -> Self {
        Sprite::Image(s)
    }
}

impl From<NineSliceSpriteInfo> for Sprite {
    fn from(s: NineSliceSpriteInfo) -> Self {
        Sprite::NineSlice(s)
    }
}

impl From<OptimizedNineSliceSpriteInfo> for Sprite {
    fn from(s: OptimizedNineSliceSpriteInfo) -> Self {
        Sprite::OptimizedNineSlice(s)
    }
}
