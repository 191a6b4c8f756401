use crate::coords::{PxExtent2D, PxRectangle};
use crate::error::{Error, Result};

use super::texture_area::{NativeTextureArea, RenderConverter, TextureOrigin};

/// Opaque handle to a backend texture. Zero is the null handle.
///
/// The engine never dereferences it; only the batch backend resolves it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeTextureHandle(pub u32);

impl NativeTextureHandle {
    pub const INVALID: NativeTextureHandle = NativeTextureHandle(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A backend texture handle plus the capability the engine needs from it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct NativeTextureInfo {
    pub handle: NativeTextureHandle,
    pub extent: PxExtent2D,
}

impl NativeTextureInfo {
    #[inline]
    pub const fn new(handle: NativeTextureHandle, extent: PxExtent2D) -> Self {
        Self { handle, extent }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.handle.is_valid() && !self.extent.is_empty()
    }
}

/// Color blending applied when compositing a quad.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlendState {
    /// No blending; destination is overwritten.
    Opaque,
    /// Premultiplied alpha (`src + dst * (1 - src.a)`).
    #[default]
    AlphaBlend,
    /// `src + dst`.
    Additive,
    /// Straight alpha (`src * src.a + dst * (1 - src.a)`).
    NonPremultiplied,
}

impl BlendState {
    #[inline]
    pub fn is_opaque(self) -> bool {
        self == BlendState::Opaque
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteMaterialId(pub u32);

/// Logical material: a texture plus its blend state.
///
/// Holds a non-owning texture handle; the texture itself belongs to the backend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteMaterialInfo {
    pub id: SpriteMaterialId,
    pub texture: NativeTextureInfo,
    pub blend: BlendState,
    converter: RenderConverter,
}

impl SpriteMaterialInfo {
    pub fn new(
        id: SpriteMaterialId,
        texture: NativeTextureInfo,
        blend: BlendState,
        origin: TextureOrigin,
    ) -> Result<Self> {
        if !texture.handle.is_valid() {
            return Err(Error::invalid_argument(format!(
                "material {:?} needs a valid texture handle",
                id
            )));
        }
        if texture.extent.is_empty() {
            return Err(Error::invalid_argument(format!(
                "material {:?} texture extent can not be empty",
                id
            )));
        }
        Ok(Self {
            id,
            texture,
            blend,
            converter: RenderConverter::new(origin),
        })
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.blend.is_opaque()
    }

    #[inline]
    pub fn texture_origin(&self) -> TextureOrigin {
        self.converter.origin()
    }

    /// UV area of an atlas rectangle inside this material's texture.
    pub fn calc_texture_area(&self, rect: PxRectangle) -> Result<NativeTextureArea> {
        self.converter.calc(rect, self.texture.extent)
    }

    /// True if both materials sample the same texture.
    #[inline]
    pub fn shares_texture_with(&self, other: &SpriteMaterialInfo) -> bool {
        self.texture == other.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tex() -> NativeTextureInfo {
        NativeTextureInfo::new(NativeTextureHandle(7), PxExtent2D::new(128, 64))
    }

    #[test]
    fn null_handle_is_rejected() {
        let t = NativeTextureInfo::new(NativeTextureHandle::INVALID, PxExtent2D::new(4, 4));
        let err = SpriteMaterialInfo::new(SpriteMaterialId(1), t, BlendState::Opaque, TextureOrigin::TopLeft)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn material_calculates_area_for_its_origin() {
        let m = SpriteMaterialInfo::new(SpriteMaterialId(1), tex(), BlendState::AlphaBlend, TextureOrigin::BottomLeft)
            .unwrap();
        let a = m.calc_texture_area(PxRectangle::create(0, 0, 64, 32)).unwrap();
        assert_eq!(a, NativeTextureArea::new(0.0, 1.0, 0.5, 0.5));
        assert!(!m.is_opaque());
    }

    #[test]
    fn default_blend_is_premultiplied() {
        assert_eq!(BlendState::default(), BlendState::AlphaBlend);
    }
}
