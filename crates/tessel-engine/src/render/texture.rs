use std::collections::HashMap;

use crate::coords::PxExtent2D;
use crate::error::{Error, Result};
use crate::sprite::{NativeTextureHandle, NativeTextureInfo};

/// Format of every sampled texture: premultiplied RGBA8, no sRGB decode.
pub const SPRITE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub struct TextureEntry {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub extent: PxExtent2D,
}

/// GPU textures addressed by [`NativeTextureHandle`].
///
/// Handles start at 1 and are never reused, so a handle that outlived its
/// texture can not alias a newer one.
pub struct TextureRegistry {
    entries: HashMap<NativeTextureHandle, TextureEntry>,
    next: u32,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self { entries: HashMap::new(), next: 1 }
    }
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: NativeTextureHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn get(&self, handle: NativeTextureHandle) -> Result<&TextureEntry> {
        self.entries
            .get(&handle)
            .ok_or_else(|| Error::usage(format!("texture {:?} is not registered or was removed", handle)))
    }

    /// Creates a texture from premultiplied RGBA8 pixels, `extent.width * 4`
    /// bytes per row.
    pub fn upload_rgba8(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        extent: PxExtent2D,
        pixels: &[u8],
    ) -> Result<NativeTextureInfo> {
        validate_rgba8(extent, pixels.len())?;

        let size = wgpu::Extent3d { width: extent.width, height: extent.height, depth_or_array_layers: 1 };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SPRITE_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(extent.width * 4),
                rows_per_image: Some(extent.height),
            },
            size,
        );

        let handle = NativeTextureHandle(self.next);
        self.next = self
            .next
            .checked_add(1)
            .ok_or_else(|| Error::not_supported("texture handle space exhausted"))?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.entries.insert(handle, TextureEntry { texture, view, extent });
        log::debug!("texture {:?} '{label}' {}x{}", handle, extent.width, extent.height);

        Ok(NativeTextureInfo::new(handle, extent))
    }

    /// 1x1 opaque white; debug fills and solid quads sample it.
    pub fn upload_white(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<NativeTextureInfo> {
        self.upload_rgba8(device, queue, "tessel white texture", PxExtent2D::new(1, 1), &[255; 4])
    }

    /// Drops the texture; `false` if the handle was unknown.
    pub fn remove(&mut self, handle: NativeTextureHandle) -> bool {
        let removed = self.entries.remove(&handle);
        if let Some(entry) = &removed {
            entry.texture.destroy();
        }
        removed.is_some()
    }
}

fn validate_rgba8(extent: PxExtent2D, len: usize) -> Result<()> {
    if extent.is_empty() {
        return Err(Error::invalid_argument("texture extent can not be empty"));
    }
    let expected = extent.width as usize * extent.height as usize * 4;
    if len != expected {
        return Err(Error::invalid_argument(format!(
            "{}x{} rgba8 texture needs {expected} bytes, got {len}",
            extent.width, extent.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn pixel_length_must_match_extent() {
        assert!(validate_rgba8(PxExtent2D::new(2, 3), 24).is_ok());
        let err = validate_rgba8(PxExtent2D::new(2, 3), 23).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn empty_extent_is_rejected() {
        assert!(validate_rgba8(PxExtent2D::new(0, 3), 0).is_err());
    }

    #[test]
    fn unknown_handle_is_a_usage_error() {
        let reg = TextureRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.get(NativeTextureHandle(1)).err().map(|e| e.kind()), Some(ErrorKind::Usage));
    }
}
