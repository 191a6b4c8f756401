use crate::coords::PxExtent2D;
use crate::error::{Error, Result};

/// Color format offscreen targets render into.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A texture the sprite renderer draws into instead of a window surface.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: PxExtent2D,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, extent: PxExtent2D) -> Result<Self> {
        if extent.is_empty() {
            return Err(Error::invalid_argument("offscreen target extent can not be empty"));
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessel offscreen target"),
            size: wgpu::Extent3d { width: extent.width, height: extent.height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view, extent })
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn extent(&self) -> PxExtent2D {
        self.extent
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        TARGET_FORMAT
    }
}
