//! Engine-wide state handed down explicitly.

use crate::batch::{BatchBackend, NativeBatch2D};
use crate::config::EngineConfig;
use crate::coords::DensityConverter;
use crate::error::Result;
use crate::mesh::MeshManager;
use crate::scene::UiRenderSystem;
use crate::sprite::{
    BlendState, ImageSpriteInfo, NativeTextureInfo, RenderConverter, SpriteMaterialId, SpriteMaterialInfo,
};

/// Owns the services the UI layer needs: configuration, the density and
/// texture-origin converters and the mesh manager.
///
/// Passed by `&mut` to whoever builds or draws UI; there is no global lookup.
#[derive(Debug)]
pub struct EngineContext {
    config: EngineConfig,
    density: DensityConverter,
    render_converter: RenderConverter,
    meshes: MeshManager,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let density = DensityConverter::new(config.density_dpi)?;
        let render_converter = RenderConverter::new(config.batch.texture_origin);
        let meshes = MeshManager::new(&config.meshes);
        log::debug!(
            "engine context: {} dpi, {:?} texture origin",
            density.density_dpi(),
            render_converter.origin()
        );
        Ok(Self { config, density, render_converter, meshes })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn density(&self) -> &DensityConverter {
        &self.density
    }

    #[inline]
    pub fn render_converter(&self) -> RenderConverter {
        self.render_converter
    }

    #[inline]
    pub fn meshes(&self) -> &MeshManager {
        &self.meshes
    }

    #[inline]
    pub fn meshes_mut(&mut self) -> &mut MeshManager {
        &mut self.meshes
    }

    /// Switches the display density. Sprites built earlier keep their old
    /// scale; rebuild them afterwards.
    pub fn set_density_dpi(&mut self, density_dpi: u32) -> Result<()> {
        self.density = DensityConverter::new(density_dpi)?;
        self.config.density_dpi = density_dpi;
        Ok(())
    }

    /// Material whose UVs follow the configured texture origin.
    pub fn create_material(
        &self,
        id: SpriteMaterialId,
        texture: NativeTextureInfo,
        blend: BlendState,
    ) -> Result<SpriteMaterialInfo> {
        SpriteMaterialInfo::new(id, texture, blend, self.render_converter.origin())
    }

    /// Image sprite covering a whole texture authored at `image_dpi`.
    pub fn image_sprite(&self, material: SpriteMaterialInfo, image_dpi: u32) -> Result<ImageSpriteInfo> {
        ImageSpriteInfo::full_texture(material, image_dpi, &self.density)
    }

    pub fn create_batch<B: BatchBackend>(&self, backend: B) -> NativeBatch2D<B> {
        NativeBatch2D::new(backend, &self.config.batch)
    }

    pub fn create_ui_render_system(&self) -> UiRenderSystem {
        UiRenderSystem::new(self.config.render.clone())
    }
}
