//! Engine configuration.
//!
//! Plain structs with defaults; there is no config file format.

use crate::coords::BASE_DPI;
use crate::device::GpuInit;
use crate::logging::LoggingConfig;
use crate::sprite::TextureOrigin;

/// Quad batcher settings.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Quads the batch reserves up front. The store grows past this on demand.
    pub quad_capacity: usize,
    /// Row convention of the backend the batch feeds.
    pub texture_origin: TextureOrigin,
}

impl BatchConfig {
    pub const DEFAULT_QUAD_CAPACITY: usize = 4096;
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            quad_capacity: Self::DEFAULT_QUAD_CAPACITY,
            texture_origin: TextureOrigin::TopLeft,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeshManagerConfig {
    /// Mesh slots reserved up front.
    pub initial_capacity: usize,
    /// Glyph capacity a new text mesh gets at minimum.
    pub font_char_capacity: u32,
}

impl Default for MeshManagerConfig {
    fn default() -> Self {
        Self { initial_capacity: 64, font_char_capacity: 128 }
    }
}

/// Per-frame render toggles.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Let the command buffer reorder draws to reduce state changes.
    ///
    /// Off by default: submission order then equals traversal order.
    pub draw_reorder: bool,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Display density used for dp <-> px conversion.
    pub density_dpi: u32,
    pub logging: LoggingConfig,
    pub batch: BatchConfig,
    pub meshes: MeshManagerConfig,
    pub render: RenderOptions,
    pub gpu: GpuInit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            density_dpi: BASE_DPI,
            logging: LoggingConfig::default(),
            batch: BatchConfig::default(),
            meshes: MeshManagerConfig::default(),
            render: RenderOptions::default(),
            gpu: GpuInit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.density_dpi, 160);
        assert_eq!(c.batch.quad_capacity, 4096);
        assert_eq!(c.meshes.font_char_capacity, 128);
        assert!(!c.render.draw_reorder);
    }
}
