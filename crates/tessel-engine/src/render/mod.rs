//! wgpu rendering of batch output.
//!
//! Convention:
//! - CPU geometry is in target pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - Textures hold premultiplied RGBA8, sampled with a top-left origin.

mod sprite;
mod target;
mod texture;

pub use sprite::{segment_draws, wgpu_blend, SpriteRenderStats, WgpuBatchBackend};
pub use target::{OffscreenTarget, TARGET_FORMAT};
pub use texture::{TextureEntry, TextureRegistry, SPRITE_TEXTURE_FORMAT};
