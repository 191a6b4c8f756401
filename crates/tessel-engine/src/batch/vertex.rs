use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;
use crate::sprite::NativeQuadTextureCoords;

/// Vertex layout shared by the batch and the GPU backend.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Premultiplied tint.
    pub color: [f32; 4],
}

impl SpriteVertex {
    #[inline]
    pub fn new(position: Vec2, uv: [f32; 2], color: Color) -> Self {
        Self {
            position: [position.x, position.y],
            uv,
            color: color.to_array(),
        }
    }
}

/// Quad corners in the order TL, TR, BL, BR.
pub type SpriteQuad = [SpriteVertex; 4];

pub const VERTICES_PER_QUAD: u32 = 4;
pub const INDICES_PER_QUAD: u32 = 6;

/// Largest quad run addressable by one 16-bit indexed draw.
pub const MAX_QUADS_PER_DRAW: u32 = (u16::MAX as u32 + 1) / VERTICES_PER_QUAD;

#[inline]
pub fn build_quad(corners: [Vec2; 4], uv: NativeQuadTextureCoords, color: Color) -> SpriteQuad {
    [
        SpriteVertex::new(corners[0], uv.top_left, color),
        SpriteVertex::new(corners[1], uv.top_right, color),
        SpriteVertex::new(corners[2], uv.bottom_left, color),
        SpriteVertex::new(corners[3], uv.bottom_right, color),
    ]
}

/// Index list for `quad_count` consecutive quads (two triangles each).
pub fn quad_indices(quad_count: u32) -> Vec<u16> {
    debug_assert!(quad_count <= MAX_QUADS_PER_DRAW);
    let mut out = Vec::with_capacity((quad_count * INDICES_PER_QUAD) as usize);
    for q in 0..quad_count {
        let b = (q * VERTICES_PER_QUAD) as u16;
        out.extend_from_slice(&[b, b + 1, b + 2, b + 2, b + 1, b + 3]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 32);
    }

    #[test]
    fn indices_cover_two_triangles_per_quad() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn max_quads_fit_u16() {
        let last = quad_indices(MAX_QUADS_PER_DRAW);
        assert_eq!(last.last().copied(), Some(u16::MAX));
    }
}
