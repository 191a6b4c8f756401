use crate::coords::{Rect, Vec2};
use crate::mesh::MeshHandle;
use crate::paint::Color;

/// Image mesh stretched to `dst`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageDrawCmd {
    pub mesh: MeshHandle,
    pub dst: Rect,
    pub color: Color,
}

/// Nine-slice mesh stretched to `dst`, optionally turned 90 degrees clockwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NineSliceDrawCmd {
    pub mesh: MeshHandle,
    pub dst: Rect,
    pub color: Color,
    pub rotated_90_cw: bool,
}

/// Text mesh with its line top-left at `position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextDrawCmd {
    pub mesh: MeshHandle,
    pub position: Vec2,
    pub color: Color,
}

/// One recorded UI draw. Commands reference meshes by handle; the mesh may be
/// gone by the time the buffer is rendered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCommand {
    Image(ImageDrawCmd),
    NineSlice(NineSliceDrawCmd),
    Text(TextDrawCmd),
}

impl DrawCommand {
    #[inline]
    pub fn mesh(&self) -> MeshHandle {
        match self {
            DrawCommand::Image(c) => c.mesh,
            DrawCommand::NineSlice(c) => c.mesh,
            DrawCommand::Text(c) => c.mesh,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Image(c) => c.color,
            DrawCommand::NineSlice(c) => c.color,
            DrawCommand::Text(c) => c.color,
        }
    }
}
