//! Where studio frames go: a wgpu offscreen target, or memory when no GPU
//! adapter is available.

use tessel_engine::Result;
use tessel_engine::batch::{BatchBackend, BatchSegment, RecordingBackend, SpriteQuad};
use tessel_engine::coords::PxExtent2D;
use tessel_engine::paint::Color;
use tessel_engine::render::WgpuBatchBackend;
use tessel_engine::sprite::{NativeTextureHandle, NativeTextureInfo};

pub trait StudioOutput: BatchBackend {
    fn name(&self) -> &'static str;
    fn upload(&mut self, label: &str, extent: PxExtent2D, pixels: &[u8]) -> Result<NativeTextureInfo>;
    fn begin_frame(&mut self, clear: Color);
    fn end_frame(&mut self) -> Result<()>;
    /// Backend draw calls issued since the last call.
    fn take_draw_calls(&mut self) -> u32;
}

impl StudioOutput for WgpuBatchBackend {
    fn name(&self) -> &'static str {
        "wgpu offscreen"
    }

    fn upload(&mut self, label: &str, extent: PxExtent2D, pixels: &[u8]) -> Result<NativeTextureInfo> {
        self.upload_rgba8(label, extent, pixels)
    }

    fn begin_frame(&mut self, clear: Color) {
        self.clear_next(clear);
    }

    fn end_frame(&mut self) -> Result<()> {
        self.finish_frame()
    }

    fn take_draw_calls(&mut self) -> u32 {
        self.take_stats().draw_calls
    }
}

/// Keeps the last frame's submits in memory; textures only get handles.
#[derive(Default)]
pub struct MemoryOutput {
    recording: RecordingBackend,
    next_texture: u32,
    draw_calls: u32,
}

impl BatchBackend for MemoryOutput {
    fn submit(&mut self, quads: &[SpriteQuad], segments: &[BatchSegment]) -> Result<()> {
        self.draw_calls += segments.len() as u32;
        self.recording.submit(quads, segments)
    }
}

impl StudioOutput for MemoryOutput {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn upload(&mut self, _label: &str, extent: PxExtent2D, _pixels: &[u8]) -> Result<NativeTextureInfo> {
        self.next_texture += 1;
        Ok(NativeTextureInfo::new(NativeTextureHandle(self.next_texture), extent))
    }

    fn begin_frame(&mut self, _clear: Color) {
        self.recording.clear();
    }

    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }

    fn take_draw_calls(&mut self) -> u32 {
        std::mem::take(&mut self.draw_calls)
    }
}
