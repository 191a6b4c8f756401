use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::batch::{
    quad_indices, BatchBackend, BatchSegment, SpriteQuad, SpriteVertex, INDICES_PER_QUAD,
    MAX_QUADS_PER_DRAW, VERTICES_PER_QUAD,
};
use crate::coords::PxExtent2D;
use crate::device::Gpu;
use crate::error::{Error, Result};
use crate::paint::Color;
use crate::sprite::{BlendState, NativeTextureHandle, NativeTextureInfo};

use super::target::OffscreenTarget;
use super::texture::TextureRegistry;

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x2, // uv
    2 => Float32x4  // color
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Fixed-function blend for each batch blend state. `None` overwrites.
pub fn wgpu_blend(blend: BlendState) -> Option<wgpu::BlendState> {
    let alpha_over = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    match blend {
        BlendState::Opaque => None,
        BlendState::AlphaBlend => Some(wgpu::BlendState { color: alpha_over, alpha: alpha_over }),
        BlendState::Additive => {
            let add = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            };
            Some(wgpu::BlendState { color: add, alpha: add })
        }
        BlendState::NonPremultiplied => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: alpha_over,
        }),
    }
}

/// Splits a segment into `(base_vertex, index_count)` draws that each fit the
/// shared 16-bit index buffer.
pub fn segment_draws(segment: &BatchSegment) -> impl Iterator<Item = (i32, u32)> + '_ {
    (0..segment.quad_count)
        .step_by(MAX_QUADS_PER_DRAW as usize)
        .map(move |offset| {
            let quads = (segment.quad_count - offset).min(MAX_QUADS_PER_DRAW);
            let base_vertex = (segment.first_quad + offset) * VERTICES_PER_QUAD;
            (base_vertex as i32, quads * INDICES_PER_QUAD)
        })
}

// ── stats ─────────────────────────────────────────────────────────────────

/// Work done by the GPU backend since the last [`WgpuBatchBackend::take_stats`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SpriteRenderStats {
    /// `submit` calls (one render pass each).
    pub passes: u32,
    pub draw_calls: u32,
    pub pipeline_switches: u32,
    pub quads: u32,
}

struct BoundTarget {
    view: wgpu::TextureView,
    extent: PxExtent2D,
    format: wgpu::TextureFormat,
}

// ── backend ───────────────────────────────────────────────────────────────

/// Draws batch segments with wgpu into an offscreen target.
///
/// Owns the texture registry so material handles resolve to bind groups
/// without outside help. One pipeline exists per blend state; one bind group
/// per texture. Every `submit` encodes one render pass and submits it.
pub struct WgpuBatchBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    textures: TextureRegistry,

    target: Option<BoundTarget>,
    pending_clear: Option<Color>,

    // pipelines
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<BlendState, wgpu::RenderPipeline>,
    shader: Option<wgpu::ShaderModule>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,

    // bindings
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
    texture_bind_groups: HashMap<NativeTextureHandle, wgpu::BindGroup>,

    // geometry
    index_buffer: Option<wgpu::Buffer>,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize, // quads

    stats: SpriteRenderStats,
}

impl WgpuBatchBackend {
    pub fn new(gpu: &Gpu) -> Self {
        Self {
            device: gpu.device().clone(),
            queue: gpu.queue().clone(),
            textures: TextureRegistry::new(),
            target: None,
            pending_clear: None,
            pipeline_format: None,
            pipelines: HashMap::new(),
            shader: None,
            pipeline_layout: None,
            texture_bgl: None,
            viewport_ubo: None,
            viewport_bind_group: None,
            sampler: None,
            texture_bind_groups: HashMap::new(),
            index_buffer: None,
            vertex_buffer: None,
            vertex_capacity: 0,
            stats: SpriteRenderStats::default(),
        }
    }

    #[inline]
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn upload_rgba8(&mut self, label: &str, extent: PxExtent2D, pixels: &[u8]) -> Result<NativeTextureInfo> {
        self.textures.upload_rgba8(&self.device, &self.queue, label, extent, pixels)
    }

    pub fn upload_white(&mut self) -> Result<NativeTextureInfo> {
        self.textures.upload_white(&self.device, &self.queue)
    }

    /// Removes a texture; materials still naming it fail on their next draw.
    pub fn remove_texture(&mut self, handle: NativeTextureHandle) -> bool {
        self.texture_bind_groups.remove(&handle);
        self.textures.remove(handle)
    }

    /// Directs following submits into `target`.
    pub fn bind_target(&mut self, target: &OffscreenTarget) {
        self.target = Some(BoundTarget {
            view: target.view().clone(),
            extent: target.extent(),
            format: target.format(),
        });
    }

    /// Clears the target to `color` before the next pass draws.
    pub fn clear_next(&mut self, color: Color) {
        self.pending_clear = Some(color);
    }

    /// Runs a clear still pending because nothing was submitted.
    pub fn finish_frame(&mut self) -> Result<()> {
        if self.pending_clear.is_some() {
            self.encode_pass(&[])?;
        }
        Ok(())
    }

    pub fn take_stats(&mut self) -> SpriteRenderStats {
        std::mem::take(&mut self.stats)
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self) {
        if self.pipeline_layout.is_some() {
            return;
        }

        let viewport_bgl = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel sprite viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64),
                },
                count: None,
            }],
        });

        let texture_bgl = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel sprite pipeline layout"),
            bind_group_layouts: &[&viewport_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let viewport_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel sprite viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel sprite viewport bind group"),
            layout: &viewport_bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() }],
        });

        self.sampler = Some(self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessel sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));

        self.shader = Some(self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessel sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        }));

        self.texture_bgl = Some(texture_bgl);
        self.pipeline_layout = Some(pipeline_layout);
        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(viewport_bind_group);
    }

    fn ensure_pipeline(&mut self, format: wgpu::TextureFormat, blend: BlendState) {
        if self.pipeline_format != Some(format) {
            self.pipelines.clear();
            self.pipeline_format = Some(format);
        }
        if self.pipelines.contains_key(&blend) {
            return;
        }
        let Some(shader) = self.shader.as_ref() else { return; };
        let Some(layout) = self.pipeline_layout.as_ref() else { return; };

        let label = format!("tessel sprite pipeline {:?}", blend);
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label.as_str()),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: wgpu_blend(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        log::debug!("created {label} for {:?}", format);
        self.pipelines.insert(blend, pipeline);
    }

    fn ensure_texture_binding(&mut self, handle: NativeTextureHandle) -> Result<()> {
        if self.texture_bind_groups.contains_key(&handle) {
            return Ok(());
        }
        let entry = self.textures.get(handle)?;
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.as_ref(), self.sampler.as_ref()) else {
            return Err(Error::gpu("sprite bind group layout missing"));
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel sprite texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&entry.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });
        self.texture_bind_groups.insert(handle, bind_group);
        Ok(())
    }

    fn ensure_index_buffer(&mut self) {
        if self.index_buffer.is_some() {
            return;
        }
        self.index_buffer = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessel sprite ibo"),
            contents: bytemuck::cast_slice(&quad_indices(MAX_QUADS_PER_DRAW)),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_vertex_capacity(&mut self, quads: usize) {
        if quads <= self.vertex_capacity && self.vertex_buffer.is_some() {
            return;
        }
        let new_cap = quads.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<SpriteQuad>()) as u64;
        self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel sprite vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        log::trace!("sprite vertex buffer grown to {new_cap} quads");
        self.vertex_capacity = new_cap;
    }

    // ── encoding ───────────────────────────────────────────────────────────

    fn encode_pass(&mut self, segments: &[BatchSegment]) -> Result<()> {
        let Some((format, extent)) = self.target.as_ref().map(|t| (t.format, t.extent)) else {
            return Err(Error::usage("sprite backend has no render target bound"));
        };

        self.ensure_layouts();
        for segment in segments {
            self.ensure_pipeline(format, segment.state.blend);
            self.ensure_texture_binding(segment.state.texture.handle)?;
        }

        if let Some(ubo) = self.viewport_ubo.as_ref() {
            let viewport = ViewportUniform {
                viewport: [extent.width.max(1) as f32, extent.height.max(1) as f32],
                _pad: [0.0; 2],
            };
            self.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&viewport));
        }

        let load = match self.pending_clear.take() {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color { r: c.r as f64, g: c.g as f64, b: c.b as f64, a: c.a as f64 }),
            None => wgpu::LoadOp::Load,
        };

        let Some(target) = self.target.as_ref() else { return Ok(()); };
        let Some(viewport_bind_group) = self.viewport_bind_group.as_ref() else {
            return Err(Error::gpu("sprite viewport binding missing"));
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("tessel sprite encoder") });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessel sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let buffers = (self.vertex_buffer.as_ref(), self.index_buffer.as_ref());
            if let (Some(vbo), Some(ibo), false) = (buffers.0, buffers.1, segments.is_empty()) {
                rpass.set_bind_group(0, viewport_bind_group, &[]);
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);

                let mut bound_blend = None;
                for segment in segments {
                    let state = segment.state;
                    let (Some(pipeline), Some(bind_group)) = (
                        self.pipelines.get(&state.blend),
                        self.texture_bind_groups.get(&state.texture.handle),
                    ) else {
                        continue;
                    };
                    if bound_blend != Some(state.blend) {
                        rpass.set_pipeline(pipeline);
                        bound_blend = Some(state.blend);
                        self.stats.pipeline_switches += 1;
                    }
                    rpass.set_bind_group(1, bind_group, &[]);
                    for (base_vertex, index_count) in segment_draws(segment) {
                        rpass.draw_indexed(0..index_count, base_vertex, 0..1);
                        self.stats.draw_calls += 1;
                    }
                    self.stats.quads += segment.quad_count;
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.stats.passes += 1;
        Ok(())
    }
}

impl BatchBackend for WgpuBatchBackend {
    fn submit(&mut self, quads: &[SpriteQuad], segments: &[BatchSegment]) -> Result<()> {
        self.ensure_index_buffer();
        self.ensure_vertex_capacity(quads.len());
        if let Some(vbo) = self.vertex_buffer.as_ref() {
            self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(quads));
        }
        self.encode_pass(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchState;
    use crate::coords::PxExtent2D;

    fn segment(first_quad: u32, quad_count: u32) -> BatchSegment {
        BatchSegment {
            state: BatchState::new(
                NativeTextureInfo::new(NativeTextureHandle(1), PxExtent2D::new(1, 1)),
                BlendState::AlphaBlend,
            ),
            first_quad,
            quad_count,
        }
    }

    // ── draw splitting ─────────────────────────────────────────────────────

    #[test]
    fn small_segment_is_one_draw() {
        let draws: Vec<_> = segment_draws(&segment(3, 10)).collect();
        assert_eq!(draws, vec![(12, 60)]);
    }

    #[test]
    fn large_segment_splits_at_index_limit() {
        let draws: Vec<_> = segment_draws(&segment(0, MAX_QUADS_PER_DRAW + 5)).collect();
        assert_eq!(
            draws,
            vec![(0, MAX_QUADS_PER_DRAW * 6), ((MAX_QUADS_PER_DRAW * 4) as i32, 30)]
        );
    }

    // ── blend mapping ──────────────────────────────────────────────────────

    #[test]
    fn opaque_overwrites() {
        assert_eq!(wgpu_blend(BlendState::Opaque), None);
    }

    #[test]
    fn alpha_blend_is_premultiplied() {
        let b = wgpu_blend(BlendState::AlphaBlend).unwrap();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }

    #[test]
    fn straight_alpha_scales_source() {
        let b = wgpu_blend(BlendState::NonPremultiplied).unwrap();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::SrcAlpha);
    }

    #[test]
    fn vertex_layout_matches_vertex_size() {
        assert_eq!(vertex_layout().array_stride, 32);
    }
}
