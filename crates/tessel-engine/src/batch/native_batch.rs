use crate::config::BatchConfig;
use crate::coords::{Matrix3, PxRectangle, Rect, Vec2};
use crate::error::{Error, Result};
use crate::paint::Color;
use crate::sprite::{
    BlendState, ImageSpriteInfo, NativeQuadTextureCoords, NativeTextureArea, NativeTextureInfo,
    NineSlicePatch, NineSliceSpriteInfo, OptimizedNineSliceSpriteInfo, RenderConverter,
    SpriteMaterialInfo,
};
use crate::text::{GlyphPosition, GlyphQuad, SpriteFont};

use super::backend::BatchBackend;
use super::strategy::{BatchByState, BatchSegment, BatchState};
use super::vertex::build_quad;

/// Whether the batch is inside a `begin`/`end` scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Recording { blend: BlendState },
}

/// Counters for one `begin`/`end` scope.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub quads: u32,
    /// Draw calls handed to the backend.
    pub segments: u32,
    /// Backend submissions (`flush` calls plus the final one).
    pub flushes: u32,
}

/// Immediate-mode quad batcher.
///
/// Draws between [`begin`](Self::begin) and [`end`](Self::end) are collected
/// and handed to the backend on `end` as runs of identical
/// (texture, blend) state. Draws that take a raw texture use the scope's
/// blend state; draws that take a material use the material's.
///
/// Misuse (drawing outside a scope, nesting scopes, null texture handles)
/// is reported as [`ErrorKind::Usage`](crate::error::ErrorKind::Usage) and
/// leaves the batch state untouched.
pub struct NativeBatch2D<B: BatchBackend> {
    backend: B,
    store: BatchByState,
    converter: RenderConverter,
    phase: BatchPhase,
    scope: BatchStats,
    last: BatchStats,
    clip: Option<Rect>,
    segment_scratch: Vec<BatchSegment>,
    glyph_scratch: Vec<GlyphPosition>,
    quad_scratch: Vec<GlyphQuad>,
}

impl<B: BatchBackend> NativeBatch2D<B> {
    pub fn new(backend: B, config: &BatchConfig) -> Self {
        Self {
            backend,
            store: BatchByState::with_capacity(config.quad_capacity),
            converter: RenderConverter::new(config.texture_origin),
            phase: BatchPhase::Idle,
            scope: BatchStats::default(),
            last: BatchStats::default(),
            clip: None,
            segment_scratch: Vec::new(),
            glyph_scratch: Vec::new(),
            quad_scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        matches!(self.phase, BatchPhase::Recording { .. })
    }

    /// Statistics of the last completed scope.
    #[inline]
    pub fn last_stats(&self) -> BatchStats {
        self.last
    }

    /// Clips subsequent axis aligned draws to `clip` (texture coordinates are
    /// cut to match). Transformed draws ignore it. Cleared by `begin`.
    pub fn set_clip_rect(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    #[inline]
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip
    }

    /// Quads recorded in the current scope and not yet flushed.
    #[inline]
    pub fn pending_quads(&self) -> usize {
        self.store.quad_count()
    }

    // ── scope ─────────────────────────────────────────────────────────────

    pub fn begin(&mut self, blend: BlendState) -> Result<()> {
        if self.is_recording() {
            return Err(Error::usage("begin called while a batch scope is already open"));
        }
        self.phase = BatchPhase::Recording { blend };
        self.scope = BatchStats::default();
        self.clip = None;
        Ok(())
    }

    /// `begin` with premultiplied alpha blending.
    pub fn begin_default(&mut self) -> Result<()> {
        self.begin(BlendState::AlphaBlend)
    }

    /// Switches the blend state used by subsequent raw texture draws.
    pub fn change_to(&mut self, blend: BlendState) -> Result<()> {
        match self.phase {
            BatchPhase::Recording { .. } => {
                self.phase = BatchPhase::Recording { blend };
                Ok(())
            }
            BatchPhase::Idle => Err(Error::usage("change_to called outside begin/end")),
        }
    }

    /// Hands everything recorded so far to the backend without closing the scope.
    pub fn flush(&mut self) -> Result<()> {
        self.scope_blend("flush")?;
        self.submit_pending()
    }

    /// Submits the scope and returns to idle.
    ///
    /// The batch is idle afterwards even if the backend fails.
    pub fn end(&mut self) -> Result<BatchStats> {
        self.scope_blend("end")?;
        let submitted = self.submit_pending();
        self.phase = BatchPhase::Idle;
        self.last = self.scope;
        submitted?;
        log::trace!(
            "batch end: {} quads in {} segments ({} flushes)",
            self.last.quads,
            self.last.segments,
            self.last.flushes
        );
        Ok(self.last)
    }

    /// Drops the open scope without submitting anything.
    pub fn discard(&mut self) {
        if !self.is_recording() {
            return;
        }
        if !self.store.is_empty() {
            log::debug!("batch discard drops {} quads", self.store.quad_count());
        }
        self.store.clear();
        self.phase = BatchPhase::Idle;
        self.scope = BatchStats::default();
    }

    fn submit_pending(&mut self) -> Result<()> {
        if self.store.is_empty() {
            self.store.clear();
            return Ok(());
        }
        self.segment_scratch.clear();
        self.segment_scratch.extend(self.store.non_empty_segments().copied());

        self.scope.quads += self.store.quad_count() as u32;
        self.scope.segments += self.segment_scratch.len() as u32;
        self.scope.flushes += 1;

        let result = self.backend.submit(self.store.quads(), &self.segment_scratch);
        self.store.clear();
        result
    }

    fn scope_blend(&self, op: &str) -> Result<BlendState> {
        match self.phase {
            BatchPhase::Recording { blend } => Ok(blend),
            BatchPhase::Idle => Err(Error::usage(format!("{op} called outside begin/end"))),
        }
    }

    fn check_texture(texture: &NativeTextureInfo) -> Result<()> {
        if texture.handle.is_valid() {
            Ok(())
        } else {
            Err(Error::usage("draw with a null native texture handle"))
        }
    }

    /// Validates scope and texture, returning the state raw draws use.
    fn raw_state(&self, texture: &NativeTextureInfo, op: &str) -> Result<BatchState> {
        let blend = self.scope_blend(op)?;
        Self::check_texture(texture)?;
        Ok(BatchState::new(*texture, blend))
    }

    fn material_state(&self, material: &SpriteMaterialInfo, op: &str) -> Result<BatchState> {
        self.scope_blend(op)?;
        Self::check_texture(&material.texture)?;
        Ok(BatchState::new(material.texture, material.blend))
    }

    fn push(&mut self, state: BatchState, corners: [Vec2; 4], uv: NativeQuadTextureCoords, color: Color) {
        self.store.set_state(state);
        self.store.add_quad(build_quad(corners, uv, color));
    }

    fn push_rect(&mut self, state: BatchState, dst: Rect, uv: NativeQuadTextureCoords, color: Color) {
        let Some(clip) = self.clip else {
            self.push(state, rect_corners(dst), uv, color);
            return;
        };
        let Some(visible) = dst.intersect(clip) else { return };
        if visible == dst {
            self.push(state, rect_corners(dst), uv, color);
        } else {
            self.push(state, rect_corners(visible), clip_coords(uv, dst, visible), color);
        }
    }

    // ── raw texture draws ─────────────────────────────────────────────────

    /// Whole texture at its natural size with the top-left at `position`.
    pub fn draw(&mut self, texture: &NativeTextureInfo, position: Vec2, color: Color) -> Result<()> {
        let state = self.raw_state(texture, "draw")?;
        let size = Vec2::new(texture.extent.width as f32, texture.extent.height as f32);
        self.push_rect(state, Rect::from_origin_size(position, size), NativeTextureArea::FULL.into(), color);
        Ok(())
    }

    /// Whole texture stretched to `dst`.
    pub fn draw_rect(&mut self, texture: &NativeTextureInfo, dst: Rect, color: Color) -> Result<()> {
        let state = self.raw_state(texture, "draw_rect")?;
        self.push_rect(state, dst, NativeTextureArea::FULL.into(), color);
        Ok(())
    }

    /// Texture region `src` at its natural size.
    pub fn draw_src(&mut self, texture: &NativeTextureInfo, position: Vec2, src: PxRectangle, color: Color) -> Result<()> {
        let dst = Rect::from_origin_size(position, Vec2::new(src.width() as f32, src.height() as f32));
        self.draw_src_rect(texture, dst, src, color)
    }

    /// Texture region `src` stretched to `dst`. `src` must lie inside the texture.
    pub fn draw_src_rect(&mut self, texture: &NativeTextureInfo, dst: Rect, src: PxRectangle, color: Color) -> Result<()> {
        let state = self.raw_state(texture, "draw_src_rect")?;
        let area = self.converter.calc(src, texture.extent)?;
        self.push_rect(state, dst, area.into(), color);
        Ok(())
    }

    pub fn draw_area(&mut self, texture: &NativeTextureInfo, dst: Rect, area: NativeTextureArea, color: Color) -> Result<()> {
        let state = self.raw_state(texture, "draw_area")?;
        self.push_rect(state, dst, area.into(), color);
        Ok(())
    }

    pub fn draw_quad_coords(
        &mut self,
        texture: &NativeTextureInfo,
        dst: Rect,
        coords: NativeQuadTextureCoords,
        color: Color,
    ) -> Result<()> {
        let state = self.raw_state(texture, "draw_quad_coords")?;
        self.push_rect(state, dst, coords, color);
        Ok(())
    }

    /// Region `src` (whole texture if `None`) rotated and scaled around `origin`,
    /// which is placed at `position`. `origin` is relative to the region's top-left.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_transformed(
        &mut self,
        texture: &NativeTextureInfo,
        src: Option<PxRectangle>,
        position: Vec2,
        origin: Vec2,
        scale: Vec2,
        radians: f32,
        color: Color,
    ) -> Result<()> {
        let transform = Matrix3::sprite_transform(position, origin, scale, radians);
        self.draw_matrix(texture, src, &transform, color)
    }

    /// Region `src` (whole texture if `None`) mapped through `transform`.
    pub fn draw_matrix(
        &mut self,
        texture: &NativeTextureInfo,
        src: Option<PxRectangle>,
        transform: &Matrix3,
        color: Color,
    ) -> Result<()> {
        let state = self.raw_state(texture, "draw_matrix")?;
        let (size, area) = match src {
            Some(src) => (
                Vec2::new(src.width() as f32, src.height() as f32),
                self.converter.calc(src, texture.extent)?,
            ),
            None => (
                Vec2::new(texture.extent.width as f32, texture.extent.height as f32),
                NativeTextureArea::FULL,
            ),
        };
        let corners = rect_corners(Rect::from_origin_size(Vec2::zero(), size)).map(|p| transform.transform_point(p));
        self.push(state, corners, area.into(), color);
        Ok(())
    }

    /// One quad of region `src` per entry in `positions` (top-left anchored).
    pub fn draw_positions(
        &mut self,
        texture: &NativeTextureInfo,
        src: PxRectangle,
        positions: &[Vec2],
        color: Color,
    ) -> Result<()> {
        let state = self.raw_state(texture, "draw_positions")?;
        let area = self.converter.calc(src, texture.extent)?.into();
        let size = Vec2::new(src.width() as f32, src.height() as f32);
        self.store.ensure_capacity(self.store.quad_count() + positions.len());
        for &p in positions {
            self.push_rect(state, Rect::from_origin_size(p, size), area, color);
        }
        Ok(())
    }

    // ── sprite draws ──────────────────────────────────────────────────────

    /// Image sprite stretched to `dst`; trim margins stay transparent.
    pub fn draw_image(&mut self, sprite: &ImageSpriteInfo, dst: Rect, color: Color) -> Result<()> {
        let state = self.material_state(&sprite.material, "draw_image")?;
        let trimmed = sprite.trimmed_dst(dst);
        if !trimmed.is_empty() {
            self.push_rect(state, trimmed, sprite.render.texture_area.into(), color);
        }
        Ok(())
    }

    /// Image sprite at its natural (density scaled) size.
    pub fn draw_image_at(&mut self, sprite: &ImageSpriteInfo, position: Vec2, color: Color) -> Result<()> {
        let dst = Rect::from_origin_size(position, Vec2::from(sprite.render.size));
        self.draw_image(sprite, dst, color)
    }

    pub fn draw_nine_slice(&mut self, sprite: &NineSliceSpriteInfo, dst: Rect, color: Color) -> Result<()> {
        let state = self.material_state(&sprite.material, "draw_nine_slice")?;
        self.push_patches(state, &sprite.patches(dst), color);
        Ok(())
    }

    /// Nine-slice with the image turned 90 degrees clockwise inside `dst`.
    pub fn draw_nine_slice_rotated_90_cw(&mut self, sprite: &NineSliceSpriteInfo, dst: Rect, color: Color) -> Result<()> {
        let state = self.material_state(&sprite.material, "draw_nine_slice_rotated_90_cw")?;
        self.push_patches(state, &sprite.patches_rotated_90_cw(dst), color);
        Ok(())
    }

    /// Nine-slice drawing its solid patches with the opaque material.
    ///
    /// The opaque material is only used when `color` keeps the pixels opaque.
    pub fn draw_optimized_nine_slice(
        &mut self,
        sprite: &OptimizedNineSliceSpriteInfo,
        dst: Rect,
        color: Color,
    ) -> Result<()> {
        let blended = self.material_state(&sprite.info.material, "draw_optimized_nine_slice")?;
        if !color.is_opaque() {
            self.push_patches(blended, &sprite.info.patches(dst), color);
            return Ok(());
        }
        let opaque = BatchState::new(sprite.opaque_material.texture, sprite.opaque_material.blend);
        for patch in sprite.info.patches(dst) {
            if patch.is_empty() {
                continue;
            }
            let state = if sprite.transparency.is_transparent(patch.index) { blended } else { opaque };
            self.push_rect(state, patch.dst, patch.uv, color);
        }
        Ok(())
    }

    fn push_patches(&mut self, state: BatchState, patches: &[NineSlicePatch; 9], color: Color) {
        for patch in patches.iter().filter(|p| !p.is_empty()) {
            self.push_rect(state, patch.dst, patch.uv, color);
        }
    }

    /// Draws `text` with its origin (line top-left) at `position`.
    pub fn draw_string(&mut self, font: &SpriteFont, text: &str, position: Vec2, color: Color) -> Result<()> {
        let state = self.material_state(font.material(), "draw_string")?;
        let mut quads = std::mem::take(&mut self.quad_scratch);
        quads.clear();
        font.append_quads(text, position, &mut self.glyph_scratch, &mut quads);
        self.store.ensure_capacity(self.store.quad_count() + quads.len());
        for q in &quads {
            self.push_rect(state, q.dst, q.uv.into(), color);
        }
        self.quad_scratch = quads;
        Ok(())
    }

    // ── debug ─────────────────────────────────────────────────────────────

    /// Rectangle outline `thickness` pixels wide, inside `rect`.
    ///
    /// `fill` is expected to be a solid (e.g. 1x1 white) texture.
    pub fn debug_draw_rectangle(
        &mut self,
        fill: &NativeTextureInfo,
        rect: Rect,
        thickness: f32,
        color: Color,
    ) -> Result<()> {
        let state = self.raw_state(fill, "debug_draw_rectangle")?;
        let uv: NativeQuadTextureCoords = NativeTextureArea::FULL.into();
        let t = thickness.max(0.0);
        if t <= 0.0 || rect.is_empty() {
            return Ok(());
        }
        if t * 2.0 >= rect.width() || t * 2.0 >= rect.height() {
            self.push_rect(state, rect, uv, color);
            return Ok(());
        }
        let (l, tp, r, b) = (rect.left, rect.top, rect.right, rect.bottom);
        self.push_rect(state, Rect::from_ltrb(l, tp, r, tp + t), uv, color);
        self.push_rect(state, Rect::from_ltrb(l, b - t, r, b), uv, color);
        self.push_rect(state, Rect::from_ltrb(l, tp + t, l + t, b - t), uv, color);
        self.push_rect(state, Rect::from_ltrb(r - t, tp + t, r, b - t), uv, color);
        Ok(())
    }

    /// Line from `from` to `to`, `thickness` pixels wide. Zero length lines draw nothing.
    pub fn debug_draw_line(
        &mut self,
        fill: &NativeTextureInfo,
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    ) -> Result<()> {
        let state = self.raw_state(fill, "debug_draw_line")?;
        let dir = (to - from).normalized_or_zero();
        if dir == Vec2::zero() || thickness <= 0.0 {
            return Ok(());
        }
        let n = Vec2::new(-dir.y, dir.x) * (thickness * 0.5);
        let corners = [from - n, to - n, from + n, to + n];
        self.push(state, corners, NativeTextureArea::FULL.into(), color);
        Ok(())
    }
}

impl<B: BatchBackend> Drop for NativeBatch2D<B> {
    fn drop(&mut self) {
        if self.is_recording() {
            log::warn!(
                "NativeBatch2D dropped inside an open scope; {} quads were never submitted",
                self.store.quad_count()
            );
        }
    }
}

/// Texture coordinates of `inner`, given those of the enclosing `outer`.
fn clip_coords(uv: NativeQuadTextureCoords, outer: Rect, inner: Rect) -> NativeQuadTextureCoords {
    let lerp = |a: [f32; 2], b: [f32; 2], t: f32| [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t];
    let at = |x: f32, y: f32| {
        let s = (x - outer.left) / outer.width();
        let t = (y - outer.top) / outer.height();
        let top = lerp(uv.top_left, uv.top_right, s);
        let bottom = lerp(uv.bottom_left, uv.bottom_right, s);
        lerp(top, bottom, t)
    };
    NativeQuadTextureCoords {
        top_left: at(inner.left, inner.top),
        top_right: at(inner.right, inner.top),
        bottom_left: at(inner.left, inner.bottom),
        bottom_right: at(inner.right, inner.bottom),
    }
}

/// TL, TR, BL, BR.
#[inline]
fn rect_corners(r: Rect) -> [Vec2; 4] {
    [
        Vec2::new(r.left, r.top),
        Vec2::new(r.right, r.top),
        Vec2::new(r.left, r.bottom),
        Vec2::new(r.right, r.bottom),
    ]
}
