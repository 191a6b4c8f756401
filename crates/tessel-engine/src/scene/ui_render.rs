use crate::batch::{BatchBackend, BatchState, NativeBatch2D};
use crate::config::RenderOptions;
use crate::coords::Rect;
use crate::error::{Error, Result};
use crate::mesh::{MeshContent, MeshManager, MeshRecord};
use crate::paint::Color;
use crate::sprite::Sprite;

use super::buffer::{DrawCommandBuffer, DrawItem};
use super::cmd::DrawCommand;
use super::reorder::{DrawReorder, ReorderItem};

/// Counters for one [`UiRenderSystem::draw`] call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UiRenderStats {
    pub commands: u32,
    pub drawn: u32,
    /// Commands whose mesh was destroyed before rendering.
    pub skipped_stale: u32,
}

/// Lowers a [`DrawCommandBuffer`] into batch draws.
#[derive(Debug, Default)]
pub struct UiRenderSystem {
    options: RenderOptions,
    reorder: DrawReorder,
    infos: Vec<ReorderItem>,
    paint: Vec<usize>,
    schedule: Vec<usize>,
}

impl UiRenderSystem {
    pub fn new(options: RenderOptions) -> Self {
        Self { options, ..Self::default() }
    }

    #[inline]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Draws every command of `buffer` into the open scope of `batch`.
    ///
    /// Commands whose mesh is gone are skipped with a warning. A command whose
    /// kind does not fit its mesh is a `Usage` error, as is calling this
    /// outside a batch scope.
    pub fn draw<B: BatchBackend>(
        &mut self,
        buffer: &mut DrawCommandBuffer,
        meshes: &MeshManager,
        batch: &mut NativeBatch2D<B>,
    ) -> Result<UiRenderStats> {
        if !batch.is_recording() {
            return Err(Error::usage("UiRenderSystem::draw needs an open batch scope"));
        }

        self.paint.clear();
        self.paint.extend_from_slice(buffer.indices_in_paint_order());
        let items = buffer.items();

        if self.options.draw_reorder {
            self.infos.clear();
            self.infos.extend(self.paint.iter().map(|&i| reorder_item(&items[i], meshes)));
            self.reorder.schedule(&self.infos, &mut self.schedule);
            for s in &mut self.schedule {
                *s = self.paint[*s];
            }
        } else {
            self.schedule.clear();
            self.schedule.extend_from_slice(&self.paint);
        }

        let mut stats = UiRenderStats { commands: items.len() as u32, ..Default::default() };
        let clip_before = batch.clip_rect();
        let mut result = Ok(());
        for &i in &self.schedule {
            let item = &items[i];
            let Some(record) = meshes.try_get(item.cmd.mesh()) else {
                log::warn!("skipping draw of stale mesh {:?}", item.cmd.mesh().raw());
                stats.skipped_stale += 1;
                continue;
            };
            batch.set_clip_rect(item.clip_rect);
            if let Err(e) = lower(&item.cmd, record, batch) {
                result = Err(e);
                break;
            }
            stats.drawn += 1;
        }
        batch.set_clip_rect(clip_before);
        result.map(|()| stats)
    }
}

fn lower<B: BatchBackend>(cmd: &DrawCommand, record: &MeshRecord, batch: &mut NativeBatch2D<B>) -> Result<()> {
    match (cmd, record.content()) {
        (DrawCommand::Image(c), MeshContent::Sprite(s)) => draw_sprite(batch, s, c.dst, c.color),
        (DrawCommand::NineSlice(c), MeshContent::Sprite(s)) if !c.rotated_90_cw => {
            draw_sprite(batch, s, c.dst, c.color)
        }
        (DrawCommand::NineSlice(c), MeshContent::Sprite(Sprite::NineSlice(s))) => {
            batch.draw_nine_slice_rotated_90_cw(s, c.dst, c.color)
        }
        (DrawCommand::NineSlice(c), MeshContent::Sprite(Sprite::OptimizedNineSlice(s))) => {
            batch.draw_nine_slice_rotated_90_cw(&s.info, c.dst, c.color)
        }
        (DrawCommand::Text(c), MeshContent::Text(t)) => batch.draw_string(&t.font, &t.text, c.position, c.color),
        _ => Err(Error::usage(format!(
            "{} command can not draw a {:?} mesh",
            command_name(cmd),
            record.kind()
        ))),
    }
}

fn draw_sprite<B: BatchBackend>(batch: &mut NativeBatch2D<B>, sprite: &Sprite, dst: Rect, color: Color) -> Result<()> {
    match sprite {
        Sprite::Image(s) => batch.draw_image(s, dst, color),
        Sprite::NineSlice(s) => batch.draw_nine_slice(s, dst, color),
        Sprite::OptimizedNineSlice(s) => batch.draw_optimized_nine_slice(s, dst, color),
    }
}

fn command_name(cmd: &DrawCommand) -> &'static str {
    match cmd {
        DrawCommand::Image(_) => "image",
        DrawCommand::NineSlice(_) => "nine-slice",
        DrawCommand::Text(_) => "text",
    }
}

fn reorder_item(item: &DrawItem, meshes: &MeshManager) -> ReorderItem {
    let Some(record) = meshes.try_get(item.cmd.mesh()) else {
        return ReorderItem { state: None, bounds: Rect::default() };
    };
    let (state, bounds) = match (&item.cmd, record.content()) {
        (DrawCommand::Image(c), MeshContent::Sprite(s)) => (sprite_state(s), c.dst),
        (DrawCommand::NineSlice(c), MeshContent::Sprite(s)) => (sprite_state(s), c.dst),
        (DrawCommand::Text(c), MeshContent::Text(t)) => {
            let m = t.font.material();
            (Some(BatchState::new(m.texture, m.blend)), t.font.bounds(&t.text, c.position))
        }
        // fails when lowered; conflicting with everything keeps it in place
        _ => (None, Rect::from_ltrb(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::INFINITY)),
    };
    let bounds = match item.clip_rect {
        Some(clip) => bounds.intersect(clip).unwrap_or_default(),
        None => bounds,
    };
    ReorderItem { state, bounds }
}

fn sprite_state(sprite: &Sprite) -> Option<BatchState> {
    let m = sprite.material();
    Some(BatchState::new(m.texture, m.blend))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::batch::RecordingBackend;
    use crate::config::{BatchConfig, MeshManagerConfig};
    use crate::coords::{DensityConverter, PxExtent2D, PxPoint2, PxRectangle, Vec2};
    use crate::error::ErrorKind;
    use crate::mesh::MeshHandle;
    use crate::scene::ZIndex;
    use crate::sprite::{
        BlendState, ImageSpriteInfo, NativeTextureHandle, NativeTextureInfo, SpriteMaterialId,
        SpriteMaterialInfo, TextureOrigin,
    };
    use crate::text::{test_font, BitmapFont, BitmapFontChar, SpriteFont, TextLayoutOptions};

    fn material(tex: u32, extent: PxExtent2D) -> SpriteMaterialInfo {
        let t = NativeTextureInfo::new(NativeTextureHandle(tex), extent);
        SpriteMaterialInfo::new(SpriteMaterialId(tex), t, BlendState::AlphaBlend, TextureOrigin::TopLeft).unwrap()
    }

    fn image(meshes: &mut MeshManager, tex: u32) -> MeshHandle {
        let sprite =
            ImageSpriteInfo::full_texture(material(tex, PxExtent2D::new(10, 10)), 160, &DensityConverter::default())
                .unwrap();
        meshes.create_mesh(sprite)
    }

    fn destroy_all(meshes: &mut MeshManager) {
        let handles: Vec<_> = meshes.iter().map(|(h, _)| h).collect();
        for h in handles {
            meshes.destroy_mesh(h);
        }
    }

    fn batch() -> NativeBatch2D<RecordingBackend> {
        let mut b = NativeBatch2D::new(RecordingBackend::new(), &BatchConfig::default());
        b.begin_default().unwrap();
        b
    }

    fn at(x: f32) -> Rect {
        Rect::new(x, 0.0, 10.0, 10.0)
    }

    /// Four disjoint images alternating between two textures.
    fn alternating(meshes: &mut MeshManager) -> DrawCommandBuffer {
        let a = image(meshes, 1);
        let b = image(meshes, 2);
        let mut buf = DrawCommandBuffer::new();
        for (i, m) in [a, b, a, b].into_iter().enumerate() {
            buf.push_image(ZIndex(0), m, at(i as f32 * 20.0), Color::WHITE);
        }
        buf
    }

    /// Font whose only glyph 'j' hangs 6 px left of the pen.
    fn hanging_font(tex: u32) -> Rc<SpriteFont> {
        let j = BitmapFontChar {
            id: 'j' as u32,
            src_rect: PxRectangle::create(24, 0, 8, 10),
            offset: PxPoint2::new(-6, 0),
            x_advance: 4,
        };
        let font = BitmapFont::new("hanging", 12, 14, 10, PxExtent2D::new(64, 16), vec![j], vec![]).unwrap();
        Rc::new(SpriteFont::new(material(tex, PxExtent2D::new(64, 16)), font, TextLayoutOptions::default()).unwrap())
    }

    /// Destination rect of every quad the batch submitted, in paint order.
    fn painted(buf: &mut DrawCommandBuffer, meshes: &MeshManager, draw_reorder: bool) -> (Vec<Rect>, u32) {
        let mut b = batch();
        UiRenderSystem::new(RenderOptions { draw_reorder }).draw(buf, meshes, &mut b).unwrap();
        let segments = b.end().unwrap().segments;
        let rects = b
            .backend()
            .last()
            .unwrap()
            .vertices
            .chunks(4)
            .map(|q| Rect::from_ltrb(q[0].position[0], q[0].position[1], q[3].position[0], q[3].position[1]))
            .collect();
        (rects, segments)
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn traversal_order_by_default() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let mut buf = alternating(&mut meshes);
        let mut b = batch();
        let stats = UiRenderSystem::new(RenderOptions::default()).draw(&mut buf, &meshes, &mut b).unwrap();
        assert_eq!(stats, UiRenderStats { commands: 4, drawn: 4, skipped_stale: 0 });
        assert_eq!(b.end().unwrap().segments, 4);
        destroy_all(&mut meshes);
    }

    #[test]
    fn reorder_merges_disjoint_draws() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let mut buf = alternating(&mut meshes);
        let mut b = batch();
        let mut system = UiRenderSystem::new(RenderOptions { draw_reorder: true });
        system.draw(&mut buf, &meshes, &mut b).unwrap();
        assert_eq!(b.end().unwrap().segments, 2);
        let xs: Vec<_> = b.backend().last().unwrap().vertices.chunks(4).map(|q| q[0].position[0]).collect();
        assert_eq!(xs, vec![0.0, 40.0, 20.0, 60.0]);
        destroy_all(&mut meshes);
    }

    #[test]
    fn reorder_respects_glyphs_left_of_text_origin() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let far = image(&mut meshes, 1);
        let near = image(&mut meshes, 1);
        let text = meshes.create_text_mesh(hanging_font(2), "j").unwrap();
        let mut buf = DrawCommandBuffer::new();
        buf.push_image(ZIndex(0), far, at(200.0), Color::WHITE);
        // glyph covers x 14..22, the image after it 10..20
        buf.push_text(ZIndex(0), text, Vec2::new(20.0, 0.0), Color::WHITE);
        buf.push_image(ZIndex(0), near, at(10.0), Color::WHITE);

        let (rects, _) = painted(&mut buf, &meshes, true);
        let xs: Vec<_> = rects.iter().map(|r| r.left).collect();
        assert_eq!(xs, vec![200.0, 14.0, 10.0]);
        destroy_all(&mut meshes);
    }

    #[test]
    fn reorder_keeps_overlapping_quads_in_paint_order() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let a = image(&mut meshes, 1);
        let b = image(&mut meshes, 2);
        let text = meshes.create_text_mesh(hanging_font(3), "jj").unwrap();
        let mut buf = DrawCommandBuffer::new();
        buf.push_image(ZIndex(0), a, at(0.0), Color::WHITE);
        buf.push_image(ZIndex(0), b, at(5.0), Color::WHITE);
        // glyphs at 34..42 and 38..46
        buf.push_text(ZIndex(0), text, Vec2::new(40.0, 0.0), Color::WHITE);
        buf.push_image(ZIndex(0), a, at(30.0), Color::WHITE);
        buf.push_image(ZIndex(0), b, at(60.0), Color::WHITE);
        buf.push_image(ZIndex(0), a, at(80.0), Color::WHITE);

        let (plain, plain_segments) = painted(&mut buf, &meshes, false);
        let (reordered, reordered_segments) = painted(&mut buf, &meshes, true);
        assert_eq!((plain_segments, reordered_segments), (6, 4));
        assert_eq!(plain.len(), reordered.len());

        let position = |r: &Rect| reordered.iter().position(|q| q == r).unwrap();
        for j in 0..plain.len() {
            for i in 0..j {
                if plain[i].overlaps(plain[j]) {
                    assert!(
                        position(&plain[i]) < position(&plain[j]),
                        "{:?} must stay under {:?}",
                        plain[i],
                        plain[j]
                    );
                }
            }
        }
        destroy_all(&mut meshes);
    }

    // ── robustness ────────────────────────────────────────────────────────

    #[test]
    fn stale_mesh_is_skipped() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let live = image(&mut meshes, 1);
        let dead = image(&mut meshes, 1);
        meshes.destroy_mesh(dead);
        let mut buf = DrawCommandBuffer::new();
        buf.push_image(ZIndex(0), dead, at(0.0), Color::WHITE);
        buf.push_image(ZIndex(0), live, at(20.0), Color::WHITE);

        let mut b = batch();
        let stats = UiRenderSystem::default().draw(&mut buf, &meshes, &mut b).unwrap();
        assert_eq!((stats.drawn, stats.skipped_stale), (1, 1));
        meshes.destroy_mesh(live);
    }

    #[test]
    fn kind_mismatch_is_usage_error() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let img = image(&mut meshes, 1);
        let mut buf = DrawCommandBuffer::new();
        buf.push_text(ZIndex(0), img, Vec2::zero(), Color::WHITE);
        let mut b = batch();
        let err = UiRenderSystem::default().draw(&mut buf, &meshes, &mut b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        meshes.destroy_mesh(img);
    }

    #[test]
    fn idle_batch_is_usage_error() {
        let meshes = MeshManager::new(&MeshManagerConfig::default());
        let mut b = NativeBatch2D::new(RecordingBackend::new(), &BatchConfig::default());
        let err = UiRenderSystem::default().draw(&mut DrawCommandBuffer::new(), &meshes, &mut b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    // ── lowering ──────────────────────────────────────────────────────────

    #[test]
    fn clip_is_applied_and_restored() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let img = image(&mut meshes, 1);
        let mut buf = DrawCommandBuffer::new();
        buf.push_clip(Rect::new(0.0, 0.0, 5.0, 100.0));
        buf.push_image(ZIndex(0), img, at(0.0), Color::WHITE);
        buf.pop_clip();

        let mut b = batch();
        UiRenderSystem::default().draw(&mut buf, &meshes, &mut b).unwrap();
        assert_eq!(b.clip_rect(), None);
        b.end().unwrap();
        let v = &b.backend().last().unwrap().vertices;
        assert_eq!(v[1].position, [5.0, 0.0]);
        meshes.destroy_mesh(img);
    }

    #[test]
    fn text_command_draws_glyphs() {
        let mut meshes = MeshManager::new(&MeshManagerConfig::default());
        let font = Rc::new(
            SpriteFont::new(material(5, PxExtent2D::new(64, 16)), test_font(), TextLayoutOptions::default()).unwrap(),
        );
        let text = meshes.create_text_mesh(font, "AVA").unwrap();
        let mut buf = DrawCommandBuffer::new();
        buf.push_text(ZIndex(0), text, Vec2::new(4.0, 4.0), Color::WHITE);

        let mut b = batch();
        UiRenderSystem::default().draw(&mut buf, &meshes, &mut b).unwrap();
        assert_eq!(b.end().unwrap().quads, 3);
        meshes.destroy_mesh(text);
    }
}
