use crate::coords::{Rect, Vec2};
use crate::mesh::MeshHandle;
use crate::paint::Color;

use super::cmd::{DrawCommand, ImageDrawCmd, NineSliceDrawCmd, TextDrawCmd};
use super::key::{SortKey, ZIndex};

/// A recorded command with its paint order key and effective clip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCommand,
    /// Scissor rect in pixels. `None` draws everywhere.
    pub clip_rect: Option<Rect>,
}

/// Per-frame UI draw stream.
///
/// Commands are recorded while walking the widget tree. Paint order is
/// ascending z, then traversal order; with equal z everywhere the paint order
/// is exactly the traversal order.
///
/// `push` is O(1); paint-order iteration reuses an internal index buffer.
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) scope
/// commands to a rect intersected with every enclosing clip.
#[derive(Debug, Default)]
pub struct DrawCommandBuffer {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    /// Effective clips; the top is already intersected with its parents.
    clip_stack: Vec<Rect>,
}

impl DrawCommandBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            sorted_indices: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Drops every command and clip. Capacity is kept.
    pub fn clear(&mut self) {
        if !self.clip_stack.is_empty() {
            log::warn!("draw command buffer cleared with {} unbalanced clips", self.clip_stack.len());
        }
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Commands in recording order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Records `cmd` on layer `z` under the current clip.
    pub fn push(&mut self, z: ZIndex, cmd: DrawCommand) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });
        self.sorted_dirty = true;
    }

    pub fn push_image(&mut self, z: ZIndex, mesh: MeshHandle, dst: Rect, color: Color) {
        self.push(z, DrawCommand::Image(ImageDrawCmd { mesh, dst, color }));
    }

    pub fn push_nine_slice(&mut self, z: ZIndex, mesh: MeshHandle, dst: Rect, color: Color) {
        self.push(
            z,
            DrawCommand::NineSlice(NineSliceDrawCmd { mesh, dst, color, rotated_90_cw: false }),
        );
    }

    pub fn push_nine_slice_rotated(&mut self, z: ZIndex, mesh: MeshHandle, dst: Rect, color: Color) {
        self.push(
            z,
            DrawCommand::NineSlice(NineSliceDrawCmd { mesh, dst, color, rotated_90_cw: true }),
        );
    }

    pub fn push_text(&mut self, z: ZIndex, mesh: MeshHandle, position: Vec2, color: Color) {
        self.push(z, DrawCommand::Text(TextDrawCmd { mesh, position, color }));
    }

    /// Starts a clip region; must be balanced with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // disjoint with the parent: an empty clip hides everything inside
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// # Panics
    /// In debug builds, if there is no matching `push_clip`.
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    #[inline]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Indices into [`items`](Self::items) in paint order.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());
        let items = &self.items;
        self.sorted_indices.sort_by_key(|&i| items[i].key);
        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32) -> Rect {
        Rect::new(x, 0.0, 10.0, 10.0)
    }

    #[test]
    fn equal_z_paints_in_traversal_order() {
        let mut b = DrawCommandBuffer::new();
        for i in 0..4 {
            b.push_image(ZIndex(0), MeshHandle::INVALID, rect(i as f32), Color::WHITE);
        }
        assert_eq!(b.indices_in_paint_order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn higher_z_paints_later() {
        let mut b = DrawCommandBuffer::new();
        b.push_image(ZIndex(2), MeshHandle::INVALID, rect(0.0), Color::WHITE);
        b.push_image(ZIndex(0), MeshHandle::INVALID, rect(1.0), Color::WHITE);
        b.push_image(ZIndex(2), MeshHandle::INVALID, rect(2.0), Color::WHITE);
        assert_eq!(b.indices_in_paint_order(), &[1, 0, 2]);
    }

    #[test]
    fn clips_nest_by_intersection() {
        let mut b = DrawCommandBuffer::new();
        b.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        b.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        b.push_text(ZIndex(0), MeshHandle::INVALID, Vec2::zero(), Color::WHITE);
        b.pop_clip();
        b.push_text(ZIndex(0), MeshHandle::INVALID, Vec2::zero(), Color::WHITE);
        b.pop_clip();
        b.push_text(ZIndex(0), MeshHandle::INVALID, Vec2::zero(), Color::WHITE);

        let clips: Vec<_> = b.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(50.0, 50.0, 50.0, 50.0)),
                Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
                None
            ]
        );
    }

    #[test]
    fn disjoint_clip_is_empty() {
        let mut b = DrawCommandBuffer::new();
        b.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        b.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        assert!(b.current_clip().unwrap().is_empty());
    }

    #[test]
    fn clear_resets_order() {
        let mut b = DrawCommandBuffer::new();
        b.push_image(ZIndex(0), MeshHandle::INVALID, rect(0.0), Color::WHITE);
        b.clear();
        assert!(b.is_empty());
        b.push_image(ZIndex(0), MeshHandle::INVALID, rect(0.0), Color::WHITE);
        assert_eq!(b.items()[0].key.order, 0);
        assert_eq!(b.iter_in_paint_order().count(), 1);
    }
}
