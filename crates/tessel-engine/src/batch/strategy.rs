use crate::sprite::{BlendState, NativeTextureInfo};

use super::vertex::SpriteQuad;

/// GPU state a quad is drawn with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct BatchState {
    pub texture: NativeTextureInfo,
    pub blend: BlendState,
}

impl BatchState {
    #[inline]
    pub const fn new(texture: NativeTextureInfo, blend: BlendState) -> Self {
        Self { texture, blend }
    }
}

/// A run of consecutive quads sharing one state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BatchSegment {
    pub state: BatchState,
    pub first_quad: u32,
    pub quad_count: u32,
}

/// Accumulates quads in submission order, splitting them into segments
/// whenever the state changes.
///
/// A state change on a segment that has no quads yet re-targets that segment
/// (or folds it back into the previous segment if that one already has the
/// new state), so redundant state flips never produce empty draw calls.
#[derive(Debug)]
pub struct BatchByState {
    quads: Vec<SpriteQuad>,
    segments: Vec<BatchSegment>,
    grow_count: u32,
}

impl BatchByState {
    pub fn with_capacity(quad_capacity: usize) -> Self {
        Self {
            quads: Vec::with_capacity(quad_capacity),
            segments: Vec::new(),
            grow_count: 0,
        }
    }

    #[inline]
    pub fn quads(&self) -> &[SpriteQuad] {
        &self.quads
    }

    #[inline]
    pub fn segments(&self) -> &[BatchSegment] {
        &self.segments
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.quads.capacity()
    }

    /// Number of times the backing store had to grow since creation.
    #[inline]
    pub fn grow_count(&self) -> u32 {
        self.grow_count
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Makes `state` the state of subsequently added quads.
    pub fn set_state(&mut self, state: BatchState) {
        let Some(current) = self.segments.last_mut() else {
            self.segments.push(BatchSegment { state, first_quad: 0, quad_count: 0 });
            return;
        };

        if current.quad_count > 0 {
            if current.state != state {
                let first_quad = current.first_quad + current.quad_count;
                self.segments.push(BatchSegment { state, first_quad, quad_count: 0 });
            }
            return;
        }

        let len = self.segments.len();
        if len >= 2 && self.segments[len - 2].state == state {
            self.segments.pop();
        } else if let Some(current) = self.segments.last_mut() {
            current.state = state;
        }
    }

    /// Appends a quad to the current segment. `set_state` must have been called.
    pub fn add_quad(&mut self, quad: SpriteQuad) {
        debug_assert!(!self.segments.is_empty(), "add_quad before set_state");
        self.ensure_capacity(self.quads.len() + 1);
        self.quads.push(quad);
        if let Some(seg) = self.segments.last_mut() {
            seg.quad_count += 1;
        }
    }

    /// Grows the backing store so at least `quad_capacity` quads fit.
    pub fn ensure_capacity(&mut self, quad_capacity: usize) {
        if quad_capacity <= self.quads.capacity() {
            return;
        }
        let new_cap = quad_capacity.next_power_of_two().max(64);
        log::trace!("batch quad store grows {} -> {}", self.quads.capacity(), new_cap);
        self.quads.reserve_exact(new_cap - self.quads.len());
        self.grow_count += 1;
    }

    /// Drops all quads and segments; capacity is kept.
    pub fn clear(&mut self) {
        self.quads.clear();
        self.segments.clear();
    }

    /// Segments that contain quads.
    pub fn non_empty_segments(&self) -> impl Iterator<Item = &BatchSegment> {
        self.segments.iter().filter(|s| s.quad_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PxExtent2D;
    use crate::sprite::NativeTextureHandle;

    fn state(tex: u32, blend: BlendState) -> BatchState {
        BatchState::new(
            NativeTextureInfo::new(NativeTextureHandle(tex), PxExtent2D::new(8, 8)),
            blend,
        )
    }

    fn quad() -> SpriteQuad {
        Default::default()
    }

    #[test]
    fn same_state_shares_segment() {
        let mut b = BatchByState::with_capacity(4);
        let s = state(1, BlendState::AlphaBlend);
        b.set_state(s);
        b.add_quad(quad());
        b.set_state(s);
        b.add_quad(quad());
        assert_eq!(b.segments(), &[BatchSegment { state: s, first_quad: 0, quad_count: 2 }]);
    }

    #[test]
    fn state_change_starts_segment() {
        let mut b = BatchByState::with_capacity(4);
        b.set_state(state(1, BlendState::AlphaBlend));
        b.add_quad(quad());
        b.set_state(state(2, BlendState::AlphaBlend));
        b.add_quad(quad());
        b.add_quad(quad());
        let segs = b.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!((segs[1].first_quad, segs[1].quad_count), (1, 2));
    }

    #[test]
    fn empty_segment_is_retargeted() {
        let mut b = BatchByState::with_capacity(4);
        b.set_state(state(1, BlendState::AlphaBlend));
        b.set_state(state(2, BlendState::Opaque));
        b.add_quad(quad());
        assert_eq!(b.segments().len(), 1);
        assert_eq!(b.segments()[0].state, state(2, BlendState::Opaque));
    }

    #[test]
    fn flip_back_without_quads_merges_into_previous() {
        let mut b = BatchByState::with_capacity(4);
        let a = state(1, BlendState::AlphaBlend);
        b.set_state(a);
        b.add_quad(quad());
        b.set_state(state(2, BlendState::AlphaBlend));
        b.set_state(a);
        b.add_quad(quad());
        assert_eq!(b.segments(), &[BatchSegment { state: a, first_quad: 0, quad_count: 2 }]);
    }

    #[test]
    fn store_grows_and_clear_keeps_capacity() {
        let mut b = BatchByState::with_capacity(1);
        b.set_state(state(1, BlendState::AlphaBlend));
        for _ in 0..100 {
            b.add_quad(quad());
        }
        assert_eq!(b.quad_count(), 100);
        assert!(b.grow_count() >= 1);
        let cap = b.capacity();
        b.clear();
        assert!(b.is_empty());
        assert!(b.segments().is_empty());
        assert_eq!(b.capacity(), cap);
    }
}
