use crate::error::Result;

use super::strategy::BatchSegment;
use super::vertex::{SpriteQuad, SpriteVertex};

/// Receives the geometry of one finished batch scope.
///
/// `quads` holds every quad of the scope in submission order; each segment
/// addresses a contiguous run of it. Segments are never empty.
pub trait BatchBackend {
    fn submit(&mut self, quads: &[SpriteQuad], segments: &[BatchSegment]) -> Result<()>;
}

impl<B: BatchBackend + ?Sized> BatchBackend for &mut B {
    fn submit(&mut self, quads: &[SpriteQuad], segments: &[BatchSegment]) -> Result<()> {
        (**self).submit(quads, segments)
    }
}

/// One `submit` call captured by [`RecordingBackend`].
#[derive(Debug, Clone, Default)]
pub struct RecordedSubmit {
    pub vertices: Vec<SpriteVertex>,
    pub segments: Vec<BatchSegment>,
}

impl RecordedSubmit {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Keeps every submission in memory. Used by tests and tools that inspect
/// the draw stream without a GPU.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub submits: Vec<RecordedSubmit>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments across all submits, in order.
    pub fn segments(&self) -> impl Iterator<Item = &BatchSegment> {
        self.submits.iter().flat_map(|s| s.segments.iter())
    }

    pub fn last(&self) -> Option<&RecordedSubmit> {
        self.submits.last()
    }

    pub fn clear(&mut self) {
        self.submits.clear();
    }
}

impl BatchBackend for RecordingBackend {
    fn submit(&mut self, quads: &[SpriteQuad], segments: &[BatchSegment]) -> Result<()> {
        self.submits.push(RecordedSubmit {
            vertices: quads.iter().flatten().copied().collect(),
            segments: segments.to_vec(),
        });
        Ok(())
    }
}
