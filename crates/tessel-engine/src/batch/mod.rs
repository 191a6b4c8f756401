//! Immediate-mode quad batching.
//!
//! [`NativeBatch2D`] records textured quads between `begin` and `end` and
//! hands them to a [`BatchBackend`] grouped into runs of identical
//! (texture, blend) state. The GPU backend lives in `render`; tests use
//! [`RecordingBackend`].

mod backend;
mod native_batch;
mod strategy;
mod vertex;

pub use backend::{BatchBackend, RecordedSubmit, RecordingBackend};
pub use native_batch::{BatchPhase, BatchStats, NativeBatch2D};
pub use strategy::{BatchByState, BatchSegment, BatchState};
pub use vertex::{
    build_quad, quad_indices, SpriteQuad, SpriteVertex, INDICES_PER_QUAD, MAX_QUADS_PER_DRAW,
    VERTICES_PER_QUAD,
};
