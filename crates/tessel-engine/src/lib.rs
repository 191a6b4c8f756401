//! Tessel engine crate.
//!
//! 2D sprite batching for UI: pixel/density coordinates, sprite descriptors,
//! the quad batcher and its wgpu backend, handle-based UI meshes, the draw
//! command buffer, plus particles and input replay.

pub mod batch;
pub mod config;
pub mod context;
pub mod coords;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod particles;
pub mod render;
pub mod scene;
pub mod sprite;
pub mod text;
pub mod time;

pub use context::EngineContext;
pub use error::{Error, ErrorKind, Result};
