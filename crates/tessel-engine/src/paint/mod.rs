//! Color model shared by sprites, batches and the GPU backend.
//!
//! Colors are linear premultiplied RGBA. Vertex tint and blending both assume
//! premultiplied values.

pub mod color;

pub use color::Color;
