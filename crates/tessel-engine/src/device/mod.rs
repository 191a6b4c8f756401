//! GPU device management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for offscreen rendering.
//! Nothing outside `device` and `render` touches wgpu types.

mod gpu;

pub use gpu::{Gpu, GpuInit};
