//! UI draw command recording and lowering.
//!
//! Responsibilities:
//! - record mesh draws in traversal order with z-layer and clip
//! - optionally reorder them to save batch state changes while keeping
//!   overlapping draws in painter order
//! - lower commands to [`NativeBatch2D`](crate::batch::NativeBatch2D) calls

mod buffer;
mod cmd;
mod drawable;
mod key;
mod reorder;
mod ui_render;

pub use buffer::{DrawCommandBuffer, DrawItem};
pub use cmd::{DrawCommand, ImageDrawCmd, NineSliceDrawCmd, TextDrawCmd};
pub use drawable::Drawable;
pub use key::{SortKey, ZIndex};
pub use reorder::{DrawReorder, ReorderItem};
pub use ui_render::{UiRenderStats, UiRenderSystem};
