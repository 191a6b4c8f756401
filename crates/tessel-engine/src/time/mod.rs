//! Frame timing.
//!
//! One `FrameClock` per loop; `tick()` once per frame. The fixed step mode
//! drives replayed input and particle runs.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
