//! Pointer input and deterministic replay.
//!
//! Platform event translation is not part of the engine; hosts feed
//! [`InputCommandKind`] values, either live or from an [`InputPlayback`].

mod replay;
mod state;
mod types;

pub use replay::{InputCommandRecord, InputPlayback, InputRecorder};
pub use state::PointerState;
pub use types::{ButtonState, InputCommandKind, MouseButton, TouchPhase, WheelDelta};
