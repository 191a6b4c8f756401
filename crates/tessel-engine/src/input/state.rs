use std::collections::{HashMap, HashSet};

use crate::coords::Vec2;

use super::types::{ButtonState, InputCommandKind, MouseButton, TouchPhase, WheelDelta};

/// Pointer and touch state rebuilt from input commands.
///
/// Holds what is down now plus the transitions of the current frame; call
/// [`begin_frame`](Self::begin_frame) before applying a frame's commands.
#[derive(Debug, Default)]
pub struct PointerState {
    /// `None` while the pointer is outside the surface.
    pub position: Option<Vec2>,
    pub buttons_down: HashSet<MouseButton>,
    pub touches: HashMap<u64, Vec2>,

    pub pressed: HashSet<MouseButton>,
    pub released: HashSet<MouseButton>,
    /// Accumulated wheel movement this frame, in lines.
    pub wheel_lines: Vec2,
    /// Accumulated wheel movement this frame, in pixels.
    pub wheel_pixels: Vec2,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame transitions; held state is kept.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.wheel_lines = Vec2::zero();
        self.wheel_pixels = Vec2::zero();
    }

    pub fn apply(&mut self, kind: &InputCommandKind) {
        match *kind {
            InputCommandKind::PointerMoved { position } => {
                self.position = Some(position);
            }
            InputCommandKind::PointerButton { button, state, position } => {
                self.position = Some(position);
                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(button) {
                            self.pressed.insert(button);
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(&button) {
                            self.released.insert(button);
                        }
                    }
                }
            }
            InputCommandKind::Wheel { delta, position } => {
                self.position = Some(position);
                match delta {
                    WheelDelta::Line(d) => self.wheel_lines += d,
                    WheelDelta::Pixel(d) => self.wheel_pixels += d,
                }
            }
            InputCommandKind::PointerLeft => {
                self.position = None;
            }
            InputCommandKind::Touch { id, phase, position } => match phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    self.touches.insert(id, position);
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    self.touches.remove(&id);
                }
            },
        }
    }

    #[inline]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// True if `button` went down this frame.
    #[inline]
    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    #[inline]
    pub fn was_released(&self, button: MouseButton) -> bool {
        self.released.contains(&button)
    }
}
