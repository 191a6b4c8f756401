use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Wheel delta. `Line` is notched scrolling, `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line(Vec2),
    Pixel(Vec2),
}

/// A pointer or touch event in pixels.
///
/// Events carry their own position so replay does not depend on an
/// external "current pointer" state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputCommandKind {
    PointerMoved { position: Vec2 },
    PointerButton { button: MouseButton, state: ButtonState, position: Vec2 },
    Wheel { delta: WheelDelta, position: Vec2 },
    /// Pointer left the surface.
    PointerLeft,
    Touch { id: u64, phase: TouchPhase, position: Vec2 },
}

impl InputCommandKind {
    /// Position the event happened at, if it has one.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            InputCommandKind::PointerMoved { position }
            | InputCommandKind::PointerButton { position, .. }
            | InputCommandKind::Wheel { position, .. }
            | InputCommandKind::Touch { position, .. } => Some(position),
            InputCommandKind::PointerLeft => None,
        }
    }
}
