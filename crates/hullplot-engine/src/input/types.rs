/// Keys the viewer reacts to.
///
/// Anything else maps to `Key::Other` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    R,
    Plus,
    Minus,
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Approximate pixels per line for touchpads reporting pixel deltas.
    const PIXELS_PER_LINE: f32 = 40.0;

    /// Vertical amount in lines.
    pub fn lines_y(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Pointer position in logical pixels.
    PointerMoved { x: f32, y: f32 },

    PointerButton {
        button: MouseButton,
        state: MouseButtonState,
    },

    MouseWheel(MouseWheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
