//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window events into `InputEvent`s.

pub(crate) mod platform;
mod state;
mod types;

pub use state::{InputFrame, InputState};
pub use types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, MouseWheelDelta};
