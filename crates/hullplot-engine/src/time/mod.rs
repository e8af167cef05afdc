//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per presented frame.
//! Keyboard orbiting scales by `FrameTime::dt`, so spin speed does not depend
//! on the display refresh rate.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
