//! Contract between the runtime loop and the application.

mod ctx;

use winit::event::WindowEvent;
use winit::window::WindowId;

pub use ctx::{FrameCtx, WindowCtx};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`Runtime`](crate::window::Runtime).
///
/// Input is already folded into `FrameCtx::input`/`input_frame` by the time
/// `on_frame` runs, so most apps only implement that.
pub trait App {
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
