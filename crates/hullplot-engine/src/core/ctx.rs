use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::projection::CanvasSize;
use crate::render::RenderTarget;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::AppControl;

pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback duration, `'w` the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the surface, lets `draw` encode into it and presents.
    ///
    /// Surface loss is handled here: the frame is skipped, or the app is told
    /// to exit when the error is fatal. Nothing is drawn while the window has
    /// no area (minimized).
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                };
            }
        };

        // The acquired texture keeps its configured size even after a resize
        // to zero, so attachments are sized from the texture itself.
        let Some(size) = drawable_size(self.gpu.size(), frame.surface_texture.texture.size()) else {
            return AppControl::Continue;
        };

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, size);
            draw(&mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

fn drawable_size(window: PhysicalSize<u32>, texture: wgpu::Extent3d) -> Option<CanvasSize> {
    let has_area = |w: u32, h: u32| w > 0 && h > 0;
    if !has_area(window.width, window.height) || !has_area(texture.width, texture.height) {
        return None;
    }
    Some(CanvasSize::new(texture.width, texture.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(width: u32, height: u32) -> wgpu::Extent3d {
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 }
    }

    #[test]
    fn target_follows_acquired_texture() {
        let size = drawable_size(PhysicalSize::new(1024, 768), extent(800, 600));
        assert_eq!(size, Some(CanvasSize::new(800, 600)));
    }

    #[test]
    fn minimized_window_draws_nothing() {
        assert_eq!(drawable_size(PhysicalSize::new(0, 0), extent(800, 600)), None);
        assert_eq!(drawable_size(PhysicalSize::new(800, 0), extent(800, 600)), None);
    }

    #[test]
    fn empty_texture_draws_nothing() {
        assert_eq!(drawable_size(PhysicalSize::new(800, 600), extent(0, 600)), None);
    }
}
