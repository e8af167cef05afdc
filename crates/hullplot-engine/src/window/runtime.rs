use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "hullplot".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
        }
    }
}

/// Runtime requests made from inside a frame callback.
///
/// Applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
    error: Option<anyhow::Error>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    /// Exits and makes [`Runtime::run`] return `err`.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.error = Some(err);
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the app exits.
    ///
    /// Fails when no window or GPU device can be created.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    /// First fatal error, returned from `Runtime::run`.
    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            error: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let app = &mut self.app;
        let mut runtime_ctx = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            let time = fields.clock.tick();

            {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime_ctx,
                };
                control = app.on_frame(&mut ctx);
            }

            fields.input_frame.clear();
        });

        if let Some(err) = runtime_ctx.take_error() {
            self.error.get_or_insert(err);
        }
        if control == AppControl::Exit || runtime_ctx.exit_requested() {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.error = Some(err);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw keeps keyboard orbiting smooth.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut exit_from_app_event = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if app.on_window_event(window_id, &event) == AppControl::Exit {
                exit_from_app_event = true;
            }
        });

        if exit_from_app_event {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_requests_exit_and_keeps_error() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());

        ctx.fail(anyhow::anyhow!("no adapter"));
        assert!(ctx.exit_requested());
        assert_eq!(ctx.take_error().map(|e| e.to_string()).as_deref(), Some("no adapter"));
        assert!(ctx.take_error().is_none());
    }

    #[test]
    fn plain_exit_carries_no_error() {
        let mut ctx = RuntimeCtx::default();
        ctx.exit();
        assert!(ctx.exit_requested());
        assert!(ctx.take_error().is_none());
    }
}
