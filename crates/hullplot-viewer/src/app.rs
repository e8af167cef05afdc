use hullplot_engine::core::{App, AppControl, FrameCtx};
use hullplot_engine::input::{InputFrame, InputState, Key, MouseButton};
use hullplot_engine::render::{RenderBackend, WgpuBackend};
use hullplot_engine::{
    CanvasSize, Color, Dataset, OrbitConfig, OrbitController, Plot, PlotConfig, PlotError, Rgba8,
};

use crate::cli::Args;

/// Appearance and control settings for the viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub point_color: Rgba8,
    pub mesh_color: Rgba8,
    pub edge_color: Rgba8,
    pub background: Color,
    pub double_sided: bool,
    pub orbit: OrbitConfig,
}

impl From<&Args> for ViewerConfig {
    fn from(args: &Args) -> Self {
        Self {
            point_color: args.point_color,
            mesh_color: args.mesh_color,
            edge_color: args.edge_color,
            background: args.background,
            double_sided: args.double_sided,
            orbit: OrbitConfig::default(),
        }
    }
}

/// Plot viewer driven by the engine runtime.
///
/// The plot is built on the first frame, once the GPU device exists.
pub struct ViewerApp {
    dataset: Dataset,
    config: ViewerConfig,
    scale: f32,
    orbit: OrbitController,
    plot: Option<Plot<WgpuBackend>>,
}

impl ViewerApp {
    pub fn new(dataset: Dataset, config: ViewerConfig) -> Self {
        // A single point has no extent; fall back to a unit window.
        let scale = if dataset.extent() > 0.0 { dataset.extent() } else { 1.0 };
        let orbit = OrbitController::new(0.0, 0.0, scale, config.orbit);
        Self {
            dataset,
            config,
            scale,
            orbit,
            plot: None,
        }
    }

    fn plot_config(&self, canvas: CanvasSize) -> PlotConfig {
        PlotConfig::new(canvas, 1.5 * self.scale, 4.0 * self.scale)
            .with_background(self.config.background)
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if apply_input(&mut self.orbit, ctx.input, ctx.input_frame, ctx.time.dt) == AppControl::Exit {
            return AppControl::Exit;
        }

        if self.plot.is_none() {
            let backend = WgpuBackend::new(&ctx.gpu.render_ctx());
            let config = self.plot_config(ctx.gpu.canvas_size());
            match build_plot(backend, config, &self.dataset, &self.config) {
                Ok(plot) => self.plot = Some(plot),
                Err(e) => {
                    ctx.runtime.fail(anyhow::Error::new(e).context("cannot build plot"));
                    return AppControl::Exit;
                }
            }
        }
        let Some(plot) = self.plot.as_mut() else {
            return AppControl::Exit;
        };

        plot.backend_mut().resize(ctx.gpu.canvas_size());
        plot.move_camera(self.orbit.angles(), self.orbit.distance());
        plot.draw_scene();

        ctx.render(|target| plot.backend_mut().encode(target))
    }
}

/// Builds the plot and adds the dataset as mesh, edge and point batches.
///
/// A batch that cannot be created is logged and skipped; the others are
/// still added.
fn build_plot<B: RenderBackend>(
    backend: B,
    plot_config: PlotConfig,
    dataset: &Dataset,
    config: &ViewerConfig,
) -> Result<Plot<B>, PlotError> {
    let mut plot = Plot::new(backend, plot_config)?;

    if !dataset.facets().is_empty() {
        let mesh = dataset.facet_triangles(config.double_sided);
        if let Err(e) = plot.add_mesh(&mesh, config.mesh_color) {
            log::warn!("facets not shown: {e}");
        }
        if let Err(e) = plot.add_segments(&dataset.facet_edges(), config.edge_color) {
            log::warn!("facet edges not shown: {e}");
        }
    }
    if let Err(e) = plot.add_points(dataset.points(), config.point_color) {
        log::warn!("points not shown: {e}");
    }

    log::info!("plot ready with {} batches", plot.batches().len());
    Ok(plot)
}

/// Maps this frame's input onto the orbit.
fn apply_input(
    orbit: &mut OrbitController,
    input: &InputState,
    frame: &InputFrame,
    dt: f32,
) -> AppControl {
    if frame.keys_pressed.contains(&Key::Escape) {
        return AppControl::Exit;
    }
    if frame.keys_pressed.contains(&Key::R) {
        orbit.reset();
    }

    if input.button_down(MouseButton::Left) {
        let (dx, dy) = frame.pointer_delta;
        orbit.drag(dx, dy);
    }

    let axis = |neg: Key, pos: Key| input.key_down(pos) as i8 as f32 - input.key_down(neg) as i8 as f32;
    let yaw = axis(Key::ArrowLeft, Key::ArrowRight);
    let pitch = axis(Key::ArrowDown, Key::ArrowUp);
    if yaw != 0.0 || pitch != 0.0 {
        orbit.spin(yaw, pitch, dt);
    }

    let mut zoom = frame.wheel_lines;
    if frame.keys_pressed.contains(&Key::Plus) {
        zoom += 1.0;
    }
    if frame.keys_pressed.contains(&Key::Minus) {
        zoom -= 1.0;
    }
    if zoom != 0.0 {
        orbit.zoom(zoom);
    }

    AppControl::Continue
}
