use crate::camera::CameraFrame;
use crate::color::{Color, Rgba8};
use crate::error::{BackendError, PlotError};
use crate::math::{Mat4, Vec3};
use crate::projection::{CanvasSize, Projection};
use crate::render::shaders::{
    COLOR_LOCATION, FRAGMENT_SHADER, MATRIX_LOCATION, POSITION_LOCATION, VERTEX_SHADER,
};
use crate::render::{AttributeType, BufferHandle, BufferUsage, DrawMode, ProgramHandle, RenderBackend};

use super::PrimitiveBatch;

/// Construction parameters for [`Plot`].
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Canvas size in physical pixels.
    pub canvas: CanvasSize,

    /// Camera-space height mapped onto the canvas height.
    pub horizontal_window: f32,

    /// Camera-space depth mapped onto the clip depth range.
    pub depth_window: f32,

    pub background: Color,
}

impl PlotConfig {
    pub fn new(canvas: CanvasSize, horizontal_window: f32, depth_window: f32) -> Self {
        Self {
            canvas,
            horizontal_window,
            depth_window,
            background: Color::BLACK,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

/// Interactive 3D plot of points, segments and triangle meshes.
///
/// A `Plot` only exists once its backend context was acquired; a failed
/// [`Plot::new`] is the "unbuilt" state and nothing else can be called.
///
/// Usage:
/// ```ignore
/// let mut plot = Plot::new(backend, PlotConfig::new(CanvasSize::new(640, 480), 10.0, 100.0))?;
/// plot.add_points(&points, Rgba8::RED)?;
/// plot.move_camera((0.3, 0.2), 20.0);
/// plot.draw_scene();
/// ```
pub struct Plot<B: RenderBackend> {
    backend: B,
    config: PlotConfig,
    program: ProgramHandle,
    projection: Projection,
    camera: CameraFrame,
    batches: Vec<PrimitiveBatch>,
}

impl<B: RenderBackend> Plot<B> {
    pub fn new(mut backend: B, config: PlotConfig) -> Result<Self, PlotError> {
        if let Err(e) = backend.create_context() {
            log::error!("rendering backend not supported: {e}");
            return Err(e.into());
        }

        let program = backend
            .compile_link_program(VERTEX_SHADER, FRAGMENT_SHADER)
            .inspect_err(|e| log::error!("{e}"))?;

        backend.set_viewport(config.canvas);

        let projection = Projection::new(config.canvas, config.horizontal_window, config.depth_window);

        Ok(Self {
            backend,
            config,
            program,
            projection,
            camera: CameraFrame::orbit(0.0, 0.0, 0.0),
            batches: Vec::new(),
        })
    }

    /// Adds filled triangles; every three vertices form one triangle.
    pub fn add_mesh(&mut self, vertices: &[Vec3], color: Rgba8) -> Result<&PrimitiveBatch, PlotError> {
        self.add_flat(DrawMode::Triangles, vertices, color)
    }

    /// Adds line segments; every two vertices form one segment.
    pub fn add_segments(&mut self, vertices: &[Vec3], color: Rgba8) -> Result<&PrimitiveBatch, PlotError> {
        self.add_flat(DrawMode::Lines, vertices, color)
    }

    pub fn add_points(&mut self, vertices: &[Vec3], color: Rgba8) -> Result<&PrimitiveBatch, PlotError> {
        self.add_flat(DrawMode::Points, vertices, color)
    }

    /// Adds a batch with one color per vertex.
    pub fn add_batch(
        &mut self,
        mode: DrawMode,
        vertices: &[Vec3],
        colors: &[Rgba8],
    ) -> Result<&PrimitiveBatch, PlotError> {
        if colors.len() != vertices.len() {
            return Err(PlotError::ColorCountMismatch {
                vertices: vertices.len(),
                colors: colors.len(),
            });
        }
        self.push_batch(mode, vertices, colors)
    }

    /// Replaces the camera frame.
    pub fn move_camera(&mut self, rotation: (f32, f32), distance: f32) {
        self.camera = CameraFrame::orbit(rotation.0, rotation.1, distance);
    }

    /// Draws one complete frame.
    ///
    /// Sequence: clear, viewport to the display size, then per batch in
    /// insertion order: program, position + color attributes, matrix
    /// uniform, one draw call.
    pub fn draw_scene(&mut self) {
        self.backend.clear(self.config.background);
        let size = self.backend.display_size();
        self.backend.set_viewport(size);

        let matrix = self.frame_matrix().to_rows_array();

        for batch in &self.batches {
            self.backend.use_program(batch.program);

            self.backend.bind_buffer(batch.positions);
            self.backend
                .set_vertex_attribute(POSITION_LOCATION, 3, AttributeType::Float32, false);

            self.backend.bind_buffer(batch.colors);
            self.backend
                .set_vertex_attribute(COLOR_LOCATION, 4, AttributeType::Uint8, true);

            self.backend.set_uniform_matrix4(MATRIX_LOCATION, &matrix);
            self.backend.draw_arrays(batch.mode, 0, batch.vertex_count);
        }

        self.backend.finish_frame();
    }

    /// Camera frame applied first, then the projection.
    pub fn frame_matrix(&self) -> Mat4 {
        self.camera.matrix() * self.projection.matrix()
    }

    #[inline]
    pub fn batches(&self) -> &[PrimitiveBatch] {
        &self.batches
    }

    #[inline]
    pub fn camera(&self) -> &CameraFrame {
        &self.camera
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn add_flat(&mut self, mode: DrawMode, vertices: &[Vec3], color: Rgba8) -> Result<&PrimitiveBatch, PlotError> {
        let colors = vec![color; vertices.len()];
        self.push_batch(mode, vertices, &colors)
    }

    /// The batch is appended only after both buffers exist, so a failed add
    /// leaves earlier batches untouched.
    fn push_batch(
        &mut self,
        mode: DrawMode,
        vertices: &[Vec3],
        colors: &[Rgba8],
    ) -> Result<&PrimitiveBatch, PlotError> {
        let vertex_count = u32::try_from(vertices.len()).map_err(|_| BackendError::BufferAllocation)?;

        let positions = self.upload(bytemuck::cast_slice(vertices))?;
        let colors = self.upload(bytemuck::cast_slice(colors))?;

        log::debug!("added {} batch with {vertex_count} vertices", mode.name());

        self.batches.push(PrimitiveBatch {
            program: self.program,
            positions,
            colors,
            mode,
            vertex_count,
        });
        Ok(&self.batches[self.batches.len() - 1])
    }

    fn upload(&mut self, data: &[u8]) -> Result<BufferHandle, BackendError> {
        let Some(buffer) = self.backend.create_buffer() else {
            log::error!("failed to create buffer");
            return Err(BackendError::BufferAllocation);
        };
        self.backend.bind_buffer(buffer);
        self.backend.upload_buffer_data(buffer, data, BufferUsage::Static);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::render::{BackendCall, RecordingBackend};

    fn plot() -> Plot<RecordingBackend> {
        let backend = RecordingBackend::new(CanvasSize::new(640, 480));
        Plot::new(backend, PlotConfig::new(CanvasSize::new(640, 480), 10.0, 100.0)).unwrap()
    }

    fn axes() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn unavailable_backend_leaves_plot_unbuilt() {
        let result = Plot::new(
            RecordingBackend::unavailable(),
            PlotConfig::new(CanvasSize::new(10, 10), 1.0, 1.0),
        );
        assert!(matches!(
            result,
            Err(PlotError::Backend(BackendError::ContextUnavailable(_)))
        ));
    }

    #[test]
    fn starts_with_identity_camera() {
        let p = plot();
        assert_eq!(p.camera().matrix(), Mat4::identity());
        assert!(p.batches().is_empty());
        assert_eq!(p.config().background, Color::BLACK);
    }

    // ── add-calls ─────────────────────────────────────────────────────────

    #[test]
    fn add_modes_match_calls() {
        let mut p = plot();
        assert_eq!(p.add_mesh(&axes(), Rgba8::WHITE).unwrap().mode(), DrawMode::Triangles);
        assert_eq!(p.add_segments(&axes()[..2], Rgba8::WHITE).unwrap().mode(), DrawMode::Lines);
        assert_eq!(p.add_points(&axes(), Rgba8::WHITE).unwrap().mode(), DrawMode::Points);
        assert_eq!(p.batches().len(), 3);
    }

    #[test]
    fn buffer_sizes_follow_vertex_count() {
        let mut p = plot();
        let verts: Vec<Vec3> = (0..7).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let batch = p.add_points(&verts, Rgba8::new(1, 2, 3, 4)).unwrap().clone();

        assert_eq!(batch.vertex_count(), 7);
        let positions = p.backend().buffer_data(batch.position_buffer()).unwrap();
        let colors = p.backend().buffer_data(batch.color_buffer()).unwrap();
        assert_eq!(positions.len(), 3 * 7 * 4);
        assert_eq!(colors.len(), 4 * 7);
        assert_eq!(&colors[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn positions_upload_as_flat_floats() {
        let mut p = plot();
        let batch = p.add_points(&axes(), Rgba8::RED).unwrap().clone();
        let bytes = p.backend().buffer_data(batch.position_buffer()).unwrap();
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(floats, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn uploads_are_static() {
        let mut p = plot();
        p.add_points(&axes(), Rgba8::RED).unwrap();
        let uploads: Vec<_> = p
            .backend()
            .calls()
            .iter()
            .filter_map(|c| match c {
                BackendCall::UploadBufferData { usage, .. } => Some(*usage),
                _ => None,
            })
            .collect();
        assert_eq!(uploads, vec![BufferUsage::Static, BufferUsage::Static]);
    }

    #[test]
    fn per_vertex_colors_are_kept() {
        let mut p = plot();
        let colors = [Rgba8::RED, Rgba8::WHITE, Rgba8::new(0, 0, 255, 255)];
        let batch = p.add_batch(DrawMode::Points, &axes(), &colors).unwrap().clone();
        let bytes = p.backend().buffer_data(batch.color_buffer()).unwrap();
        assert_eq!(bytes, bytemuck::cast_slice::<Rgba8, u8>(&colors));
    }

    #[test]
    fn per_vertex_color_count_must_match() {
        let mut p = plot();
        let err = p.add_batch(DrawMode::Lines, &axes(), &[Rgba8::RED]).unwrap_err();
        assert_eq!(err, PlotError::ColorCountMismatch { vertices: 3, colors: 1 });
        assert!(p.batches().is_empty());
    }

    #[test]
    fn failed_add_keeps_existing_batches() {
        let backend = RecordingBackend::new(CanvasSize::new(64, 64)).with_buffer_budget(3);
        let mut p = Plot::new(backend, PlotConfig::new(CanvasSize::new(64, 64), 1.0, 1.0)).unwrap();

        let first = p.add_points(&axes(), Rgba8::RED).unwrap().clone();
        // Third buffer succeeds (positions), fourth fails (colors).
        let err = p.add_mesh(&axes(), Rgba8::WHITE).unwrap_err();
        assert_eq!(err, PlotError::Backend(BackendError::BufferAllocation));

        assert_eq!(p.batches(), &[first]);
    }

    // ── draw protocol ─────────────────────────────────────────────────────

    #[test]
    fn end_to_end_single_points_batch() {
        let mut p = plot();
        p.add_points(&axes(), Rgba8::new(255, 0, 0, 255)).unwrap();
        p.backend_mut().clear_calls();

        p.draw_scene();

        let calls = p.backend().calls();
        assert_eq!(p.backend().draw_calls(), vec![(DrawMode::Points, 0, 3)]);

        let clears = calls.iter().filter(|c| matches!(c, BackendCall::Clear(_))).count();
        let viewports = calls
            .iter()
            .filter(|c| matches!(c, BackendCall::SetViewport(_)))
            .count();
        assert_eq!((clears, viewports), (1, 1));

        assert_eq!(calls[0], BackendCall::Clear(Color::BLACK));
        assert_eq!(calls[1], BackendCall::SetViewport(CanvasSize::new(640, 480)));
        assert_eq!(calls.last(), Some(&BackendCall::FinishFrame));
    }

    #[test]
    fn batches_draw_in_insertion_order() {
        let mut p = plot();
        let spot = [Vec3::new(0.5, 0.5, 0.5)];
        let red = p.add_points(&spot, Rgba8::RED).unwrap().color_buffer();
        let white = p.add_points(&spot, Rgba8::WHITE).unwrap().color_buffer();
        p.backend_mut().clear_calls();

        p.draw_scene();

        let bound: Vec<_> = p
            .backend()
            .calls()
            .iter()
            .filter_map(|c| match c {
                BackendCall::BindBuffer(b) if *b == red || *b == white => Some(*b),
                _ => None,
            })
            .collect();
        assert_eq!(bound, vec![red, white]);
        assert_eq!(p.backend().draw_calls().len(), 2);
    }

    #[test]
    fn each_batch_binds_attributes_before_drawing() {
        let mut p = plot();
        p.add_segments(&axes()[..2], Rgba8::WHITE).unwrap();
        p.backend_mut().clear_calls();
        p.draw_scene();

        let calls = p.backend().calls();
        let draw_at = calls
            .iter()
            .position(|c| matches!(c, BackendCall::DrawArrays { .. }))
            .unwrap();
        let attrs: Vec<_> = calls[..draw_at]
            .iter()
            .filter_map(|c| match c {
                BackendCall::SetVertexAttribute { location, components, ty, normalized } => {
                    Some((*location, *components, *ty, *normalized))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            attrs,
            vec![
                (POSITION_LOCATION, 3, AttributeType::Float32, false),
                (COLOR_LOCATION, 4, AttributeType::Uint8, true),
            ]
        );
    }

    #[test]
    fn uniform_is_camera_times_projection() {
        let mut p = plot();
        p.add_points(&axes(), Rgba8::RED).unwrap();
        p.move_camera((0.4, -0.2), 12.0);
        p.backend_mut().clear_calls();
        p.draw_scene();

        let expected = (p.camera().matrix() * p.projection().matrix()).to_rows_array();
        let uploaded = p
            .backend()
            .calls()
            .iter()
            .find_map(|c| match c {
                BackendCall::SetUniformMatrix4 { data, .. } => Some(*data),
                _ => None,
            })
            .unwrap();
        for (a, b) in uploaded.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn viewport_follows_display_size() {
        let mut p = plot();
        p.backend_mut().set_display_size(CanvasSize::new(1024, 768));
        p.backend_mut().clear_calls();
        p.draw_scene();
        assert!(p
            .backend()
            .calls()
            .contains(&BackendCall::SetViewport(CanvasSize::new(1024, 768))));
    }

    #[test]
    fn background_is_used_for_clear() {
        let backend = RecordingBackend::new(CanvasSize::new(8, 8));
        let bg = Color::rgb(0.1, 0.2, 0.3);
        let mut p = Plot::new(
            backend,
            PlotConfig::new(CanvasSize::new(8, 8), 1.0, 1.0).with_background(bg),
        )
        .unwrap();
        p.backend_mut().clear_calls();
        p.draw_scene();
        assert_eq!(p.backend().calls()[0], BackendCall::Clear(bg));
    }

    #[test]
    fn empty_scene_still_clears() {
        let mut p = plot();
        p.backend_mut().clear_calls();
        p.draw_scene();
        assert!(p.backend().draw_calls().is_empty());
        assert_eq!(p.backend().calls().len(), 3);
    }
}
