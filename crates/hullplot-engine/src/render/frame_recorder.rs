use crate::color::Color;
use crate::projection::CanvasSize;

use super::shaders::{COLOR_LOCATION, POSITION_LOCATION};
use super::{AttributeLocation, AttributeType, BufferHandle, DrawMode, ProgramHandle};

/// Size of one `mat4x4<f32>` uniform.
pub(super) const MATRIX_SIZE: u64 = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(super) struct PipelineKey {
    pub program: ProgramHandle,
    pub mode: DrawMode,
    pub position: wgpu::VertexFormat,
    pub color: wgpu::VertexFormat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct AttributeBinding {
    buffer: BufferHandle,
    format: wgpu::VertexFormat,
}

#[derive(Debug, Default)]
struct BindState {
    program: Option<ProgramHandle>,
    buffer: Option<BufferHandle>,
    position: Option<AttributeBinding>,
    color: Option<AttributeBinding>,
    uniform_offset: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct RecordedDraw {
    pub key: PipelineKey,
    pub position: BufferHandle,
    pub color: BufferHandle,
    pub uniform_offset: u32,
    pub first: u32,
    pub count: u32,
}

/// Everything one frame asked for, ready to be encoded.
#[derive(Debug, Default)]
pub(super) struct FrameCommands {
    pub clear: Option<Color>,
    pub viewport: Option<CanvasSize>,
    /// Matrix arena; every entry starts at a multiple of the uniform alignment.
    pub uniforms: Vec<u8>,
    pub draws: Vec<RecordedDraw>,
}

/// Turns immediate-mode backend calls into [`FrameCommands`].
///
/// Device independent: the wgpu side only supplies the uniform offset
/// alignment.
#[derive(Debug, Default)]
pub(super) struct FrameRecorder {
    bound: BindState,
    recording: FrameCommands,
    finished: Option<FrameCommands>,
}

impl FrameRecorder {
    pub fn use_program(&mut self, program: ProgramHandle) {
        self.bound.program = Some(program);
    }

    pub fn bind_buffer(&mut self, buffer: BufferHandle) {
        self.bound.buffer = Some(buffer);
    }

    /// Attaches the bound buffer to `location`.
    pub fn set_vertex_attribute(
        &mut self,
        location: AttributeLocation,
        components: u32,
        ty: AttributeType,
        normalized: bool,
    ) {
        let Some(buffer) = self.bound.buffer else {
            log::warn!("vertex attribute {} set with no buffer bound", location.0);
            return;
        };
        let Some(format) = vertex_format(components, ty, normalized) else {
            log::warn!("unsupported vertex format: {components} x {ty:?} (normalized: {normalized})");
            return;
        };

        let binding = Some(AttributeBinding { buffer, format });
        if location == POSITION_LOCATION {
            self.bound.position = binding;
        } else if location == COLOR_LOCATION {
            self.bound.color = binding;
        } else {
            log::warn!("unknown attribute location {}", location.0);
        }
    }

    /// Appends `data` to the arena at the next `align` boundary; later draws
    /// use it until another matrix is set.
    pub fn set_uniform_matrix4(&mut self, data: &[f32; 16], align: u64) {
        let align = align.max(MATRIX_SIZE);
        let uniforms = &mut self.recording.uniforms;

        let offset = (uniforms.len() as u64).next_multiple_of(align);
        uniforms.resize(offset as usize, 0);
        uniforms.extend_from_slice(bytemuck::cast_slice(data));
        // Keep the arena a multiple of the alignment so the binding never overruns.
        uniforms.resize((offset + align) as usize, 0);

        self.bound.uniform_offset = u32::try_from(offset).ok();
    }

    pub fn set_viewport(&mut self, size: CanvasSize) {
        self.recording.viewport = Some(size);
    }

    pub fn clear(&mut self, color: Color) {
        self.recording.clear = Some(color);
    }

    /// Records a draw with the current bindings; skipped when any is missing.
    pub fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) {
        let (Some(program), Some(position), Some(color), Some(uniform_offset)) = (
            self.bound.program,
            self.bound.position,
            self.bound.color,
            self.bound.uniform_offset,
        ) else {
            log::warn!("draw_arrays({}) skipped: incomplete bindings", mode.name());
            return;
        };

        self.recording.draws.push(RecordedDraw {
            key: PipelineKey {
                program,
                mode,
                position: position.format,
                color: color.format,
            },
            position: position.buffer,
            color: color.buffer,
            uniform_offset,
            first,
            count,
        });
    }

    /// Seals the frame and resets all bindings.
    pub fn finish_frame(&mut self) {
        self.finished = Some(std::mem::take(&mut self.recording));
        self.bound = BindState::default();
    }

    pub fn take_finished(&mut self) -> Option<FrameCommands> {
        self.finished.take()
    }
}

pub(super) fn vertex_format(components: u32, ty: AttributeType, normalized: bool) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;
    match (ty, components, normalized) {
        (AttributeType::Float32, 1, _) => Some(F::Float32),
        (AttributeType::Float32, 2, _) => Some(F::Float32x2),
        (AttributeType::Float32, 3, _) => Some(F::Float32x3),
        (AttributeType::Float32, 4, _) => Some(F::Float32x4),
        (AttributeType::Uint8, 2, true) => Some(F::Unorm8x2),
        (AttributeType::Uint8, 4, true) => Some(F::Unorm8x4),
        (AttributeType::Uint8, 2, false) => Some(F::Uint8x2),
        (AttributeType::Uint8, 4, false) => Some(F::Uint8x4),
        _ => None,
    }
}
