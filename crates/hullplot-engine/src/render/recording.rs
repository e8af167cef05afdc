use crate::color::Color;
use crate::error::BackendError;
use crate::projection::CanvasSize;

use super::{
    AttributeLocation, AttributeType, BufferHandle, BufferUsage, DrawMode, ProgramHandle,
    RenderBackend, UniformLocation,
};

/// One call received by a [`RecordingBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateContext,
    CompileLinkProgram(ProgramHandle),
    CreateBuffer(Option<BufferHandle>),
    UploadBufferData {
        buffer: BufferHandle,
        len: usize,
        usage: BufferUsage,
    },
    UseProgram(ProgramHandle),
    BindBuffer(BufferHandle),
    SetVertexAttribute {
        location: AttributeLocation,
        components: u32,
        ty: AttributeType,
        normalized: bool,
    },
    SetUniformMatrix4 {
        location: UniformLocation,
        data: [f32; 16],
    },
    SetViewport(CanvasSize),
    Clear(Color),
    DrawArrays {
        mode: DrawMode,
        first: u32,
        count: u32,
    },
    FinishFrame,
}

/// Headless backend that keeps an ordered log of every call and the bytes
/// uploaded to each buffer.
///
/// Failure injection:
/// - [`RecordingBackend::unavailable`] refuses `create_context`
/// - [`RecordingBackend::with_buffer_budget`] returns `None` from
///   `create_buffer` once the budget is spent
#[derive(Debug)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    buffers: Vec<Vec<u8>>,
    display_size: CanvasSize,
    context_available: bool,
    context_created: bool,
    buffer_budget: Option<usize>,
    next_program: u32,
}

impl RecordingBackend {
    pub fn new(display_size: CanvasSize) -> Self {
        Self {
            calls: Vec::new(),
            buffers: Vec::new(),
            display_size,
            context_available: true,
            context_created: false,
            buffer_budget: None,
            next_program: 0,
        }
    }

    /// Backend whose context can never be acquired.
    pub fn unavailable() -> Self {
        Self {
            context_available: false,
            ..Self::new(CanvasSize::new(0, 0))
        }
    }

    /// Allows at most `budget` successful `create_buffer` calls.
    pub fn with_buffer_budget(mut self, budget: usize) -> Self {
        self.buffer_budget = Some(budget);
        self
    }

    pub fn set_display_size(&mut self, size: CanvasSize) {
        self.display_size = size;
    }

    #[inline]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forgets recorded calls; buffer contents are kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// `(mode, first, count)` of every draw call, in order.
    pub fn draw_calls(&self) -> Vec<(DrawMode, u32, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                BackendCall::DrawArrays { mode, first, count } => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    /// Bytes last uploaded to `buffer`.
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(buffer.0 as usize).map(Vec::as_slice)
    }
}

impl RenderBackend for RecordingBackend {
    fn create_context(&mut self) -> Result<(), BackendError> {
        self.calls.push(BackendCall::CreateContext);
        if !self.context_available {
            return Err(BackendError::ContextUnavailable(
                "recording backend configured as unavailable".to_string(),
            ));
        }
        self.context_created = true;
        Ok(())
    }

    fn compile_link_program(
        &mut self,
        _vertex_source: &str,
        _fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        let program = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.calls.push(BackendCall::CompileLinkProgram(program));
        Ok(program)
    }

    fn create_buffer(&mut self) -> Option<BufferHandle> {
        let exhausted = self.buffer_budget == Some(0);
        let handle = if self.context_created && !exhausted {
            if let Some(budget) = self.buffer_budget.as_mut() {
                *budget -= 1;
            }
            self.buffers.push(Vec::new());
            Some(BufferHandle(self.buffers.len() as u32 - 1))
        } else {
            None
        };
        self.calls.push(BackendCall::CreateBuffer(handle));
        handle
    }

    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], usage: BufferUsage) {
        if let Some(slot) = self.buffers.get_mut(buffer.0 as usize) {
            slot.clear();
            slot.extend_from_slice(data);
        }
        self.calls.push(BackendCall::UploadBufferData {
            buffer,
            len: data.len(),
            usage,
        });
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(BackendCall::UseProgram(program));
    }

    fn bind_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(BackendCall::BindBuffer(buffer));
    }

    fn set_vertex_attribute(
        &mut self,
        location: AttributeLocation,
        components: u32,
        ty: AttributeType,
        normalized: bool,
    ) {
        self.calls.push(BackendCall::SetVertexAttribute {
            location,
            components,
            ty,
            normalized,
        });
    }

    fn set_uniform_matrix4(&mut self, location: UniformLocation, data: &[f32; 16]) {
        self.calls.push(BackendCall::SetUniformMatrix4 {
            location,
            data: *data,
        });
    }

    fn display_size(&self) -> CanvasSize {
        self.display_size
    }

    fn set_viewport(&mut self, size: CanvasSize) {
        self.calls.push(BackendCall::SetViewport(size));
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(BackendCall::Clear(color));
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) {
        self.calls.push(BackendCall::DrawArrays { mode, first, count });
    }

    fn finish_frame(&mut self) {
        self.calls.push(BackendCall::FinishFrame);
    }
}
