use crate::color::Color;
use crate::error::BackendError;
use crate::projection::CanvasSize;

/// Linked vertex + fragment program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// GPU vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Vertex attribute slot of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// Uniform slot of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Upload hint. Batches are write-once and always use `Static`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    Static,
    Dynamic,
}

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Float32,
    Uint8,
}

/// How a vertex sequence is assembled into primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    Triangles,
}

impl DrawMode {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            DrawMode::Points => "points",
            DrawMode::Lines => "lines",
            DrawMode::Triangles => "triangles",
        }
    }
}

/// Capability set the scene needs from a GPU rasterizer.
///
/// Binding follows the classic immediate-mode model: `bind_buffer` selects
/// the current buffer and `set_vertex_attribute` attaches it to an attribute
/// slot of the program selected by `use_program`. A draw uses whatever is
/// bound when `draw_arrays` is issued.
pub trait RenderBackend {
    /// Acquires the rendering context. Must succeed before any other call.
    fn create_context(&mut self) -> Result<(), BackendError>;

    fn compile_link_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError>;

    /// Returns `None` when the backend cannot allocate another buffer.
    fn create_buffer(&mut self) -> Option<BufferHandle>;

    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], usage: BufferUsage);

    fn use_program(&mut self, program: ProgramHandle);

    fn bind_buffer(&mut self, buffer: BufferHandle);

    fn set_vertex_attribute(
        &mut self,
        location: AttributeLocation,
        components: u32,
        ty: AttributeType,
        normalized: bool,
    );

    /// `data` holds the matrix rows in order.
    fn set_uniform_matrix4(&mut self, location: UniformLocation, data: &[f32; 16]);

    /// Current size of the presentation surface in physical pixels.
    fn display_size(&self) -> CanvasSize;

    fn set_viewport(&mut self, size: CanvasSize);

    /// Clears color to `color` and depth to the far plane.
    fn clear(&mut self, color: Color);

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32);

    /// Marks the end of a frame's commands.
    fn finish_frame(&mut self) {}
}
