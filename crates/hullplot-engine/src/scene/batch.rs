use crate::render::{BufferHandle, DrawMode, ProgramHandle};

/// One GPU-resident group of same-mode primitives, drawn with a single call.
///
/// Owns a position buffer (3 × f32 per vertex) and a color buffer
/// (4 × u8 per vertex). Both are uploaded once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveBatch {
    pub(crate) program: ProgramHandle,
    pub(crate) positions: BufferHandle,
    pub(crate) colors: BufferHandle,
    pub(crate) mode: DrawMode,
    pub(crate) vertex_count: u32,
}

impl PrimitiveBatch {
    #[inline]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn position_buffer(&self) -> BufferHandle {
        self.positions
    }

    #[inline]
    pub fn color_buffer(&self) -> BufferHandle {
        self.colors
    }
}
