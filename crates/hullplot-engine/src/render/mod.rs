//! GPU rendering backend boundary.
//!
//! The scene never talks to wgpu directly. It drives a [`RenderBackend`],
//! a narrow immediate-mode capability set (program, buffers, attributes,
//! uniform, viewport, clear, draw). Two implementations live here:
//! - [`WgpuBackend`]: records the calls of a frame and encodes them into a
//!   single wgpu render pass with a depth attachment
//! - [`RecordingBackend`]: headless; keeps an ordered log of every call

mod backend;
mod ctx;
mod frame_recorder;
mod recording;
pub mod shaders;
mod wgpu_backend;

pub use backend::{
    AttributeLocation, AttributeType, BufferHandle, BufferUsage, DrawMode, ProgramHandle,
    RenderBackend, UniformLocation,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use recording::{BackendCall, RecordingBackend};
pub use wgpu_backend::WgpuBackend;
