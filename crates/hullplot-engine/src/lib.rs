//! Orbit-camera 3D plotting on top of wgpu.
//!
//! The plotting core ([`scene::Plot`]) speaks to the GPU only through the
//! [`render::RenderBackend`] trait; [`render::WgpuBackend`] is the real
//! implementation and [`render::RecordingBackend`] a scriptable stand-in.
//! The remaining modules own the window, the frame loop and input.

pub mod camera;
pub mod color;
pub mod core;
pub mod dataset;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod math;
pub mod projection;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use camera::{CameraFrame, OrbitConfig, OrbitController};
pub use color::{Color, Rgba8};
pub use dataset::Dataset;
pub use error::{BackendError, DatasetError, PlotError};
pub use math::{Mat3, Mat4, Vec3, Vec4};
pub use projection::{CanvasSize, Projection};
pub use scene::{DrawMode, Plot, PlotConfig, PrimitiveBatch};
