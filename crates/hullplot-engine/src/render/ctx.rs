use crate::projection::CanvasSize;

/// Device handles needed to build a [`WgpuBackend`](super::WgpuBackend).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub size: CanvasSize, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: CanvasSize,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            size,
        }
    }
}

/// Target for one frame (encoder + color view + its size).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub size: CanvasSize,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        size: CanvasSize,
    ) -> Self {
        Self {
            encoder,
            color_view,
            size,
        }
    }
}
