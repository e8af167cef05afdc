use std::collections::HashMap;
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::color::Color;
use crate::error::BackendError;
use crate::projection::CanvasSize;

use super::frame_recorder::{FrameRecorder, MATRIX_SIZE, PipelineKey};
use super::shaders::{COLOR_LOCATION, FRAGMENT_ENTRY, POSITION_LOCATION, VERTEX_ENTRY};
use super::{
    AttributeLocation, AttributeType, BufferHandle, BufferUsage, DrawMode, ProgramHandle,
    RenderBackend, RenderCtx, RenderTarget, UniformLocation,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Fragments overwrite the target; batch alpha is not composited.
const COLOR_BLEND: wgpu::BlendState = wgpu::BlendState::REPLACE;

/// [`RenderBackend`] on top of wgpu.
///
/// wgpu has no immediate mode, so calls made between `clear` and
/// `finish_frame` are recorded into a frame command list. [`encode`] turns the
/// last finished frame into one render pass:
/// - color cleared to the recorded clear color, depth cleared to 1.0
/// - one pipeline per (program, draw mode, vertex formats), built lazily
/// - every `set_uniform_matrix4` appends to a per-frame uniform arena, and
///   each draw binds it with a dynamic offset
///
/// [`encode`]: WgpuBackend::encode
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    display_size: CanvasSize,

    resources: Option<ContextResources>,
    depth: Option<DepthTarget>,

    programs: Vec<Program>,
    buffers: Vec<Option<wgpu::Buffer>>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    recorder: FrameRecorder,
    last_clear: Color,
}

struct ContextResources {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_align: u64,
    uniform_ubo: wgpu::Buffer,
    uniform_capacity: u64,
    bind_group: wgpu::BindGroup,
}

struct DepthTarget {
    size: CanvasSize,
    view: wgpu::TextureView,
}

struct Program {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
}

impl WgpuBackend {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            surface_format: ctx.surface_format,
            display_size: ctx.size,
            resources: None,
            depth: None,
            programs: Vec::new(),
            buffers: Vec::new(),
            pipelines: HashMap::new(),
            recorder: FrameRecorder::default(),
            last_clear: Color::BLACK,
        }
    }

    /// Updates the size reported by `display_size` (call on surface resize).
    pub fn resize(&mut self, size: CanvasSize) {
        self.display_size = size;
    }

    /// Encodes the last finished frame into `target`.
    ///
    /// Without a finished frame the target is only cleared.
    pub fn encode(&mut self, target: &mut RenderTarget<'_>) {
        let frame = self.recorder.take_finished().unwrap_or_default();
        if let Some(c) = frame.clear {
            self.last_clear = c;
        }

        self.ensure_depth(target.size);
        self.upload_uniforms(&frame.uniforms);
        for draw in &frame.draws {
            self.ensure_pipeline(draw.key);
        }

        let Some(depth) = self.depth.as_ref() else { return };
        let clear = self.last_clear;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("hullplot scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(clear)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(res) = self.resources.as_ref() else { return };

        let vp = frame.viewport.unwrap_or(target.size);
        let vw = vp.width.min(target.size.width).max(1);
        let vh = vp.height.min(target.size.height).max(1);
        rpass.set_viewport(0.0, 0.0, vw as f32, vh as f32, 0.0, 1.0);

        for draw in &frame.draws {
            if draw.count == 0 {
                continue;
            }
            let Some(pipeline) = self.pipelines.get(&draw.key) else { continue };
            let Some(Some(positions)) = self.buffers.get(draw.position.0 as usize) else {
                continue;
            };
            let Some(Some(colors)) = self.buffers.get(draw.color.0 as usize) else { continue };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &res.bind_group, &[draw.uniform_offset]);
            rpass.set_vertex_buffer(0, positions.slice(..));
            rpass.set_vertex_buffer(1, colors.slice(..));
            rpass.draw(draw.first..draw.first + draw.count, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_depth(&mut self, size: CanvasSize) {
        let size = CanvasSize::new(size.width.max(1), size.height.max(1));
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hullplot depth"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some(DepthTarget { size, view });
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let required = bytes.len() as u64;
        let needs_growth = self
            .resources
            .as_ref()
            .is_some_and(|r| required > r.uniform_capacity);
        if needs_growth {
            self.grow_uniforms(required);
        }
        let Some(res) = self.resources.as_ref() else { return };
        self.queue.write_buffer(&res.uniform_ubo, 0, bytes);
    }

    fn grow_uniforms(&mut self, required: u64) {
        let Some(res) = self.resources.as_mut() else { return };
        let capacity = required.next_power_of_two();
        let (ubo, bind_group) = create_uniform_binding(&self.device, &res.bind_group_layout, capacity);
        res.uniform_ubo = ubo;
        res.bind_group = bind_group;
        res.uniform_capacity = capacity;
        log::debug!("uniform arena grown to {capacity} bytes");
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(res) = self.resources.as_ref() else { return };
        let Some(program) = self.programs.get(key.program.0 as usize) else { return };

        let position_attrs = [wgpu::VertexAttribute {
            format: key.position,
            offset: 0,
            shader_location: POSITION_LOCATION.0,
        }];
        let color_attrs = [wgpu::VertexAttribute {
            format: key.color,
            offset: 0,
            shader_location: COLOR_LOCATION.0,
        }];
        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: key.position.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &position_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: key.color.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &color_attrs,
            },
        ];

        let (topology, cull_mode) = match key.mode {
            DrawMode::Points => (wgpu::PrimitiveTopology::PointList, None),
            DrawMode::Lines => (wgpu::PrimitiveTopology::LineList, None),
            DrawMode::Triangles => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
        };

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hullplot batch pipeline"),
            layout: Some(&res.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(COLOR_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("built pipeline for {} (program {})", key.mode.name(), key.program.0);
        self.pipelines.insert(key, pipeline);
    }
}

impl RenderBackend for WgpuBackend {
    fn create_context(&mut self) -> Result<(), BackendError> {
        if self.resources.is_some() {
            return Ok(());
        }

        let limits = self.device.limits();
        if limits.max_vertex_buffers < 2 {
            return Err(BackendError::ContextUnavailable(format!(
                "device supports {} vertex buffers, 2 required",
                limits.max_vertex_buffers
            )));
        }
        let uniform_align = u64::from(limits.min_uniform_buffer_offset_alignment).max(MATRIX_SIZE);

        let bind_group_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hullplot matrix bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(MATRIX_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hullplot pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let capacity = uniform_align * 16;
        let (uniform_ubo, bind_group) =
            create_uniform_binding(&self.device, &bind_group_layout, capacity);

        self.resources = Some(ContextResources {
            bind_group_layout,
            pipeline_layout,
            uniform_align,
            uniform_ubo,
            uniform_capacity: capacity,
            bind_group,
        });
        log::debug!("wgpu context ready ({:?})", self.surface_format);
        Ok(())
    }

    fn compile_link_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        if self.resources.is_none() {
            return Err(BackendError::ProgramLink("no rendering context".to_string()));
        }

        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hullplot vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hullplot fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        self.programs.push(Program { vertex, fragment });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn create_buffer(&mut self) -> Option<BufferHandle> {
        self.resources.as_ref()?;
        let index = u32::try_from(self.buffers.len()).ok()?;
        self.buffers.push(None);
        Some(BufferHandle(index))
    }

    fn upload_buffer_data(&mut self, buffer: BufferHandle, data: &[u8], usage: BufferUsage) {
        let max = self.device.limits().max_buffer_size;
        if data.len() as u64 > max {
            log::error!("buffer {} upload of {} bytes exceeds device limit {max}", buffer.0, data.len());
            return;
        }
        let Some(slot) = self.buffers.get_mut(buffer.0 as usize) else {
            log::warn!("upload to unknown buffer {}", buffer.0);
            return;
        };

        let usage = match usage {
            BufferUsage::Static => wgpu::BufferUsages::VERTEX,
            BufferUsage::Dynamic => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        };
        *slot = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hullplot vertex buffer"),
            contents: data,
            usage,
        }));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.recorder.use_program(program);
    }

    fn bind_buffer(&mut self, buffer: BufferHandle) {
        self.recorder.bind_buffer(buffer);
    }

    fn set_vertex_attribute(
        &mut self,
        location: AttributeLocation,
        components: u32,
        ty: AttributeType,
        normalized: bool,
    ) {
        self.recorder
            .set_vertex_attribute(location, components, ty, normalized);
    }

    fn set_uniform_matrix4(&mut self, _location: UniformLocation, data: &[f32; 16]) {
        let Some(res) = self.resources.as_ref() else { return };
        self.recorder.set_uniform_matrix4(data, res.uniform_align);
    }

    fn display_size(&self) -> CanvasSize {
        self.display_size
    }

    fn set_viewport(&mut self, size: CanvasSize) {
        self.recorder.set_viewport(size);
    }

    fn clear(&mut self, color: Color) {
        self.recorder.clear(color);
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) {
        self.recorder.draw_arrays(mode, first, count);
    }

    fn finish_frame(&mut self) {
        self.recorder.finish_frame();
    }
}

fn create_uniform_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: u64,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let ubo = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("hullplot matrix ubo"),
        size: capacity,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("hullplot matrix bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &ubo,
                offset: 0,
                size: NonZeroU64::new(MATRIX_SIZE),
            }),
        }],
    });

    (ubo, bind_group)
}

/// The surface is always cleared opaque, whatever the background alpha.
fn clear_color(c: Color) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: 1.0,
    }
}
