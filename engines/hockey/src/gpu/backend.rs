//! wgpu implementation of [`GraphicsApi`].
//!
//! [`GpuResources`] owns everything that lives from surface creation until
//! the surface is lost. [`WgpuApi`] is a short-lived view constructed for a
//! single lifecycle callback: creation calls go straight to the device, draw
//! calls are recorded and executed in one render pass on [`WgpuApi::flush`].

use super::{
    BufferHandle, GraphicsApi, ProgramDesc, ProgramHandle, TextureHandle, TextureImage, Topology,
    VertexLayout,
};
use crate::RenderError;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::error;
use std::mem::size_of;
use wgpu::util::DeviceExt;

/// One uniform slot per draw call, aligned to the default
/// `min_uniform_buffer_offset_alignment`.
const UNIFORM_STRIDE: u32 = 256;
/// Enough for every draw call of the scene with room to spare.
const UNIFORM_SLOTS: u32 = 64;

/// The projection uses the GL depth convention (NDC z in `[-1, 1]`) while
/// wgpu clips z to `[0, 1]`; this matrix remaps the depth range on upload.
#[rustfmt::skip]
const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

const POSITION_TEXTURE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

/// The uniform block shared by both shader programs: the MVP matrix and the
/// flat color (unused by the textured program).
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
struct DrawUniforms {
    matrix: [f32; 16],
    color: [f32; 4],
}

struct Program {
    layout: VertexLayout,
    /// one pipeline per topology, indexed by [`pipeline_index`]
    pipelines: [wgpu::RenderPipeline; 3],
}

fn pipeline_index(topology: Topology) -> usize {
    match topology {
        Topology::TriangleFan => 0,
        Topology::TriangleStrip => 1,
        Topology::Lines => 2,
    }
}

struct Texture {
    _texture: wgpu::Texture,
    /// uniforms + view + sampler, for the textured pipeline
    bind_group: wgpu::BindGroup,
}

/// GPU-side state that lives from surface creation until the surface is lost.
pub struct GpuResources {
    view_format: wgpu::TextureFormat,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    color_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    color_bind_group: wgpu::BindGroup,
    programs: Vec<Program>,
    buffers: Vec<wgpu::Buffer>,
    textures: Vec<Texture>,
    /// shared index pattern turning any triangle fan into a triangle list
    fan_indices: Option<wgpu::Buffer>,
    /// largest fan vertex count the index buffer covers
    fan_capacity: u32,
    clear_color: wgpu::Color,
    viewport: Option<(u32, u32)>,
}

impl GpuResources {
    #[must_use]
    pub fn new(device: &wgpu::Device, view_format: wgpu::TextureFormat) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("per-draw uniforms"),
            size: u64::from(UNIFORM_SLOTS * UNIFORM_STRIDE),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..wgpu::SamplerDescriptor::default()
        });

        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
            },
            count: None,
        };

        let color_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("color program"),
                entries: &[uniform_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("textured program"),
                entries: &[
                    uniform_entry(wgpu::ShaderStages::VERTEX),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let color_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &color_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
                }),
            }],
            label: None,
        });

        Self {
            view_format,
            uniform_buffer,
            sampler,
            color_bind_group_layout,
            texture_bind_group_layout,
            color_bind_group,
            programs: Vec::new(),
            buffers: Vec::new(),
            textures: Vec::new(),
            fan_indices: None,
            fan_capacity: 0,
            clear_color: wgpu::Color::BLACK,
            viewport: None,
        }
    }

    /// Grows the shared fan index buffer so fans of up to `vertex_count`
    /// vertices can be drawn as indexed triangle lists.
    fn ensure_fan_capacity(&mut self, device: &wgpu::Device, vertex_count: u32) {
        if vertex_count <= self.fan_capacity || vertex_count < 3 {
            return;
        }

        let mut indices = Vec::with_capacity(((vertex_count - 2) * 3) as usize);
        for point in 1..vertex_count - 1 {
            indices.extend_from_slice(&[0, point, point + 1]);
        }

        self.fan_indices = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("triangle fan indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.fan_capacity = vertex_count;
    }
}

#[derive(Default)]
struct Frame {
    clear_requested: bool,
    uniforms: Vec<DrawUniforms>,
    draws: Vec<DrawCall>,
    current_program: Option<ProgramHandle>,
    current_buffer: Option<BufferHandle>,
    current_texture: Option<TextureHandle>,
    pending: DrawUniforms,
}

struct DrawCall {
    program: ProgramHandle,
    buffer: BufferHandle,
    texture: Option<TextureHandle>,
    topology: Topology,
    first: u32,
    count: u32,
    uniform_slot: u32,
}

/// Per-callback view of the device. Draw calls are recorded in order and
/// executed against the surface texture on [`Self::flush`].
pub struct WgpuApi<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    resources: &'a mut GpuResources,
    frame: Frame,
}

impl<'a> WgpuApi<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        resources: &'a mut GpuResources,
    ) -> Self {
        Self {
            device,
            queue,
            resources,
            frame: Frame::default(),
        }
    }

    /// Compiles a single shader stage, surfacing the driver log on failure.
    fn compile(&self, source: &str, stage: &'static str) -> Result<wgpu::ShaderModule, RenderError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ShaderCompile {
                stage,
                log: error.to_string(),
            });
        }
        Ok(module)
    }

    fn create_pipeline(
        &self,
        pipeline_layout: &wgpu::PipelineLayout,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        layout: VertexLayout,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let vertex_buffers = [match layout {
            VertexLayout::PositionTexture => wgpu::VertexBufferLayout {
                array_stride: (4 * size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_TEXTURE_ATTRIBUTES,
            },
            VertexLayout::Position => wgpu::VertexBufferLayout {
                array_stride: (3 * size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
        }];

        let vertex_state = wgpu::VertexState {
            module: vertex,
            entry_point: "vs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &vertex_buffers,
        };

        let fragment_state = wgpu::FragmentState {
            module: fragment,
            entry_point: "fs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(self.resources.view_format.into())],
        };

        let primitive = wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..wgpu::PrimitiveState::default()
        };

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: None,
                layout: Some(pipeline_layout),
                vertex: vertex_state,
                fragment: Some(fragment_state),
                primitive,
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    /// Executes the recorded frame against the given surface texture.
    pub fn flush(self, texture_view: &wgpu::TextureView) {
        for (slot, uniforms) in self.frame.uniforms.iter().enumerate() {
            self.queue.write_buffer(
                &self.resources.uniform_buffer,
                u64::try_from(slot).unwrap() * u64::from(UNIFORM_STRIDE),
                bytemuck::bytes_of(uniforms),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let load = if self.frame.clear_requested {
                wgpu::LoadOp::Clear(self.resources.clear_color)
            } else {
                wgpu::LoadOp::Load
            };
            let render_pass_color_attachment = wgpu::RenderPassColorAttachment {
                view: texture_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            };
            let color_attachments = [Some(render_pass_color_attachment)];
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &color_attachments,
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some((width, height)) = self.resources.viewport {
                render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            }

            for draw in &self.frame.draws {
                let program = &self.resources.programs[draw.program.0 as usize];
                render_pass.set_pipeline(&program.pipelines[pipeline_index(draw.topology)]);

                let uniform_offset = draw.uniform_slot * UNIFORM_STRIDE;
                match draw.texture {
                    Some(texture) if program.layout == VertexLayout::PositionTexture => {
                        let texture = &self.resources.textures[texture.0 as usize];
                        render_pass.set_bind_group(0, &texture.bind_group, &[uniform_offset]);
                    }
                    _ => {
                        render_pass.set_bind_group(
                            0,
                            &self.resources.color_bind_group,
                            &[uniform_offset],
                        );
                    }
                }

                render_pass
                    .set_vertex_buffer(0, self.resources.buffers[draw.buffer.0 as usize].slice(..));

                match draw.topology {
                    Topology::TriangleFan => {
                        let fan_indices = self
                            .resources
                            .fan_indices
                            .as_ref()
                            .expect("fan index buffer was sized at buffer creation");
                        render_pass.set_index_buffer(fan_indices.slice(..), wgpu::IndexFormat::Uint32);
                        let index_count = (draw.count - 2) * 3;
                        render_pass.draw_indexed(
                            0..index_count,
                            i32::try_from(draw.first).unwrap(),
                            0..1,
                        );
                    }
                    Topology::TriangleStrip | Topology::Lines => {
                        render_pass.draw(draw.first..draw.first + draw.count, 0..1);
                    }
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

impl GraphicsApi for WgpuApi<'_> {
    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.resources.clear_color = wgpu::Color {
            r: f64::from(rgba[0]),
            g: f64::from(rgba[1]),
            b: f64::from(rgba[2]),
            a: f64::from(rgba[3]),
        };
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.resources.viewport = Some((width, height));
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, RenderError> {
        let vertex = self.compile(desc.vertex_source, "vertex")?;
        let fragment = self.compile(desc.fragment_source, "fragment")?;

        let bind_group_layout = match desc.layout {
            VertexLayout::PositionTexture => &self.resources.texture_bind_group_layout,
            VertexLayout::Position => &self.resources.color_bind_group_layout,
        };
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: None,
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            });

        // linking: all pipeline variants are built up front so the draw path
        // never creates GPU objects
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines = [
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::PrimitiveTopology::TriangleStrip,
            wgpu::PrimitiveTopology::LineList,
        ]
        .map(|topology| {
            self.create_pipeline(&pipeline_layout, &vertex, &fragment, desc.layout, topology)
        });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ProgramLink {
                log: error.to_string(),
            });
        }

        let handle = ProgramHandle(u32::try_from(self.resources.programs.len()).unwrap());
        self.resources.programs.push(Program {
            layout: desc.layout,
            pipelines,
        });
        Ok(handle)
    }

    fn create_vertex_buffer(&mut self, layout: VertexLayout, data: &[f32]) -> BufferHandle {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let vertex_count = u32::try_from(data.len() / layout.floats_per_vertex()).unwrap();
        self.resources.ensure_fan_capacity(self.device, vertex_count);

        let handle = BufferHandle(u32::try_from(self.resources.buffers.len()).unwrap());
        self.resources.buffers.push(buffer);
        handle
    }

    fn create_texture(&mut self, image: &TextureImage) -> TextureHandle {
        let base = &image.levels[0];
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene texture"),
            size: wgpu::Extent3d {
                width: base.width,
                height: base.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: u32::try_from(image.levels.len()).unwrap(),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in image.levels.iter().enumerate() {
            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: u32::try_from(level).unwrap(),
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &mip.rgba,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * mip.width),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: mip.width,
                    height: mip.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.resources.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &self.resources.uniform_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.resources.sampler),
                },
            ],
            label: None,
        });

        let handle = TextureHandle(u32::try_from(self.resources.textures.len()).unwrap());
        self.resources.textures.push(Texture {
            _texture: texture,
            bind_group,
        });
        handle
    }

    fn clear(&mut self) {
        self.frame.clear_requested = true;
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.frame.current_program = Some(program);
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.frame.current_buffer = Some(buffer);
    }

    fn set_matrix(&mut self, matrix: Mat4) {
        self.frame.pending.matrix = (OPENGL_TO_WGPU * matrix).to_cols_array();
    }

    fn set_color(&mut self, rgb: [f32; 3]) {
        self.frame.pending.color = [rgb[0], rgb[1], rgb[2], 1.0];
    }

    fn set_texture(&mut self, texture: TextureHandle) {
        self.frame.current_texture = Some(texture);
    }

    fn draw(&mut self, topology: Topology, first: u32, count: u32) {
        let (Some(program), Some(buffer)) =
            (self.frame.current_program, self.frame.current_buffer)
        else {
            error!("draw call without a bound program or vertex buffer");
            return;
        };

        let uniform_slot = u32::try_from(self.frame.uniforms.len()).unwrap();
        if uniform_slot >= UNIFORM_SLOTS {
            error!("uniform slots exhausted; dropping draw call");
            return;
        }
        self.frame.uniforms.push(self.frame.pending);

        self.frame.draws.push(DrawCall {
            program,
            buffer,
            texture: self.frame.current_texture,
            topology,
            first,
            count,
            uniform_slot,
        });
    }
}
