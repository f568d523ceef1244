//! `wgpu` implementation of [`GpuBackend`].
//!
//! The backend keeps the immediate-mode feel of the seam by recording
//! each `draw_triangles` together with the state it needs (pipeline,
//! uniform bind group, texture bind group, vertex buffer, scissor) and
//! replaying the whole list in one render pass at `end_frame`.
//!
//! ```text
//!  use_program / set_uniform_matrix / bind_texture / set_scissor
//!       │  (state capture)
//!       ▼
//!  draw_triangles ──▶ Vec<DrawCall>
//!       │
//!       ▼
//!  end_frame ──▶ one render pass, one submit, present
//! ```
//!
//! Bind group 0 holds the `mvp` uniform, bind group 1 the texture and
//! sampler.  Untextured programs still get a 1×1 white texture in group 1.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{debug, trace};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, Extent3d, FilterMode, FragmentState, FrontFace, LoadOp,
    MultisampleState, Operations, Origin3d, PipelineCompilationOptions, PipelineLayout,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    Sampler, SamplerBindingType, SamplerDescriptor, ShaderModuleDescriptor, ShaderStages,
    StoreOp, TexelCopyBufferLayout, TexelCopyTextureInfo, Texture, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureViewDescriptor, TextureViewDimension, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode,
};

use super::context::GpuContext;
use super::{BackendError, FrameStats, GpuBackend, ProgramDesc, ProgramHandle, TextureId};
use crate::vertex::{Mat4, VertexAttributeDesc};
use glint_core::{Color, PixelBuffer, PixelFormat, PixelRect};

/// Uniform names and the bind group each one lives in.
const UNIFORMS: [(&str, u32); 2] = [("mvp", 0), ("base_color_texture", 1)];

struct GpuProgram {
    pipeline: Rc<RenderPipeline>,
    attributes: HashMap<&'static str, u32>,
    uniforms: HashSet<&'static str>,
}

struct GpuTexture {
    texture: Texture,
    bind_group: Rc<BindGroup>,
}

/// Everything one recorded draw needs at replay time.
struct DrawCall {
    pipeline: Rc<RenderPipeline>,
    uniforms: Rc<BindGroup>,
    texture: Rc<BindGroup>,
    vertex_buffer: Rc<Buffer>,
    first_vertex: u32,
    vertex_count: u32,
    scissor: Option<PixelRect>,
}

/// A [`GpuBackend`] that renders through `wgpu`.
pub struct WgpuBackend {
    gpu: GpuContext,
    uniform_layout: BindGroupLayout,
    texture_layout: BindGroupLayout,
    pipeline_layout: PipelineLayout,
    sampler: Sampler,
    white: Rc<BindGroup>,

    programs: Vec<GpuProgram>,
    textures: Vec<GpuTexture>,

    current_program: Option<usize>,
    current_uniforms: Option<Rc<BindGroup>>,
    current_texture: Option<TextureId>,
    vertex_buffer: Option<Rc<Buffer>>,
    scissor: Option<PixelRect>,

    /// Render target used when there is no surface.
    offscreen: Option<Texture>,
    size: (u32, u32),
    clear: Color,
    draws: Vec<DrawCall>,
    frame: FrameStats,
}

impl WgpuBackend {
    /// Wrap a GPU context.  `width`/`height` size the off-screen target
    /// when the context is headless.
    pub fn new(gpu: GpuContext, width: u32, height: u32) -> Self {
        let device = &gpu.device;

        // ── Bind group layouts ──────────────────────────────────
        let uniform_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("glint_uniform_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("glint_texture_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("glint_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("glint_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });

        // 1×1 white texture bound whenever no texture is.
        let white = make_texture(device, &texture_layout, &sampler, 1, 1, PixelFormat::Rgba);
        let pixels = PixelBuffer::filled(1, 1, PixelFormat::Rgba, &[255; 4]);
        write_region(&gpu.queue, &white.texture, PixelRect::new(0, 0, 1, 1), &pixels);

        let mut backend = Self {
            white: white.bind_group,
            gpu,
            uniform_layout,
            texture_layout,
            pipeline_layout,
            sampler,
            programs: Vec::new(),
            textures: Vec::new(),
            current_program: None,
            current_uniforms: None,
            current_texture: None,
            vertex_buffer: None,
            scissor: None,
            offscreen: None,
            size: (width.max(1), height.max(1)),
            clear: Color::BLACK,
            draws: Vec::new(),
            frame: FrameStats::default(),
        };
        backend.offscreen = backend.make_offscreen();
        backend
    }

    /// The wrapped GPU context.
    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn make_offscreen(&self) -> Option<Texture> {
        if !self.gpu.is_headless() {
            return None;
        }
        Some(self.gpu.device.create_texture(&TextureDescriptor {
            label: Some("glint_offscreen"),
            size: Extent3d {
                width: self.size.0,
                height: self.size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: self.gpu.format(),
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            view_formats: &[],
        }))
    }

    fn vertex_format(components: u32) -> VertexFormat {
        match components {
            1 => VertexFormat::Float32,
            2 => VertexFormat::Float32x2,
            3 => VertexFormat::Float32x3,
            _ => VertexFormat::Float32x4,
        }
    }

    /// Clamp `rect` to the render target.  `None` when nothing is left.
    fn clamp_scissor(rect: PixelRect, (width, height): (u32, u32)) -> Option<PixelRect> {
        let x = rect.x.min(width);
        let y = rect.y.min(height);
        let w = rect.width.min(width - x);
        let h = rect.height.min(height - y);
        if w == 0 || h == 0 {
            None
        } else {
            Some(PixelRect::new(x, y, w, h))
        }
    }
}

// ── Texture helpers ─────────────────────────────────────────────────

fn make_texture(
    device: &wgpu::Device,
    layout: &BindGroupLayout,
    sampler: &Sampler,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> GpuTexture {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("glint_page"),
        size: Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: match format {
            PixelFormat::Grayscale => TextureFormat::R8Unorm,
            PixelFormat::Rgba => TextureFormat::Rgba8Unorm,
        },
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("glint_page_bg"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    });
    GpuTexture {
        texture,
        bind_group: Rc::new(bind_group),
    }
}

/// Copy `region` of the full-page buffer `pixels` into `texture`.
fn write_region(queue: &wgpu::Queue, texture: &Texture, region: PixelRect, pixels: &PixelBuffer) {
    let bpp = pixels.format().bytes_per_pixel();
    let offset = region.y as usize * pixels.stride() + region.x as usize * bpp;
    queue.write_texture(
        TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: Origin3d {
                x: region.x,
                y: region.y,
                z: 0,
            },
            aspect: TextureAspect::All,
        },
        pixels.data(),
        TexelCopyBufferLayout {
            offset: offset as u64,
            bytes_per_row: Some(pixels.stride() as u32),
            rows_per_image: Some(region.height),
        },
        Extent3d {
            width: region.width,
            height: region.height,
            depth_or_array_layers: 1,
        },
    );
}

impl GpuBackend for WgpuBackend {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, BackendError> {
        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.vertex_source.into()),
        });
        let fs = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.fragment_source.into()),
        });

        let attributes: Vec<VertexAttribute> = desc
            .attributes
            .iter()
            .filter_map(|binding| {
                let a = desc.layout.attributes.iter().find(|a| a.attribute.name() == binding.name)?;
                Some(VertexAttribute {
                    format: Self::vertex_format(a.components),
                    offset: a.offset as u64,
                    shader_location: binding.location,
                })
            })
            .collect();

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&self.pipeline_layout),
            vertex: VertexState {
                module: &vs,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[VertexBufferLayout {
                    array_stride: desc.layout.stride as u64,
                    step_mode: VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },
            fragment: Some(FragmentState {
                module: &fs,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: self.gpu.format(),
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(BackendError::ProgramBuild {
                label: desc.label.to_string(),
                message: err.to_string(),
            });
        }

        let uniforms = UNIFORMS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| desc.vertex_source.contains(name) || desc.fragment_source.contains(name))
            .collect();

        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push(GpuProgram {
            pipeline: Rc::new(pipeline),
            attributes: desc.attributes.iter().map(|a| (a.name, a.location)).collect(),
            uniforms,
        });
        debug!("Built pipeline '{}' as {:?}", desc.label, handle);
        Ok(handle)
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        self.programs.get(program.0 as usize)?.attributes.get(name).copied()
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let p = self.programs.get(program.0 as usize)?;
        UNIFORMS
            .iter()
            .find(|(n, _)| *n == name && p.uniforms.contains(n))
            .map(|(_, group)| *group)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.current_program = Some(program.0 as usize);
    }

    fn set_uniform_matrix(&mut self, _location: u32, matrix: &Mat4) {
        let buffer = self.gpu.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("glint_mvp"),
            contents: bytemuck::cast_slice(matrix),
            usage: BufferUsages::UNIFORM,
        });
        let bind_group = self.gpu.device.create_bind_group(&BindGroupDescriptor {
            label: Some("glint_mvp_bg"),
            layout: &self.uniform_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.current_uniforms = Some(Rc::new(bind_group));
    }

    fn set_uniform_sampler(&mut self, _location: u32, unit: u32) {
        // Only unit 0 exists; bind group 1 always carries it.
        trace!("sampler bound to unit {unit}");
    }

    fn create_texture(&mut self, width: u32, height: u32, format: PixelFormat) -> TextureId {
        let texture = make_texture(
            &self.gpu.device,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
            format,
        );
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        debug!("Created {width}×{height} {format:?} texture {id:?}");
        id
    }

    fn upload_texture(&mut self, texture: TextureId, region: PixelRect, pixels: &PixelBuffer) {
        let Some(target) = self.textures.get(texture.0 as usize) else {
            return;
        };
        if region.is_empty() {
            return;
        }
        write_region(&self.gpu.queue, &target.texture, region, pixels);
        self.frame.texture_uploads += 1;
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.current_texture = texture;
    }

    fn allocate_vertex_buffer(&mut self, size: usize) {
        // Earlier buffers stay alive through the draws that reference them.
        let size = (size as u64).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        self.vertex_buffer = Some(Rc::new(self.gpu.device.create_buffer(&BufferDescriptor {
            label: Some("glint_vertices"),
            size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })));
    }

    fn write_vertex_buffer(&mut self, offset: usize, data: &[u8]) {
        if let Some(buffer) = &self.vertex_buffer {
            self.gpu.queue.write_buffer(buffer, offset as u64, data);
        }
    }

    fn enable_attribute(&mut self, location: u32, desc: VertexAttributeDesc, stride: u32) {
        // Layouts are baked into the pipeline.
        trace!("attribute {location}: {desc:?} stride {stride}");
    }

    fn disable_attribute(&mut self, location: u32) {
        trace!("attribute {location} disabled");
    }

    fn draw_triangles(&mut self, first_vertex: u32, vertex_count: u32) {
        let (Some(program), Some(uniforms), Some(vertex_buffer)) = (
            self.current_program.and_then(|p| self.programs.get(p)),
            self.current_uniforms.as_ref(),
            self.vertex_buffer.as_ref(),
        ) else {
            return;
        };
        let texture = self
            .current_texture
            .and_then(|t| self.textures.get(t.0 as usize))
            .map(|t| Rc::clone(&t.bind_group))
            .unwrap_or_else(|| Rc::clone(&self.white));

        self.draws.push(DrawCall {
            pipeline: Rc::clone(&program.pipeline),
            uniforms: Rc::clone(uniforms),
            texture,
            vertex_buffer: Rc::clone(vertex_buffer),
            first_vertex,
            vertex_count,
            scissor: self.scissor,
        });
    }

    fn set_scissor(&mut self, rect: PixelRect) {
        self.scissor = Some(rect);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.gpu.resize(width, height);
        self.offscreen = self.make_offscreen();
    }

    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError> {
        self.clear = clear;
        self.draws.clear();
        self.scissor = None;
        self.frame = FrameStats {
            texture_uploads: self.frame.texture_uploads,
            ..FrameStats::default()
        };
        Ok(())
    }

    fn end_frame(&mut self) -> Result<FrameStats, BackendError> {
        let surface_texture = self.gpu.acquire_frame()?;
        let view = match (&surface_texture, &self.offscreen) {
            (Some(frame), _) => frame.texture.create_view(&TextureViewDescriptor::default()),
            (None, Some(offscreen)) => offscreen.create_view(&TextureViewDescriptor::default()),
            (None, None) => return Err(BackendError::NoSurface),
        };
        let target_size = match &surface_texture {
            Some(frame) => (frame.texture.width(), frame.texture.height()),
            None => self.size,
        };

        let mut encoder = self.gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("glint_frame"),
        });

        let mut stats = FrameStats {
            texture_uploads: self.frame.texture_uploads,
            ..FrameStats::default()
        };
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("glint_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: self.clear.r as f64,
                            g: self.clear.g as f64,
                            b: self.clear.b as f64,
                            a: self.clear.a as f64,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for draw in &self.draws {
                let scissor = draw
                    .scissor
                    .unwrap_or(PixelRect::new(0, 0, target_size.0, target_size.1));
                let Some(scissor) = Self::clamp_scissor(scissor, target_size) else {
                    continue;
                };
                pass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
                pass.set_pipeline(&draw.pipeline);
                pass.set_bind_group(0, draw.uniforms.as_ref(), &[]);
                pass.set_bind_group(1, draw.texture.as_ref(), &[]);
                pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                pass.draw(draw.first_vertex..draw.first_vertex + draw.vertex_count, 0..1);
                stats.draw_calls += 1;
                stats.vertices += draw.vertex_count;
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        if let Some(frame) = surface_texture {
            frame.present();
        }
        self.draws.clear();
        self.frame = FrameStats::default();
        Ok(stats)
    }
}
