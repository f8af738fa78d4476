//! [`UiBackend`] on top of `wgpu`.
//!
//! [`UiPipeline`] holds the long-lived GPU objects (shader, pipeline, atlas
//! texture, projection uniform). [`WgpuBackend`] borrows them together with the
//! frame's encoder and target view for the duration of one frame.

use wgpu::util::DeviceExt;

use crate::atlas::Atlas;
use crate::batch::Vertex;
use crate::error::DeviceAllocationError;

use super::{BufferKind, DrawRequest, Projection, RenderCtx, RenderTarget, StagedCopy, UiBackend};

/// Renderer whose device buffers are `wgpu` buffers.
pub type WgpuRenderer = super::UiRenderer<wgpu::Buffer>;

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

/// GPU objects shared by every frame: pipeline, atlas and projection uniform.
pub struct UiPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    projection_ubo: wgpu::Buffer,
    // Kept alive for the bind group.
    _atlas_texture: wgpu::Texture,
}

impl UiPipeline {
    /// Uploads `atlas` once and builds the pipeline for `format`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        atlas: &Atlas,
    ) -> Result<Self, DeviceAllocationError> {
        let atlas_texture = upload_atlas(device, queue, atlas)?;
        let atlas_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen ui atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let projection_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen ui projection ubo"),
            size: Projection::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen ui bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(Projection::SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen ui bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: projection_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&atlas_view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen ui shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/ui.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen ui pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen ui pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "ui pipeline ready: format={format:?} atlas={}x{} glyphs={}",
            atlas.width(),
            atlas.height(),
            atlas.glyph_count()
        );

        Ok(Self { format, pipeline, bind_group, projection_ubo, _atlas_texture: atlas_texture })
    }

    /// Surface format the pipeline was built for.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn upload_atlas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    atlas: &Atlas,
) -> Result<wgpu::Texture, DeviceAllocationError> {
    let limit = device.limits().max_texture_dimension_2d;
    let (width, height) = (atlas.width(), atlas.height());
    if width > limit || height > limit {
        return Err(DeviceAllocationError::Texture { width, height, limit });
    }

    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lumen ui atlas"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        atlas.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width),
            rows_per_image: Some(height),
        },
        size,
    );

    Ok(texture)
}

/// One frame's view of the device.
pub struct WgpuBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    encoder: &'a mut wgpu::CommandEncoder,
    color_view: &'a wgpu::TextureView,
    pipeline: &'a UiPipeline,
    max_buffer_size: u64,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(ctx: &'a RenderCtx<'_>, target: &'a mut RenderTarget<'_>, pipeline: &'a UiPipeline) -> Self {
        Self {
            device: ctx.device,
            queue: ctx.queue,
            encoder: &mut *target.encoder,
            color_view: target.color_view,
            pipeline,
            max_buffer_size: ctx.max_buffer_size(),
        }
    }
}

impl UiBackend for WgpuBackend<'_> {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&mut self, kind: BufferKind, size: u64) -> Result<wgpu::Buffer, DeviceAllocationError> {
        if size > self.max_buffer_size {
            return Err(DeviceAllocationError::Buffer { kind, requested: size, limit: self.max_buffer_size });
        }
        let (label, usage) = match kind {
            BufferKind::Vertex => ("lumen ui vbo", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("lumen ui ibo", wgpu::BufferUsages::INDEX),
        };
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    fn copy_staged(
        &mut self,
        staging: &[u8],
        copies: &[StagedCopy<'_, wgpu::Buffer>],
    ) -> Result<(), DeviceAllocationError> {
        let requested = staging.len() as u64;
        if requested > self.max_buffer_size {
            return Err(DeviceAllocationError::Transfer { requested, limit: self.max_buffer_size });
        }

        // The encoder keeps the transfer buffer alive until the copies execute.
        let transfer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen ui transfer"),
            contents: staging,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        for copy in copies.iter().filter(|c| c.size > 0) {
            self.encoder.copy_buffer_to_buffer(&transfer, copy.src_offset, copy.dst, copy.dst_offset, copy.size);
        }
        Ok(())
    }

    fn draw(&mut self, request: DrawRequest<'_, wgpu::Buffer>) {
        self.queue.write_buffer(&self.pipeline.projection_ubo, 0, request.projection.as_bytes());

        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen ui pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline.pipeline);
        rpass.set_bind_group(0, &self.pipeline.bind_group, &[]);
        rpass.set_vertex_buffer(0, request.vertices.slice(..request.vertex_bytes));
        rpass.set_index_buffer(request.indices.slice(..request.index_bytes), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..request.index_count, 0, 0..1);
    }
}
