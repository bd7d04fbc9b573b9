use anyhow::{ensure, Result};

use crate::coords::Viewport;
use crate::device::GpuInit;
use crate::gfx::{
    BufferUsage, DeviceBuffer, ShaderProgram, Texture2D, TextureRef, TextureRegistry, VertexInput,
};
use crate::render::RenderTarget;

use super::batcher::{BatchConfig, BatchSubmit, Batcher};
use super::vertex::BatchVertex;

/// Column-major orthographic projection mapping `(0, 0)` to the top-left and
/// `(width, height)` to the bottom-right of clip space. `z` passes through.
pub fn ortho_projection(width: f32, height: f32) -> [[f32; 4]; 4] {
    let w = width.max(f32::EPSILON);
    let h = height.max(f32::EPSILON);
    [
        [2.0 / w, 0.0, 0.0, 0.0],
        [0.0, -2.0 / h, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0, 1.0],
    ]
}

/// [`BatchSubmit`] sink that draws into a wgpu color target.
///
/// Each submission writes the vertices into one reused vertex buffer and
/// submits its own command buffer (load, draw, store), so several flushes per
/// frame stay ordered without extra buffers.
pub struct GpuBatch {
    device: wgpu::Device,
    queue: wgpu::Queue,

    program: ShaderProgram,
    vertex_input: VertexInput,
    vertex_buffer: DeviceBuffer,

    projection_ubo: DeviceBuffer,
    projection_layout: wgpu::BindGroupLayout,
    projection_bind_group: wgpu::BindGroup,
    logical_size: Viewport,

    textures: TextureRegistry,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    target: Option<(wgpu::TextureView, wgpu::TextureFormat)>,

    warned_no_target: bool,
    warned_invalid_program: bool,
}

impl GpuBatch {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, config: &BatchConfig) -> Result<Self> {
        let required = GpuInit::batching_features();
        ensure!(
            device.features().contains(required),
            "sprite batching needs device features {required:?}; create the device with GpuInit::for_batching"
        );
        let max_slots = device.limits().max_binding_array_elements_per_shader_stage;
        ensure!(
            config.texture_slots <= max_slots,
            "{} texture slots requested, device allows {max_slots}",
            config.texture_slots
        );

        let program = ShaderProgram::from_wgsl(device, include_str!("shaders/batch.wgsl"));
        let vertex_input = VertexInput::from_program(&program);
        if program.is_valid() {
            debug_assert_eq!(vertex_input.stride(0), BatchVertex::STRIDE);
        }

        let vertex_buffer = DeviceBuffer::new(
            device,
            "sprig batch vbo",
            config.max_vertices() as u64 * BatchVertex::STRIDE,
            None,
            wgpu::BufferUsages::VERTEX,
            BufferUsage::DYNAMIC,
        );

        let projection = ortho_projection(config.logical_size.width, config.logical_size.height);
        let projection_ubo = DeviceBuffer::new(
            device,
            "sprig batch projection ubo",
            std::mem::size_of_val(&projection) as u64,
            Some(bytemuck::cast_slice(&projection)),
            wgpu::BufferUsages::UNIFORM,
            BufferUsage::DYNAMIC,
        );

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig batch projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(projection_ubo.size()),
                },
                count: None,
            }],
        });

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig batch projection bind group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.raw().as_entire_binding(),
            }],
        });

        let textures = TextureRegistry::new(device, queue, config.texture_slots);

        log::debug!(
            "GpuBatch: {} vertices ({} KiB), {} texture slots",
            config.max_vertices(),
            vertex_buffer.size() / 1024,
            textures.capacity()
        );

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            program,
            vertex_input,
            vertex_buffer,
            projection_ubo,
            projection_layout,
            projection_bind_group,
            logical_size: config.logical_size,
            textures,
            pipeline_format: None,
            pipeline: None,
            target: None,
            warned_no_target: false,
            warned_invalid_program: false,
        })
    }

    /// Directs subsequent submissions to `target`.
    pub fn retarget(&mut self, target: &RenderTarget<'_>) {
        self.target = Some((target.color_view.clone(), target.format));
    }

    /// Changes the logical coordinate space mapped onto the target.
    pub fn set_logical_size(&mut self, size: Viewport) {
        if !size.is_valid() || size == self.logical_size {
            return;
        }
        self.logical_size = size;
        let projection = ortho_projection(size.width, size.height);
        self.projection_ubo
            .sub_data(&self.queue, 0, bytemuck::cast_slice(&projection));
    }

    #[inline]
    pub fn logical_size(&self) -> Viewport {
        self.logical_size
    }

    #[inline]
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    #[inline]
    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    #[inline]
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn ensure_pipeline(&mut self, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }
        let Some([(vs_module, vs_entry), (fs_module, fs_entry)]) = self.program.stages() else {
            return;
        };

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprig batch pipeline layout"),
            bind_group_layouts: &[&self.projection_layout, self.textures.layout()],
            immediate_size: 0,
        });

        let buffers = self.vertex_input.layouts();

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprig batch pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: vs_module,
                entry_point: Some(vs_entry),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: fs_module,
                entry_point: Some(fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
    }
}

impl BatchSubmit for GpuBatch {
    fn submit(&mut self, vertices: &[BatchVertex]) {
        if vertices.is_empty() {
            return;
        }
        let Some(format) = self.target.as_ref().map(|(_, f)| *f) else {
            if !self.warned_no_target {
                log::warn!("GpuBatch: flush without a render target; call begin() first");
                self.warned_no_target = true;
            }
            return;
        };
        if !self.program.is_valid() {
            if !self.warned_invalid_program {
                log::error!("GpuBatch: batch shader is invalid, nothing will be drawn");
                self.warned_invalid_program = true;
            }
            return;
        }

        self.ensure_pipeline(format);
        self.vertex_buffer
            .sub_data(&self.queue, 0, bytemuck::cast_slice(vertices));

        // Mutating borrows first; the rest are plain field reads.
        let textures_bg = self.textures.bind_group(&self.device);
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some((view, _)) = self.target.as_ref() else { return };

        let byte_len = vertices.len() as u64 * BatchVertex::STRIDE;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprig batch encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprig batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
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

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.projection_bind_group, &[]);
            rpass.set_bind_group(1, textures_bg, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.raw().slice(..byte_len));
            rpass.draw(0..vertices.len() as u32, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Batcher drawing through wgpu.
pub type SpriteBatcher = Batcher<GpuBatch>;

impl Batcher<GpuBatch> {
    /// Creates a batcher bound to `device`, which must have been created
    /// with [`GpuInit::for_batching`].
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, config: BatchConfig) -> Result<Self> {
        let sink = GpuBatch::new(device, queue, &config)?;
        Ok(Self::with_sink(&config, sink))
    }

    /// Starts a batch drawing into `target`.
    pub fn begin(&mut self, target: &RenderTarget<'_>) {
        self.sink_mut().retarget(target);
        self.start();
    }

    /// Makes `texture` addressable by quads; see [`TextureRegistry::make_resident`].
    pub fn register_texture(&mut self, texture: &Texture2D) -> TextureRef {
        self.sink_mut().textures_mut().make_resident(texture)
    }

    pub fn release_texture(&mut self, texture: TextureRef) {
        self.sink_mut().textures_mut().release(texture);
    }

    pub fn set_logical_size(&mut self, size: Viewport) {
        self.sink_mut().set_logical_size(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: &[[f32; 4]; 4], x: f32, y: f32) -> (f32, f32) {
        let v = [x, y, 0.0, 1.0];
        let mut out = [0.0f32; 4];
        for (col, &component) in m.iter().zip(v.iter()) {
            for row in 0..4 {
                out[row] += col[row] * component;
            }
        }
        (out[0] / out[3], out[1] / out[3])
    }

    fn assert_near(got: (f32, f32), want: (f32, f32)) {
        assert!(
            (got.0 - want.0).abs() < 1e-5 && (got.1 - want.1).abs() < 1e-5,
            "{got:?} != {want:?}"
        );
    }

    #[test]
    fn projection_maps_corners_to_clip_space() {
        let m = ortho_projection(1920.0, 1080.0);
        assert_near(apply(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_near(apply(&m, 1920.0, 1080.0), (1.0, -1.0));
        assert_near(apply(&m, 960.0, 540.0), (0.0, 0.0));
    }

    #[test]
    fn projection_tolerates_zero_size() {
        let m = ortho_projection(0.0, 0.0);
        assert!(m.iter().flatten().all(|v| v.is_finite()));
    }
}
