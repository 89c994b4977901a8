use egui_wgpu::wgpu;
use wgpu::util::DeviceExt;

use crate::{
    EngineResult, PassContext, RenderPass, Shader, SkyConfig, SkyMesh, SkyProgram, Uniforms,
    Vertex, validation_scope,
};

pub struct SkyRenderer {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_bind_layout: wgpu::BindGroupLayout, // @group(0) - uniforms
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub mesh: SkyMesh,
}

impl SkyRenderer {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        mesh: SkyMesh,
        shader: &Shader,
    ) -> EngineResult<Self> {
        // ========================================================================
        // BIND GROUP 0 : Uniforms (view_proj)
        // ========================================================================
        let uniform_bind_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("sky_uniform_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: SkyProgram::UNIFORM_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(Uniforms::SIZE),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky_pipeline_layout"),
            bind_group_layouts: &[&uniform_bind_layout], // @group(0)
            push_constant_ranges: &[],
        });

        let vertex_buffers = [Vertex::layout()];
        let color_targets = [Some(wgpu::ColorTargetState {
            format: target_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let descriptor = wgpu::RenderPipelineDescriptor {
            label: Some("sky_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader.module(),
                entry_point: Some(SkyProgram::VERTEX_ENTRY),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader.module(),
                entry_point: Some(SkyProgram::FRAGMENT_ENTRY),
                targets: &color_targets,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        };

        // Les entry points et bindings d'un shader externe ne sont vérifiés qu'ici.
        let pipeline = validation_scope(device, "sky_pipeline", || {
            device.create_render_pipeline(&descriptor)
        })?;

        // ========================================================================
        // Buffer d'uniforms et son bind group
        // ========================================================================
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky_uniform_buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky_uniform_bind_group"),
            layout: &uniform_bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: SkyProgram::UNIFORM_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // ========================================================================
        // Géométrie
        // ========================================================================
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky_vertex_buffer"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky_index_buffer"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Sky pipeline created for {:?} ({} indices, mesh: {})",
            target_format,
            mesh.indices().len(),
            mesh.name()
        );

        Ok(Self {
            pipeline,
            uniform_bind_layout,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices().len() as u32,
            mesh,
        })
    }

    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &Uniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(SkyProgram::UNIFORM_GROUP, &self.uniform_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// ============================================================================
// SKY PASS - Efface la cible puis dessine le ciel
// ============================================================================

pub struct SkyPass {
    renderer: SkyRenderer,
    clear_color: wgpu::Color,
}

impl SkyPass {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        config: &SkyConfig,
    ) -> EngineResult<Self> {
        let shader = match &config.shader_path {
            Some(path) => {
                log::info!("Loading sky shader override from {:?}", path);
                Shader::from_file(device, SkyProgram::LABEL, path)?
            }
            None => Shader::from_wgsl(device, SkyProgram::LABEL, SkyProgram::SOURCE)?,
        };

        let renderer = SkyRenderer::new(device, target_format, config.mesh, &shader)?;
        let [r, g, b, a] = config.clear_color;

        Ok(Self {
            renderer,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Enregistre la passe dans `encoder` : upload des uniforms, clear puis draw.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        queue: &wgpu::Queue,
        uniforms: &Uniforms,
    ) {
        self.renderer.update_uniforms(queue, uniforms);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sky_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.renderer.draw(&mut rpass);
    }
}

impl RenderPass for SkyPass {
    fn name(&self) -> &str {
        "sky_pass"
    }

    fn execute(&self, ctx: &mut PassContext) {
        self.encode(ctx.encoder, ctx.target, ctx.queue, ctx.scene.uniforms());
    }
}
