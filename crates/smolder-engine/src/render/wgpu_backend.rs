use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use super::backend::{
    BackendError, GraphicsBackend, MeshData, MeshId, ProgramDesc, ProgramId, Uniform, VertexLayout,
};
use super::ctx::{RenderCtx, RenderTarget};
use super::mesh::{buffer_layout, premul_alpha_blend};
use super::shader::{link_program, ShaderError};
use super::uniforms::{align_up, UniformBlock};

/// wgpu implementation of [`GraphicsBackend`].
///
/// Draw calls are recorded during composition. Each draw snapshots the bound
/// program's uniform block into a staging buffer at a dynamic-offset aligned
/// position. [`flush`](Self::flush) uploads the staging bytes and replays every
/// draw in order into a single render pass that loads the cleared target.
pub struct WgpuBackend {
    device: wgpu::Device,
    surface_format: wgpu::TextureFormat,
    uniform_alignment: u64,

    programs: Vec<GpuProgram>,
    meshes: Vec<GpuMesh>,
    bound: Option<usize>,

    commands: Vec<Command>,
    staging: Vec<u8>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: u64,
}

struct GpuProgram {
    label: String,
    layout: VertexLayout,
    uniforms: UniformBlock,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
}

struct GpuMesh {
    label: String,
    layout: VertexLayout,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    element_count: u32,
}

enum Command {
    Pass(&'static str),
    Draw { program: usize, mesh: usize, offset: u32 },
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let uniform_alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        Self {
            device: device.clone(),
            surface_format,
            uniform_alignment,
            programs: Vec::new(),
            meshes: Vec::new(),
            bound: None,
            commands: Vec::new(),
            staging: Vec::new(),
            uniform_buffer: None,
            uniform_capacity: 0,
        }
    }

    /// Drops anything recorded but not flushed (e.g. after a skipped frame).
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.staging.clear();
    }

    /// Number of draws recorded since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }

    /// Uploads recorded uniforms and replays recorded draws into `target`.
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.commands.is_empty() {
            return;
        }
        if ctx.surface_format != self.surface_format {
            log::warn!(
                "dropping {} draws: pipelines target {:?}, frame is {:?}",
                self.pending_draws(),
                self.surface_format,
                ctx.surface_format
            );
            self.begin_frame();
            return;
        }

        self.ensure_uniform_capacity(self.staging.len() as u64);
        if !self.staging.is_empty() {
            if let Some(buffer) = self.uniform_buffer.as_ref() {
                ctx.queue.write_buffer(buffer, 0, &self.staging);
            }
        }
        self.ensure_bind_groups();

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("smolder frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
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

            let mut group_open = false;
            for cmd in &self.commands {
                match *cmd {
                    Command::Pass(label) => {
                        if group_open {
                            rpass.pop_debug_group();
                        }
                        rpass.push_debug_group(label);
                        group_open = true;
                    }
                    Command::Draw { program, mesh, offset } => {
                        let p = &self.programs[program];
                        let m = &self.meshes[mesh];

                        rpass.set_pipeline(&p.pipeline);
                        if let Some(bind_group) = p.bind_group.as_ref() {
                            rpass.set_bind_group(0, bind_group, &[offset]);
                        }
                        rpass.set_vertex_buffer(0, m.vertex_buffer.slice(..));
                        match m.index_buffer.as_ref() {
                            Some(ibo) => {
                                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                                rpass.draw_indexed(0..m.element_count, 0, 0..1);
                            }
                            None => rpass.draw(0..m.element_count, 0..1),
                        }
                    }
                }
            }
            if group_open {
                rpass.pop_debug_group();
            }
        }

        self.commands.clear();
        self.staging.clear();
    }

    fn ensure_uniform_capacity(&mut self, required: u64) {
        if required == 0 || (self.uniform_buffer.is_some() && required <= self.uniform_capacity) {
            return;
        }

        let new_cap = required.next_power_of_two().max(16 * 1024);
        self.uniform_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("smolder uniform staging ubo"),
            size: new_cap,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.uniform_capacity = new_cap;

        // Bind groups reference the old buffer.
        for p in &mut self.programs {
            p.bind_group = None;
        }
    }

    fn ensure_bind_groups(&mut self) {
        let Some(buffer) = self.uniform_buffer.as_ref() else { return };

        for p in &mut self.programs {
            if p.bind_group.is_some() {
                continue;
            }
            let Some(bgl) = p.bind_group_layout.as_ref() else { continue };

            p.bind_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("smolder {} bind group", p.label)),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer,
                        offset: 0,
                        size: NonZeroU64::new(p.uniforms.size()),
                    }),
                }],
            }));
        }
    }

    fn bound_program_mut(&mut self) -> Result<&mut GpuProgram, BackendError> {
        let index = self.bound.ok_or(BackendError::NoProgramBound)?;
        self.programs
            .get_mut(index)
            .ok_or(BackendError::UnknownProgram(ProgramId::new(index as u32)))
    }
}

impl GraphicsBackend for WgpuBackend {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        let linked = link_program(desc)?;
        let uniforms = UniformBlock::new(desc.uniforms);

        let vertex_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("smolder {} vertex", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.vertex_source.into()),
        });
        let fragment_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("smolder {} fragment", desc.label)),
            source: wgpu::ShaderSource::Wgsl(desc.fragment_source.into()),
        });

        let bind_group_layout = NonZeroU64::new(uniforms.size()).map(|min_size| {
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("smolder {} bgl", desc.label)),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: Some(min_size),
                        },
                        count: None,
                    }],
                })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("smolder {} pipeline layout", desc.label)),
                bind_group_layouts: &bind_group_layouts,
                immediate_size: 0,
            });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("smolder {} pipeline", desc.label)),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(&linked.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[buffer_layout(desc.layout)],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(&linked.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
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

        let id = ProgramId::new(self.programs.len() as u32);
        log::debug!(
            "program `{}` linked ({} uniform bytes) as {id:?}",
            desc.label,
            uniforms.size()
        );

        self.programs.push(GpuProgram {
            label: desc.label.to_string(),
            layout: desc.layout,
            uniforms,
            pipeline,
            bind_group_layout,
            bind_group: None,
        });
        Ok(id)
    }

    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> MeshId {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("smolder {} vbo", mesh.label)),
            contents: mesh.vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = mesh.indices.map(|indices| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("smolder {} ibo", mesh.label)),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let id = MeshId::new(self.meshes.len() as u32);
        self.meshes.push(GpuMesh {
            label: mesh.label.to_string(),
            layout: mesh.layout,
            vertex_buffer,
            index_buffer,
            element_count: mesh.element_count(),
        });
        id
    }

    fn begin_pass(&mut self, label: &'static str) {
        self.commands.push(Command::Pass(label));
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), BackendError> {
        if program.index() >= self.programs.len() {
            return Err(BackendError::UnknownProgram(program));
        }
        self.bound = Some(program.index());
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: Uniform) -> Result<(), BackendError> {
        let program = self.bound_program_mut()?;
        program.uniforms.set(&program.label, name, value)
    }

    fn draw(&mut self, mesh: MeshId) -> Result<(), BackendError> {
        let index = self.bound.ok_or(BackendError::NoProgramBound)?;
        let program = self
            .programs
            .get(index)
            .ok_or(BackendError::UnknownProgram(ProgramId::new(index as u32)))?;
        let m = self
            .meshes
            .get(mesh.index())
            .ok_or(BackendError::UnknownMesh(mesh))?;

        if program.layout != m.layout {
            return Err(BackendError::LayoutMismatch {
                program: program.label.clone(),
                mesh: m.label.clone(),
                expected: program.layout,
                actual: m.layout,
            });
        }

        let offset = if program.uniforms.is_empty() {
            0
        } else {
            let offset = align_up(self.staging.len() as u64, self.uniform_alignment);
            self.staging.resize(offset as usize, 0);
            self.staging.extend_from_slice(program.uniforms.bytes());
            offset as u32
        };

        self.commands.push(Command::Draw {
            program: index,
            mesh: mesh.index(),
            offset,
        });
        Ok(())
    }
}
