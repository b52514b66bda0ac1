//! Recording [`GraphicsBackend`] for GPU-free tests.
//!
//! Programs go through the same naga compile/link checks as the wgpu backend,
//! and uniform writes go through a real [`UniformBlock`], so type and name
//! errors surface here exactly as they would on the GPU path.

use smolder_engine::render::{
    link_program, BackendError, GraphicsBackend, MeshData, MeshId, ProgramDesc, ProgramId,
    ShaderError, Uniform, UniformBlock, VertexLayout,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Pass(&'static str),
    Use(ProgramId),
    Set(String, Uniform),
    Draw { program: ProgramId, mesh: MeshId },
}

struct RecordedProgram {
    label: String,
    layout: VertexLayout,
    uniforms: UniformBlock,
}

#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    programs: Vec<RecordedProgram>,
    meshes: Vec<(String, VertexLayout)>,
    bound: Option<usize>,
    failing: Vec<String>,
}

impl RecordingBackend {
    /// Makes the next compile of the program named `label` fail to link.
    pub fn fail_program(&mut self, label: &str) {
        self.failing.push(label.to_string());
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Pass labels in issue order.
    pub fn passes(&self) -> Vec<&'static str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Pass(label) => Some(*label),
                _ => None,
            })
            .collect()
    }

    /// Number of draws issued under the pass labelled `label`.
    pub fn draws_in(&self, label: &str) -> usize {
        let mut current = None;
        let mut count = 0;
        for c in &self.calls {
            match c {
                Call::Pass(l) => current = Some(*l),
                Call::Draw { .. } if current == Some(label) => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Values of uniform `name` as they were at each draw of pass `label`.
    pub fn uniform_at_draws(&self, label: &str, name: &str) -> Vec<Uniform> {
        let mut current = None;
        let mut last: Option<Uniform> = None;
        let mut out = Vec::new();
        for c in &self.calls {
            match c {
                Call::Pass(l) => current = Some(*l),
                Call::Set(n, v) if n == name => last = Some(*v),
                Call::Draw { .. } if current == Some(label) => {
                    if let Some(v) = last {
                        out.push(v);
                    }
                }
                _ => {}
            }
        }
        out
    }
}

impl GraphicsBackend for RecordingBackend {
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError> {
        if let Some(i) = self.failing.iter().position(|l| l == desc.label) {
            self.failing.remove(i);
            return Err(ShaderError::Link {
                program: desc.label.to_string(),
                log: "forced failure".to_string(),
            });
        }

        link_program(desc)?;

        let id = ProgramId::new(self.programs.len() as u32);
        self.programs.push(RecordedProgram {
            label: desc.label.to_string(),
            layout: desc.layout,
            uniforms: UniformBlock::new(desc.uniforms),
        });
        Ok(id)
    }

    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> MeshId {
        let id = MeshId::new(self.meshes.len() as u32);
        self.meshes.push((mesh.label.to_string(), mesh.layout));
        id
    }

    fn begin_pass(&mut self, label: &'static str) {
        self.calls.push(Call::Pass(label));
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), BackendError> {
        if program.index() >= self.programs.len() {
            return Err(BackendError::UnknownProgram(program));
        }
        self.bound = Some(program.index());
        self.calls.push(Call::Use(program));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: Uniform) -> Result<(), BackendError> {
        let index = self.bound.ok_or(BackendError::NoProgramBound)?;
        let p = &mut self.programs[index];
        p.uniforms.set(&p.label, name, value)?;
        self.calls.push(Call::Set(name.to_string(), value));
        Ok(())
    }

    fn draw(&mut self, mesh: MeshId) -> Result<(), BackendError> {
        let index = self.bound.ok_or(BackendError::NoProgramBound)?;
        let p = &self.programs[index];
        let (mesh_label, mesh_layout) =
            self.meshes.get(mesh.index()).ok_or(BackendError::UnknownMesh(mesh))?;

        if p.layout != *mesh_layout {
            return Err(BackendError::LayoutMismatch {
                program: p.label.clone(),
                mesh: mesh_label.clone(),
                expected: p.layout,
                actual: *mesh_layout,
            });
        }

        self.calls.push(Call::Draw {
            program: ProgramId::new(index as u32),
            mesh,
        });
        Ok(())
    }
}
