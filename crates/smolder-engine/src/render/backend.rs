//! Abstract drawing contract.
//!
//! The effect layer talks to the GPU only through [`GraphicsBackend`]: it
//! compiles programs, uploads static meshes once, then per frame binds a
//! program, sets named uniforms and issues draws. `WgpuBackend` is the real
//! implementation; tests substitute a recorder.

use bytemuck::Pod;
use glam::{Mat4, Vec4};
use thiserror::Error;

use super::shader::ShaderError;

/// Opaque handle to a compiled and linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(u32);

impl ProgramId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque handle to an uploaded mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(u32);

impl MeshId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of a program uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    /// Signed integer, used for mode selectors.
    Int,
    Vec4,
    Mat4,
}

impl UniformKind {
    /// Size in bytes inside a uniform block.
    #[inline]
    pub const fn size(self) -> u64 {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }

    /// Alignment in bytes inside a uniform block.
    #[inline]
    pub const fn align(self) -> u64 {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec4 | UniformKind::Mat4 => 16,
        }
    }
}

/// A uniform value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Uniform {
    Float(f32),
    Int(i32),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl Uniform {
    #[inline]
    pub fn kind(&self) -> UniformKind {
        match self {
            Uniform::Float(_) => UniformKind::Float,
            Uniform::Int(_) => UniformKind::Int,
            Uniform::Vec4(_) => UniformKind::Vec4,
            Uniform::Mat4(_) => UniformKind::Mat4,
        }
    }
}

/// Declared uniform of a program.
///
/// Declaration order defines the block layout; the shader's uniform struct
/// must list the same members at the same offsets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    #[inline]
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Vertex formats understood by the backend.
///
/// Attribute locations are fixed: position at 0, the second attribute at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexLayout {
    /// `vec3` position + `vec3` color.
    PositionColor,
    /// `vec2` position + `vec2` texture coordinate.
    PositionUv,
}

impl VertexLayout {
    #[inline]
    pub const fn stride(self) -> u64 {
        match self {
            VertexLayout::PositionColor => 24,
            VertexLayout::PositionUv => 16,
        }
    }

    /// Shader input locations this layout feeds.
    #[inline]
    pub const fn locations(self) -> &'static [u32] {
        &[0, 1]
    }
}

/// Program creation parameters.
#[derive(Debug, Copy, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub layout: VertexLayout,
    pub uniforms: &'a [UniformDecl],
}

/// Static mesh data, already in the byte layout named by `layout`.
#[derive(Debug, Copy, Clone)]
pub struct MeshData<'a> {
    pub label: &'a str,
    pub layout: VertexLayout,
    pub vertices: &'a [u8],
    pub vertex_count: u32,
    pub indices: Option<&'a [u16]>,
}

impl<'a> MeshData<'a> {
    pub fn new<V: Pod>(
        label: &'a str,
        layout: VertexLayout,
        vertices: &'a [V],
        indices: Option<&'a [u16]>,
    ) -> Self {
        debug_assert_eq!(std::mem::size_of::<V>() as u64, layout.stride());
        Self {
            label,
            layout,
            vertices: bytemuck::cast_slice(vertices),
            vertex_count: vertices.len() as u32,
            indices,
        }
    }

    /// Number of elements a draw of this mesh consumes.
    #[inline]
    pub fn element_count(&self) -> u32 {
        self.indices.map_or(self.vertex_count, |i| i.len() as u32)
    }
}

/// Failure while recording a draw.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("unknown program handle {0:?}")]
    UnknownProgram(ProgramId),

    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshId),

    #[error("no program bound")]
    NoProgramBound,

    #[error("program `{program}` has no uniform named `{name}`")]
    UnknownUniform { program: String, name: String },

    #[error("uniform `{name}` of program `{program}` is {expected:?}, got {actual:?}")]
    UniformKindMismatch {
        program: String,
        name: String,
        expected: UniformKind,
        actual: UniformKind,
    },

    #[error("program `{program}` takes {expected:?} vertices, mesh `{mesh}` holds {actual:?}")]
    LayoutMismatch {
        program: String,
        mesh: String,
        expected: VertexLayout,
        actual: VertexLayout,
    },
}

/// Drawing contract between the effect layer and a graphics API.
///
/// Uniform values persist per program between draws, as with GL program
/// objects: setting `model` once and drawing twice draws twice with it.
pub trait GraphicsBackend {
    /// Compiles and links a program.
    fn compile_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, ShaderError>;

    /// Uploads a static vertex buffer (and optional index buffer).
    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> MeshId;

    /// Marks the start of a visual pass. Purely informational.
    fn begin_pass(&mut self, label: &'static str);

    fn use_program(&mut self, program: ProgramId) -> Result<(), BackendError>;

    /// Sets a uniform of the bound program.
    fn set_uniform(&mut self, name: &str, value: Uniform) -> Result<(), BackendError>;

    /// Draws `mesh` with the bound program and its current uniforms.
    fn draw(&mut self, mesh: MeshId) -> Result<(), BackendError>;
}
