//! GPU rendering subsystem.
//!
//! Higher layers draw through the [`GraphicsBackend`] contract: compile
//! programs from WGSL text, upload static meshes, then bind programs, set
//! named uniforms and draw. [`WgpuBackend`] implements it on top of wgpu.
//!
//! Convention:
//! - Programs output linear premultiplied color.
//! - All draws blend source-over in submission order.

mod backend;
mod ctx;
mod mesh;
mod shader;
mod uniforms;
mod wgpu_backend;

pub use backend::{
    BackendError, GraphicsBackend, MeshData, MeshId, ProgramDesc, ProgramId, Uniform, UniformDecl,
    UniformKind, VertexLayout,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{ColorVertex, UvVertex, UNIT_QUAD_INDICES, UNIT_QUAD_VERTICES};
pub use shader::{link_program, LinkedProgram, ShaderError, ShaderStage};
pub use uniforms::{UniformBlock, UniformSlot};
pub use wgpu_backend::WgpuBackend;
