//! Programs and meshes the scene draws with, created once at startup.

use smolder_engine::render::{
    ColorVertex, GraphicsBackend, MeshData, MeshId, ProgramDesc, ProgramId, ShaderError,
    UniformDecl, UniformKind, VertexLayout, UNIT_QUAD_INDICES, UNIT_QUAD_VERTICES,
};

const SHAPE_VERT: &str = include_str!("shaders/shape.vert.wgsl");
const SHAPE_FRAG: &str = include_str!("shaders/shape.frag.wgsl");
const GUI_VERT: &str = include_str!("shaders/gui.vert.wgsl");
const GUI_FRAG: &str = include_str!("shaders/gui.frag.wgsl");
const VIGNETTE_VERT: &str = include_str!("shaders/vignette.vert.wgsl");
const VIGNETTE_FRAG: &str = include_str!("shaders/vignette.frag.wgsl");

const SHAPE_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("model", UniformKind::Mat4),
    UniformDecl::new("time", UniformKind::Float),
];

const GUI_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("proj", UniformKind::Mat4),
    UniformDecl::new("model", UniformKind::Mat4),
    UniformDecl::new("color", UniformKind::Vec4),
    UniformDecl::new("mode", UniformKind::Int),
];

const VIGNETTE_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("proj", UniformKind::Mat4),
    UniformDecl::new("model", UniformKind::Mat4),
    UniformDecl::new("strength", UniformKind::Float),
];

/// RGB triangle in normalized device coordinates.
pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex {
        pos: [0.0, 0.6, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    ColorVertex {
        pos: [-0.6, -0.6, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    ColorVertex {
        pos: [0.6, -0.6, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

/// Fill mode of the gui program, passed as its `mode` uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GuiMode {
    Rect = 0,
    Disc = 1,
}

pub fn shape_program() -> ProgramDesc<'static> {
    ProgramDesc {
        label: "shape",
        vertex_source: SHAPE_VERT,
        fragment_source: SHAPE_FRAG,
        layout: VertexLayout::PositionColor,
        uniforms: SHAPE_UNIFORMS,
    }
}

pub fn gui_program() -> ProgramDesc<'static> {
    ProgramDesc {
        label: "gui",
        vertex_source: GUI_VERT,
        fragment_source: GUI_FRAG,
        layout: VertexLayout::PositionUv,
        uniforms: GUI_UNIFORMS,
    }
}

pub fn vignette_program() -> ProgramDesc<'static> {
    ProgramDesc {
        label: "vignette",
        vertex_source: VIGNETTE_VERT,
        fragment_source: VIGNETTE_FRAG,
        layout: VertexLayout::PositionUv,
        uniforms: VIGNETTE_UNIFORMS,
    }
}

/// Handles for everything the compositor draws.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneResources {
    pub shape: ProgramId,
    pub gui: ProgramId,
    pub vignette: ProgramId,
    pub triangle: MeshId,
    pub quad: MeshId,
}

impl SceneResources {
    /// Compiles all programs, then uploads the static meshes.
    ///
    /// Fails on the first program that does not compile or link.
    pub fn load<B>(backend: &mut B) -> Result<Self, ShaderError>
    where
        B: GraphicsBackend + ?Sized,
    {
        let shape = backend.compile_program(&shape_program())?;
        let gui = backend.compile_program(&gui_program())?;
        let vignette = backend.compile_program(&vignette_program())?;

        let triangle = backend.upload_mesh(&MeshData::new(
            "triangle",
            VertexLayout::PositionColor,
            &TRIANGLE_VERTICES[..],
            None,
        ));
        let quad = backend.upload_mesh(&MeshData::new(
            "unit quad",
            VertexLayout::PositionUv,
            &UNIT_QUAD_VERTICES[..],
            Some(&UNIT_QUAD_INDICES[..]),
        ));

        log::debug!("scene resources loaded");
        Ok(Self { shape, gui, vignette, triangle, quad })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBackend;
    use smolder_engine::render::link_program;

    #[test]
    fn bundled_programs_link() {
        for desc in [shape_program(), gui_program(), vignette_program()] {
            let linked = link_program(&desc);
            assert!(linked.is_ok(), "{}: {:?}", desc.label, linked.err());
        }
    }

    #[test]
    fn entry_points_are_named_by_stage() {
        let linked = link_program(&gui_program()).unwrap();
        assert_eq!(linked.vertex_entry, "vs_main");
        assert_eq!(linked.fragment_entry, "fs_main");
    }

    #[test]
    fn load_yields_distinct_handles() {
        let mut backend = RecordingBackend::default();
        let res = SceneResources::load(&mut backend).unwrap();

        assert_ne!(res.shape, res.gui);
        assert_ne!(res.gui, res.vignette);
        assert_ne!(res.triangle, res.quad);
        assert_eq!(backend.program_count(), 3);
        assert_eq!(backend.mesh_count(), 2);
    }

    #[test]
    fn load_reports_broken_program() {
        let mut backend = RecordingBackend::default();
        backend.fail_program("gui");

        match SceneResources::load(&mut backend) {
            Err(ShaderError::Link { program, .. }) => assert_eq!(program, "gui"),
            other => panic!("expected link failure, got {other:?}"),
        }
        // Meshes are only uploaded once every program is ready.
        assert_eq!(backend.mesh_count(), 0);
    }
}
