//! Program compilation and linking for WGSL sources.
//!
//! Each stage is parsed and validated by naga on its own ("compile"). The two
//! stages are then checked against each other and against the program's
//! declared vertex layout and uniform list ("link"). A program that links here
//! is accepted by wgpu pipeline creation.

use std::collections::BTreeSet;
use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Module, Scalar, TypeInner, VectorSize};
use thiserror::Error;

use super::backend::{ProgramDesc, UniformKind};
use super::uniforms::UniformBlock;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Program creation failure, carrying the diagnostic log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} stage of program `{program}`:\n{log}")]
    Compile {
        program: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("failed to link program `{program}`:\n{log}")]
    Link { program: String, log: String },
}

impl ShaderError {
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log, .. } => log,
        }
    }
}

/// Result of a successful link: the entry points pipelines should use.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LinkedProgram {
    pub vertex_entry: String,
    pub fragment_entry: String,
}

/// Compiles both stages of `desc` and links them.
pub fn link_program(desc: &ProgramDesc<'_>) -> Result<LinkedProgram, ShaderError> {
    let vertex = compile_stage(desc.label, ShaderStage::Vertex, desc.vertex_source)?;
    let fragment = compile_stage(desc.label, ShaderStage::Fragment, desc.fragment_source)?;

    let mut problems = Vec::new();

    let vertex_entry = single_entry(&vertex, ShaderStage::Vertex, &mut problems);
    let fragment_entry = single_entry(&fragment, ShaderStage::Fragment, &mut problems);

    if let (Some(vs), Some(fs)) = (vertex_entry, fragment_entry) {
        let vs_fn = &vertex.entry_points[vs].function;
        let fs_fn = &fragment.entry_points[fs].function;

        let mut vertex_inputs = BTreeSet::new();
        for arg in &vs_fn.arguments {
            collect_locations(&vertex, arg.ty, arg.binding.as_ref(), &mut vertex_inputs);
        }
        for loc in &vertex_inputs {
            if !desc.layout.locations().contains(loc) {
                problems.push(format!(
                    "vertex input @location({loc}) is not provided by {:?} vertices",
                    desc.layout
                ));
            }
        }

        let mut varyings = BTreeSet::new();
        if let Some(result) = &vs_fn.result {
            collect_locations(&vertex, result.ty, result.binding.as_ref(), &mut varyings);
        }
        let mut fragment_inputs = BTreeSet::new();
        for arg in &fs_fn.arguments {
            collect_locations(&fragment, arg.ty, arg.binding.as_ref(), &mut fragment_inputs);
        }
        for loc in fragment_inputs.difference(&varyings) {
            problems.push(format!(
                "fragment input @location({loc}) is not written by the vertex stage"
            ));
        }
    }

    let block = UniformBlock::new(desc.uniforms);
    let mut used = BTreeSet::new();
    check_uniforms(&vertex, ShaderStage::Vertex, &block, &mut used, &mut problems);
    check_uniforms(&fragment, ShaderStage::Fragment, &block, &mut used, &mut problems);
    for slot in block.slots() {
        if !used.contains(slot.name) {
            problems.push(format!("uniform `{}` is not declared by either stage", slot.name));
        }
    }

    match (vertex_entry, fragment_entry) {
        (Some(vs), Some(fs)) if problems.is_empty() => Ok(LinkedProgram {
            vertex_entry: vertex.entry_points[vs].name.clone(),
            fragment_entry: fragment.entry_points[fs].name.clone(),
        }),
        _ => Err(ShaderError::Link {
            program: desc.label.to_string(),
            log: problems.join("\n"),
        }),
    }
}

fn compile_stage(program: &str, stage: ShaderStage, source: &str) -> Result<Module, ShaderError> {
    let compile_error = |log: String| ShaderError::Compile {
        program: program.to_string(),
        stage,
        log,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(error_chain(e.as_inner())))?;

    Ok(module)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut log = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        log.push_str("\n  caused by: ");
        log.push_str(&cause.to_string());
        source = cause.source();
    }
    log
}

fn single_entry(module: &Module, stage: ShaderStage, problems: &mut Vec<String>) -> Option<usize> {
    let found: Vec<usize> = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| ep.stage == stage.naga())
        .map(|(i, _)| i)
        .collect();

    match found.as_slice() {
        [one] => Some(*one),
        [] => {
            problems.push(format!("{stage} source has no {stage} entry point"));
            None
        }
        many => {
            problems.push(format!(
                "{stage} source has {} {stage} entry points, expected one",
                many.len()
            ));
            None
        }
    }
}

/// Collects `@location` bindings of a value, looking through one struct level.
fn collect_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(Binding::Location { location, .. }) = &m.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    match *inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => Some(UniformKind::Float),
        TypeInner::Scalar(s) if s == Scalar::I32 => Some(UniformKind::Int),
        TypeInner::Vector { size: VectorSize::Quad, scalar } if scalar == Scalar::F32 => {
            Some(UniformKind::Vec4)
        }
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar,
        } if scalar == Scalar::F32 => Some(UniformKind::Mat4),
        _ => None,
    }
}

fn check_uniforms(
    module: &Module,
    stage: ShaderStage,
    block: &UniformBlock,
    used: &mut BTreeSet<&'static str>,
    problems: &mut Vec<String>,
) {
    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }

        match &var.binding {
            Some(rb) if rb.group == 0 && rb.binding == 0 => {}
            _ => {
                problems.push(format!(
                    "{stage} uniform block must be bound at @group(0) @binding(0)"
                ));
                continue;
            }
        }

        let TypeInner::Struct { members, span } = &module.types[var.ty].inner else {
            problems.push(format!("{stage} uniform block is not a struct"));
            continue;
        };

        if u64::from(*span) > block.size() {
            problems.push(format!(
                "{stage} uniform block spans {span} bytes, declared uniforms cover {}",
                block.size()
            ));
        }

        for m in members {
            let name = m.name.as_deref().unwrap_or("<unnamed>");
            let Some(slot) = block.slot(name) else {
                problems.push(format!("{stage} uniform `{name}` is not declared by the program"));
                continue;
            };
            used.insert(slot.name);

            match uniform_kind(&module.types[m.ty].inner) {
                Some(kind) if kind == slot.kind => {}
                _ => problems.push(format!(
                    "{stage} uniform `{name}` does not have type {:?}",
                    slot.kind
                )),
            }
            if u64::from(m.offset) != slot.offset {
                problems.push(format!(
                    "{stage} uniform `{name}` sits at offset {}, program layout expects {}",
                    m.offset, slot.offset
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{UniformDecl, VertexLayout};

    const UNIFORMS: &[UniformDecl] = &[
        UniformDecl::new("model", UniformKind::Mat4),
        UniformDecl::new("time", UniformKind::Float),
    ];

    const VS: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    time: f32,
}
@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = u.model * vec4<f32>(pos, 1.0);
    out.color = color * (0.5 + 0.5 * sin(u.time));
    return out;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;

    fn desc<'a>(vs: &'a str, fs: &'a str, uniforms: &'a [UniformDecl]) -> ProgramDesc<'a> {
        ProgramDesc {
            label: "test",
            vertex_source: vs,
            fragment_source: fs,
            layout: VertexLayout::PositionColor,
            uniforms,
        }
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn matching_stages_link() {
        let linked = link_program(&desc(VS, FS, UNIFORMS)).unwrap();
        assert_eq!(linked.vertex_entry, "vs_main");
        assert_eq!(linked.fragment_entry, "fs_main");
    }

    // ── compile failures ──────────────────────────────────────────────────

    #[test]
    fn syntax_error_is_a_compile_error_with_log() {
        let err = link_program(&desc(VS, "@fragment fn fs_main( -> {", UNIFORMS)).unwrap_err();
        match err {
            ShaderError::Compile { stage, ref log, .. } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let bad = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = vec2<f32>(1.0, 2.0);
    return vec4<f32>(x);
}
"#;
        let err = link_program(&desc(VS, bad, UNIFORMS)).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    // ── link failures ─────────────────────────────────────────────────────

    #[test]
    fn unwritten_varying_fails_to_link() {
        let fs = r#"
@fragment
fn fs_main(@location(3) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;
        let err = link_program(&desc(VS, fs, UNIFORMS)).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.log().contains("@location(3)"));
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let err = link_program(&desc(VS, VS, UNIFORMS)).unwrap_err();
        assert!(err.log().contains("no fragment entry point"));
    }

    #[test]
    fn undeclared_uniform_fails_to_link() {
        let only_model = [UniformDecl::new("model", UniformKind::Mat4)];
        let err = link_program(&desc(VS, FS, &only_model)).unwrap_err();
        assert!(err.log().contains("`time`"));
    }

    #[test]
    fn unused_declared_uniform_fails_to_link() {
        let extra = [
            UniformDecl::new("model", UniformKind::Mat4),
            UniformDecl::new("time", UniformKind::Float),
            UniformDecl::new("strength", UniformKind::Float),
        ];
        let err = link_program(&desc(VS, FS, &extra)).unwrap_err();
        assert!(err.log().contains("`strength` is not declared by either stage"));
    }

    #[test]
    fn reordered_uniform_fails_to_link() {
        let swapped = [
            UniformDecl::new("time", UniformKind::Float),
            UniformDecl::new("model", UniformKind::Mat4),
        ];
        let err = link_program(&desc(VS, FS, &swapped)).unwrap_err();
        assert!(err.log().contains("offset"));
    }

    #[test]
    fn vertex_input_outside_layout_fails_to_link() {
        let vs = r#"
@vertex
fn vs_main(@location(0) pos: vec3<f32>, @location(4) extra: f32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos * extra, 1.0);
}
"#;
        let fs = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = link_program(&desc(vs, fs, &[])).unwrap_err();
        assert!(err.log().contains("@location(4)"));
    }
}
