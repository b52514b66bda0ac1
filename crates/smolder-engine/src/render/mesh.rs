//! Vertex formats and fixed GPU state shared by every program.

use bytemuck::{Pod, Zeroable};

use super::backend::VertexLayout;

// ── blend ─────────────────────────────────────────────────────────────────

/// Source-over for premultiplied color.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── vertices ──────────────────────────────────────────────────────────────

/// Position + per-vertex color, for [`VertexLayout::PositionColor`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

/// Position + texture coordinate, for [`VertexLayout::PositionUv`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct UvVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

const COLOR_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // pos
    1 => Float32x3  // color
];

const UV_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // pos
    1 => Float32x2  // uv
];

pub(super) fn buffer_layout(layout: VertexLayout) -> wgpu::VertexBufferLayout<'static> {
    let attributes: &'static [wgpu::VertexAttribute] = match layout {
        VertexLayout::PositionColor => &COLOR_ATTRS,
        VertexLayout::PositionUv => &UV_ATTRS,
    };
    wgpu::VertexBufferLayout {
        array_stride: layout.stride(),
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Unit quad over `[0, 1]²` with matching texture coordinates.
pub const UNIT_QUAD_VERTICES: [UvVertex; 4] = [
    UvVertex { pos: [0.0, 0.0], uv: [0.0, 0.0] },
    UvVertex { pos: [1.0, 0.0], uv: [1.0, 0.0] },
    UvVertex { pos: [1.0, 1.0], uv: [1.0, 1.0] },
    UvVertex { pos: [0.0, 1.0], uv: [0.0, 1.0] },
];

pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_vertex_structs() {
        assert_eq!(
            std::mem::size_of::<ColorVertex>() as u64,
            VertexLayout::PositionColor.stride()
        );
        assert_eq!(std::mem::size_of::<UvVertex>() as u64, VertexLayout::PositionUv.stride());
    }

    #[test]
    fn attribute_locations_match_layout() {
        for layout in [VertexLayout::PositionColor, VertexLayout::PositionUv] {
            let locs: Vec<u32> = buffer_layout(layout)
                .attributes
                .iter()
                .map(|a| a.shader_location)
                .collect();
            assert_eq!(locs, layout.locations());
        }
    }

    #[test]
    fn quad_indices_cover_two_triangles() {
        assert!(UNIT_QUAD_INDICES.iter().all(|&i| (i as usize) < UNIT_QUAD_VERTICES.len()));
    }
}
