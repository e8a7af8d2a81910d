//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::UvRect;

/// 2D vertex with position and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two triangles covering a `size` rectangle centered on the origin.
/// Texture v grows downward, so the top edge samples `uv.v`.
pub fn quad_vertices(size: Vec2, uv: UvRect) -> [TexturedVertex; 6] {
    let (hw, hh) = (size.x / 2.0, size.y / 2.0);
    let (u0, v0) = (uv.u, uv.v);
    let (u1, v1) = (uv.u + uv.width, uv.v + uv.height);
    [
        TexturedVertex::new(-hw, -hh, u0, v1),
        TexturedVertex::new(hw, -hh, u1, v1),
        TexturedVertex::new(hw, hh, u1, v0),
        TexturedVertex::new(-hw, -hh, u0, v1),
        TexturedVertex::new(hw, hh, u1, v0),
        TexturedVertex::new(-hw, hh, u0, v0),
    ]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = TexturedVertex::desc();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes.len(), 2);
        let vertex = [TexturedVertex::new(0.0, 0.0, 0.0, 0.0)];
        assert_eq!(bytemuck::cast_slice::<TexturedVertex, u8>(&vertex).len(), 16);
    }

    #[test]
    fn test_quad_covers_uv_rect() {
        let uv = UvRect {
            u: 0.25,
            v: 0.5,
            width: 0.25,
            height: 0.25,
        };
        let verts = quad_vertices(Vec2::new(2.0, 1.0), uv);
        let top_left = verts[5];
        assert_eq!(top_left.position, [-1.0, 0.5]);
        assert_eq!(top_left.uv, [0.25, 0.5]);
        let bottom_right = verts[1];
        assert_eq!(bottom_right.position, [1.0, -0.5]);
        assert_eq!(bottom_right.uv, [0.5, 0.75]);
    }
}
