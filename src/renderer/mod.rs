//! Rendering boundary
//!
//! The simulation never draws. `build_frame` captures a `FrameSnapshot`,
//! `render_frame` replays it against any `Renderer` implementation.

pub mod frame;
pub mod headless;
pub mod text;
pub mod vertex;

pub use frame::{EntitySnapshot, FrameSnapshot, TextItem, build_frame};
pub use headless::RecordingRenderer;
pub use text::glyph_vertices;
pub use vertex::{TexturedVertex, quad_vertices};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::consts::{PLAYFIELD_HALF_HEIGHT, PLAYFIELD_HALF_WIDTH};
use crate::sim::{DrawMode, TextureId, UvRect};

/// Per-draw shader data (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadUniforms {
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Orthographic projection covering the playfield
pub fn projection() -> Mat4 {
    Mat4::orthographic_rh(
        -PLAYFIELD_HALF_WIDTH,
        PLAYFIELD_HALF_WIDTH,
        -PLAYFIELD_HALF_HEIGHT,
        PLAYFIELD_HALF_HEIGHT,
        -1.0,
        1.0,
    )
}

/// One textured or flat-colored rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub vertices: [TexturedVertex; 6],
    /// `None` draws a flat `color` quad
    pub texture: Option<TextureId>,
    pub color: [f32; 4],
    pub transform: Mat4,
}

impl Quad {
    pub fn for_entity(entity: &EntitySnapshot) -> Self {
        let transform = Mat4::from_translation(entity.position);
        match (&entity.sprite, entity.draw_mode) {
            (Some(sprite), DrawMode::Textured) => Self {
                vertices: quad_vertices(sprite.size, sprite.uv_rect()),
                texture: Some(sprite.texture),
                color: entity.color,
                transform,
            },
            _ => Self {
                vertices: quad_vertices(entity.size, UvRect::FULL),
                texture: None,
                color: entity.color,
                transform,
            },
        }
    }

    pub fn uniforms(&self) -> QuadUniforms {
        QuadUniforms {
            projection: projection().to_cols_array_2d(),
            model: self.transform.to_cols_array_2d(),
            color: self.color,
        }
    }
}

/// Backend that puts pixels on screen
pub trait Renderer {
    fn clear(&mut self, color: [f32; 4]);
    fn draw_quad(&mut self, quad: &Quad);
    /// Glyph geometry comes from `glyph_vertices`
    fn draw_text(&mut self, text: &TextItem);
}

/// Replay a snapshot in draw order
pub fn render_frame<R: Renderer + ?Sized>(renderer: &mut R, frame: &FrameSnapshot) {
    renderer.clear(frame.clear);
    for entity in &frame.entities {
        renderer.draw_quad(&Quad::for_entity(entity));
    }
    for text in &frame.texts {
        renderer.draw_text(text);
    }
}
