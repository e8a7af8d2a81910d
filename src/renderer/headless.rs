//! Renderer that records draw calls instead of drawing

use super::text::glyph_vertices;
use super::{Quad, Renderer, TextItem};

/// Counts what a frame would have drawn; used by the headless runner and tests
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: u64,
    pub quads: usize,
    pub textured_quads: usize,
    pub glyph_vertices: usize,
    /// Text drawn during the last frame
    pub texts: Vec<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, _color: [f32; 4]) {
        self.frames += 1;
        self.quads = 0;
        self.textured_quads = 0;
        self.glyph_vertices = 0;
        self.texts.clear();
    }

    fn draw_quad(&mut self, quad: &Quad) {
        self.quads += 1;
        if quad.texture.is_some() {
            self.textured_quads += 1;
        }
    }

    fn draw_text(&mut self, text: &TextItem) {
        self.glyph_vertices += glyph_vertices(&text.text, text.size, text.spacing).len();
        self.texts.push(text.text.clone());
    }
}
