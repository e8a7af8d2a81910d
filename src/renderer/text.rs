//! Bitmap font layout
//!
//! The font texture is a 16x16 grid of glyphs; a character's glyph index is
//! its ordinal value.

use super::vertex::TexturedVertex;

const GRID: u32 = 16;
const CELL: f32 = 1.0 / GRID as f32;
/// Drawn in place of characters outside the grid
const FALLBACK: u32 = b'?' as u32;

/// Glyph index of a character in the 16x16 grid
pub fn glyph_index(c: char) -> u32 {
    let ordinal = c as u32;
    if ordinal < GRID * GRID { ordinal } else { FALLBACK }
}

/// Top-left UV of a glyph cell
pub fn glyph_uv(index: u32) -> (f32, f32) {
    ((index % GRID) as f32 * CELL, (index / GRID) as f32 * CELL)
}

/// Six vertices per character, glyph `i` centered at `x = spacing * i`,
/// relative to the text origin
pub fn glyph_vertices(text: &str, size: f32, spacing: f32) -> Vec<TexturedVertex> {
    let half = 0.5 * size;
    let mut vertices = Vec::with_capacity(text.chars().count() * 6);

    for (i, c) in text.chars().enumerate() {
        let (u, v) = glyph_uv(glyph_index(c));
        let x = spacing * i as f32;
        vertices.extend_from_slice(&[
            TexturedVertex::new(x - half, half, u, v),
            TexturedVertex::new(x - half, -half, u, v + CELL),
            TexturedVertex::new(x + half, half, u + CELL, v),
            TexturedVertex::new(x + half, -half, u + CELL, v + CELL),
            TexturedVertex::new(x + half, half, u + CELL, v),
            TexturedVertex::new(x - half, -half, u, v + CELL),
        ]);
    }

    vertices
}
