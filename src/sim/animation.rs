//! Sprites and frame animations
//!
//! Sprites are plain data: a texture handle plus an optional sheet
//! sub-rectangle. Textures themselves live with the renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ANIMATION_INTERVAL;

/// Opaque texture handle handed out by the platform's texture loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Sub-rectangle of a texture in normalized (0..1) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    /// The whole texture
    pub const FULL: UvRect = UvRect {
        u: 0.0,
        v: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

/// A single visual frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: TextureId,
    /// Sheet region, `None` for a standalone image
    pub uv: Option<UvRect>,
    /// Display size in playfield units
    pub size: Vec2,
}

impl Sprite {
    /// A standalone image stretched to `size`
    pub fn standalone(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            uv: None,
            size,
        }
    }

    /// UV rectangle to sample (full texture for standalone images)
    pub fn uv_rect(&self) -> UvRect {
        self.uv.unwrap_or(UvRect::FULL)
    }
}

/// A sprite sheet texture with known pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub texture: TextureId,
    pub width: f32,
    pub height: f32,
}

impl SpriteSheet {
    pub fn new(texture: TextureId, width: f32, height: f32) -> Self {
        Self {
            texture,
            width,
            height,
        }
    }

    /// Cut a sprite from a pixel rectangle, displayed `display_height` tall
    /// with the rectangle's aspect ratio
    pub fn sprite(&self, x: f32, y: f32, w: f32, h: f32, display_height: f32) -> Sprite {
        let uv = UvRect {
            u: x / self.width,
            v: y / self.height,
            width: w / self.width,
            height: h / self.height,
        };
        let aspect = if h > 0.0 { w / h } else { 1.0 };
        Sprite {
            texture: self.texture,
            uv: Some(uv),
            size: Vec2::new(display_height * aspect, display_height),
        }
    }
}

/// A cyclic sequence of frames advanced on a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<Sprite>,
    current_index: usize,
    /// Simulation time of the last frame change
    last_change: f32,
    /// Seconds between frame changes
    interval: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(ANIMATION_INTERVAL)
    }
}

impl Animation {
    pub fn new(interval: f32) -> Self {
        Self {
            frames: Vec::new(),
            current_index: 0,
            last_change: 0.0,
            interval,
        }
    }

    /// A one-frame animation
    pub fn single(sprite: Sprite) -> Self {
        Self::from_frames(vec![sprite], ANIMATION_INTERVAL)
    }

    pub fn from_frames(frames: Vec<Sprite>, interval: f32) -> Self {
        Self {
            frames,
            ..Self::new(interval)
        }
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.frames.push(sprite);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn current_sprite(&self) -> Option<&Sprite> {
        self.frames.get(self.current_index)
    }

    /// Step to the next frame, wrapping to the first
    pub fn advance(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.current_index += 1;
        if self.current_index >= self.frames.len() {
            self.current_index = 0;
        }
    }

    /// Advance if more than `interval` has passed since the last change.
    /// Returns true when the frame changed.
    pub fn update(&mut self, now: f32) -> bool {
        if now - self.last_change > self.interval {
            self.advance();
            self.last_change = now;
            return true;
        }
        false
    }
}
