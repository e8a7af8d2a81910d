//! Draw-list construction
//!
//! `build_frame` turns a `GameState` into a `FrameSnapshot` the renderer
//! consumes. Nothing here touches the GPU.

use glam::{Vec2, Vec3};

use super::vertex::colors;
use crate::sim::{DrawMode, Entity, GameMode, GameState, Sprite, TextureId};

const HUD_SIZE: f32 = 0.4;
const HUD_SPACING: f32 = 0.165;
const BANNER_SIZE: f32 = 0.5;
const BANNER_SPACING: f32 = 0.3;

/// What the renderer needs to draw one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub position: Vec3,
    pub size: Vec2,
    pub sprite: Option<Sprite>,
    pub color: [f32; 4],
    pub draw_mode: DrawMode,
}

impl EntitySnapshot {
    /// None for entities that should not be drawn
    pub fn capture(entity: &Entity) -> Option<Self> {
        if entity.destroyed {
            return None;
        }
        let sprite = entity.current_sprite().cloned();
        if entity.draw_mode == DrawMode::Textured && sprite.is_none() {
            return None;
        }
        Some(Self {
            position: entity.pos,
            size: entity.size,
            sprite,
            color: entity.color,
            draw_mode: entity.draw_mode,
        })
    }
}

/// A line of bitmap-font text
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub spacing: f32,
    pub font: TextureId,
    pub color: [f32; 4],
}

impl TextItem {
    fn hud(text: impl Into<String>, x: f32, y: f32, font: TextureId) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size: HUD_SIZE,
            spacing: HUD_SPACING,
            font,
            color: colors::TEXT,
        }
    }

    fn banner(text: impl Into<String>, font: TextureId) -> Self {
        Self {
            size: BANNER_SIZE,
            spacing: BANNER_SPACING,
            ..Self::hud(text, -1.0, 0.0, font)
        }
    }
}

/// Everything drawn in one frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub clear: [f32; 4],
    pub entities: Vec<EntitySnapshot>,
    pub texts: Vec<TextItem>,
}

/// Build the draw list for the current mode
pub fn build_frame(state: &GameState, font: TextureId) -> FrameSnapshot {
    let mut frame = FrameSnapshot {
        clear: colors::BACKGROUND,
        entities: Vec::new(),
        texts: Vec::new(),
    };

    match state.mode {
        GameMode::MainMenu => {
            frame.texts.push(TextItem::hud("Space Invaders", -1.5, 1.0, font));
            frame.texts.push(TextItem::hud("Press Spacebar to play", -1.5, 0.0, font));
        }
        GameMode::Level => {
            let level = &state.level;
            frame.entities = level
                .objects
                .iter()
                .chain(&level.enemies)
                .chain(&level.bullets)
                .chain(&level.barriers)
                .chain(std::iter::once(&level.player))
                .filter_map(EntitySnapshot::capture)
                .collect();

            frame.texts.push(TextItem::hud(format!("points: {}", level.score), -3.4, 1.859, font));
            frame.texts.push(TextItem::hud(
                format!("lives: {}", level.player.lives),
                -3.45,
                -1.849,
                font,
            ));
        }
        GameMode::GameOver => frame.texts.push(TextItem::banner("GAME OVER", font)),
        GameMode::GameWon => frame.texts.push(TextItem::banner("YOU WON", font)),
    }

    frame
}
