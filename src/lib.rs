//! Invaders - a Space Invaders simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, collisions, game modes)
//! - `renderer`: Draw-list construction and the renderer boundary
//! - `platform`: Input and asset-loading boundary
//! - `settings`: Data-driven game tuning

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Orthographic playfield extents
    pub const PLAYFIELD_HALF_WIDTH: f32 = 3.55;
    pub const PLAYFIELD_HALF_HEIGHT: f32 = 2.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 0.0;
    pub const PLAYER_START_Y: f32 = -1.68;
    pub const PLAYER_SIZE: f32 = 0.35;
    pub const PLAYER_NAME: &str = "hero";

    /// Enemy grid layout
    pub const ENEMY_SPAWN_X: f32 = -2.44;
    pub const ENEMY_SPAWN_Y: f32 = 1.5;
    pub const ENEMY_SPACING_X: f32 = (3.5 * 2.0) / 13.0;
    pub const ENEMY_SPACING_Y: f32 = 0.46;
    pub const ENEMY_SIZE: f32 = 0.44;

    /// Barrier layout
    pub const BARRIER_COUNT: usize = 3;
    pub const BARRIER_START_X: f32 = -2.3;
    pub const BARRIER_SPACING_X: f32 = 2.23;
    pub const BARRIER_Y: f32 = -1.3;
    pub const BARRIER_WIDTH: f32 = 1.0;
    pub const BARRIER_HEIGHT: f32 = 0.5;
    /// Damage frame at which the next hit destroys the barrier
    pub const BARRIER_LAST_FRAME: usize = 4;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 0.1;
    pub const BULLET_SPEED: f32 = 3.0;

    /// Default animation frame interval (seconds)
    pub const ANIMATION_INTERVAL: f32 = 0.085;
}

/// Player spawn point
#[inline]
pub fn player_start() -> Vec2 {
    Vec2::new(consts::PLAYER_START_X, consts::PLAYER_START_Y)
}

/// Clamp an x coordinate so a body of `width` stays inside the playfield
#[inline]
pub fn clamp_to_playfield(x: f32, width: f32) -> f32 {
    let limit = (consts::PLAYFIELD_HALF_WIDTH - width / 2.0).max(0.0);
    x.clamp(-limit, limit)
}
