//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, seeded once per game
//! - Stable iteration order (the enemy grid is never reordered)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod entity;
pub mod formation;
pub mod state;
pub mod tick;

pub use animation::{Animation, Sprite, SpriteSheet, TextureId, UvRect};
pub use collision::{boxes_overlap, check_box_collision, entities_collide};
pub use entity::{Aabb, DrawMode, Entity, EntityKind, Faction};
pub use formation::{Cadence, Formation, attack_eligible, choose_attacker};
pub use state::{GameEvent, GameLevel, GameMode, GameState, LevelAssets};
pub use tick::{TickInput, autopilot, tick};
