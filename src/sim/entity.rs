//! Simulated actors
//!
//! One `Entity` struct covers the player, enemies, bullets, barriers and
//! decorations. `EntityKind` picks the update policy.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::animation::{Animation, Sprite};
use crate::consts::{BARRIER_LAST_FRAME, BULLET_SIZE, BULLET_SPEED};

/// Name of the animation every entity starts on
pub const IDLE: &str = "idle";

/// Which update policy applies to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
    /// Static; only changes through `advance_active_animation`
    Barrier,
    Decoration,
}

/// Side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// How the renderer should draw an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    Textured,
    /// Flat colored quad
    Shape,
}

/// Axis-aligned bounding box (bottom-left corner plus extent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A positioned, sized, animatable actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Position captured at spawn; the formation descends relative to it
    pub start_pos: Vec3,
    pub size: Vec2,
    pub velocity: Vec2,
    pub direction: Vec2,
    /// Integrate `direction * velocity` every update
    pub apply_velocity: bool,
    /// Simulation time at spawn
    pub created_at: f32,
    pub destroyed: bool,
    /// Player hits remaining; the game ends when this drops below zero
    pub lives: i32,
    /// Enemy hit points
    pub life: u32,
    /// Who fired this (bullets only)
    pub owner: Option<Faction>,
    pub color: [f32; 4],
    pub draw_mode: DrawMode,
    animations: HashMap<String, Animation>,
    current_animation: String,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>, now: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            pos: Vec3::ZERO,
            start_pos: Vec3::ZERO,
            size: Vec2::ZERO,
            velocity: Vec2::ZERO,
            direction: Vec2::ZERO,
            apply_velocity: true,
            created_at: now,
            destroyed: false,
            lives: 2,
            life: 1,
            owner: None,
            color: [1.0; 4],
            draw_mode: DrawMode::Textured,
            animations: HashMap::new(),
            current_animation: IDLE.to_string(),
        }
    }

    /// Faction this entity fires for, if it can fire at all
    pub fn faction(&self) -> Option<Faction> {
        match self.kind {
            EntityKind::Player => Some(Faction::Player),
            EntityKind::Enemy => Some(Faction::Enemy),
            EntityKind::Bullet => self.owner,
            EntityKind::Barrier | EntityKind::Decoration => None,
        }
    }

    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.pos.x = x;
        self.pos.y = y;
    }

    /// Set position; `initial` also records it as the start position
    pub fn set_pos_z(&mut self, x: f32, y: f32, z: f32, initial: bool) {
        self.pos = Vec3::new(x, y, z);
        if initial {
            self.start_pos = self.pos;
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    pub fn set_direction(&mut self, dx: f32, dy: f32) {
        self.direction = Vec2::new(dx, dy);
    }

    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
    }

    pub fn move_x(&mut self, dx: f32) {
        self.pos.x += dx;
    }

    pub fn move_y(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    pub fn add_animation(&mut self, name: impl Into<String>, animation: Animation) {
        self.animations.insert(name.into(), animation);
    }

    /// Select the active animation. Unknown names are accepted; such an
    /// entity simply has nothing to animate or draw.
    pub fn set_animation(&mut self, name: impl Into<String>) {
        self.current_animation = name.into();
    }

    pub fn current_animation_name(&self) -> &str {
        &self.current_animation
    }

    pub fn active_animation(&self) -> Option<&Animation> {
        self.animations.get(&self.current_animation)
    }

    fn active_animation_mut(&mut self) -> Option<&mut Animation> {
        self.animations.get_mut(&self.current_animation)
    }

    /// Sprite to draw this frame
    pub fn current_sprite(&self) -> Option<&Sprite> {
        self.active_animation().and_then(Animation::current_sprite)
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn time_alive(&self, now: f32) -> f32 {
        now - self.created_at
    }

    /// Per-frame integration and animation
    pub fn update(&mut self, now: f32, dt: f32) {
        if self.kind == EntityKind::Barrier {
            return;
        }

        if self.apply_velocity {
            self.pos.x += self.direction.x * dt * self.velocity.x;
            self.pos.y += self.direction.y * dt * self.velocity.y;
        }

        if let Some(animation) = self.active_animation_mut() {
            animation.update(now);
        }
    }

    /// Step a barrier's damage animation; hitting it on the last damage
    /// frame destroys it instead of wrapping. Returns the frame index after
    /// the hit, or `None` if the barrier was destroyed.
    pub fn advance_active_animation(&mut self) -> Option<usize> {
        let index = self.active_animation().map(Animation::current_index)?;
        if index >= BARRIER_LAST_FRAME {
            self.destroyed = true;
            return None;
        }
        let animation = self.active_animation_mut()?;
        animation.advance();
        Some(animation.current_index())
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn top_left_x(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn top_left_y(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.top_left_x(),
            y: self.top_left_y(),
            width: self.width(),
            height: self.height(),
        }
    }

    /// Spawn a bullet at this entity's position travelling along its
    /// facing direction
    pub fn shoot(&self, animation: Animation, now: f32) -> Entity {
        let mut bullet = Entity::new(EntityKind::Bullet, format!("{}_bullet", self.name), now);
        bullet.set_pos(self.x(), self.y());
        bullet.set_velocity(0.0, BULLET_SPEED);
        bullet.direction = self.direction;
        bullet.set_size(BULLET_SIZE, BULLET_SIZE);
        bullet.owner = self.faction();
        bullet.add_animation(IDLE, animation);
        bullet.set_animation(IDLE);
        bullet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::TextureId;

    fn sprite() -> Sprite {
        Sprite::standalone(TextureId(1), Vec2::splat(0.1))
    }

    fn barrier() -> Entity {
        let mut barrier = Entity::new(EntityKind::Barrier, "barrier", 0.0);
        let frames = (0..5).map(|_| sprite()).collect();
        barrier.add_animation(IDLE, Animation::from_frames(frames, 0.1));
        barrier
    }

    #[test]
    fn test_update_integrates_velocity() {
        let mut e = Entity::new(EntityKind::Bullet, "b", 0.0);
        e.set_velocity(0.0, 3.0);
        e.set_direction(0.0, -1.0);
        e.update(0.5, 0.5);
        assert!((e.y() + 1.5).abs() < 1e-6);
        assert_eq!(e.x(), 0.0);
    }

    #[test]
    fn test_update_without_apply_velocity_stays_put() {
        let mut e = Entity::new(EntityKind::Player, "hero", 0.0);
        e.apply_velocity = false;
        e.set_velocity(3.0, 3.0);
        e.set_direction(0.0, 1.0);
        e.update(1.0, 1.0);
        assert_eq!(e.pos, Vec3::ZERO);
    }

    #[test]
    fn test_barrier_update_is_noop() {
        let mut b = barrier();
        b.set_velocity(1.0, 1.0);
        b.set_direction(1.0, 1.0);
        b.update(5.0, 1.0);
        assert_eq!(b.pos, Vec3::ZERO);
        assert_eq!(b.active_animation().unwrap().current_index(), 0);
    }

    #[test]
    fn test_barrier_destroyed_after_last_frame() {
        let mut b = barrier();
        for expected in 1..=4 {
            assert_eq!(b.advance_active_animation(), Some(expected));
            assert!(!b.destroyed);
        }
        assert_eq!(b.advance_active_animation(), None);
        assert!(b.destroyed);
    }

    #[test]
    fn test_unknown_animation_is_silent() {
        let mut e = Entity::new(EntityKind::Enemy, "e", 0.0);
        e.set_animation("missing");
        e.update(1.0, 0.1);
        assert!(e.current_sprite().is_none());
        assert_eq!(e.advance_active_animation(), None);
        assert!(!e.destroyed);
    }

    #[test]
    fn test_shoot_inherits_position_direction_and_faction() {
        let mut enemy = Entity::new(EntityKind::Enemy, "enemy", 0.0);
        enemy.set_pos(1.0, 1.5);
        enemy.set_direction(0.0, -1.0);

        let bullet = enemy.shoot(Animation::single(sprite()), 4.0);
        assert_eq!(bullet.kind, EntityKind::Bullet);
        assert_eq!(bullet.owner, Some(Faction::Enemy));
        assert_eq!(bullet.pos.truncate(), Vec2::new(1.0, 1.5));
        assert_eq!(bullet.velocity, Vec2::new(0.0, BULLET_SPEED));
        assert_eq!(bullet.direction, Vec2::new(0.0, -1.0));
        assert_eq!(bullet.size, Vec2::splat(BULLET_SIZE));
        assert_eq!(bullet.created_at, 4.0);
        assert!(bullet.current_sprite().is_some());
    }

    #[test]
    fn test_aabb_is_centered() {
        let mut e = Entity::new(EntityKind::Enemy, "e", 0.0);
        e.set_pos(1.0, 2.0);
        e.set_size(0.5, 0.25);
        let b = e.aabb();
        assert!((b.x - 0.75).abs() < 1e-6);
        assert!((b.y - 1.875).abs() < 1e-6);
        assert_eq!(b.width, 0.5);
        assert_eq!(b.height, 0.25);
    }
}
