//! Game state and level construction
//!
//! `GameState` is the single owner of everything the simulation mutates:
//! the current mode, the level, the seeded RNG and the simulation clock.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{Animation, Sprite, SpriteSheet, TextureId};
use super::collision::entities_collide;
use super::entity::{DrawMode, Entity, EntityKind, Faction, IDLE};
use super::formation::Formation;
use crate::consts::*;
use crate::settings::Settings;
use crate::{clamp_to_playfield, player_start};

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, waiting for the fire key
    MainMenu,
    /// Active gameplay
    Level,
    /// Player ran out of lives
    GameOver,
    /// No enemy left to attack
    GameWon,
}

impl GameMode {
    /// Terminal modes only render
    pub fn is_terminal(self) -> bool {
        matches!(self, GameMode::GameOver | GameMode::GameWon)
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted,
    PlayerFired,
    EnemyFired { index: usize },
    EnemyDestroyed { index: usize, score: u64 },
    PlayerHit { lives: i32 },
    BarrierDamaged { frame: usize },
    BarrierDestroyed,
    GameOver { score: u64 },
    GameWon { score: u64 },
}

/// Textures a level is built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelAssets {
    pub sheet: SpriteSheet,
    /// Standalone background image; drawn as a flat quad when absent
    pub background: Option<TextureId>,
}

/// Sheet x offset (pixels) of the enemy sprite for each row, top first
const ENEMY_SHEET_X: [f32; 5] = [16.0, 32.0, 32.0, 48.0, 48.0];
const SHEET_CELL: f32 = 16.0;
const HERO_BULLET_SHEET_X: f32 = 112.0;
const ENEMY_BULLET_SHEET_X: f32 = 128.0;
const BARRIER_SHEET_Y: f32 = 48.0;
const BARRIER_FRAMES: usize = 5;

/// One level: the player, the enemy grid, bullets, barriers and decorations
#[derive(Debug, Clone)]
pub struct GameLevel {
    pub player: Entity,
    /// Fixed grid, row-major from the top; never compacted
    pub enemies: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub barriers: Vec<Entity>,
    /// Background and other non-interactive objects
    pub objects: Vec<Entity>,
    pub score: u64,
    pub formation: Formation,
    sheet: SpriteSheet,
    settings: Settings,
}

impl GameLevel {
    pub fn new(settings: &Settings, assets: &LevelAssets, now: f32) -> Self {
        let sheet = assets.sheet;
        let tuning = &settings.formation;

        let mut player = Entity::new(EntityKind::Player, PLAYER_NAME, now);
        let start = player_start();
        player.set_pos(start.x, start.y);
        player.set_velocity(settings.player_speed, settings.player_speed);
        player.apply_velocity = false;
        player.set_size(PLAYER_SIZE, PLAYER_SIZE);
        player.set_direction(0.0, 1.0);
        player.lives = settings.player_lives;
        player.add_animation(
            IDLE,
            Animation::single(sheet.sprite(0.0, 0.0, SHEET_CELL, SHEET_CELL, PLAYER_SIZE)),
        );

        let mut enemies = Vec::with_capacity(settings.enemy_count());
        for i in 0..settings.enemy_count() {
            let row = i / tuning.enemies_per_row;
            let col = i % tuning.enemies_per_row;
            let x = ENEMY_SPAWN_X + col as f32 * ENEMY_SPACING_X;
            let y = ENEMY_SPAWN_Y - row as f32 * ENEMY_SPACING_Y;

            let mut enemy = Entity::new(EntityKind::Enemy, format!("enemy_{i}"), now);
            enemy.set_pos_z(x, y, 0.0, true);
            enemy.set_velocity(0.0, 0.0);
            enemy.apply_velocity = false;
            enemy.set_size(ENEMY_SIZE, ENEMY_SIZE);
            enemy.set_direction(0.0, -1.0);
            enemy.life = tuning.enemy_life;

            let sheet_x = ENEMY_SHEET_X[row.min(ENEMY_SHEET_X.len() - 1)];
            enemy.add_animation(
                IDLE,
                Animation::single(sheet.sprite(sheet_x, 0.0, SHEET_CELL, SHEET_CELL, ENEMY_SIZE)),
            );
            enemies.push(enemy);
        }

        let mut background = Entity::new(EntityKind::Decoration, "background", now);
        background.set_color(0.5, 0.3, 0.0, 1.0);
        background.set_size(PLAYFIELD_HALF_WIDTH * 1.2, PLAYFIELD_HALF_HEIGHT * 1.2);
        match assets.background {
            Some(texture) => {
                let sprite = Sprite::standalone(texture, background.size);
                background.add_animation(IDLE, Animation::single(sprite));
            }
            None => background.draw_mode = DrawMode::Shape,
        }

        let barriers = (0..BARRIER_COUNT)
            .map(|z| {
                let mut barrier = Entity::new(EntityKind::Barrier, format!("barrier_{z}"), now);
                barrier.set_pos(BARRIER_START_X + BARRIER_SPACING_X * z as f32, BARRIER_Y);
                barrier.set_size(BARRIER_WIDTH, BARRIER_HEIGHT);
                let frames = (0..BARRIER_FRAMES)
                    .map(|f| {
                        sheet.sprite(
                            SHEET_CELL * 2.0 * f as f32,
                            BARRIER_SHEET_Y,
                            SHEET_CELL * 2.0,
                            SHEET_CELL,
                            ENEMY_SIZE,
                        )
                    })
                    .collect();
                barrier.add_animation(
                    IDLE,
                    Animation::from_frames(frames, settings.animation_interval),
                );
                barrier
            })
            .collect();

        Self {
            player,
            enemies,
            bullets: Vec::new(),
            barriers,
            objects: vec![background],
            score: 0,
            formation: Formation::new(tuning),
            sheet,
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| !e.destroyed).count()
    }

    /// Move the player horizontally by input; `direction` is -1, 0 or +1
    pub fn move_player(&mut self, direction: f32, dt: f32) {
        if direction == 0.0 {
            return;
        }
        self.player.move_x(direction * self.player.velocity.x * dt);
        if self.settings.clamp_player {
            self.player.pos.x = clamp_to_playfield(self.player.pos.x, self.player.width());
        }
    }

    fn bullet_animation(&self, faction: Faction) -> Animation {
        let sheet_x = match faction {
            Faction::Player => HERO_BULLET_SHEET_X,
            Faction::Enemy => ENEMY_BULLET_SHEET_X,
        };
        Animation::single(self.sheet.sprite(sheet_x, 0.0, SHEET_CELL, SHEET_CELL, PLAYER_SIZE))
    }

    fn push_bullet(&mut self, mut bullet: Entity) {
        bullet.set_velocity(0.0, self.settings.bullet_speed);
        self.bullets.push(bullet);
    }

    /// Fire a bullet from the player
    pub fn player_fire(&mut self, now: f32) {
        let animation = self.bullet_animation(Faction::Player);
        let bullet = self.player.shoot(animation, now);
        self.push_bullet(bullet);
    }

    /// Fire a bullet from the enemy at `index`
    pub fn enemy_fire(&mut self, index: usize, now: f32) {
        let animation = self.bullet_animation(Faction::Enemy);
        if let Some(bullet) = self.enemies.get(index).map(|e| e.shoot(animation, now)) {
            self.push_bullet(bullet);
        }
    }

    /// Drop bullets that expired or were destroyed
    pub fn prune_bullets(&mut self, now: f32) {
        let lifetime = self.settings.bullet_lifetime;
        self.bullets
            .retain(|b| !b.destroyed && b.time_alive(now) <= lifetime);
    }

    pub fn prune_barriers(&mut self) {
        self.barriers.retain(|b| !b.destroyed);
    }

    /// Take one hit: lose a life and respawn at the start position.
    /// Returns true if that was the last life.
    pub fn player_got_hit(&mut self) -> bool {
        self.player.lives -= 1;
        let start = player_start();
        self.player.set_pos(start.x, start.y);
        self.player.lives < 0
    }

    /// Resolve bullet hits against enemies, the player and barriers.
    /// Returns true if the player lost their last life.
    pub fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let points = self.settings.formation.points_per_enemy;

        for b in 0..self.bullets.len() {
            let owner = self.bullets[b].owner;
            match owner {
                Some(Faction::Player) => {
                    let bullet = &self.bullets[b];
                    let hit = self
                        .enemies
                        .iter()
                        .position(|enemy| entities_collide(bullet, enemy));
                    if let Some(index) = hit {
                        self.bullets[b].destroy();
                        let enemy = &mut self.enemies[index];
                        enemy.life = enemy.life.saturating_sub(1);
                        if enemy.life > 0 {
                            continue;
                        }
                        enemy.destroy();
                        self.score += points;
                        log::debug!("Enemy {} destroyed, score {}", index, self.score);
                        events.push(GameEvent::EnemyDestroyed {
                            index,
                            score: self.score,
                        });
                        continue;
                    }
                }
                _ => {
                    if entities_collide(&self.bullets[b], &self.player) {
                        self.bullets[b].destroy();
                        let defeated = self.player_got_hit();
                        log::debug!("Player hit, {} lives left", self.player.lives);
                        events.push(GameEvent::PlayerHit {
                            lives: self.player.lives,
                        });
                        // A player hit ends collision handling for this tick
                        return defeated;
                    }
                }
            }

            let bullet = &self.bullets[b];
            let hit = self
                .barriers
                .iter()
                .position(|barrier| entities_collide(bullet, barrier));
            if let Some(index) = hit {
                self.bullets[b].destroy();
                match self.barriers[index].advance_active_animation() {
                    Some(frame) => events.push(GameEvent::BarrierDamaged { frame }),
                    None => {
                        log::debug!("Barrier {} destroyed", self.barriers[index].name);
                        events.push(GameEvent::BarrierDestroyed);
                    }
                }
            }
        }
        false
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded once; drives attacker selection
    rng: Pcg32,
    pub mode: GameMode,
    pub level: GameLevel,
    /// Simulation clock (seconds)
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events recorded during the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in the main menu
    pub fn new(settings: &Settings, assets: &LevelAssets, seed: u64) -> Self {
        if let Err(err) = settings.validate() {
            log::warn!("Running with invalid settings: {err}");
        }
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::MainMenu,
            level: GameLevel::new(settings, assets, 0.0),
            time: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Switch modes, logging the transition
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        log::info!("Mode {:?} -> {:?} (score {})", self.mode, mode, self.level.score);
        self.mode = mode;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_assets() -> LevelAssets {
        LevelAssets {
            sheet: SpriteSheet::new(TextureId(1), 256.0, 64.0),
            background: Some(TextureId(2)),
        }
    }

    fn level() -> GameLevel {
        GameLevel::new(&Settings::default(), &test_assets(), 0.0)
    }

    #[test]
    fn test_level_layout() {
        let level = level();
        assert_eq!(level.enemies.len(), 55);
        assert_eq!(level.barriers.len(), 3);
        assert_eq!(level.objects.len(), 1);
        assert_eq!(level.player.lives, 2);
        assert_eq!(level.player.pos.truncate(), player_start());
        assert!(!level.player.apply_velocity);
        assert_eq!(level.score, 0);

        // Row-major from the top
        assert!((level.enemies[0].x() - ENEMY_SPAWN_X).abs() < 1e-6);
        assert!((level.enemies[0].y() - ENEMY_SPAWN_Y).abs() < 1e-6);
        let last = &level.enemies[54];
        assert!((last.y() - (ENEMY_SPAWN_Y - 4.0 * ENEMY_SPACING_Y)).abs() < 1e-6);
        assert!(level.enemies.iter().all(|e| e.start_pos == e.pos));
    }

    #[test]
    fn test_missing_background_draws_as_shape() {
        let assets = LevelAssets {
            background: None,
            ..test_assets()
        };
        let level = GameLevel::new(&Settings::default(), &assets, 0.0);
        assert_eq!(level.objects[0].draw_mode, DrawMode::Shape);
    }

    #[test]
    fn test_player_movement_is_clamped() {
        let mut level = level();
        level.move_player(1.0, 100.0);
        let limit = PLAYFIELD_HALF_WIDTH - PLAYER_SIZE / 2.0;
        assert!((level.player.x() - limit).abs() < 1e-6);
        level.move_player(-1.0, 0.1);
        assert!((level.player.x() - (limit - 0.3)).abs() < 1e-5);
    }

    #[test]
    fn test_bullets_pruned_when_expired_or_destroyed() {
        let mut level = level();
        level.player_fire(0.0);
        level.player_fire(1.0);
        level.player_fire(1.5);
        level.bullets[2].destroy();

        level.prune_bullets(2.5);
        assert_eq!(level.bullets.len(), 1);
        assert_eq!(level.bullets[0].created_at, 1.0);
    }

    #[test]
    fn test_hero_bullet_destroys_one_enemy() {
        let mut level = level();
        // Two overlapping enemies under one bullet
        let target = level.enemies[54].pos;
        level.enemies[53].set_pos(target.x, target.y);
        level.player.set_pos(target.x, target.y);
        level.player_fire(0.0);

        let mut events = Vec::new();
        assert!(!level.resolve_collisions(&mut events));
        assert_eq!(level.score, 10);
        assert!(level.bullets[0].destroyed);
        assert_eq!(level.enemies_alive(), 54);
        assert!(level.enemies[53].destroyed);
        assert!(!level.enemies[54].destroyed);
        assert_eq!(
            events,
            vec![GameEvent::EnemyDestroyed { index: 53, score: 10 }]
        );
    }

    #[test]
    fn test_tougher_enemies_absorb_hits() {
        let mut settings = Settings::default();
        settings.formation.enemy_life = 2;
        let mut level = GameLevel::new(&settings, &test_assets(), 0.0);
        let target = level.enemies[54].pos;
        let mut events = Vec::new();

        level.player.set_pos(target.x, target.y);
        level.player_fire(0.0);
        level.resolve_collisions(&mut events);
        assert!(level.bullets[0].destroyed);
        assert!(!level.enemies[54].destroyed);
        assert_eq!(level.score, 0);
        assert!(events.is_empty());

        level.player_fire(0.0);
        level.resolve_collisions(&mut events);
        assert!(level.enemies[54].destroyed);
        assert_eq!(level.score, 10);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut level = level();
        level.player.set_pos(1.0, -1.68);
        let mut bullet = level.enemies[54].shoot(Animation::default(), 0.0);
        bullet.set_pos(1.0, -1.68);
        level.bullets.push(bullet);

        let mut events = Vec::new();
        assert!(!level.resolve_collisions(&mut events));
        assert_eq!(level.player.lives, 1);
        assert_eq!(level.player.pos.truncate(), player_start());
        assert!(level.bullets[0].destroyed);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives: 1 }]);
    }

    #[test]
    fn test_player_hit_stops_resolution_for_the_frame() {
        let mut level = level();
        let start = player_start();
        let mut enemy_bullet = level.enemies[54].shoot(Animation::default(), 0.0);
        enemy_bullet.set_pos(start.x, start.y);
        level.bullets.push(enemy_bullet);

        let target = level.enemies[54].pos;
        let mut hero_bullet = level.player.shoot(Animation::default(), 0.0);
        hero_bullet.set_pos(target.x, target.y);
        level.bullets.push(hero_bullet);

        let mut events = Vec::new();
        assert!(!level.resolve_collisions(&mut events));
        assert_eq!(level.player.lives, 1);
        assert!(level.bullets[0].destroyed);
        // The hero bullet waits for the next frame
        assert!(!level.bullets[1].destroyed);
        assert!(!level.enemies[54].destroyed);
        assert_eq!(level.score, 0);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives: 1 }]);

        events.clear();
        level.prune_bullets(0.0);
        level.resolve_collisions(&mut events);
        assert!(level.enemies[54].destroyed);
    }

    #[test]
    fn test_enemy_hit_shields_barrier_behind_it() {
        let mut level = level();
        let barrier_pos = level.barriers[1].pos;
        level.enemies[54].set_pos(barrier_pos.x, barrier_pos.y);
        level.player.set_pos(barrier_pos.x, barrier_pos.y);
        level.player_fire(0.0);

        let mut events = Vec::new();
        level.resolve_collisions(&mut events);
        assert!(level.enemies[54].destroyed);
        assert!(level.bullets[0].destroyed);
        let frame = level.barriers[1].active_animation().map(Animation::current_index);
        assert_eq!(frame, Some(0));
        assert!(!level.barriers[1].destroyed);
        assert_eq!(events, vec![GameEvent::EnemyDestroyed { index: 54, score: 10 }]);
    }

    #[test]
    fn test_background_sprite_matches_entity_size() {
        let level = level();
        let background = &level.objects[0];
        let sprite = background.current_sprite().map(|s| s.size);
        assert_eq!(sprite, Some(background.size));
        assert!((background.width() - PLAYFIELD_HALF_WIDTH * 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_bullet_ignores_enemies() {
        let mut level = level();
        let target = level.enemies[10].pos;
        let mut bullet = level.enemies[0].shoot(Animation::default(), 0.0);
        bullet.set_pos(target.x, target.y);
        level.bullets.push(bullet);

        let mut events = Vec::new();
        level.resolve_collisions(&mut events);
        assert!(events.is_empty());
        assert_eq!(level.enemies_alive(), 55);
        assert!(!level.bullets[0].destroyed);
    }

    #[test]
    fn test_bullet_damages_barrier_then_destroys_it() {
        let mut level = level();
        let barrier_pos = level.barriers[1].pos;
        let mut events = Vec::new();

        for hit in 1..=5 {
            level.player.set_pos(barrier_pos.x, barrier_pos.y);
            level.player_fire(0.0);
            level.resolve_collisions(&mut events);
            level.prune_bullets(0.0);
            if hit < 5 {
                assert_eq!(events.last(), Some(&GameEvent::BarrierDamaged { frame: hit }));
            }
        }
        assert_eq!(events.last(), Some(&GameEvent::BarrierDestroyed));
        assert!(level.barriers[1].destroyed);

        level.prune_barriers();
        assert_eq!(level.barriers.len(), 2);
        assert!(level.bullets.is_empty());
    }

    #[test]
    fn test_last_life_defeats_player() {
        let mut level = level();
        assert!(!level.player_got_hit());
        assert!(!level.player_got_hit());
        assert!(level.player_got_hit());
        assert_eq!(level.player.lives, -1);
    }
}
