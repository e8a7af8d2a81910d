//! Fixed timestep simulation tick
//!
//! Advances the game mode machine and, while a level is running, the
//! per-frame update pipeline in its fixed order.

use std::cmp::Ordering;

use super::entity::Faction;
use super::formation::{attack_eligible, choose_attacker};
use super::state::{GameEvent, GameMode, GameState};
use crate::consts::ENEMY_SIZE;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement: -1 left, +1 right, 0 idle
    pub move_x: f32,
    /// Fire key pressed this tick (also starts the game from the menu)
    pub fire: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.mode.is_terminal() {
        return;
    }

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.time += dt;

    match state.mode {
        GameMode::MainMenu => {
            if input.fire {
                state.set_mode(GameMode::Level);
                state.events.push(GameEvent::LevelStarted);
            }
        }
        GameMode::Level => tick_level(state, &input, dt),
        GameMode::GameOver | GameMode::GameWon => {}
    }
}

/// One level frame. The order of the steps below is part of the game's
/// behaviour and must not change.
fn tick_level(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.time;

    // Input: the player moves directly, never through velocity integration
    {
        let level = &mut state.level;
        level.move_player(input.move_x.clamp(-1.0, 1.0), dt);
        if input.fire {
            level.player_fire(now);
            state.events.push(GameEvent::PlayerFired);
        }
        level.player.update(now, dt);

        // Lockstep row sweep
        if level.formation.movement_due(dt) {
            level.formation.sweep_row(&mut level.enemies);
        }
    }

    // Attack
    if state.level.formation.attack_due(dt) {
        let per_row = state.level.formation.enemies_per_row;
        let eligible = attack_eligible(&state.level.enemies, per_row);
        match choose_attacker(&eligible, state.rng()) {
            Some(index) => {
                state.level.enemy_fire(index, now);
                state.events.push(GameEvent::EnemyFired { index });
            }
            None => {
                let score = state.level.score;
                state.set_mode(GameMode::GameWon);
                state.events.push(GameEvent::GameWon { score });
            }
        }
    }

    let level = &mut state.level;

    level.prune_bullets(now);
    for bullet in &mut level.bullets {
        bullet.update(now, dt);
    }
    for object in &mut level.objects {
        object.update(now, dt);
    }

    level.prune_barriers();
    for barrier in &mut level.barriers {
        barrier.update(now, dt);
    }

    let defeated = level.resolve_collisions(&mut state.events);
    if defeated && state.mode == GameMode::Level {
        let score = state.level.score;
        state.set_mode(GameMode::GameOver);
        state.events.push(GameEvent::GameOver { score });
    }
}

/// Seconds the autopilot waits between its own shots
const AUTOPILOT_FIRE_SPACING: f32 = 0.25;

/// Demo-mode input: start the game, then line up under the nearest enemy
/// that can be hit and fire at it
pub fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut out = TickInput {
        move_x: 0.0,
        fire: false,
        ..input.clone()
    };

    match state.mode {
        GameMode::MainMenu => out.fire = true,
        GameMode::Level => {
            let level = &state.level;
            let px = level.player.x();
            let eligible = attack_eligible(&level.enemies, level.formation.enemies_per_row);
            let target = eligible
                .iter()
                .map(|&i| level.enemies[i].x())
                .min_by(|a, b| {
                    (a - px)
                        .abs()
                        .partial_cmp(&(b - px).abs())
                        .unwrap_or(Ordering::Equal)
                });

            if let Some(tx) = target {
                let dx = tx - px;
                if dx.abs() > ENEMY_SIZE * 0.25 {
                    out.move_x = dx.signum();
                } else {
                    let recently_fired = level.bullets.iter().any(|b| {
                        b.owner == Some(Faction::Player)
                            && b.time_alive(state.time) < AUTOPILOT_FIRE_SPACING
                    });
                    out.fire = !recently_fired;
                }
            }
        }
        GameMode::GameOver | GameMode::GameWon => {}
    }

    out
}
