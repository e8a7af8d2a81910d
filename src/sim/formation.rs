//! Enemy formation controller
//!
//! The grid moves one row per movement tick (lockstep row sweep), starting
//! from the bottom row. Every `sweeps_per_descent` full passes the grid drops
//! one step, every `sweeps_per_reversal` passes it turns around.
//!
//! Enemies are never removed from the grid. Row and column are derived from
//! the index, so dead slots stay in place as inert entries.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::settings::FormationTuning;

/// Fixed-interval trigger driven by simulation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cadence {
    interval: f32,
    elapsed: f32,
}

impl Cadence {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt`; true once per elapsed interval
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.interval {
            self.elapsed -= self.interval;
            return true;
        }
        false
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }
}

/// Movement and attack state for the enemy grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub enemies_per_row: usize,
    /// +1 moves right, -1 moves left
    pub movement_direction: f32,
    /// Row (counted from the bottom) that moves next
    pub row_index: usize,
    /// Completed full passes over the grid
    pub row_change_count: u32,
    movement_step: f32,
    descent_step: f32,
    sweeps_per_descent: u32,
    sweeps_per_reversal: u32,
    movement: Cadence,
    attack: Cadence,
}

impl Formation {
    pub fn new(tuning: &FormationTuning) -> Self {
        Self {
            enemies_per_row: tuning.enemies_per_row,
            movement_direction: -1.0,
            row_index: 0,
            row_change_count: 0,
            movement_step: tuning.movement_step,
            descent_step: tuning.descent_step,
            sweeps_per_descent: tuning.sweeps_per_descent,
            sweeps_per_reversal: tuning.sweeps_per_reversal,
            movement: Cadence::new(tuning.movement_interval),
            attack: Cadence::new(tuning.attack_interval),
        }
    }

    /// Advance the movement timer; true when a row should move
    pub fn movement_due(&mut self, dt: f32) -> bool {
        self.movement.tick(dt)
    }

    /// Advance the attack timer; true when an enemy should fire
    pub fn attack_due(&mut self, dt: f32) -> bool {
        self.attack.tick(dt)
    }

    pub fn total_rows(&self, enemy_count: usize) -> usize {
        enemy_count.checked_div(self.enemies_per_row).unwrap_or(0)
    }

    /// Indices of the row that moves next, counted back from the end of
    /// the enemy list
    pub fn sweep_window(&self, enemy_count: usize) -> Range<usize> {
        let end = enemy_count.saturating_sub(self.row_index * self.enemies_per_row);
        let start = end.saturating_sub(self.enemies_per_row);
        start..end
    }

    /// Current vertical drop below each enemy's start position
    pub fn descent(&self) -> f32 {
        let descents = self.row_change_count.checked_div(self.sweeps_per_descent).unwrap_or(0);
        descents as f32 * self.descent_step
    }

    /// Move one row and advance the sweep
    pub fn sweep_row(&mut self, enemies: &mut [Entity]) {
        let step = self.movement_step * self.movement_direction;
        let descent = self.descent();
        let window = self.sweep_window(enemies.len());
        for enemy in &mut enemies[window] {
            enemy.move_x(step);
            enemy.pos.y = enemy.start_pos.y - descent;
        }

        self.row_index += 1;
        if self.row_index >= self.total_rows(enemies.len()) {
            self.row_change_count += 1;
            self.row_index = 0;

            if self.row_change_count.is_multiple_of(self.sweeps_per_reversal) {
                self.movement_direction *= -1.0;
                log::debug!(
                    "Formation reversed after {} sweeps (direction {})",
                    self.row_change_count,
                    self.movement_direction
                );
            }
        }
    }
}

/// Enemies allowed to fire: alive, and either in the bottom row or with
/// every enemy below them in the same column destroyed
pub fn attack_eligible(enemies: &[Entity], enemies_per_row: usize) -> Vec<usize> {
    let enemies_per_row = enemies_per_row.max(1);
    let count = enemies.len();
    let bottom_row_start = count.saturating_sub(enemies_per_row);

    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| !enemy.destroyed)
        .filter(|&(i, _)| {
            i >= bottom_row_start
                || (i + enemies_per_row..count)
                    .step_by(enemies_per_row)
                    .all(|below| enemies[below].destroyed)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Pick one eligible attacker uniformly at random
pub fn choose_attacker<R: Rng + ?Sized>(eligible: &[usize], rng: &mut R) -> Option<usize> {
    if eligible.is_empty() {
        return None;
    }
    Some(eligible[rng.random_range(0..eligible.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const PER_ROW: usize = 11;

    fn grid(rows: usize) -> Vec<Entity> {
        (0..rows * PER_ROW)
            .map(|i| {
                let mut e = Entity::new(EntityKind::Enemy, "enemy", 0.0);
                let row = i / PER_ROW;
                let col = i % PER_ROW;
                e.set_pos_z(col as f32 * 0.5, 1.5 - row as f32 * 0.46, 0.0, true);
                e.set_size(0.44, 0.44);
                e
            })
            .collect()
    }

    fn formation() -> Formation {
        Formation::new(&FormationTuning::default())
    }

    #[test]
    fn test_cadence_fires_once_per_interval() {
        let mut cadence = Cadence::new(0.2);
        let fired = (0..100).filter(|_| cadence.tick(0.01)).count();
        // 1.0s of time at 0.2s intervals; the last boundary may land on
        // either side of 1.0 with float accumulation
        assert!((4..=5).contains(&fired));
    }

    #[test]
    fn test_sweep_moves_bottom_row_first() {
        let mut enemies = grid(5);
        let mut f = formation();
        f.sweep_row(&mut enemies);

        for (i, e) in enemies.iter().enumerate() {
            let moved = (e.x() - e.start_pos.x).abs() > 1e-6;
            assert_eq!(moved, i >= 44, "enemy {i}");
        }
        assert!((enemies[54].x() - (enemies[54].start_pos.x - 0.1)).abs() < 1e-6);
        assert_eq!(f.row_index, 1);
        assert_eq!(f.sweep_window(55), 33..44);
    }

    #[test]
    fn test_full_pass_increments_count_and_resets_row() {
        let mut enemies = grid(5);
        let mut f = formation();
        for _ in 0..5 {
            f.sweep_row(&mut enemies);
        }
        assert_eq!(f.row_index, 0);
        assert_eq!(f.row_change_count, 1);
        assert_eq!(f.movement_direction, -1.0);
        for e in &enemies {
            assert!((e.x() - (e.start_pos.x - 0.1)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reversal_and_descent_after_five_passes() {
        let mut enemies = grid(5);
        let mut f = formation();
        for _ in 0..25 {
            f.sweep_row(&mut enemies);
        }
        assert_eq!(f.row_change_count, 5);
        assert_eq!(f.movement_direction, 1.0);
        // Descent is applied from the next pass on
        assert!(enemies[0].y() == enemies[0].start_pos.y);

        f.sweep_row(&mut enemies);
        let bottom = &enemies[54];
        assert!((bottom.y() - (bottom.start_pos.y - 0.05)).abs() < 1e-6);
        // Five passes left then one step right
        assert!((bottom.x() - (bottom.start_pos.x - 0.4)).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_tuning_does_not_panic() {
        let tuning = FormationTuning {
            enemies_per_row: 0,
            sweeps_per_descent: 0,
            ..FormationTuning::default()
        };
        let mut f = Formation::new(&tuning);
        let mut enemies = grid(1);
        assert_eq!(f.total_rows(enemies.len()), 0);
        f.sweep_row(&mut enemies);
        assert_eq!(f.descent(), 0.0);
        assert_eq!(attack_eligible(&enemies, 0), vec![PER_ROW - 1]);
    }

    #[test]
    fn test_bottom_row_always_eligible() {
        let enemies = grid(5);
        let eligible = attack_eligible(&enemies, PER_ROW);
        assert_eq!(eligible, (44..55).collect::<Vec<_>>());
    }

    #[test]
    fn test_cleared_column_exposes_enemy_above() {
        let mut enemies = grid(5);
        // Column 3: destroy rows 2..4 (indices 25, 36, 47)
        for i in [25, 36, 47] {
            enemies[i].destroy();
        }
        let eligible = attack_eligible(&enemies, PER_ROW);
        assert!(eligible.contains(&14));
        assert!(!eligible.contains(&3));
        assert!(!eligible.contains(&47));

        // A live enemy below blocks eligibility
        enemies[36].destroyed = false;
        let eligible = attack_eligible(&enemies, PER_ROW);
        assert!(!eligible.contains(&14));
        assert!(eligible.contains(&36));
    }

    #[test]
    fn test_cleared_grid_has_no_attackers() {
        let mut enemies = grid(5);
        enemies.iter_mut().for_each(Entity::destroy);
        assert!(attack_eligible(&enemies, PER_ROW).is_empty());

        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(choose_attacker(&[], &mut rng), None);
    }

    #[test]
    fn test_attacker_selection_is_uniform() {
        let eligible = [3, 14, 40, 52];
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 4];
        let draws = 8000;
        for _ in 0..draws {
            let pick = choose_attacker(&eligible, &mut rng).unwrap();
            let slot = eligible.iter().position(|&e| e == pick).unwrap();
            counts[slot] += 1;
        }
        for count in counts {
            // Expected 2000 each
            assert!((1700..2300).contains(&count), "counts {counts:?}");
        }
    }
}
