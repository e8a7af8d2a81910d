//! Game settings and tuning
//!
//! Every field has a default that reproduces the classic layout, so a
//! settings file only needs to name the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::consts::{ANIMATION_INTERVAL, BULLET_SPEED};

/// Enemy formation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    /// Columns in the grid (also the width of one sweep window)
    pub enemies_per_row: usize,
    /// Rows in the grid
    pub rows: usize,
    /// Seconds between row sweeps
    pub movement_interval: f32,
    /// Horizontal shift per sweep
    pub movement_step: f32,
    /// Vertical drop applied every `sweeps_per_descent` full passes
    pub descent_step: f32,
    pub sweeps_per_descent: u32,
    /// Full passes between direction reversals
    pub sweeps_per_reversal: u32,
    /// Seconds between enemy shots
    pub attack_interval: f32,
    /// Hits an enemy takes before it is destroyed
    pub enemy_life: u32,
    /// Score credited per destroyed enemy
    pub points_per_enemy: u64,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            enemies_per_row: 11,
            rows: 5,
            movement_interval: 0.2,
            movement_step: 0.1,
            descent_step: 0.05,
            sweeps_per_descent: 5,
            sweeps_per_reversal: 5,
            attack_interval: 1.0,
            enemy_life: 1,
            points_per_enemy: 10,
        }
    }
}

/// Texture paths, relative to the asset root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub sprite_sheet: PathBuf,
    pub font: PathBuf,
    pub background: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            sprite_sheet: PathBuf::from("resources/sheet.png"),
            font: PathBuf::from("resources/font.png"),
            background: PathBuf::from("resources/space.png"),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one at startup
    pub seed: Option<u64>,

    // === Player ===
    /// Hits the player can absorb before the next one ends the game
    pub player_lives: i32,
    /// Horizontal speed (units per second)
    pub player_speed: f32,
    /// Keep the player inside the playfield
    pub clamp_player: bool,

    // === Bullets ===
    pub bullet_speed: f32,
    /// Seconds before a bullet expires
    pub bullet_lifetime: f32,

    // === Animation ===
    pub animation_interval: f32,

    pub formation: FormationTuning,
    pub assets: AssetPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            player_lives: 2,
            player_speed: 3.0,
            clamp_player: true,

            bullet_speed: BULLET_SPEED,
            bullet_lifetime: 2.0,

            animation_interval: ANIMATION_INTERVAL,

            formation: FormationTuning::default(),
            assets: AssetPaths::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let f = &self.formation;
        if f.enemies_per_row == 0 || f.rows == 0 {
            bail!("formation needs at least one row and one column");
        }
        if f.movement_interval <= 0.0 || f.attack_interval <= 0.0 {
            bail!("formation intervals must be positive");
        }
        if f.sweeps_per_descent == 0 || f.sweeps_per_reversal == 0 {
            bail!("sweep counts must be positive");
        }
        if f.enemy_life == 0 {
            bail!("enemy_life must be at least 1");
        }
        if self.bullet_lifetime <= 0.0 || self.animation_interval <= 0.0 {
            bail!("bullet_lifetime and animation_interval must be positive");
        }
        Ok(())
    }

    /// Total enemies in the grid
    pub fn enemy_count(&self) -> usize {
        self.formation.enemies_per_row * self.formation.rows
    }
}
