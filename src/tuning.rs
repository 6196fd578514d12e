//! Data-driven game balance
//!
//! Every number that shapes a run lives here so tests and alternate modes can
//! reshape the game without touching the tick logic. `Tuning` is stored
//! inside `GameState`, which keeps a restored save playing identically.

use serde::{Deserialize, Serialize};

/// One row of the combo multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTier {
    /// Consecutive catches needed to reach this tier
    pub min_streak: u32,
    /// Score multiplier while at this tier
    pub multiplier: u32,
}

/// Balance constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Falling fruit ===
    /// Added to the fruit's vertical velocity every tick
    pub gravity: f32,
    /// Initial fall speed at level 1
    pub base_fall_speed: f32,
    /// Extra initial fall speed per level above 1
    pub fall_speed_per_level: f32,
    /// Displacement multiplier while speed-boost is active
    pub speed_boost_factor: f32,
    /// Spawns during which a special fruit is re-rolled after one appears
    pub special_cooldown_spawns: u32,
    /// Columns kept clear at each edge when choosing a spawn column
    pub spawn_margin: i32,

    // === Baskets ===
    pub basket_width: i32,
    pub max_basket_width: i32,
    /// Baskets widen on every level that is a multiple of this
    pub basket_widen_every: u32,
    /// No widening past this level
    pub basket_widen_until_level: u32,

    // === Scoring ===
    /// Tiers sorted by descending `min_streak`; below all tiers the multiplier is 1
    pub combo_tiers: Vec<ComboTier>,
    /// Magnet effect doubles points when the fruit lands this close to the basket centre
    pub magnet_bonus_radius: i32,
    /// Flat bonus from the score-boost power-up
    pub score_boost_points: u64,

    // === Levels & speed ===
    /// Level n is cleared once score reaches n * level_score_step
    pub level_score_step: u64,
    pub coins_per_level: u64,
    pub base_speed_ms: u64,
    pub level_speed_factor: u64,
    pub difficulty_speed_factor: u64,
    pub min_speed_ms: u64,
    /// Frame period while slow-motion is active
    pub slow_motion_speed_ms: u64,

    // === Power-ups & effects ===
    /// Percent chance per tick to grant a power-up when none is active
    pub powerup_chance: u32,
    pub powerup_duration_ms: u64,
    /// Percent chance per tick to activate a random effect
    pub effect_chance: u32,
    pub effect_duration_ms: u64,

    // === Scheduler ===
    pub bonus_interval_ms: u64,
    pub bonus_duration_ms: u64,
    pub challenge_interval_ms: u64,
    pub challenge_timeout_ms: u64,
    pub challenge_slots: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            base_fall_speed: 1.0,
            fall_speed_per_level: 0.1,
            speed_boost_factor: 1.5,
            special_cooldown_spawns: 10,
            spawn_margin: 5,

            basket_width: 3,
            max_basket_width: 10,
            basket_widen_every: 5,
            basket_widen_until_level: 50,

            combo_tiers: vec![
                ComboTier {
                    min_streak: 10,
                    multiplier: 3,
                },
                ComboTier {
                    min_streak: 5,
                    multiplier: 2,
                },
            ],
            magnet_bonus_radius: 5,
            score_boost_points: 50,

            level_score_step: 100,
            coins_per_level: 10,
            base_speed_ms: 250,
            level_speed_factor: 5,
            difficulty_speed_factor: 25,
            min_speed_ms: 50,
            slow_motion_speed_ms: 200,

            powerup_chance: 20,
            powerup_duration_ms: 5_000,
            effect_chance: 10,
            effect_duration_ms: 10_000,

            bonus_interval_ms: 30_000,
            bonus_duration_ms: 10_000,
            challenge_interval_ms: 60_000,
            challenge_timeout_ms: 60_000,
            challenge_slots: 3,
        }
    }
}

impl Tuning {
    /// Tuning with every random roll disabled (power-ups and effects only
    /// appear when a test or scripted mode grants them)
    pub fn calm() -> Self {
        Self {
            powerup_chance: 0,
            effect_chance: 0,
            ..Self::default()
        }
    }

    /// Frame period in ms for a level and difficulty index
    pub fn game_speed_ms(&self, level: u32, difficulty: u32) -> u64 {
        self.base_speed_ms
            .saturating_sub(level as u64 * self.level_speed_factor)
            .saturating_sub(difficulty as u64 * self.difficulty_speed_factor)
            .max(self.min_speed_ms)
    }

    /// Multiplier for a consecutive-catch streak
    pub fn multiplier_for(&self, streak: u32) -> u32 {
        self.combo_tiers
            .iter()
            .find(|tier| streak >= tier.min_streak)
            .map(|tier| tier.multiplier)
            .unwrap_or(1)
    }

    /// Initial fall speed for a fruit spawned at `level`
    pub fn spawn_velocity(&self, level: u32) -> f32 {
        self.base_fall_speed + level.saturating_sub(1) as f32 * self.fall_speed_per_level
    }
}
