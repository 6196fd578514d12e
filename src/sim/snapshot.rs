//! Read-only views handed to renderers and score sinks

use serde::{Deserialize, Serialize};

use super::achievements::AchievementKind;
use super::catalog::{Basket, FallingFruit};
use super::challenge::ChallengeKind;
use super::effects::{EffectKind, PowerupKind};
use super::particles::Particle;
use super::state::{GamePhase, GameState};
use crate::score_per_minute;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub remaining_ms: u64,
    pub color_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupView {
    pub kind: PowerupKind,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub kind: ChallengeKind,
    pub description: String,
    pub target: i64,
    pub progress: i64,
    pub active: bool,
}

/// Everything a frame needs, with timers resolved against `now_ms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub coins: u64,
    pub combo: u32,
    pub multiplier: u32,
    pub fruit: Option<FallingFruit>,
    pub baskets: Vec<Basket>,
    /// Active effects only
    pub effects: Vec<EffectView>,
    pub powerup: Option<PowerupView>,
    pub bonus_active: bool,
    pub messages: Vec<String>,
    pub challenges: Vec<ChallengeView>,
    pub particles: Vec<Particle>,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: u64) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            level: state.level,
            coins: state.coins,
            combo: state.combo.combo,
            multiplier: state.combo.multiplier,
            fruit: state.fruit.clone(),
            baskets: state.baskets.clone(),
            effects: state
                .effects
                .active()
                .map(|slot| EffectView {
                    kind: slot.kind,
                    remaining_ms: slot.remaining_ms(now_ms),
                    color_index: slot.color_index,
                })
                .collect(),
            powerup: state
                .powerup
                .as_ref()
                .filter(|p| !p.is_expired(now_ms))
                .map(|p| PowerupView {
                    kind: p.kind,
                    remaining_ms: p.remaining_ms(now_ms),
                }),
            bonus_active: state.scheduler.bonus_active(now_ms),
            messages: state.messages.iter().cloned().collect(),
            challenges: state
                .challenges
                .iter()
                .map(|c| ChallengeView {
                    kind: c.kind,
                    description: c.kind.description().to_string(),
                    target: c.target,
                    progress: c.progress,
                    active: c.is_active(),
                })
                .collect(),
            particles: state.particles.clone(),
        }
    }
}

/// End-of-game report passed to score sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u64,
    pub level: u32,
    pub max_combo: u32,
    pub longest_streak: u32,
    pub caught: u64,
    pub special_caught: u64,
    pub missed: u64,
    pub powerups_collected: u64,
    pub effects_activated: u64,
    pub challenges_completed: u64,
    pub coins: u64,
    pub duration_ms: u64,
    pub score_per_minute: u64,
    /// Wall-clock end of the game, in the host clock's milliseconds
    pub ended_at_ms: u64,
    /// Achievements unlocked during this game
    pub new_achievements: Vec<AchievementKind>,
}

impl GameSummary {
    pub fn from_state(state: &GameState, now_ms: u64) -> Self {
        let duration_ms = state.stats.duration_ms(now_ms);
        Self {
            score: state.score,
            level: state.level,
            max_combo: state.combo.max_combo,
            longest_streak: state.combo.longest_streak,
            caught: state.stats.caught,
            special_caught: state.stats.special_caught,
            missed: state.stats.missed,
            powerups_collected: state.stats.powerups_collected,
            effects_activated: state.stats.effects_activated,
            challenges_completed: state.stats.challenges_completed,
            coins: state.coins,
            duration_ms,
            score_per_minute: score_per_minute(state.score, duration_ms),
            ended_at_ms: now_ms,
            new_achievements: state.unlocked_this_game.clone(),
        }
    }

    /// Catch rate in percent, 0 when nothing landed
    pub fn accuracy(&self) -> f64 {
        let total = self.caught + self.missed;
        if total == 0 {
            0.0
        } else {
            self.caught as f64 * 100.0 / total as f64
        }
    }
}
