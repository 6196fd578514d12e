//! Game state and core simulation types
//!
//! All state that must be persisted for save/restore and determinism lives here.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::achievements::{AchievementKind, Achievements, Progress};
use super::catalog::{Basket, FallingFruit, FruitKind, initial_baskets};
use super::challenge::{Challenge, ChallengeKind, Scheduler, random_pool};
use super::combo::ComboState;
use super::effects::{ActivePowerup, EffectKind, EffectTable, PowerupKind};
use super::particles::Particle;
use super::rng::GameRng;
use super::snapshot::GameSummary;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Top-level mode. Only `Playing` advances the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, waiting for a selection
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen until the pause toggle
    Paused,
    /// Run ended; summary available
    GameOver,
    HighScores,
    Settings,
    Shop,
    Instructions,
    /// Host should shut down
    Exited,
}

/// Counters for the current game, plus a few that span the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub caught: u64,
    pub special_caught: u64,
    pub missed: u64,
    pub powerups_collected: u64,
    pub effects_activated: u64,
    pub fruits_spawned: u64,
    pub challenges_completed: u64,
    pub challenges_failed: u64,
    /// Session-wide
    pub games_played: u32,
    pub started_at_ms: u64,
    pub ended_at_ms: Option<u64>,
    /// Session-wide catch count per kind
    pub caught_by_kind: BTreeMap<FruitKind, u64>,
}

impl GameStats {
    /// Zero the per-game counters
    fn reset_for_game(&mut self, now_ms: u64) {
        let caught_by_kind = std::mem::take(&mut self.caught_by_kind);
        *self = Self {
            games_played: self.games_played,
            caught_by_kind,
            started_at_ms: now_ms,
            ..Self::default()
        };
    }

    /// Game length so far (or in total once ended)
    pub fn duration_ms(&self, now_ms: u64) -> u64 {
        self.ended_at_ms
            .unwrap_or(now_ms)
            .saturating_sub(self.started_at_ms)
    }
}

/// Something that happened during a tick. Hosts drain `GameState::events`
/// for sound/visual cues; the readable ones also land in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    Caught { kind: FruitKind, points: u64 },
    Missed { kind: FruitKind },
    LevelUp { level: u32, coins: u64 },
    BasketsWidened { width: i32 },
    PowerupGranted(PowerupKind),
    PowerupEnded(PowerupKind),
    EffectActivated(EffectKind),
    EffectEnded(EffectKind),
    BonusStarted,
    BonusEnded,
    ChallengeStarted(ChallengeKind),
    ChallengeCompleted(ChallengeKind),
    ChallengeFailed(ChallengeKind),
    AchievementUnlocked(AchievementKind),
    Paused,
    Resumed,
    GameOver { score: u64 },
}

impl GameEvent {
    /// Whether this event belongs in the on-screen message log
    pub fn is_message(&self) -> bool {
        !matches!(
            self,
            Self::Caught { .. } | Self::BasketsWidened { .. } | Self::GameStarted
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameStarted => write!(f, "Game started"),
            Self::Caught { kind, points } => write!(f, "Caught {} (+{})", kind.name(), points),
            Self::Missed { .. } => write!(f, "Missed! Lost a life"),
            Self::LevelUp { level, coins } => {
                write!(f, "Level Up! Now at level {} (+{} coins)", level, coins)
            }
            Self::BasketsWidened { width } => write!(f, "Baskets widened to {}", width),
            Self::PowerupGranted(kind) => write!(f, "Power-up: {}", kind.name()),
            Self::PowerupEnded(kind) => write!(f, "{} effect ended", kind.name()),
            Self::EffectActivated(kind) => write!(f, "Activated {} effect!", kind.name()),
            Self::EffectEnded(kind) => write!(f, "{} effect ended", kind.name()),
            Self::BonusStarted => write!(f, "Bonus Mode Activated!"),
            Self::BonusEnded => write!(f, "Bonus Mode Ended"),
            Self::ChallengeStarted(kind) => write!(f, "New Challenge: {}", kind.description()),
            Self::ChallengeCompleted(kind) => {
                write!(f, "Challenge Completed: {}", kind.description())
            }
            Self::ChallengeFailed(kind) => write!(f, "Challenge Failed: {}", kind.description()),
            Self::AchievementUnlocked(kind) => write!(f, "Achievement Unlocked: {}", kind.name()),
            Self::Paused => write!(f, "Game Paused"),
            Self::Resumed => write!(f, "Game Resumed"),
            Self::GameOver { score } => write!(f, "Game Over! Final score {}", score),
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// RNG (seed + stream position)
    pub rng: GameRng,
    /// Balance table for this run
    pub tuning: Tuning,
    pub difficulty: Difficulty,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,

    pub score: u64,
    pub lives: u8,
    pub level: u32,
    /// Level-up rewards, kept across games
    pub coins: u64,
    /// Frame period in ms
    pub game_speed_ms: u64,

    /// The fruit in flight, if any
    pub fruit: Option<FallingFruit>,
    pub baskets: Vec<Basket>,
    /// Spawns left during which a special fruit is re-rolled
    pub special_cooldown: u32,

    pub effects: EffectTable,
    pub powerup: Option<ActivePowerup>,
    pub combo: ComboState,
    pub challenges: Vec<Challenge>,
    pub scheduler: Scheduler,

    pub stats: GameStats,
    pub achievements: Achievements,
    /// Achievements unlocked since the current game started
    pub unlocked_this_game: Vec<AchievementKind>,

    pub particles: Vec<Particle>,
    /// Particle emission toggle from settings
    pub particles_enabled: bool,
    /// Newest first, at most MAX_MESSAGES
    pub messages: VecDeque<String>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Filled when a game ends
    pub summary: Option<GameSummary>,
}

impl GameState {
    /// Create a session sitting in the main menu
    pub fn new(seed: u64, tuning: Tuning, difficulty: Difficulty) -> Self {
        let game_speed_ms = tuning.game_speed_ms(1, difficulty.index());
        let baskets = initial_baskets(tuning.basket_width);
        Self {
            rng: GameRng::new(seed),
            tuning,
            difficulty,
            phase: GamePhase::Menu,
            time_ticks: 0,
            score: 0,
            lives: MAX_LIVES,
            level: 1,
            coins: 0,
            game_speed_ms,
            fruit: None,
            baskets,
            special_cooldown: 0,
            effects: EffectTable::default(),
            powerup: None,
            combo: ComboState::default(),
            challenges: Vec::new(),
            scheduler: Scheduler::default(),
            stats: GameStats::default(),
            achievements: Achievements::default(),
            unlocked_this_game: Vec::new(),
            particles: Vec::new(),
            particles_enabled: true,
            messages: VecDeque::with_capacity(MAX_MESSAGES),
            events: Vec::new(),
            summary: None,
        }
    }

    /// Reset per-game state and enter `Playing`
    pub fn start_game(&mut self, now_ms: u64) {
        self.score = 0;
        self.lives = MAX_LIVES;
        self.level = 1;
        self.game_speed_ms = self.tuning.game_speed_ms(1, self.difficulty.index());
        self.fruit = None;
        self.baskets = initial_baskets(self.tuning.basket_width);
        self.special_cooldown = 0;
        self.effects.clear();
        self.powerup = None;
        self.combo.reset();
        self.challenges = random_pool(&mut self.rng, self.tuning.challenge_slots);
        self.scheduler = Scheduler::new(now_ms);
        self.stats.reset_for_game(now_ms);
        self.unlocked_this_game.clear();
        self.particles.clear();
        self.summary = None;
        self.phase = GamePhase::Playing;
        log::info!(
            "Game started (difficulty {}, seed {})",
            self.difficulty.as_str(),
            self.rng.seed()
        );
        self.push_event(GameEvent::GameStarted);
    }

    /// Close the current game: stamp stats, run end-of-game achievements, build the summary
    pub fn finish_game(&mut self, now_ms: u64) {
        self.stats.ended_at_ms = Some(now_ms);
        self.stats.games_played += 1;
        self.fruit = None;
        self.check_achievements(true);
        self.summary = Some(GameSummary::from_state(self, now_ms));
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {}, level {}, max combo {}",
            self.score,
            self.level,
            self.combo.max_combo
        );
        self.push_event(GameEvent::GameOver { score: self.score });
    }

    /// Record an event and mirror it into the message log
    pub fn push_event(&mut self, event: GameEvent) {
        if event.is_message() {
            self.messages.push_front(event.to_string());
            self.messages.truncate(MAX_MESSAGES);
        }
        self.events.push(event);
    }

    /// Re-run the achievement evaluator against current progress
    pub fn check_achievements(&mut self, game_ended: bool) {
        let newly = self.achievements.evaluate(&Progress {
            stats: &self.stats,
            max_combo: self.combo.max_combo,
            level: self.level,
            game_ended,
        });
        for kind in newly {
            log::info!("Achievement unlocked: {}", kind.name());
            self.unlocked_this_game.push(kind);
            self.push_event(GameEvent::AchievementUnlocked(kind));
        }
    }

    /// Whether a power-up of `kind` is held and unexpired
    pub fn powerup_active(&self, kind: PowerupKind, now_ms: u64) -> bool {
        self.powerup
            .as_ref()
            .is_some_and(|p| p.kind == kind && !p.is_expired(now_ms))
    }

    /// Freeze-time holds the fruit in place
    pub fn is_frozen(&self, now_ms: u64) -> bool {
        self.powerup_active(PowerupKind::FreezeTime, now_ms)
    }

    /// Magnet from either the effect or the power-up
    pub fn magnet_active(&self, now_ms: u64) -> bool {
        self.effects.is_active(EffectKind::Magnet, now_ms)
            || self.powerup_active(PowerupKind::Magnet, now_ms)
    }

    /// Delay the host should wait before the next tick
    pub fn tick_interval_ms(&self, now_ms: u64) -> u64 {
        if self.powerup_active(PowerupKind::SlowMotion, now_ms) {
            self.game_speed_ms.max(self.tuning.slow_motion_speed_ms)
        } else {
            self.game_speed_ms
        }
    }
}
