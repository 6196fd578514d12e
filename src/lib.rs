//! Fruit Basket - catch-the-falling-fruit arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, catching, combos, effects, challenges)
//! - `platform`: Time source and key-to-command mapping
//! - `persistence`: JSON save/load for settings, high scores and profiles
//! - `highscores`: Leaderboard, player profile and the `ScoreSink` seam
//! - `settings`: Player preferences and difficulty
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, Profile, ScoreSink};
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield width in columns
    pub const SCREEN_WIDTH: i32 = 160;
    /// Playfield height in rows
    pub const SCREEN_HEIGHT: i32 = 40;
    /// Row on which a falling fruit is resolved against the baskets
    pub const LANDING_ROW: f32 = (SCREEN_HEIGHT - 1) as f32;

    /// Level cap
    pub const MAX_LEVEL: u32 = 200;
    /// Lives at game start and the upper bound for extra-life pickups
    pub const MAX_LIVES: u8 = 5;

    /// Number of colours the colour-shift effect cycles through
    pub const COLOR_COUNT: u8 = 8;

    /// Maximum number of particles alive at once
    pub const MAX_PARTICLES: usize = 256;
    /// Newest-first message log length
    pub const MAX_MESSAGES: usize = 5;
}

/// Score-per-minute over a game of `duration_ms`.
///
/// A zero-length game reports the raw score.
#[inline]
pub fn score_per_minute(score: u64, duration_ms: u64) -> u64 {
    let secs = duration_ms / 1000;
    if secs == 0 {
        score
    } else {
        (60.0 * score as f64 / secs as f64).round() as u64
    }
}
