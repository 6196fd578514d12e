//! High score leaderboard and player profile
//!
//! Both are persisted as JSON in the data directory and fed from the
//! end-of-game summary through `ScoreSink`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};
use crate::sim::GameSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Most recent games remembered regardless of score
pub const MAX_RECENT: usize = 5;

/// Receives finished games. Implementations must not fail the caller.
pub trait ScoreSink {
    fn record(&mut self, player: &str, summary: &GameSummary, timestamp_ms: u64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    /// Sorted by descending score
    pub entries: Vec<HighScoreEntry>,
    /// Newest first
    pub recent: Vec<HighScoreEntry>,
}

impl HighScores {
    pub const FILE_NAME: &'static str = "highscores.json";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score. Always lands in `recent`; returns the table rank
    /// (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        self.recent.insert(0, entry.clone());
        self.recent.truncate(MAX_RECENT);

        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties rank below existing entries
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load(dir: &Path) -> Self {
        let scores: Self = persistence::load_or_default(&dir.join(Self::FILE_NAME));
        log::debug!("{} high scores on file", scores.entries.len());
        scores
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        persistence::save_json(&dir.join(Self::FILE_NAME), self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn record(&mut self, player: &str, summary: &GameSummary, timestamp_ms: u64) {
        let rank = self.add_score(HighScoreEntry {
            name: player.to_string(),
            score: summary.score,
            level: summary.level,
            timestamp_ms,
        });
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, summary.score);
        }
    }
}

/// Lifetime totals for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub games_played: u64,
    pub total_score: u64,
    pub best_score: u64,
    pub highest_level: u32,
    pub fruits_caught: u64,
    /// Achievement names, in unlock order
    pub achievements: Vec<String>,
}

impl Profile {
    pub const FILE_NAME: &'static str = "profile.json";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn average_score(&self) -> u64 {
        self.total_score.checked_div(self.games_played).unwrap_or(0)
    }

    pub fn load(dir: &Path) -> Self {
        persistence::load_or_default(&dir.join(Self::FILE_NAME))
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        persistence::save_json(&dir.join(Self::FILE_NAME), self)
    }
}

impl ScoreSink for Profile {
    fn record(&mut self, player: &str, summary: &GameSummary, _timestamp_ms: u64) {
        if self.name.is_empty() {
            self.name = player.to_string();
        }
        self.games_played += 1;
        self.total_score += summary.score;
        self.best_score = self.best_score.max(summary.score);
        self.highest_level = self.highest_level.max(summary.level);
        self.fruits_caught += summary.caught;
        for kind in &summary.new_achievements {
            let name = kind.name().to_string();
            if !self.achievements.contains(&name) {
                self.achievements.push(name);
            }
        }
    }
}

/// Format how long ago `timestamp_ms` was, relative to `now_ms`
pub fn format_age(timestamp_ms: u64, now_ms: u64) -> String {
    let diff_mins = now_ms.saturating_sub(timestamp_ms) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", diff_days)
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}
