//! Game settings and preferences
//!
//! Persisted as `settings.json` in the data directory, separate from scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Difficulty level. Each step shortens the frame period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Hell,
    Nightmare,
    Ultimate,
}

impl Difficulty {
    pub const ALL: [Self; 6] = [
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::Hell,
        Self::Nightmare,
        Self::Ultimate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Hell => "Hell",
            Difficulty::Nightmare => "Nightmare",
            Difficulty::Ultimate => "Ultimate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "hell" => Some(Difficulty::Hell),
            "nightmare" => Some(Difficulty::Nightmare),
            "ultimate" => Some(Difficulty::Ultimate),
            _ => None,
        }
    }

    /// Position in the speed formula (Easy = 0)
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded with high scores and the profile
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Particle effects (sparkles, explosions, trails)
    pub particles: bool,
    /// Fixed RNG seed; None draws one per session
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            difficulty: Difficulty::Easy,
            particles: true,
            seed: None,
        }
    }
}

impl Settings {
    /// File name inside the data directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Load settings from `dir`, using defaults when absent or corrupt
    pub fn load(dir: &Path) -> Self {
        persistence::load_or_default(&dir.join(Self::FILE_NAME))
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        persistence::save_json(&dir.join(Self::FILE_NAME), self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
