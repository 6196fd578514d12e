//! Combo and streak tracking

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    /// Catches since the last miss
    pub combo: u32,
    /// Consecutive catches driving the multiplier
    pub streak: u32,
    pub max_combo: u32,
    pub longest_streak: u32,
    /// Always `tuning.multiplier_for(streak)`
    pub multiplier: u32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            combo: 0,
            streak: 0,
            max_combo: 0,
            longest_streak: 0,
            multiplier: 1,
        }
    }
}

impl ComboState {
    /// Register a catch and return the multiplier that applies to it.
    ///
    /// The streak is counted first, so the catch that reaches a tier is
    /// already scored at that tier.
    pub fn record_catch(&mut self, tuning: &Tuning) -> u32 {
        self.combo += 1;
        self.streak += 1;
        self.multiplier = tuning.multiplier_for(self.streak);
        self.max_combo = self.max_combo.max(self.combo);
        self.longest_streak = self.longest_streak.max(self.streak);
        self.multiplier
    }

    /// A miss drops everything back to baseline
    pub fn record_miss(&mut self) {
        self.combo = 0;
        self.streak = 0;
        self.multiplier = 1;
    }

    /// Start-of-game reset (max combo included)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
