//! Rotating mini-challenges and the bonus/challenge interval timers

use serde::{Deserialize, Serialize};

use super::catalog::FruitKind;
use super::rng::GameRng;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Catch `target` fruits before the timeout
    Speed,
    /// Reach a combo of `target`
    Combo,
    /// Catch `target` fruits; every miss lowers the target by one
    Accuracy,
    /// Stay alive `target` seconds
    Survival,
    /// Catch `target` red fruits in a row
    Color,
}

impl ChallengeKind {
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::Combo,
        Self::Accuracy,
        Self::Survival,
        Self::Color,
    ];

    pub fn default_target(&self) -> i64 {
        match self {
            Self::Speed => 50,
            Self::Combo => 30,
            Self::Accuracy => 100,
            Self::Survival => 120,
            Self::Color => 20,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Speed => "Catch 50 fruits in under 60 seconds",
            Self::Combo => "Achieve a combo of 30",
            Self::Accuracy => "Catch 100 fruits without missing more than 5",
            Self::Survival => "Survive for 120 seconds",
            Self::Color => "Catch 20 red fruits in a row",
        }
    }
}

/// How an active challenge ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub kind: ChallengeKind,
    /// Signed: accuracy misses can drive it to zero or below
    pub target: i64,
    pub progress: i64,
    /// Set while active
    pub started_at_ms: Option<u64>,
}

impl Challenge {
    pub fn new(kind: ChallengeKind) -> Self {
        Self {
            kind,
            target: kind.default_target(),
            progress: 0,
            started_at_ms: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Begin tracking. The target is left as is, so accuracy misses from an
    /// earlier run of this slot still count against it.
    pub fn activate(&mut self, now_ms: u64) {
        self.progress = 0;
        self.started_at_ms = Some(now_ms);
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        self.started_at_ms
            .map(|start| now_ms.saturating_sub(start))
            .unwrap_or(0)
    }

    pub fn on_catch(&mut self, kind: FruitKind, combo: u32) {
        if !self.is_active() {
            return;
        }
        match self.kind {
            ChallengeKind::Speed | ChallengeKind::Accuracy => self.progress += 1,
            ChallengeKind::Combo => self.progress = self.progress.max(combo as i64),
            ChallengeKind::Color => {
                if kind.is_red() {
                    self.progress += 1;
                } else {
                    self.progress = 0;
                }
            }
            ChallengeKind::Survival => {}
        }
    }

    pub fn on_miss(&mut self) {
        if self.is_active() && self.kind == ChallengeKind::Accuracy {
            self.target -= 1;
        }
    }

    /// Check completion, then the timeout. Deactivates on either outcome.
    pub fn evaluate(&mut self, now_ms: u64, timeout_ms: u64) -> Option<ChallengeOutcome> {
        if !self.is_active() {
            return None;
        }
        let elapsed = self.elapsed_ms(now_ms);
        let completed = match self.kind {
            ChallengeKind::Survival => {
                self.progress = (elapsed / 1000) as i64;
                self.progress >= self.target
            }
            _ => self.progress >= self.target,
        };

        if completed {
            self.started_at_ms = None;
            Some(ChallengeOutcome::Completed)
        } else if self.kind != ChallengeKind::Survival && elapsed >= timeout_ms {
            self.started_at_ms = None;
            Some(ChallengeOutcome::Failed)
        } else {
            None
        }
    }
}

/// Draw the starting pool (kinds may repeat)
pub fn random_pool(rng: &mut GameRng, slots: usize) -> Vec<Challenge> {
    (0..slots)
        .map(|_| Challenge::new(ChallengeKind::ALL[rng.below(ChallengeKind::ALL.len())]))
        .collect()
}

/// Interval timers for bonus mode and challenge rotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    pub last_bonus_ms: u64,
    pub last_challenge_ms: u64,
    /// Set while bonus mode runs
    pub bonus_until_ms: Option<u64>,
}

impl Scheduler {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_bonus_ms: now_ms,
            last_challenge_ms: now_ms,
            bonus_until_ms: None,
        }
    }

    pub fn bonus_active(&self, now_ms: u64) -> bool {
        self.bonus_until_ms.is_some_and(|until| now_ms < until)
    }

    /// True once per bonus interval; restarts the interval and opens bonus mode
    pub fn take_bonus(&mut self, now_ms: u64, tuning: &Tuning) -> bool {
        if now_ms.saturating_sub(self.last_bonus_ms) < tuning.bonus_interval_ms {
            return false;
        }
        self.last_bonus_ms = now_ms;
        self.bonus_until_ms = Some(now_ms.saturating_add(tuning.bonus_duration_ms));
        true
    }

    /// True once per challenge interval; restarts the interval
    pub fn take_challenge(&mut self, now_ms: u64, tuning: &Tuning) -> bool {
        if now_ms.saturating_sub(self.last_challenge_ms) < tuning.challenge_interval_ms {
            return false;
        }
        self.last_challenge_ms = now_ms;
        true
    }

    /// Close bonus mode once its window has passed. Returns true when it just ended.
    pub fn expire_bonus(&mut self, now_ms: u64) -> bool {
        match self.bonus_until_ms {
            Some(until) if now_ms >= until => {
                self.bonus_until_ms = None;
                true
            }
            _ => false,
        }
    }
}
