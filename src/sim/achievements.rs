//! Achievement catalogue and evaluator
//!
//! Unlocks are a one-way latch. Each evaluation only tests locked entries,
//! and `SuperPlayer` is always tested after everything else so that an
//! achievement unlocked earlier in the same pass counts toward it.

use serde::{Deserialize, Serialize};

use super::catalog::FruitKind;
use super::state::GameStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementKind {
    RookieCollector,
    BasketMaster,
    FruitExpert,
    ProPlayer,
    PerfectGame,
    FruitMaster,
    ComboKing,
    LevelChallenger,
    SuperPlayer,
    FruitCollector,
    PowerMaster,
}

impl AchievementKind {
    /// Catalogue order (display order)
    pub const ALL: [Self; 11] = [
        Self::RookieCollector,
        Self::BasketMaster,
        Self::FruitExpert,
        Self::ProPlayer,
        Self::PerfectGame,
        Self::FruitMaster,
        Self::ComboKing,
        Self::LevelChallenger,
        Self::SuperPlayer,
        Self::FruitCollector,
        Self::PowerMaster,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RookieCollector => "Rookie Collector",
            Self::BasketMaster => "Basket Master",
            Self::FruitExpert => "Fruit Expert",
            Self::ProPlayer => "Pro Player",
            Self::PerfectGame => "Perfect Game",
            Self::FruitMaster => "Fruit Master",
            Self::ComboKing => "Combo King",
            Self::LevelChallenger => "Level Challenger",
            Self::SuperPlayer => "Super Player",
            Self::FruitCollector => "Fruit Collector",
            Self::PowerMaster => "Power Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::RookieCollector => "Play your first game",
            Self::BasketMaster => "Reach 10 combo",
            Self::FruitExpert => "Catch 100 fruits",
            Self::ProPlayer => "Reach Level 10",
            Self::PerfectGame => "Complete a game without missing",
            Self::FruitMaster => "Catch 500 fruits",
            Self::ComboKing => "Reach 20 combo",
            Self::LevelChallenger => "Reach Level 50",
            Self::SuperPlayer => "Unlock all achievements",
            Self::FruitCollector => "Collect all fruit types",
            Self::PowerMaster => "Collect 20 power-ups",
        }
    }

    pub fn requirement(&self) -> u64 {
        match self {
            Self::RookieCollector => 1,
            Self::BasketMaster => 10,
            Self::FruitExpert => 100,
            Self::ProPlayer => 10,
            Self::PerfectGame => 1,
            Self::FruitMaster => 500,
            Self::ComboKing => 20,
            Self::LevelChallenger => 50,
            Self::SuperPlayer => Self::ALL.len() as u64 - 1,
            Self::FruitCollector => FruitKind::REGULAR.len() as u64,
            Self::PowerMaster => 20,
        }
    }
}

/// Values the predicates read
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub stats: &'a GameStats,
    pub max_combo: u32,
    pub level: u32,
    /// True only for the end-of-game evaluation
    pub game_ended: bool,
}

impl AchievementKind {
    /// Predicate for everything except `SuperPlayer`, which depends on the table
    fn is_met(&self, p: &Progress<'_>) -> bool {
        let req = self.requirement();
        match self {
            Self::RookieCollector => p.stats.games_played as u64 >= req,
            Self::BasketMaster | Self::ComboKing => p.max_combo as u64 >= req,
            Self::FruitExpert | Self::FruitMaster => p.stats.caught >= req,
            Self::ProPlayer | Self::LevelChallenger => p.level as u64 >= req,
            Self::PerfectGame => p.game_ended && p.stats.missed == 0 && p.stats.caught > 0,
            Self::FruitCollector => FruitKind::REGULAR
                .iter()
                .all(|k| p.stats.caught_by_kind.get(k).copied().unwrap_or(0) > 0),
            Self::PowerMaster => p.stats.powerups_collected >= req,
            Self::SuperPlayer => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked: bool,
}

/// The full catalogue with unlock latches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    entries: Vec<Achievement>,
}

impl Default for Achievements {
    fn default() -> Self {
        Self {
            entries: AchievementKind::ALL
                .iter()
                .map(|&kind| Achievement {
                    kind,
                    unlocked: false,
                })
                .collect(),
        }
    }
}

impl Achievements {
    pub fn entries(&self) -> &[Achievement] {
        &self.entries
    }

    pub fn is_unlocked(&self, kind: AchievementKind) -> bool {
        self.entries.iter().any(|a| a.kind == kind && a.unlocked)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = AchievementKind> + '_ {
        self.entries.iter().filter(|a| a.unlocked).map(|a| a.kind)
    }

    /// Test every locked achievement. Returns the ones unlocked by this call,
    /// in catalogue order with `SuperPlayer` last.
    pub fn evaluate(&mut self, progress: &Progress<'_>) -> Vec<AchievementKind> {
        let mut newly = Vec::new();
        for entry in self
            .entries
            .iter_mut()
            .filter(|a| !a.unlocked && a.kind != AchievementKind::SuperPlayer)
        {
            if entry.kind.is_met(progress) {
                entry.unlocked = true;
                newly.push(entry.kind);
            }
        }

        let others_done = self
            .entries
            .iter()
            .filter(|a| a.kind != AchievementKind::SuperPlayer)
            .all(|a| a.unlocked);
        if others_done {
            if let Some(meta) = self
                .entries
                .iter_mut()
                .find(|a| a.kind == AchievementKind::SuperPlayer && !a.unlocked)
            {
                meta.unlocked = true;
                newly.push(meta.kind);
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(stats: &GameStats, max_combo: u32, level: u32, game_ended: bool) -> Progress<'_> {
        Progress {
            stats,
            max_combo,
            level,
            game_ended,
        }
    }

    #[test]
    fn test_fruit_expert_threshold() {
        let mut a = Achievements::default();
        let mut stats = GameStats::default();
        stats.caught = 99;
        assert!(a.evaluate(&progress(&stats, 0, 1, false)).is_empty());
        stats.caught = 100;
        assert_eq!(
            a.evaluate(&progress(&stats, 0, 1, false)),
            vec![AchievementKind::FruitExpert]
        );
    }

    #[test]
    fn test_unlock_is_a_latch() {
        let mut a = Achievements::default();
        let mut stats = GameStats::default();
        stats.caught = 150;
        a.evaluate(&progress(&stats, 12, 1, false));
        assert!(a.is_unlocked(AchievementKind::BasketMaster));

        // Counters going back down never re-lock
        let fresh = GameStats::default();
        assert!(a.evaluate(&progress(&fresh, 0, 1, false)).is_empty());
        assert!(a.is_unlocked(AchievementKind::BasketMaster));
        assert!(a.is_unlocked(AchievementKind::FruitExpert));
    }

    #[test]
    fn test_perfect_game_only_at_end() {
        let mut a = Achievements::default();
        let mut stats = GameStats::default();
        stats.caught = 3;
        a.evaluate(&progress(&stats, 3, 1, false));
        assert!(!a.is_unlocked(AchievementKind::PerfectGame));
        a.evaluate(&progress(&stats, 3, 1, true));
        assert!(a.is_unlocked(AchievementKind::PerfectGame));
    }

    #[test]
    fn test_fruit_collector_needs_every_regular_kind() {
        let mut a = Achievements::default();
        let mut stats = GameStats::default();
        for kind in &FruitKind::REGULAR[..5] {
            stats.caught_by_kind.insert(*kind, 1);
        }
        stats.caught_by_kind.insert(FruitKind::Star, 4);
        a.evaluate(&progress(&stats, 0, 1, false));
        assert!(!a.is_unlocked(AchievementKind::FruitCollector));
        stats.caught_by_kind.insert(FruitKind::Strawberry, 1);
        a.evaluate(&progress(&stats, 0, 1, false));
        assert!(a.is_unlocked(AchievementKind::FruitCollector));
    }

    #[test]
    fn test_super_player_in_same_pass() {
        let mut a = Achievements::default();
        let mut stats = GameStats::default();
        stats.games_played = 1;
        stats.caught = 500;
        stats.powerups_collected = 20;
        for kind in FruitKind::REGULAR {
            stats.caught_by_kind.insert(kind, 1);
        }
        let newly = a.evaluate(&progress(&stats, 20, 50, true));
        assert_eq!(newly.len(), AchievementKind::ALL.len());
        assert_eq!(newly.last(), Some(&AchievementKind::SuperPlayer));
    }
}
