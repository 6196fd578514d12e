//! Timed effects and power-ups
//!
//! Both are stored only as expiry timestamps. Remaining time is derived from
//! `now_ms` on demand, so there is a single source of truth and nothing to
//! drift between a countdown and a clock.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use crate::consts::COLOR_COUNT;

/// Randomly triggered game effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fruit falls 50% faster
    SpeedBoost,
    /// Cosmetic barrier around the baskets
    Shield,
    /// Catches are worth double
    DoubleScore,
    /// Fruit drifts toward its basket; close catches are worth double
    Magnet,
    /// Baskets are hidden from the player
    Invisibility,
    /// Fruit colour cycles every tick
    ColorShift,
}

impl EffectKind {
    pub const ALL: [Self; 6] = [
        Self::SpeedBoost,
        Self::Shield,
        Self::DoubleScore,
        Self::Magnet,
        Self::Invisibility,
        Self::ColorShift,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SpeedBoost => "Speed Boost",
            Self::Shield => "Shield",
            Self::DoubleScore => "Double Score",
            Self::Magnet => "Magnet",
            Self::Invisibility => "Invisibility",
            Self::ColorShift => "Color Shift",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::SpeedBoost => "💨",
            Self::Shield => "🛡️",
            Self::DoubleScore => "2️⃣X",
            Self::Magnet => "🧲",
            Self::Invisibility => "👻",
            Self::ColorShift => "🎨",
        }
    }
}

/// State of one effect kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSlot {
    pub kind: EffectKind,
    /// Set while active
    pub expires_at_ms: Option<u64>,
    pub activated_at_ms: u64,
    /// Colour-shift palette index, 0 while inactive
    pub color_index: u8,
}

impl EffectSlot {
    fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            expires_at_ms: None,
            activated_at_ms: 0,
            color_index: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.expires_at_ms.is_some()
    }

    /// Milliseconds left, 0 when inactive or expired
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms
            .map(|at| at.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    fn activate(&mut self, now_ms: u64, duration_ms: u64, color_index: u8) {
        self.activated_at_ms = now_ms;
        self.expires_at_ms = Some(now_ms.saturating_add(duration_ms.max(1)));
        self.color_index = color_index;
    }

    fn deactivate(&mut self) {
        self.expires_at_ms = None;
        self.color_index = 0;
    }
}

/// Fixed table with one slot per effect kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTable {
    slots: Vec<EffectSlot>,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self {
            slots: EffectKind::ALL.iter().map(|&k| EffectSlot::new(k)).collect(),
        }
    }
}

impl EffectTable {
    pub fn slots(&self) -> &[EffectSlot] {
        &self.slots
    }

    pub fn slot(&self, kind: EffectKind) -> Option<&EffectSlot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    /// Whether `kind` is active at `now_ms`
    pub fn is_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.slot(kind)
            .is_some_and(|s| s.remaining_ms(now_ms) > 0)
    }

    pub fn active(&self) -> impl Iterator<Item = &EffectSlot> {
        self.slots.iter().filter(|s| s.is_active())
    }

    /// Start (or restart) `kind` for `duration_ms`
    pub fn activate(&mut self, kind: EffectKind, now_ms: u64, duration_ms: u64, color_index: u8) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.kind == kind) {
            slot.activate(now_ms, duration_ms, color_index);
        }
    }

    /// Activate a uniformly chosen inactive slot. Returns the kind, or None
    /// when every slot is already running.
    pub fn activate_random_inactive(
        &mut self,
        rng: &mut GameRng,
        now_ms: u64,
        duration_ms: u64,
    ) -> Option<EffectKind> {
        let idle: Vec<EffectKind> = self
            .slots
            .iter()
            .filter(|s| !s.is_active())
            .map(|s| s.kind)
            .collect();
        let kind = rng.pick(&idle)?;
        let color = rng.below(COLOR_COUNT as usize) as u8;
        self.activate(kind, now_ms, duration_ms, color);
        Some(kind)
    }

    /// Expire finished slots and cycle colour-shift. Returns the kinds that ended.
    pub fn update(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let mut ended = Vec::new();
        for slot in &mut self.slots {
            if !slot.is_active() {
                continue;
            }
            if slot.remaining_ms(now_ms) == 0 {
                slot.deactivate();
                ended.push(slot.kind);
            } else if slot.kind == EffectKind::ColorShift {
                slot.color_index = (slot.color_index + 1) % COLOR_COUNT;
            }
        }
        ended
    }

    /// Switch everything off
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    DoublePoints,
    SlowMotion,
    ExtraLife,
    Magnet,
    ScoreBoost,
    FreezeTime,
}

impl PowerupKind {
    pub const ALL: [Self; 6] = [
        Self::DoublePoints,
        Self::SlowMotion,
        Self::ExtraLife,
        Self::Magnet,
        Self::ScoreBoost,
        Self::FreezeTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DoublePoints => "Double Points",
            Self::SlowMotion => "Slow Motion",
            Self::ExtraLife => "Extra Life",
            Self::Magnet => "Magnet",
            Self::ScoreBoost => "Score Boost",
            Self::FreezeTime => "Freeze Time",
        }
    }

    /// One-shot power-ups apply at grant time and expire immediately
    pub fn is_instant(&self) -> bool {
        matches!(self, Self::ExtraLife | Self::ScoreBoost)
    }
}

/// The power-up currently held
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerup {
    pub kind: PowerupKind,
    pub granted_at_ms: u64,
    pub expires_at_ms: u64,
}

impl ActivePowerup {
    pub fn new(kind: PowerupKind, now_ms: u64, duration_ms: u64) -> Self {
        Self {
            kind,
            granted_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(duration_ms),
        }
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_equivalence(table: &EffectTable, now: u64) {
        for slot in table.slots() {
            assert_eq!(slot.is_active(), slot.remaining_ms(now) > 0, "{:?}", slot.kind);
        }
    }

    #[test]
    fn test_effect_expires_after_window() {
        let mut table = EffectTable::default();
        table.activate(EffectKind::Shield, 1_000, 10_000, 0);
        assert!(table.is_active(EffectKind::Shield, 5_000));
        assert_eq!(table.slot(EffectKind::Shield).unwrap().remaining_ms(5_000), 6_000);

        assert!(table.update(10_999).is_empty());
        assert_equivalence(&table, 10_999);

        let ended = table.update(11_000);
        assert_eq!(ended, vec![EffectKind::Shield]);
        assert!(!table.is_active(EffectKind::Shield, 11_000));
        assert_equivalence(&table, 11_000);
    }

    #[test]
    fn test_color_shift_cycles_and_resets() {
        let mut table = EffectTable::default();
        table.activate(EffectKind::ColorShift, 0, 10_000, 6);
        table.update(1);
        assert_eq!(table.slot(EffectKind::ColorShift).unwrap().color_index, 7);
        table.update(2);
        assert_eq!(table.slot(EffectKind::ColorShift).unwrap().color_index, 0);
        table.update(10_000);
        let slot = table.slot(EffectKind::ColorShift).unwrap();
        assert!(!slot.is_active());
        assert_eq!(slot.color_index, 0);
    }

    #[test]
    fn test_random_activation_only_picks_idle_slots() {
        let mut table = EffectTable::default();
        let mut rng = GameRng::new(9);
        let mut seen = Vec::new();
        for _ in 0..EffectKind::ALL.len() {
            let kind = table.activate_random_inactive(&mut rng, 0, 10_000).unwrap();
            assert!(!seen.contains(&kind));
            seen.push(kind);
        }
        assert_eq!(table.activate_random_inactive(&mut rng, 0, 10_000), None);
    }

    #[test]
    fn test_powerup_expiry() {
        let p = ActivePowerup::new(PowerupKind::FreezeTime, 2_000, 5_000);
        assert_eq!(p.remaining_ms(3_000), 4_000);
        assert!(!p.is_expired(6_999));
        assert!(p.is_expired(7_000));
        assert!(PowerupKind::ExtraLife.is_instant());
        assert!(!PowerupKind::FreezeTime.is_instant());
    }
}
