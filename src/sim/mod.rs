//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as a `now_ms` argument
//! - Seeded RNG only, stored in the state
//! - Stable iteration order (catalogue order for baskets, effects, achievements)
//! - No rendering or platform dependencies

pub mod achievements;
pub mod catalog;
pub mod challenge;
pub mod combo;
pub mod effects;
pub mod particles;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use achievements::{Achievement, AchievementKind, Achievements};
pub use catalog::{Basket, FallingFruit, FruitKind};
pub use challenge::{Challenge, ChallengeKind, ChallengeOutcome};
pub use combo::ComboState;
pub use effects::{ActivePowerup, EffectKind, EffectSlot, EffectTable, PowerupKind};
pub use particles::{Particle, ParticleKind};
pub use rng::GameRng;
pub use snapshot::{GameSummary, Snapshot};
pub use state::{GameEvent, GamePhase, GameState, GameStats};
pub use tick::{Command, TickInput, autopilot, grant_powerup, tick};
