//! Fruit catalogue, baskets and the falling fruit

use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use crate::consts::SCREEN_WIDTH;
use crate::tuning::Tuning;

/// Fruit types. The set is fixed; `Star` is the special fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Banana,
    Orange,
    Grape,
    Watermelon,
    Strawberry,
    Star,
}

impl FruitKind {
    pub const ALL: [Self; 7] = [
        Self::Apple,
        Self::Banana,
        Self::Orange,
        Self::Grape,
        Self::Watermelon,
        Self::Strawberry,
        Self::Star,
    ];

    /// Every kind except the special one
    pub const REGULAR: [Self; 6] = [
        Self::Apple,
        Self::Banana,
        Self::Orange,
        Self::Grape,
        Self::Watermelon,
        Self::Strawberry,
    ];

    /// Base points for a catch
    pub fn points(&self) -> u64 {
        match self {
            Self::Apple => 10,
            Self::Banana => 15,
            Self::Orange => 12,
            Self::Grape => 8,
            Self::Watermelon => 20,
            Self::Strawberry => 18,
            Self::Star => 30,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Apple => "🍎",
            Self::Banana => "🍌",
            Self::Orange => "🍊",
            Self::Grape => "🍇",
            Self::Watermelon => "🍉",
            Self::Strawberry => "🍓",
            Self::Star => "🌟",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Apple => "Apple",
            Self::Banana => "Banana",
            Self::Orange => "Orange",
            Self::Grape => "Grape",
            Self::Watermelon => "Watermelon",
            Self::Strawberry => "Strawberry",
            Self::Star => "Star",
        }
    }

    pub fn is_special(&self) -> bool {
        *self == Self::Star
    }

    /// The red fruit tracked by the colour challenge
    pub fn is_red(&self) -> bool {
        *self == Self::Apple
    }
}

/// A basket sitting on the landing row. One per fruit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    /// Centre column
    pub x: i32,
    pub width: i32,
    pub kind: FruitKind,
}

impl Basket {
    /// Whether column `x` lands inside this basket
    pub fn covers(&self, x: i32) -> bool {
        let half = self.width / 2;
        x >= self.x - half && x <= self.x + half
    }

    /// Shift by `dx`, clamped so the whole basket stays on screen
    pub fn shift(&mut self, dx: i32) {
        let half = self.width / 2;
        self.x = (self.x + dx).clamp(half, SCREEN_WIDTH - 1 - half);
    }
}

/// Evenly spaced baskets, one per kind, in catalogue order
pub fn initial_baskets(width: i32) -> Vec<Basket> {
    let spacing = SCREEN_WIDTH / FruitKind::ALL.len() as i32;
    FruitKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| Basket {
            x: i as i32 * spacing + spacing / 2,
            width,
            kind,
        })
        .collect()
}

/// The single fruit in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingFruit {
    pub kind: FruitKind,
    /// Column (fixed at spawn, nudged only by magnet)
    pub x: i32,
    /// Row, real-valued; renderers truncate
    pub y: f32,
    /// Rows per tick
    pub vy: f32,
}

/// Choose the next fruit.
///
/// While `cooldown` is positive it is decremented, and a special pick is
/// re-rolled among the regular kinds. Spawning a special resets the cooldown.
pub fn spawn_fruit(rng: &mut GameRng, cooldown: &mut u32, level: u32, tuning: &Tuning) -> FallingFruit {
    let mut kind = FruitKind::ALL[rng.below(FruitKind::ALL.len())];
    if *cooldown > 0 {
        *cooldown -= 1;
        if kind.is_special() {
            kind = FruitKind::REGULAR[rng.below(FruitKind::REGULAR.len())];
        }
    }
    if kind.is_special() {
        *cooldown = tuning.special_cooldown_spawns;
    }

    let margin = tuning.spawn_margin;
    FallingFruit {
        kind,
        x: rng.range_i32(margin, SCREEN_WIDTH - margin),
        y: 0.0,
        vy: tuning.spawn_velocity(level),
    }
}
