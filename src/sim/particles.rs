//! Transient particles for catch/miss feedback
//!
//! Particles never affect gameplay, but their jitter draws from the game RNG,
//! so they are part of the deterministic state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use crate::consts::{COLOR_COUNT, MAX_PARTICLES, SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Sparkle,
    Explosion,
    Trail,
    ScorePopup,
}

impl ParticleKind {
    pub fn lifetime_ms(&self) -> u64 {
        match self {
            Self::Sparkle => 500,
            Self::Explosion => 300,
            Self::Trail => 400,
            Self::ScorePopup => 200,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Sparkle => "*",
            Self::Explosion => ".",
            Self::Trail => "+",
            Self::ScorePopup => "+",
        }
    }
}

/// Terminal palette indices used for particle colours
pub mod palette {
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Cells per tick
    pub vel: Vec2,
    /// Palette index 0..8
    pub color: u8,
    pub expires_at_ms: u64,
}

impl Particle {
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }

    fn on_screen(&self) -> bool {
        self.pos.x >= 0.0
            && self.pos.x < SCREEN_WIDTH as f32
            && self.pos.y >= 0.0
            && self.pos.y < SCREEN_HEIGHT as f32
    }
}

/// Random step in `{-spread..=spread} * scale`
fn jitter(rng: &mut GameRng, spread: i32, scale: f32) -> f32 {
    rng.range_i32(-spread, spread + 1) as f32 * scale
}

/// Emit `count` particles at `origin`. `color` None picks a random palette entry.
pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut GameRng,
    origin: Vec2,
    kind: ParticleKind,
    count: usize,
    color: Option<u8>,
    now_ms: u64,
) {
    for _ in 0..count {
        if particles.len() >= MAX_PARTICLES {
            particles.remove(0);
        }
        let vel = match kind {
            ParticleKind::Sparkle => Vec2::new(jitter(rng, 1, 0.5), jitter(rng, 1, 0.5)),
            ParticleKind::Explosion => Vec2::new(jitter(rng, 2, 0.5), jitter(rng, 2, 0.5)),
            ParticleKind::Trail => Vec2::new(jitter(rng, 1, 0.3), jitter(rng, 1, 0.3)),
            ParticleKind::ScorePopup => Vec2::new(0.0, -0.5),
        };
        let color = match color {
            Some(c) => c,
            None => rng.below(COLOR_COUNT as usize) as u8,
        };
        particles.push(Particle {
            kind,
            pos: origin,
            vel,
            color,
            expires_at_ms: now_ms + kind.lifetime_ms(),
        });
    }
}

/// Move every particle one step and drop the expired or off-screen ones
pub fn update(particles: &mut Vec<Particle>, now_ms: u64) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
    }
    particles.retain(|p| p.remaining_ms(now_ms) > 0 && p.on_screen());
}
