//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (monotonic clock for real play, manual clock for tests and replays)
//! - Input (raw key to engine command)

use std::cell::Cell;
use std::time::Instant;

use crate::sim::Command;

/// Millisecond time source handed to the simulation
pub trait Clock {
    /// Milliseconds since the clock's epoch. Must never go backwards.
    fn now_ms(&self) -> u64;
}

/// Monotonic clock anchored at construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Map a key press to an engine command. Case-insensitive; unknown keys are ignored.
pub fn command_for_key(key: char) -> Option<Command> {
    match key.to_ascii_lowercase() {
        'a' => Some(Command::MoveLeft),
        'd' => Some(Command::MoveRight),
        'p' => Some(Command::PauseToggle),
        'q' => Some(Command::Quit),
        c @ '1'..='9' => c.to_digit(10).map(|n| Command::MenuSelect(n as u8)),
        _ => None,
    }
}
