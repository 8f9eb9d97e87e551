//! Simulation clock and determinism hash.
//!
//! The world always advances in whole fixed steps. A presentation layer that
//! runs at a variable frame rate feeds elapsed wall time into
//! [`World::advance`](crate::world::World::advance), which accumulates it and
//! runs as many steps as fit, carrying the remainder forward.

use crate::fixed::{Fixed64, Ticks};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable clock state tracked by the world.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented by 1 for each simulation step.
    pub tick: Ticks,

    /// Accumulated wall time not yet consumed by a step.
    pub accumulator: Duration,
}

impl SimState {
    /// Create a new simulation state starting at tick 0.
    pub fn new() -> Self {
        Self {
            tick: 0,
            accumulator: Duration::ZERO,
        }
    }

    /// Add elapsed time and return how many whole steps of `step` length are
    /// now due. The remainder stays in the accumulator.
    pub fn accumulate(&mut self, elapsed: Duration, step: Duration) -> u64 {
        if step.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            due += 1;
        }
        due
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of one logic step at the given rate.
pub fn step_duration(tick_rate: u32) -> Duration {
    if tick_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(1_000_000_000 / tick_rate as u64)
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// Result of a `World::advance()` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceResult {
    /// Number of simulation steps actually executed.
    pub steps_run: u64,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for replay checks.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
