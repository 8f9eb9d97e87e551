//! Deterministic PRNG for simulation use (map generation, cosmetic jitter).
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, excellent
//! statistical properties, and trivially serializable.

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms, so a seed fully reproduces a world.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `[0, bound)`. Returns 0 for a zero bound.
    pub fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + self.below(span) as i32
    }

    /// Returns `true` with the given probability (Fixed64 in [0, 1]).
    ///
    /// - probability <= 0 always returns false
    /// - probability >= 1 always returns true
    pub fn chance(&mut self, probability: Fixed64) -> bool {
        if probability <= Fixed64::ZERO {
            return false;
        }
        if probability >= Fixed64::from_num(1) {
            return true;
        }
        // For p in (0,1) the raw Q32.32 bits are the fraction scaled to
        // [0, 2^32); compare against a uniform u32.
        let upper = (self.next_u64() >> 32) as u32;
        (upper as u64) < probability.to_bits() as u64
    }

    /// Symmetric offset in `[-amplitude, amplitude]`.
    pub fn jitter(&mut self, amplitude: Fixed64) -> Fixed64 {
        let upper = (self.next_u64() >> 32) as u32;
        let unit = Fixed64::from_bits(upper as i64);
        (unit * 2 - Fixed64::from_num(1)) * amplitude
    }

    /// Get the internal state (for hashing).
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            let v = rng.range_inclusive(3, 60);
            assert!((3..=60).contains(&v));
        }
        assert_eq!(rng.range_inclusive(5, 5), 5);
        assert_eq!(rng.range_inclusive(9, 2), 9);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SimRng::new(999);
        for _ in 0..100 {
            assert!(!rng.chance(Fixed64::ZERO));
            assert!(rng.chance(Fixed64::from_num(1)));
        }
    }

    #[test]
    fn chance_half_roughly_balanced() {
        let mut rng = SimRng::new(12345);
        let half = Fixed64::from_num(0.5);
        let hits = (0..10_000).filter(|_| rng.chance(half)).count();
        assert!((4000..=6000).contains(&hits), "expected ~5000, got {hits}");
    }

    #[test]
    fn jitter_within_amplitude() {
        let mut rng = SimRng::new(3);
        let amp = Fixed64::from_num(0.125);
        for _ in 0..500 {
            let j = rng.jitter(amp);
            assert!(j >= -amp && j <= amp, "jitter {j} out of range");
        }
    }

    #[test]
    fn serialization_round_trip() {
        let mut rng = SimRng::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SimRng = serde_json::from_str(&json).unwrap();
        assert_eq!(rng, restored);
        for _ in 0..10 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
