//! Seedable random stream threaded through every generation phase.
//!
//! A run owns exactly one stream. Every consumer (automaton stages, noise
//! seeding, color jitter) draws from it in a fixed order, so a seed fully
//! determines the output.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic pseudo-random stream backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct RandomStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// The seed this stream was last (re)initialized with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_float(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform integer in `[lo, hi]` (inclusive). Returns `lo` if the range is empty.
    pub fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` if the range is empty.
    pub fn next_float_range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Raw 32 bits, used to seed noise generators.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.gen::<u32>()
    }
}
