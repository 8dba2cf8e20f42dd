//! Random number generation.
//!
//! The pipeline uses two distinct generators, per spec.md §9: a
//! cryptographically-irrelevant LCG for scribble jitter (seeded by line
//! index, deterministic by construction) and a seedable general-purpose
//! PRNG for k-means initialization and Poisson-disk sampling. Both are
//! deterministic given a fixed seed so the pipeline as a whole is
//! reproducible.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed shared by k-means initialization and Poisson-disk sampling for one
/// pipeline invocation. Defaults to a fixed constant for reproducibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSeed(pub u64);

impl Default for PipelineSeed {
    fn default() -> Self {
        Self(0x5EED_C0DE)
    }
}

impl PipelineSeed {
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

/// Minimal linear congruential generator used for per-copy scribble jitter,
/// matching spec.md §4.7 exactly: `state = state*1664525 + 1013904223 mod 2^32`.
#[derive(Debug, Clone, Copy)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seed the generator with `seed` (the copy index, per spec.md §4.7).
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the generator and return the new raw state.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1664525)
            .wrapping_add(1013904223);
        self.state
    }

    /// Next value in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Next value in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}
