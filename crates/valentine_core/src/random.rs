//! Seedable random source.
//!
//! Every random decision in the engine (spawn positions, palette picks,
//! multi-burst rolls, jitter) goes through [`RandomSource`]. Given the same
//! seed, a session produces exactly the same particles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform random numbers.
pub trait RandomSource {
    /// Returns a uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Returns a uniform sample in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        let value = min + self.next_unit() * (max - min);
        // Rounding can land exactly on `max` for samples just below 1.
        if value < max || max <= min {
            value
        } else {
            next_down(max)
        }
    }

    /// Returns a uniform index in `[0, len)`. `len` must be non-zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

/// Largest `f32` strictly below `x` (finite `x`).
fn next_down(x: f32) -> f32 {
    if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Random seed for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed(u64);

impl Seed {
    /// Creates a new seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed, so the two animations of one page
    /// do not replay the same stream.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(0x1402_2026_dead_beef)
    }
}

/// ChaCha8-backed [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a random source from a seed.
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.value()),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}
