//! Deterministic pseudo-random sequences
//!
//! A 32-bit linear congruential generator. Values depend only on the seed, so
//! server-rendered and client-rendered markup place decorative elements at the
//! same coordinates.

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u32 = 12345;

// LCG constants (Numerical Recipes)
const A: u64 = 1664525;
const C: u64 = 1013904223;
const M: u64 = 1u64 << 32;

/// Seeded LCG producing floats in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicRandom {
    seed: u32,
}

impl DeterministicRandom {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Current generator state. Equal to the last value returned by
    /// [`next_u32`](Self::next_u32), or the construction seed before any draw.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the state and return it.
    pub fn next_u32(&mut self) -> u32 {
        self.seed = ((A * self.seed as u64 + C) % M) as u32;
        self.seed
    }

    /// Advance the state and return it scaled into `[0, 1)`.
    ///
    /// Not an [`Iterator`]: the sequence never ends.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.next_u32() as f64 / M as f64
    }

    /// `min + next() * (max - min)`.
    ///
    /// An inverted range (`max < min`) is not rejected; it maps into
    /// `(max, min]` with the same draw.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Restart from `seed`. The following draws repeat the sequence of a fresh
    /// generator built with the same seed.
    pub fn reset(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Restart from [`DEFAULT_SEED`].
    pub fn reset_default(&mut self) {
        self.reset(DEFAULT_SEED);
    }
}

impl Default for DeterministicRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
