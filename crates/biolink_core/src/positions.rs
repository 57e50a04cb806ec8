//! Hydration-safe placement for decorative elements
//!
//! Every element index gets its own generator seeded with `base_seed + index`.
//! Record `i` therefore depends on `(base_seed, i)` only: growing or shrinking
//! the element count never moves the elements that were already placed.

use serde::{Deserialize, Serialize};

use crate::random::{DeterministicRandom, DEFAULT_SEED};

/// Placement and animation parameters for one decorative element.
///
/// Field order is the draw order. Each field consumes exactly one draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticlePosition {
    /// Horizontal placement, percent of container width `[0, 100)`.
    pub x: f64,
    /// Vertical placement, percent of container height `[0, 100)`.
    pub y: f64,
    /// Horizontal drift amplitude `[-20, 20)`.
    pub animation_x: f64,
    /// Vertical drift amplitude `[-20, 20)`.
    pub animation_y: f64,
    /// Animation start delay in seconds `[0, 2)`.
    pub delay: f64,
    /// `[0.8, 1.2)`
    pub scale: f64,
    /// Degrees `[0, 180)`.
    pub rotation: f64,
    /// Pixel width `[250, 350)`.
    pub width: f64,
}

impl ParticlePosition {
    /// Draw one record from `rng`.
    pub fn draw(rng: &mut DeterministicRandom) -> Self {
        Self {
            x: rng.range(0.0, 100.0),
            y: rng.range(0.0, 100.0),
            animation_x: rng.range(-20.0, 20.0),
            animation_y: rng.range(-20.0, 20.0),
            delay: rng.range(0.0, 2.0),
            scale: rng.range(0.8, 1.2),
            rotation: rng.range(0.0, 180.0),
            width: rng.range(250.0, 350.0),
        }
    }

    /// Record for element `index` under `base_seed`.
    pub fn for_index(index: u32, base_seed: u32) -> Self {
        let mut rng = DeterministicRandom::new(base_seed.wrapping_add(index));
        Self::draw(&mut rng)
    }
}

/// Lazy, restartable sequence of [`ParticlePosition`] records.
#[derive(Debug, Clone)]
pub struct Positions {
    base_seed: u32,
    next: u32,
    end: u32,
}

impl Positions {
    pub fn new(count: u32, base_seed: u32) -> Self {
        Self {
            base_seed,
            next: 0,
            end: count,
        }
    }
}

impl Iterator for Positions {
    type Item = ParticlePosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let position = ParticlePosition::for_index(self.next, self.base_seed);
        self.next += 1;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

/// Eagerly materialize `count` records for `base_seed`.
pub fn create_deterministic_positions(count: u32, base_seed: u32) -> Vec<ParticlePosition> {
    Positions::new(count, base_seed).collect()
}

/// [`create_deterministic_positions`] with [`DEFAULT_SEED`].
pub fn default_positions(count: u32) -> Vec<ParticlePosition> {
    create_deterministic_positions(count, DEFAULT_SEED)
}
