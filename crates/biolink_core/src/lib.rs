//! Biolink Core
//!
//! Deterministic building blocks shared by server rendering and the client:
//! - Seeded LCG ([`random`])
//! - Hydration-safe element placement ([`positions`])
//! - Pointer math and frame timing

pub mod math;
pub mod positions;
pub mod random;
pub mod time;

pub use glam;
pub use positions::{create_deterministic_positions, ParticlePosition, Positions};
pub use random::{DeterministicRandom, DEFAULT_SEED};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
