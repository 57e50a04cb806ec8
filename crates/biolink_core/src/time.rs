//! Frame timing constants
//!
//! Pointer effects are paced against a 60Hz display refresh

use std::time::Duration;

/// Nominal display refresh rate.
pub const FRAME_RATE_HZ: u32 = 60;
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Default minimum spacing between pointer dispatches (~60fps).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(16);

/// Convert a millisecond setting into a [`Duration`].
pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
