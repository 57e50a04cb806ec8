//! Biolink Services Layer
//!
//! Client-side plumbing for pointer-driven effects: scheduling, rate limiting,
//! pointer tracking and settings.

pub mod input;
pub mod scheduler;
pub mod settings;
pub mod throttle;

pub use input::{PointerEvent, PointerTracker, TrackerPhase};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};
pub use settings::{Settings, SettingsError};
pub use throttle::{Debounce, Throttle};
