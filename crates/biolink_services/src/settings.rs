//! Settings management

use std::path::{Path, PathBuf};
use std::time::Duration;

use biolink_core::positions::{create_deterministic_positions, ParticlePosition};
use biolink_core::random::DEFAULT_SEED;
use biolink_core::time::{millis, DEFAULT_THROTTLE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::DEFAULT_JITTER_THRESHOLD;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Landing page settings. Every section falls back to its defaults, so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracker: TrackerSettings,
    pub particles: ParticleSettings,
    pub motion: MotionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub throttle_ms: u64,
    pub jitter_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count: u32,
    pub base_seed: u32,
}

/// Device capabilities reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub reduced_motion: bool,
    pub touch_device: bool,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}

impl TrackerSettings {
    pub fn throttle(&self) -> Duration {
        millis(self.throttle_ms)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            jitter_threshold: DEFAULT_JITTER_THRESHOLD,
        }
    }
}

impl ParticleSettings {
    pub fn positions(&self) -> Vec<ParticlePosition> {
        create_deterministic_positions(self.count, self.base_seed)
    }
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: 20,
            base_seed: DEFAULT_SEED,
        }
    }
}

impl MotionSettings {
    /// Custom cursor needs a mouse and full motion.
    pub fn should_show_cursor(&self) -> bool {
        !self.touch_device && !self.reduced_motion
    }

    /// Parallax tracking only needs a mouse.
    pub fn should_track_pointer(&self) -> bool {
        !self.touch_device
    }
}
