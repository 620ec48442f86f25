//! Cadence configuration system
//!
//! Loads scheduler and clock settings from `cadence.toml`, with environment
//! variables taking precedence.

use cadence_core::CurvePreset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CadenceConfig {
    /// Animation timing defaults
    pub timing: TimingConfig,
    /// Frame clock settings
    pub clock: ClockConfig,
    /// Event queue settings
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Curve used when an animation is built without one
    pub default_curve: CurvePreset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Target frames per second
    pub frame_rate: f64,
    /// Advance by exactly one frame interval per tick instead of wall time
    pub fixed_step: bool,
    /// Stop a run after this many frames
    pub max_frames: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EventsConfig {
    /// Record `PositionChanged` events in the queue, not only for listeners
    pub record_positions: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_curve: CurvePreset::Linear,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            fixed_step: false,
            max_frames: None,
        }
    }
}

fn flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl CadenceConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `cadence.toml` from the current directory, or defaults if it
    /// is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Override settings from `CADENCE_*` environment variables.
    /// Unparsable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("CADENCE_DEFAULT_CURVE") {
            if let Ok(curve) = val.parse::<CurvePreset>() {
                self.timing.default_curve = curve;
            }
        }

        if let Ok(val) = std::env::var("CADENCE_FRAME_RATE") {
            if let Ok(rate) = val.parse::<f64>() {
                self.clock.frame_rate = rate;
            }
        }
        if let Ok(val) = std::env::var("CADENCE_FIXED_STEP") {
            self.clock.fixed_step = flag(&val);
        }
        if let Ok(val) = std::env::var("CADENCE_MAX_FRAMES") {
            if let Ok(frames) = val.parse::<u64>() {
                self.clock.max_frames = Some(frames);
            }
        }

        if let Ok(val) = std::env::var("CADENCE_RECORD_POSITIONS") {
            self.events.record_positions = flag(&val);
        }
    }

    /// Load configuration with environment variable overrides:
    /// 1. Load from cadence.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Time between frames at the configured rate. Falls back to 60 fps
    /// for a rate that is not positive or whose interval does not fit a
    /// `Duration`.
    pub fn frame_interval(&self) -> Duration {
        let fallback = Duration::from_secs_f64(1.0 / 60.0);
        let rate = self.clock.frame_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return fallback;
        }
        Duration::try_from_secs_f64(1.0 / rate).unwrap_or(fallback)
    }
}
