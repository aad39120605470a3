//! Rune animation configuration
//!
//! This crate loads settings for the animation engine from `rune.toml`, with
//! `RUNE_ANIM_*` environment variables taking precedence over the file.
//!
//! ```toml
//! [scheduler]
//! jump_when_offscreen = true
//! frame_interval_ms = 16.667
//!
//! [defaults]
//! duration = 0.5
//! delay = 0.0
//! easing = "cubic-out"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default file name looked up by [`AnimationConfig::load_or_default`].
pub const CONFIG_FILE: &str = "rune.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the animation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frame scheduler settings
    pub scheduler: SchedulerConfig,
    /// Timing defaults for new animators
    pub defaults: DefaultsConfig,
}

/// Frame scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Finish animations immediately when the host reports it is offscreen
    pub jump_when_offscreen: bool,
    /// Nominal frame interval used by headless hosts, in milliseconds
    pub frame_interval_ms: f64,
}

/// Timing defaults applied by `Animator::new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Duration in seconds
    pub duration: f64,
    /// Delay before the visible change starts, in seconds
    pub delay: f64,
    /// Easing curve name (`linear`, `quadratic-in`, `cubic-out`, `back-out`, ...)
    pub easing: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            jump_when_offscreen: true,
            frame_interval_ms: 1000.0 / 60.0,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            delay: 0.0,
            easing: "linear".to_string(),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
}

fn env_number(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|val| val.parse::<f64>().ok())
}

impl AnimationConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `rune.toml` in the current directory,
    /// or return the defaults if the file is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Some(flag) = env_flag("RUNE_ANIM_JUMP_WHEN_OFFSCREEN") {
            self.scheduler.jump_when_offscreen = flag;
        }
        if let Some(interval) = env_number("RUNE_ANIM_FRAME_INTERVAL_MS") {
            self.scheduler.frame_interval_ms = interval;
        }

        if let Some(duration) = env_number("RUNE_ANIM_DURATION") {
            self.defaults.duration = duration;
        }
        if let Some(delay) = env_number("RUNE_ANIM_DELAY") {
            self.defaults.delay = delay;
        }
        if let Ok(easing) = std::env::var("RUNE_ANIM_EASING") {
            self.defaults.easing = easing;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
