//! Configuration loading and validation.
//!
//! brightctl works with no configuration file at all; every setting has a
//! built-in default. Users who want different behavior can create
//! `~/.config/brightctl/brightctl.toml`:
//!
//! ```toml
//! step = 10              # Brightness step for up/down in percent (1-50)
//! cache_duration = 60    # Monitor cache TTL in seconds (5-3600)
//! default_monitor = "1"  # Monitor index or stable id to target without -m
//! ```
//!
//! A missing file is not an error and none is created on first run — this
//! tool is invoked per keypress and must not leave droppings behind unasked.
//! Out-of-range values are rejected with the valid range in the message.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_DURATION_SECS, DEFAULT_STEP, MAXIMUM_CACHE_DURATION_SECS, MAXIMUM_STEP,
    MINIMUM_CACHE_DURATION_SECS, MINIMUM_STEP,
};


/// User configuration, all fields optional with defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Brightness step for the up/down commands, in percent.
    pub step: Option<u8>,
    /// Monitor cache TTL in seconds.
    pub cache_duration: Option<u64>,
    /// Monitor selector (index or stable id) used when -m is not given.
    pub default_monitor: Option<String>,
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("brightctl").join("brightctl.toml"))
    }

    /// Step size with the default applied.
    pub fn step(&self) -> u8 {
        self.step.unwrap_or(DEFAULT_STEP)
    }

    /// Cache TTL with the default applied.
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration.unwrap_or(DEFAULT_CACHE_DURATION_SECS))
    }

    fn validate(&self) -> Result<()> {
        if let Some(step) = self.step
            && !(MINIMUM_STEP..=MAXIMUM_STEP).contains(&step)
        {
            bail!("step must be between {MINIMUM_STEP} and {MAXIMUM_STEP}, got {step}");
        }

        if let Some(duration) = self.cache_duration
            && !(MINIMUM_CACHE_DURATION_SECS..=MAXIMUM_CACHE_DURATION_SECS).contains(&duration)
        {
            bail!(
                "cache_duration must be between {MINIMUM_CACHE_DURATION_SECS} and {MAXIMUM_CACHE_DURATION_SECS} seconds, got {duration}"
            );
        }

        if let Some(selector) = &self.default_monitor
            && selector.trim().is_empty()
        {
            bail!("default_monitor must not be empty");
        }

        Ok(())
    }
}
