//! Configuration types for a monitoring session.
//!
//! Settings are remembered between runs in `config.json`. They are checked
//! by `MonitorConfig::validate()` before a session may start.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::capture::{Point, Region};
use crate::monitor::error::ConfigError;

/// Complete monitoring configuration as edited in the setup screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Screen region to read the number from
    pub region: Option<Region>,
    /// Time between the starts of two ticks (seconds)
    pub interval_seconds: f64,
    /// Minimum change from the last accepted value that fires an alert
    pub delta_threshold: f64,
    /// Whether to click `click_target` when an alert fires
    pub click_on_alert: bool,
    pub click_target: Option<Point>,
    /// End the session after the first alert instead of continuing
    pub stop_on_alert: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            region: None,
            interval_seconds: 0.5,
            delta_threshold: 2.0,
            click_on_alert: false,
            click_target: None,
            stop_on_alert: false,
        }
    }
}

/// A configuration that passed validation; the monitor loop only sees this.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub region: Region,
    pub interval: Duration,
    pub delta_threshold: f64,
    /// Set only when clicking on alert is enabled
    pub click_target: Option<Point>,
    pub stop_on_alert: bool,
}

impl MonitorConfig {
    /// Checks every startup invariant and returns the session settings.
    pub fn validate(&self) -> Result<SessionConfig, ConfigError> {
        let region = self.region.ok_or(ConfigError::MissingRegion)?;
        if region.is_empty() {
            return Err(ConfigError::EmptyRegion(region));
        }

        if !self.interval_seconds.is_finite() || self.interval_seconds <= 0.0 {
            return Err(ConfigError::InvalidInterval(self.interval_seconds));
        }
        let interval = Duration::try_from_secs_f64(self.interval_seconds)
            .map_err(|_| ConfigError::InvalidInterval(self.interval_seconds))?;

        if !self.delta_threshold.is_finite() || self.delta_threshold <= 0.0 {
            return Err(ConfigError::InvalidDelta(self.delta_threshold));
        }

        let click_target = if self.click_on_alert {
            Some(self.click_target.ok_or(ConfigError::MissingClickTarget)?)
        } else {
            None
        };

        Ok(SessionConfig {
            region,
            interval,
            delta_threshold: self.delta_threshold,
            click_target,
            stop_on_alert: self.stop_on_alert,
        })
    }

    /// Loads the remembered settings, falling back to defaults.
    pub fn load_or_default() -> Self {
        let config_path = crate::paths::get_config_file();
        crate::log(&format!("Looking for config at: {}", config_path.display()));

        if !config_path.exists() {
            crate::log("config.json not found. Using default config.");
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!("{:#}. Using defaults.", e));
                Self::default()
            }
        }
    }

    /// Reads settings from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Remembers the settings for the next run.
    pub fn save(&self) -> Result<()> {
        self.save_to(&crate::paths::get_config_file())
    }

    /// Writes settings to a JSON file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
