// SPDX-License-Identifier: MPL-2.0
//! This module handles the toaster's configuration, including loading and saving
//! it to a `toasts.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use toast_lifecycle::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.max_notifications = Some(3);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_file = PathBuf::from("./temp_config_dir/toasts.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.max_notifications, Some(3));
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::journal::JournalCapacity;
use crate::domain::toast::{GracePeriod, MaxNotifications, TickInterval};
use crate::error::Result;
use crate::notifications::{Durations, ToasterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "toasts.toml";
const APP_NAME: &str = "ToastLifecycle";

/// User-editable settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub max_notifications: Option<usize>,
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    #[serde(default)]
    pub grace_period_ms: Option<u64>,
    #[serde(default)]
    pub default_duration_ms: Option<u64>,
    #[serde(default)]
    pub error_duration_ms: Option<u64>,
    #[serde(default)]
    pub journal_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_notifications: Some(DEFAULT_MAX_NOTIFICATIONS),
            tick_interval_ms: Some(DEFAULT_TICK_INTERVAL_MS),
            grace_period_ms: Some(DEFAULT_GRACE_PERIOD_MS),
            default_duration_ms: Some(DEFAULT_DURATION_MS),
            error_duration_ms: Some(ERROR_DURATION_MS),
            journal_capacity: Some(DEFAULT_JOURNAL_CAPACITY),
        }
    }
}

impl Config {
    /// Validates the settings into a runtime configuration, clamping
    /// out-of-range values.
    #[must_use]
    pub fn toaster_config(&self) -> ToasterConfig {
        ToasterConfig {
            capacity: MaxNotifications::new(
                self.max_notifications.unwrap_or(DEFAULT_MAX_NOTIFICATIONS),
            ),
            tick: TickInterval::from_millis(
                self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS),
            ),
            grace: GracePeriod::from_millis(
                self.grace_period_ms.unwrap_or(DEFAULT_GRACE_PERIOD_MS),
            ),
            durations: Durations {
                default: Duration::from_millis(
                    self.default_duration_ms.unwrap_or(DEFAULT_DURATION_MS),
                ),
                error: Duration::from_millis(self.error_duration_ms.unwrap_or(ERROR_DURATION_MS)),
            },
            journal_capacity: JournalCapacity::new(
                self.journal_capacity.unwrap_or(DEFAULT_JOURNAL_CAPACITY),
            ),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads settings from `path`. Invalid TOML yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
