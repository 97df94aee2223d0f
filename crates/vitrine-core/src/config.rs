//! Configuration management for Vitrine.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate
//! location.

use crate::error::{Result, VitrineError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main configuration structure for Vitrine.
///
/// ## Example Configuration File (vitrine.toml)
///
/// ```toml
/// [gallery]
/// manifest = "/srv/gallery/manifest.json"
///
/// [search]
/// debounce_ms = 300
///
/// [viewport]
/// margin = 20.0
/// min_ratio = 0.1
///
/// [ui]
/// columns = 4
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gallery data location
    pub gallery: GalleryConfig,

    /// Search and debounce settings
    pub search: SearchConfig,

    /// Visibility trigger thresholds
    pub viewport: ViewportConfig,

    /// UI settings
    pub ui: UiConfig,
}

/// Gallery data configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Path to the JSON manifest (None = must be given on the command
    /// line)
    pub manifest: Option<PathBuf>,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period in milliseconds before a typed query fires
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { debounce_ms: 300 }
    }
}

/// Visibility trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Margin around the viewport within which cells start loading
    pub margin: f32,

    /// Minimum intersection ratio that triggers a load on its own
    pub min_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            margin: 20.0,
            min_ratio: 0.1,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Number of grid columns in the interactive view
    pub columns: u16,

    /// Event-loop tick interval in milliseconds
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            columns: 4,
            tick_ms: 50,
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults if no file exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data).map_err(|err| VitrineError::ConfigError {
            reason: err.to_string(),
        })?;

        debug!(path = %path.display(), "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            VitrineError::config("could not determine configuration directory")
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(self).map_err(|err| VitrineError::ConfigError {
            reason: err.to_string(),
        })?;
        fs::write(&path, data)?;

        debug!(path = %path.display(), "Configuration saved");

        Ok(())
    }

    /// Default configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "vitrine", "vitrine")
            .map(|dirs| dirs.config_dir().join("vitrine.toml"))
    }

    /// The configured debounce quiet period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// The configured event-loop tick interval.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }
}
