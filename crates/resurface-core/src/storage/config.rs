//! TOML-based engine configuration.
//!
//! Stores the tunables the engine needs outside the event stream:
//! - Daily usage goal (minutes)
//! - The set of tracked app packages
//! - The UTC offset used for calendar-day boundaries
//! - High-frequency attempt thresholds for the notifier signal
//!
//! Configuration is stored at `~/.config/resurface/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Thresholds for the high-frequency-attempts signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighFrequencyConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/resurface/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Daily usage goal in minutes; days at or under it count as successful.
    #[serde(default = "default_daily_goal")]
    pub daily_goal_minutes: f64,
    /// App packages whose usage counts toward the habit score. Empty means
    /// all recorded usage counts.
    #[serde(default)]
    pub tracked_packages: Vec<String>,
    /// Minutes east of UTC for calendar-day boundaries.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub high_frequency: HighFrequencyConfig,
}

// Default functions
fn default_daily_goal() -> f64 {
    30.0
}
fn default_window_ms() -> i64 {
    3_600_000
}
fn default_threshold() -> usize {
    3
}

impl Default for HighFrequencyConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            threshold: default_threshold(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_goal_minutes: default_daily_goal(),
            tracked_packages: Vec::new(),
            utc_offset_minutes: 0,
            high_frequency: HighFrequencyConfig::default(),
        }
    }
}

impl EngineConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/resurface"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load configuration, creating the default file if none exists.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.daily_goal_minutes, 30.0);
        assert!(config.tracked_packages.is_empty());
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(config.high_frequency.window_ms, 3_600_000);
        assert_eq!(config.high_frequency.threshold, 3);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str("daily_goal_minutes = 45.0").unwrap();
        assert_eq!(config.daily_goal_minutes, 45.0);
        assert_eq!(config.high_frequency.threshold, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.tracked_packages = vec!["com.example.social".into()];
        config.utc_offset_minutes = 540;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
