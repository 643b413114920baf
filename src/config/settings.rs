//! Configuration settings for studoro.
//!
//! Settings are loaded from `~/.studoro/config.yaml`. The timer core runs
//! on fixed canonical durations; this layer only feeds the TUI/CLI shell
//! and the reward computation at the edges.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::StudoroError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Reward policy settings.
    pub rewards: RewardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Number of recent sessions shown by `stats recent`.
    #[serde(default = "default_recent_limit")]
    pub recent_sessions: usize,
}

/// Reward policy settings.
///
/// Defaults match the observed policy: a flat award per pomodoro and
/// one XP per studied minute for free sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// XP for a completed pomodoro.
    #[serde(default = "default_pomodoro_xp")]
    pub pomodoro_xp: i64,
    /// XP per minute for a finalized free session.
    #[serde(default = "default_free_xp_per_minute")]
    pub free_xp_per_minute: i64,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_recent_limit() -> usize {
    10
}

const fn default_pomodoro_xp() -> i64 {
    25
}

const fn default_free_xp_per_minute() -> i64 {
    1
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            recent_sessions: default_recent_limit(),
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            pomodoro_xp: default_pomodoro_xp(),
            free_xp_per_minute: default_free_xp_per_minute(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, StudoroError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, StudoroError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            StudoroError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            StudoroError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), StudoroError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| StudoroError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            StudoroError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
