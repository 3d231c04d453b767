//! Configuration for the game list service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::partition::GameView;

/// Error types for loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// YAML did not parse
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML did not parse
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Configuration for [`crate::GameListService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameListConfig {
    /// Interval between background refreshes (ms)
    pub refresh_interval_ms: u64,
    /// Reject snapshots in which two records share a game ID
    pub reject_duplicate_ids: bool,
    /// View shown when the caller does not pick one
    pub default_view: GameView,
}

impl Default for GameListConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 30_000,
            reject_duplicate_ids: true,
            default_view: GameView::Active,
        }
    }
}

impl GameListConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load config from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "refresh_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Refresh period; never zero, even for configs built in code.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}
