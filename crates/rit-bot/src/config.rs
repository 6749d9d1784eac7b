//! Application configuration.

use rit_mm::{Preset, StrategyConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Config file used when neither `--config` nor `RIT_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RIT_CONFIG";

/// Environment variable overriding `[exchange].api_key`.
pub const API_KEY_ENV: &str = "RIT_API_KEY";

/// Exchange connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// API root including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `X-API-Key`; must match the key shown in the RIT client.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    rit_client::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ExchangeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Strategy variant used when no `[strategy]` table is given.
    #[serde(default)]
    pub preset: Preset,

    /// Full strategy parameters; replaces the preset when present.
    #[serde(default)]
    pub strategy: Option<StrategyConfig>,
}

impl AppConfig {
    /// Resolve and load the configuration.
    ///
    /// Path: `cli_path` > `RIT_CONFIG` > `config/default.toml`. An explicit
    /// path must exist; a missing default file falls back to defaults.
    /// `RIT_API_KEY` overrides the file's API key.
    pub fn resolve(cli_path: Option<String>) -> AppResult<Self> {
        let explicit = cli_path.or_else(|| std::env::var(CONFIG_ENV).ok());

        let config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => {
                tracing::warn!(path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults");
                Self::default()
            }
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Replace the API key when `key` is set and non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.exchange.api_key = key;
        }
        self
    }

    /// Select a preset from the command line. Drops any `[strategy]` table.
    pub fn override_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.strategy = None;
    }

    /// Effective strategy parameters.
    pub fn strategy_config(&self) -> StrategyConfig {
        self.strategy
            .clone()
            .unwrap_or_else(|| self.preset.config())
    }

    /// Whether an explicit `[strategy]` table is in effect.
    pub fn has_custom_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.exchange.api_key.trim().is_empty() {
            return Err(AppError::Config(format!(
                "exchange.api_key is empty; set it in the config file or via {API_KEY_ENV}"
            )));
        }
        if !self.exchange.base_url.starts_with("http://")
            && !self.exchange.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "exchange.base_url must be an http(s) URL, got {}",
                self.exchange.base_url
            )));
        }
        if self.exchange.request_timeout_ms == 0 {
            return Err(AppError::Config(
                "exchange.request_timeout_ms must be positive".to_string(),
            ));
        }
        self.strategy_config().validate()?;
        Ok(())
    }
}
