//! Application configuration.

use crate::error::{AppError, AppResult};
use adder_mm::{ProvideConfig, StrategyConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed tuning knobs (reconnect policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedTuning {
    /// Consecutive failed connection attempts before giving up. Default: 5.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Fixed delay between attempts (ms). Default: 5,000.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Fill log path. Default: `data/fills.jsonl`.
    #[serde(default = "default_fill_log_path")]
    pub fill_log_path: String,
}

fn default_fill_log_path() -> String {
    "data/fills.jsonl".to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            fill_log_path: default_fill_log_path(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// WebSocket endpoint URL.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// REST API base URL for the order gateway.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Account address the strategy trades for.
    pub user_address: String,
    /// Provide-side configuration (instrument, tolerances, timers).
    pub provide: ProvideConfig,
    /// Quote strategy selection and parameters.
    pub strategy: StrategyConfig,
    /// Feed reconnect policy.
    #[serde(default)]
    pub feed: FeedTuning,
    /// Persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

fn default_ws_url() -> String {
    "wss://api.hyperliquid.xyz/ws".to_string()
}

fn default_api_url() -> String {
    "https://api.hyperliquid.xyz".to_string()
}

impl AppConfig {
    /// Load configuration, trying the `ADDER_CONFIG` env var and falling
    /// back to `config/default.toml`.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("ADDER_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Err(AppError::Config(format!(
                "Config file not found: {config_path}"
            )));
        }
        Self::from_file(&config_path)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
