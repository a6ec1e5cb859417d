//! Configuration management for the treadmill calculator app
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: TC__)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use treadmill_calc_shared::{DEFAULT_WEIGHT_KG, MAX_CHART_POINTS};

use crate::error::AppResult;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub weight_log: WeightLogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local key-value store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Weight used for a fresh session, and when the stored weight is unusable
    pub default_weight_kg: f64,
}

/// Weight log display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightLogConfig {
    pub max_chart_points: usize,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from(".treadmill-calc"),
            },
            session: SessionConfig {
                default_weight_kg: DEFAULT_WEIGHT_KG,
            },
            weight_log: WeightLogConfig {
                max_chart_points: MAX_CHART_POINTS,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with TC__ prefix
    pub fn load() -> AppResult<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);
        Self::load_from(&config_file)
    }

    /// Load with an explicit config file path (the file may be absent)
    pub fn load_from(config_file: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(config_file).required(false))
            // e.g., TC__STORAGE__DATA_DIR=/tmp/tc sets storage.data_dir
            .add_source(config::Environment::with_prefix("TC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Render as TOML, for `config init`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
