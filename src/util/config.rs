//! Engine configuration, stored as JSON in the per-user config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::debug;

use crate::domain::pricing::{PricingConfig, DEFAULT_GLOBAL_SELL_PRICE_PERCENT};
use crate::infra::cache::NAME_CACHE_TTL;
use crate::infra::names::MISSING_NAME_TAG;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "MarketPricing";
const APP_NAME: &str = "MarketPricing";
const CONFIG_FILENAME: &str = "market.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sell percent used when both item and zone inherit (`-1`).
    pub global_sell_price_percent: f64,
    pub name_cache_ttl_secs: u64,
    pub missing_name_tag: String,
    /// Upper bound on one name service round trip.
    pub lookup_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_sell_price_percent: DEFAULT_GLOBAL_SELL_PRICE_PERCENT,
            name_cache_ttl_secs: NAME_CACHE_TTL.as_secs(),
            missing_name_tag: MISSING_NAME_TAG.to_string(),
            lookup_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percent = self.global_sell_price_percent;
        if !(percent > 0.0 && percent <= 999.0) {
            return Err(ConfigError::Invalid(format!(
                "global_sell_price_percent must be in (0, 999], got {percent}"
            )));
        }
        if self.name_cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "name_cache_ttl_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            global_sell_price_percent: self.global_sell_price_percent,
        }
    }

    pub fn name_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.name_cache_ttl_secs)
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads the configuration from the per-user config directory.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    let path = config_file().ok_or(ConfigError::StorageUnavailable)?;
    load_config_from(&path)
}

/// Loads the configuration at `path`; a missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no engine config found, using defaults");
        return Ok(EngineConfig::default());
    }

    let data = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(config: &EngineConfig) -> Result<(), ConfigError> {
    let path = config_file().ok_or(ConfigError::StorageUnavailable)?;
    save_config_to(config, &path)
}

pub fn save_config_to(config: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config directory unavailable")]
    StorageUnavailable,
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
