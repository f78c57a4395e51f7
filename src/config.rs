//! Tool configuration.
//!
//! The config file is optional: a missing file yields defaults, a present
//! file is validated before use so bad QR options fail early.
use crate::qr::QrOptions;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
const APP_DIR: &str = "splitpay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub schema_version: u32,
    /// Key-value store location; defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub qr: QrOptions,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            store_path: None,
            qr: QrOptions::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// `<config dir>/splitpay/config.json`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// `<data dir>/splitpay/store.json`, falling back to the working directory.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("store.json")
}

/// Load `explicit` (which must exist) or the default path (which may not).
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(Config::default()),
        },
    };
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate schema version and QR options.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.qr.scale == 0 || config.qr.scale > 64 {
        return Err(anyhow!(
            "qr.scale must be between 1 and 64 (got {})",
            config.qr.scale
        ));
    }
    if config.qr.margin > 16 {
        return Err(anyhow!(
            "qr.margin must be at most 16 (got {})",
            config.qr.margin
        ));
    }
    if config.log_level.trim().is_empty() {
        return Err(anyhow!("log_level must be non-empty"));
    }
    Ok(())
}

impl Config {
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
