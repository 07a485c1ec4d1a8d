//! Configuration I/O - Loading configuration
//!
//! Handles reading configuration from files and environment variables.

use secrecy::SecretString;
use std::path::Path;
use std::time::Duration;

use super::types::Config;
use crate::error::{Error, Result};

/// Load configuration with layered precedence:
/// 1. Settings file if it exists, otherwise defaults
/// 2. Environment variable overrides (includes .env)
pub fn load_config() -> Result<Config> {
    load_config_with(None)
}

/// Load configuration, optionally from an explicit settings file.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config_with(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) if !path.exists() => {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => load_config_from_path(path)?,
        None => match super::paths::config_path() {
            Some(default_path) if default_path.exists() => load_config_from_path(&default_path)?,
            _ => Config::default(),
        },
    };

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    // Detect format by extension
    let config: Config = if path.extension().map_or(false, |ext| ext == "json") {
        json5::from_str(&content).map_err(|e| Error::Config(format!("Invalid JSON config: {}", e)))?
    } else if path.extension().map_or(false, |ext| ext == "toml") {
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))?
    } else {
        // Try TOML first, then JSON5
        toml::from_str(&content)
            .or_else(|_| json5::from_str(&content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?
    };

    Ok(config)
}

/// Apply environment variable overrides to an existing config.
///
/// Loads `.env` first, then overlays any set variables. Env vars have the
/// highest precedence below CLI flags.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    dotenvy::dotenv().ok();
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup("REJESTR_IO_API_KEY") {
        config.api.api_key = SecretString::from(api_key.trim().to_string());
    }
    if let Some(url) = lookup("REJESTR_IO_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(secs) = lookup("REJESTR_IO_TIMEOUT") {
        config.api.timeout = parse_secs("REJESTR_IO_TIMEOUT", &secs)?;
    }
    if let Some(secs) = lookup("REJESTR_IO_CONNECT_TIMEOUT") {
        config.api.connect_timeout = parse_secs("REJESTR_IO_CONNECT_TIMEOUT", &secs)?;
    }

    if let Some(level) = lookup("RUST_LOG") {
        config.log.level = level;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.log.format = format.parse()?;
    }

    Ok(())
}

fn parse_secs(var: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::Config(format!("{} must be a whole number of seconds, got '{}'", var, value)))
}
