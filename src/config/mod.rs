//! Configuration module
//!
//! - types.rs: configuration types (Config, ApiConfig, LogConfig)
//! - io.rs: layered loading (defaults < settings file < environment)
//! - validation.rs: configuration validation
//! - paths.rs: settings file location

mod io;
mod paths;
mod types;
mod validation;

pub use types::{ApiConfig, Config, LogConfig, LogFormat, DEFAULT_BASE_URL};

pub use io::{apply_env_overrides, apply_overrides, load_config, load_config_from_path, load_config_with};
pub use paths::{config_dir, config_path, config_path_with, CONFIG_PATH_VAR};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
