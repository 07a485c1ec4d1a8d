//! Configuration validation
//!
//! Validates configuration and reports issues.

use secrecy::ExposeSecret;

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    /// Whether the config is valid
    pub valid: bool,
    /// Validation errors (critical)
    pub errors: Vec<ValidationIssue>,
    /// Validation warnings (non-critical)
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        ConfigValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error
    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    /// Add a warning
    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the config field
    pub path: String,
    /// Issue message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Validate the configuration
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::valid();

    result = validate_api_key(config, result);
    result = validate_endpoint(config, result);

    result
}

fn validate_api_key(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    let key = config.api.api_key.expose_secret().trim();

    if key.is_empty() {
        result = result.with_error(
            ValidationIssue::new("api.api_key", "rejestr.io API key is not set")
                .with_suggestion("Set REJESTR_IO_API_KEY in the environment or in .env"),
        );
    } else if key.to_lowercase().contains("your") || key.len() < 8 {
        result = result.with_warning(
            ValidationIssue::new("api.api_key", "API key looks like a placeholder")
                .with_suggestion("Copy the key from your rejestr.io account page"),
        );
    }

    result
}

fn validate_endpoint(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    match url::Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() == "https" => {}
        Ok(url) if url.scheme() == "http" => {
            result = result.with_warning(
                ValidationIssue::new(
                    "api.base_url",
                    format!("{} is not HTTPS, the API key will travel in clear text", url),
                )
                .with_suggestion("Use https:// outside of local testing"),
            );
        }
        Ok(url) => {
            result = result.with_error(ValidationIssue::new(
                "api.base_url",
                format!("Unsupported URL scheme: {}", url.scheme()),
            ));
        }
        Err(e) => {
            result = result.with_error(
                ValidationIssue::new(
                    "api.base_url",
                    format!("Invalid URL '{}': {}", config.api.base_url, e),
                )
                .with_suggestion(format!("Default is {}", super::types::DEFAULT_BASE_URL)),
            );
        }
    }

    if config.api.timeout.is_zero() {
        result = result.with_error(ValidationIssue::new(
            "api.timeout",
            "Request timeout must be greater than zero",
        ));
    }
    if config.api.connect_timeout.is_zero() {
        result = result.with_error(ValidationIssue::new(
            "api.connect_timeout",
            "Connect timeout must be greater than zero",
        ));
    }

    result
}
