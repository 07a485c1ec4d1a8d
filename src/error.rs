//! Error types for rejestr-mcp

use thiserror::Error;

/// Result type alias using rejestr-mcp's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rejestr-mcp
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required tool argument is missing, empty or malformed
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// rejestr.io rejected the API key (401/403)
    #[error("rejestr.io rejected the API key (HTTP {status}): {message}. Check REJESTR_IO_API_KEY")]
    Auth { status: u16, message: String },

    /// Any other non-2xx answer from rejestr.io
    #[error("rejestr.io API error (HTTP {status}): {message}")]
    RemoteApi { status: u16, message: String },

    /// The API could not be reached (timeout, refused connection, DNS)
    #[error("rejestr.io unreachable: {0}")]
    Transport(String),

    /// MCP / JSON-RPC framing error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable label for the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Validation(_) => "validation",
            Error::Auth { .. } => "auth",
            Error::RemoteApi { .. } => "remote_api",
            Error::Transport(_) => "transport",
            Error::Protocol(_) => "protocol",
            Error::Json(_) => "json",
            Error::Io(_) => "io",
        }
    }

    /// HTTP status attached to the error, if the remote API answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } | Error::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if error is retryable.
    ///
    /// Always false: every rejestr.io call may be billed, so failures are
    /// reported once and the caller decides what to do.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Auth { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            Error::Transport(format!("connection failed: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}
