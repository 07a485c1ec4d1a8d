//! # rejestr-mcp
//!
//! Model Context Protocol server for the [rejestr.io](https://rejestr.io) API:
//! Polish business registry lookups (KRS, NIP, CRBR beneficiaries, KRS
//! connections, financial statements, account balance) exposed as MCP tools.
//!
//! ## Features
//!
//! - **One call per tool:** each tool call is a single GET, never retried
//! - **Data-driven catalog:** tools are rows in a static table
//! - **Structured errors:** validation, auth, remote API and transport
//!   failures are reported as distinct MCP tool errors

pub mod config;
pub mod error;
pub mod mcp;
pub mod rejestr;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
