//! MCP (Model Context Protocol) module
//!
//! Serves the registered tools to MCP clients over stdio.
//!
//! ## Architecture
//!
//! - **protocol**: Wire protocol types (JSON-RPC based)
//! - **server**: Line-delimited stdio server dispatching to the `ToolRegistry`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rejestr_mcp::{mcp::McpServer, Config};
//!
//! # async fn example() -> rejestr_mcp::Result<()> {
//! let config = Config::from_env()?;
//! let server = Arc::new(McpServer::from_config(&config)?);
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod protocol;
mod server;

pub use protocol::{
    CallToolParams, McpContent, McpError, McpRequest, McpResponse, McpTool, McpToolInput,
    McpToolResult, RequestId, DEFAULT_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
pub use server::{McpServer, ServerInfo};
