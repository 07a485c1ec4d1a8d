//! Tools module
//!
//! Each tool implements the `Tool` trait and is registered into a
//! `ToolRegistry`, which the MCP server lists and dispatches to.
//!
//! ## Adding a New Tool
//!
//! rejestr.io lookups are data, not code: add a `ToolKind` variant and its
//! `ToolSpec` row in `rejestr/catalog.rs`. `RejestrTool::all` picks it up.

mod registry;
mod rejestr_tool;
mod traits;

pub use registry::ToolRegistry;
pub use rejestr_tool::RejestrTool;
pub use traits::{Tool, ToolCall, ToolFailure, ToolResult};
