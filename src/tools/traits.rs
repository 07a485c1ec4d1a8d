//! Core tool trait and result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mcp::{McpTool, McpToolInput};

/// A tool that can be called over MCP
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the JSON Schema for tool parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with given arguments
    async fn execute(&self, args: Value) -> Result<ToolResult>;

    /// Convert to an MCP tool definition
    fn to_definition(&self) -> McpTool {
        let schema = self.parameters_schema();
        McpTool {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: McpToolInput {
                schema_type: "object".to_string(),
                properties: schema.get("properties").cloned().unwrap_or_default(),
                required: schema
                    .get("required")
                    .and_then(|r| serde_json::from_value(r.clone()).ok())
                    .unwrap_or_default(),
            },
        }
    }
}

/// Why a tool call failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    /// Error class (`validation`, `auth`, `remote_api`, `transport`, ...)
    pub kind: String,
    /// HTTP status, when the remote API answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Human-readable message
    pub message: String,
}

impl From<&Error> for ToolFailure {
    fn from(err: &Error) -> Self {
        ToolFailure {
            kind: err.kind().to_string(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Result payload (for successful execution)
    pub content: Option<Value>,
    /// Error details (for failed execution)
    pub error: Option<ToolFailure>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: Value) -> Self {
        ToolResult {
            success: true,
            content: Some(content),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: ToolFailure) -> Self {
        ToolResult {
            success: false,
            content: None,
            error: Some(error),
        }
    }

    /// Create a failed result from a crate error
    pub fn from_error(err: &Error) -> Self {
        Self::failure(ToolFailure::from(err))
    }

    /// Text rendering: the JSON payload, or the error message
    pub fn to_text(&self) -> String {
        if self.success {
            match &self.content {
                Some(Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
                None => String::new(),
            }
        } else {
            self.error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_default()
        }
    }
}

/// A tool call request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Tool arguments as JSON
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        ToolCall {
            name: name.into(),
            arguments,
        }
    }
}
