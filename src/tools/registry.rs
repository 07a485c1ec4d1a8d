//! Tool registry - manages the tools served over MCP

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::mcp::McpTool;
use crate::rejestr::RejestrClient;

use super::rejestr_tool::RejestrTool;
use super::traits::{Tool, ToolCall, ToolFailure, ToolResult};

/// Registry of available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ToolRegistry {
            tools: BTreeMap::new(),
        }
    }

    /// Registry holding every rejestr.io tool
    pub fn with_rejestr_tools(client: Arc<RejestrClient>) -> Self {
        let mut registry = Self::new();
        for tool in RejestrTool::all(client) {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<McpTool> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        match self.get(&call.name) {
            Some(tool) => tool.execute(call.arguments.clone()).await,
            None => Ok(ToolResult::failure(ToolFailure {
                kind: "unknown_tool".to_string(),
                status: None,
                message: format!("Unknown tool: {}", call.name),
            })),
        }
    }

    /// Get tool count
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// List tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]})
        }

        async fn execute(&self, args: Value) -> Result<ToolResult> {
            Ok(ToolResult::success(args))
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.names(), vec!["echo"]);

        let result = registry
            .execute(&ToolCall::new("echo", json!({"text": "hej"})))
            .await
            .unwrap();
        assert_eq!(result.content, Some(json!({"text": "hej"})));

        let definition = &registry.definitions()[0];
        assert_eq!(definition.input_schema.required, vec!["text".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute(&ToolCall::new("get_weather", Value::Null))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, "unknown_tool");
    }

    #[test]
    fn test_rejestr_tools_registered() {
        let config = crate::config::Config::with_api_key("test-key-123");
        let client = Arc::new(RejestrClient::new(&config.api).unwrap());
        let registry = ToolRegistry::with_rejestr_tools(client);
        assert_eq!(registry.count(), 11);
        assert!(registry.get("get_token_amount").is_some());
        assert!(registry.get("get_financial_statement_in_json").is_some());
    }
}
