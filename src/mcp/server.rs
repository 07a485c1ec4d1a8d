//! MCP server over stdio
//!
//! Reads one JSON-RPC message per line, writes one response per line.
//! `tools/call` requests run concurrently on their own tasks; every other
//! method is answered inline so handshake ordering is preserved.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::protocol::{
    CallToolParams, McpContent, McpError, McpRequest, McpResponse, McpToolResult, RequestId,
    DEFAULT_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::rejestr::RejestrClient;
use crate::tools::{ToolRegistry, ToolResult};

const INSTRUCTIONS: &str = "Tools for the rejestr.io Polish business registry (KRS, NIP, CRBR, \
financial statements). Look a company up by name, NIP or KRS first; person ids for \
get_person_data and get_connections_by_person come from company data, connections or \
beneficiaries. get_financial_statement_in_json costs 0.50 PLN per call: check \
get_token_amount and ask the user before using it.";

/// Identity reported in the initialize handshake
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        ServerInfo {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// MCP server dispatching to a tool registry
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        McpServer {
            registry,
            info: ServerInfo::default(),
        }
    }

    /// Build the rejestr.io server from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(RejestrClient::new(&config.api)?);
        Ok(Self::new(ToolRegistry::with_rejestr_tools(client)))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve on the process's stdin/stdout until stdin closes
    pub async fn serve_stdio(self: Arc<Self>) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve on an arbitrary line-oriented transport until the reader hits EOF.
    ///
    /// In-flight tool calls are awaited before returning.
    pub async fn serve<R, W>(self: Arc<Self>, mut reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<McpResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));
        let mut in_flight = JoinSet::new();
        let mut buf = Vec::new();

        info!("MCP server ready on stdio");

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    error!("reading MCP input failed, shutting down: {}", e);
                    break;
                }
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!("MCP message is not valid UTF-8: {}", e);
                    let _ = tx.send(McpResponse::error(None, McpError::parse_error(e)));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            debug!("MCP request <- {}", line);

            let request = match parse_request(line) {
                Ok(request) => request,
                Err(response) => {
                    let _ = tx.send(response);
                    continue;
                }
            };

            if request.method == "tools/call" && !request.is_notification() {
                let server = Arc::clone(&self);
                let tx = tx.clone();
                in_flight.spawn(async move {
                    if let Some(response) = server.handle_request(request).await {
                        let _ = tx.send(response);
                    }
                });
            } else if let Some(response) = self.handle_request(request).await {
                let _ = tx.send(response);
            }

            while let Some(joined) = in_flight.try_join_next() {
                if let Err(e) = joined {
                    error!("tool call task failed: {}", e);
                }
            }
        }

        info!("input closed, waiting for {} in-flight call(s)", in_flight.len());
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("tool call task failed: {}", e);
            }
        }

        drop(tx);
        writer_task
            .await
            .map_err(|e| Error::Protocol(format!("writer task failed: {}", e)))??;

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw line; `None` for notifications
    #[cfg(test)]
    async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        match parse_request(line) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => Some(response),
        }
    }

    /// Handle a parsed request; `None` for notifications
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification received");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(&id, request.params).await,
            other => {
                warn!(method = other, "unsupported MCP method");
                Err(McpError::method_not_found(other))
            }
        };

        Some(match outcome {
            Ok(result) => McpResponse::success(Some(id), result),
            Err(error) => McpResponse::error(Some(id), error),
        })
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = match requested {
            Some(v) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v) => v,
            _ => DEFAULT_PROTOCOL_VERSION,
        };

        if let Some(client) = params.and_then(|p| p.get("clientInfo")) {
            info!(client = %client, protocol = version, "MCP client connected");
        }

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version,
            },
            "instructions": INSTRUCTIONS,
        })
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.registry.definitions() })
    }

    async fn call_tool(
        &self,
        id: &RequestId,
        params: Option<Value>,
    ) -> std::result::Result<Value, McpError> {
        let params: CallToolParams = params
            .ok_or_else(|| McpError::invalid_params("missing params"))
            .and_then(|p| serde_json::from_value(p).map_err(McpError::invalid_params))?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        debug!(request = %id, tool = %params.name, "tools/call");

        let result = tool
            .execute(params.arguments)
            .await
            .unwrap_or_else(|e| ToolResult::from_error(&e));

        serde_json::to_value(to_mcp_result(&result)).map_err(McpError::internal)
    }
}

/// Map a tool result onto the MCP content shape
fn to_mcp_result(result: &ToolResult) -> McpToolResult {
    let structured_content = if result.success {
        result.content.clone().filter(Value::is_object)
    } else {
        result.error.as_ref().map(|e| json!({ "error": e }))
    };

    McpToolResult {
        content: vec![McpContent::text(result.to_text())],
        structured_content,
        is_error: !result.success,
    }
}

/// Parse a line into a request, or the error response to send back
fn parse_request(line: &str) -> std::result::Result<McpRequest, McpResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!("unparsable MCP message: {}", e);
        McpResponse::error(None, McpError::parse_error(e))
    })?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

    let request: McpRequest = serde_json::from_value(value)
        .map_err(|e| McpResponse::error(id.clone(), McpError::invalid_request(e)))?;

    if request.jsonrpc != "2.0" {
        return Err(McpResponse::error(
            id,
            McpError::invalid_request(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
        ));
    }

    Ok(request)
}

async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<McpResponse>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response)?;
        debug!("MCP response -> {}", line);
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolFailure};
    use async_trait::async_trait;

    struct FixedTool {
        result: ToolResult,
    }

    #[async_trait]
    impl Tool for FixedTool {
        fn name(&self) -> &str {
            "fixed"
        }

        fn description(&self) -> &str {
            "Always returns the same result"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}, "required": []})
        }

        async fn execute(&self, _args: Value) -> Result<ToolResult> {
            Ok(self.result.clone())
        }
    }

    fn server_with(result: ToolResult) -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(FixedTool { result });
        McpServer::new(registry)
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server_with(ToolResult::success(json!({})));
        let resp = server
            .handle_request(McpRequest::initialize(1))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "rejestr-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_echoes_known_version() {
        let server = server_with(ToolResult::success(json!({})));
        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#)
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["protocolVersion"], "2025-06-18");

        let resp = server
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"initialize","params":{"protocolVersion":"1999-01-01"}}"#)
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server_with(ToolResult::success(json!({})));
        assert!(server
            .handle_request(McpRequest::notification("notifications/initialized"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_ping_and_unknown_method() {
        let server = server_with(ToolResult::success(json!({})));
        let resp = server.handle_request(McpRequest::new(3, "ping", None)).await.unwrap();
        assert_eq!(resp.result, Some(json!({})));

        let resp = server
            .handle_request(McpRequest::new(4, "resources/list", None))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_and_shape_errors() {
        let server = server_with(ToolResult::success(json!({})));

        let resp = server.handle_line("{not json").await.unwrap();
        assert_eq!(resp.id, None);
        assert_eq!(resp.error.unwrap().code, McpError::PARSE_ERROR);

        let resp = server.handle_line(r#"{"jsonrpc":"2.0","id":9}"#).await.unwrap();
        assert_eq!(resp.id, Some(RequestId::Number(9)));
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_REQUEST);

        let resp = server
            .handle_line(r#"{"jsonrpc":"1.0","id":10,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = server_with(ToolResult::success(json!({})));
        let resp = server.handle_request(McpRequest::list_tools(5)).await.unwrap();
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools[0]["name"], "fixed");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_tool_success_passes_payload() {
        let payload = json!({"id": 12345, "nazwy": {"skrocona": "ACME"}});
        let server = server_with(ToolResult::success(payload.clone()));
        let resp = server
            .handle_request(McpRequest::call_tool(6, "fixed", json!({})))
            .await
            .unwrap();
        let result: McpToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(!result.is_error);
        assert_eq!(result.structured_content, Some(payload.clone()));
        let text = result.content[0].text.clone().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_array_payload_has_no_structured_content() {
        let server = server_with(ToolResult::success(json!([1, 2])));
        let resp = server
            .handle_request(McpRequest::call_tool(7, "fixed", json!({})))
            .await
            .unwrap();
        let result: McpToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.structured_content.is_none());
        assert_eq!(result.content[0].text.as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn test_call_tool_failure_is_error_result() {
        let server = server_with(ToolResult::failure(ToolFailure {
            kind: "transport".into(),
            status: None,
            message: "rejestr.io unreachable: request timed out".into(),
        }));
        let resp = server
            .handle_request(McpRequest::call_tool(8, "fixed", json!({})))
            .await
            .unwrap();
        assert!(resp.error.is_none());
        let result: McpToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.is_error);
        assert_eq!(result.structured_content.unwrap()["error"]["kind"], "transport");
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_invalid_params() {
        let server = server_with(ToolResult::success(json!({})));
        let resp = server
            .handle_request(McpRequest::call_tool(9, "get_weather", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_PARAMS);

        let resp = server
            .handle_request(McpRequest::new(10, "tools/call", None))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_PARAMS);
    }
}
