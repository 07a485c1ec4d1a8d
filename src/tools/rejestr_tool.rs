//! rejestr.io lookup tools
//!
//! A single `Tool` implementation parameterized by `ToolKind`; the catalog
//! row decides the URL, the client does the call.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::traits::{Tool, ToolResult};
use crate::error::Result;
use crate::rejestr::{RejestrClient, ToolKind};

/// One rejestr.io lookup exposed as a tool
pub struct RejestrTool {
    kind: ToolKind,
    client: Arc<RejestrClient>,
}

impl RejestrTool {
    pub fn new(kind: ToolKind, client: Arc<RejestrClient>) -> Self {
        Self { kind, client }
    }

    /// One tool per catalog entry, sharing the client
    pub fn all(client: Arc<RejestrClient>) -> Vec<Self> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| Self::new(kind, Arc::clone(&client)))
            .collect()
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }
}

#[async_trait]
impl Tool for RejestrTool {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.spec().description
    }

    fn parameters_schema(&self) -> Value {
        self.kind.input_schema()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let started = Instant::now();

        match self.client.call(self.kind, &args).await {
            Ok(payload) => {
                info!(
                    tool = self.kind.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool call succeeded"
                );
                Ok(ToolResult::success(payload))
            }
            Err(e) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if e.is_client_error() {
                    info!(
                        tool = self.kind.name(),
                        kind = e.kind(),
                        elapsed_ms,
                        "tool call rejected: {}",
                        e
                    );
                } else {
                    warn!(
                        tool = self.kind.name(),
                        kind = e.kind(),
                        retryable = e.is_retryable(),
                        elapsed_ms,
                        "tool call failed: {}",
                        e
                    );
                }
                Ok(ToolResult::from_error(&e))
            }
        }
    }
}
