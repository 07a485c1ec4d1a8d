//! rejestr.io HTTP client
//!
//! One GET per call, no retries. The API key travels verbatim in the
//! `Authorization` header, which is how rejestr.io expects it.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::catalog::{HttpMethod, ToolKind};
use super::query::RemoteQuery;
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Longest error body excerpt carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Field under which a non-JSON success body is returned
pub const RAW_BODY_FIELD: &str = "raw";

/// Client for the rejestr.io API
#[derive(Debug, Clone)]
pub struct RejestrClient {
    http: Client,
    base_url: Url,
    authorization: HeaderValue,
}

impl RejestrClient {
    /// Create a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if !config.has_api_key() {
            return Err(Error::Config("REJESTR_IO_API_KEY is required".to_string()));
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let mut authorization = HeaderValue::from_str(config.api_key.expose_secret().trim())
            .map_err(|_| Error::Config("API key contains characters not allowed in a header".to_string()))?;
        authorization.set_sensitive(true);

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            authorization,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Validate arguments, build the query and fetch it
    pub async fn call(&self, kind: ToolKind, args: &Value) -> Result<Value> {
        let query = RemoteQuery::build(kind, args)?;
        self.fetch(&query).await
    }

    /// Issue the request for a prepared query and map the response
    pub async fn fetch(&self, query: &RemoteQuery) -> Result<Value> {
        let url = query.url(&self.base_url)?;
        debug!(url = %url, "rejestr.io request");

        let request = match query.method() {
            HttpMethod::Get => self.http.get(url),
        };

        let response = request
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "rejestr.io response");

        if status.is_success() {
            return Ok(parse_success_body(body));
        }

        let message = error_message(status, &body);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "rejestr.io rejected the API key");
            Err(Error::Auth {
                status: status.as_u16(),
                message,
            })
        } else {
            warn!(status = status.as_u16(), %message, "rejestr.io returned an error");
            Err(Error::RemoteApi {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// JSON bodies pass through untouched; anything else is wrapped as `{"raw": text}`
fn parse_success_body(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => {
            debug!("rejestr.io answered with a non-JSON body");
            let mut wrapped = serde_json::Map::new();
            wrapped.insert(RAW_BODY_FIELD.to_string(), Value::String(body));
            Value::Object(wrapped)
        }
    }
}

/// Pull a readable message out of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.get("message"),
            json.get("error").and_then(|e| e.get("message")),
            json.get("error"),
            json.get("detail"),
            json.get("blad"),
        ];
        if let Some(text) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return text.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
