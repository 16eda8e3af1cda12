//! Remote delegation: hand a complex workbook to the specialized parser.
//!
//! The remote service is a layout-aware engine that handles merged cells and
//! template-driven report sheets the local tabular converter cannot. The
//! contract is one POST of `{bucket_name, file_name}` to a fixed endpoint;
//! HTTP 200 returns the result payload, anything else returns an error
//! descriptor. Nothing in this module raises past the [`RemoteOutcome`]
//! boundary — the orchestrator treats every error descriptor the same way:
//! log a warning and fall back to local parsing.
//!
//! [`RemoteParser`] is the seam: the orchestrator only sees the trait, so
//! tests and embedders can substitute the transport entirely.

use crate::error::ConvertError;
use crate::pipeline::input::SpreadsheetReference;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Environment variable consulted when no endpoint is configured.
pub const ENDPOINT_ENV: &str = "XLSX2JSON_REMOTE_ENDPOINT";

/// Wire request sent to the remote parser.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteParseRequest {
    pub bucket_name: String,
    pub file_name: String,
}

impl RemoteParseRequest {
    pub fn new(source: &SpreadsheetReference) -> Self {
        Self {
            bucket_name: source.container.clone(),
            file_name: source.key.clone(),
        }
    }
}

/// What the remote parser produced: a result payload, or an error
/// descriptor that triggers local fallback.
#[derive(Debug, Clone)]
pub enum RemoteOutcome {
    Payload(serde_json::Value),
    Error(String),
}

/// The remote parse seam. Implementations must not panic or return early
/// through any channel other than [`RemoteOutcome`].
pub trait RemoteParser: Send + Sync {
    fn parse<'a>(&'a self, request: &'a RemoteParseRequest) -> BoxFuture<'a, RemoteOutcome>;
}

/// [`RemoteParser`] over HTTP, the production transport.
pub struct HttpRemoteParser {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemoteParser {
    /// `timeout_secs` bounds the whole call, connect through body.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ConvertError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn parse_inner(&self, request: &RemoteParseRequest) -> RemoteOutcome {
        info!(
            "Forwarding '{}' to remote parser at {}",
            request.file_name, self.endpoint
        );

        let response = match self.client.post(&self.endpoint).json(request).send().await {
            Ok(r) => r,
            Err(e) => {
                return RemoteOutcome::Error(format!("failed to reach remote parser: {e}"));
            }
        };

        let status = response.status();
        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                return RemoteOutcome::Error(format!(
                    "remote parser returned an unreadable body (HTTP {status}): {e}"
                ));
            }
        };

        if status == StatusCode::OK {
            info!("Remote parser processed '{}'", request.file_name);
            RemoteOutcome::Payload(body)
        } else {
            let reason = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            RemoteOutcome::Error(format!("remote parser failed (HTTP {status}): {reason}"))
        }
    }
}

impl RemoteParser for HttpRemoteParser {
    fn parse<'a>(&'a self, request: &'a RemoteParseRequest) -> BoxFuture<'a, RemoteOutcome> {
        Box::pin(self.parse_inner(request))
    }
}
