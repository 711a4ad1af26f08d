//! The backend gateway trait and its HTTP implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use scribe_core::BackendId;

use crate::backend::BackendTable;
use crate::error::{UpstreamCause, UpstreamError};

/// A backend's JSON object reply, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendReply(Map<String, Value>);

impl BackendReply {
    /// The `response` field, if present and a string.
    pub fn response_text(&self) -> Option<&str> {
        self.0.get("response").and_then(Value::as_str)
    }
}

impl TryFrom<Value> for BackendReply {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Sends one request to one backend.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// POST `{"text": text, "context": context}` to `backend`.
    ///
    /// `context` is left out of the payload when absent or empty.
    async fn call(
        &self,
        backend: BackendId,
        text: &str,
        context: Option<&str>,
    ) -> Result<BackendReply, UpstreamError>;
}

/// Build the JSON payload for a backend call.
pub fn request_payload(text: &str, context: Option<&str>) -> Value {
    let mut payload = Map::new();
    payload.insert("text".to_string(), Value::String(text.to_string()));
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        payload.insert("context".to_string(), Value::String(context.to_string()));
    }
    Value::Object(payload)
}

/// [`BackendGateway`] over HTTP using a shared `reqwest` client.
pub struct HttpGateway {
    client: reqwest::Client,
    table: Arc<BackendTable>,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(table: Arc<BackendTable>, timeout: Duration, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to create HTTP client, using default config: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            table,
            timeout,
        }
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> UpstreamCause {
    if err.is_timeout() {
        UpstreamCause::Timeout
    } else {
        UpstreamCause::Transport(err.to_string())
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn call(
        &self,
        backend: BackendId,
        text: &str,
        context: Option<&str>,
    ) -> Result<BackendReply, UpstreamError> {
        let target = self.table.get(backend);
        let fail = |cause: UpstreamCause| {
            warn!(backend = %backend, name = %target.name, %cause, "Backend call failed");
            UpstreamError::new(backend, target.name.clone(), cause)
        };

        debug!(
            backend = %backend,
            name = %target.name,
            has_context = context.is_some_and(|c| !c.is_empty()),
            "Calling backend"
        );

        let response = self
            .client
            .post(&target.url)
            // Per request as well, in case the builder fell back to defaults.
            .timeout(self.timeout)
            .json(&request_payload(text, context))
            .send()
            .await
            .map_err(|e| fail(classify_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(UpstreamCause::Status(status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fail(classify_reqwest_error(&e)))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| fail(UpstreamCause::InvalidBody(e.to_string())))?;

        BackendReply::try_from(value).map_err(|_| {
            fail(UpstreamCause::InvalidBody(
                "expected a JSON object".to_string(),
            ))
        })
    }
}
