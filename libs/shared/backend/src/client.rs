use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend API URL is not configured")]
    NotConfigured,

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Timeouts, connection failures and 5xx responses may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Timeout { .. } | BackendError::Transport(_) => true,
            BackendError::Status { status, .. } => status.is_server_error(),
            BackendError::NotConfigured | BackendError::Decode(_) => false,
        }
    }

    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout { url: url.to_string() }
        } else {
            BackendError::Transport(err)
        }
    }
}

/// JSON-over-HTTP client for the remote clinic backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    retry_backoff: Duration,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.backend_api_url.clone(),
            retry_backoff: config.retry_backoff(),
        }
    }

    /// GET with a single retry on retryable failures.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        match self.send::<T, ()>(Method::GET, path, query, None).await {
            Err(e) if e.is_retryable() => {
                warn!("GET {} failed ({}), retrying once in {:?}", path, e, self.retry_backoff);
                tokio::time::sleep(self.retry_backoff).await;
                self.send::<T, ()>(Method::GET, path, query, None).await
            }
            other => other,
        }
    }

    /// POST is never retried: the backend offers no idempotency keys.
    pub async fn post_json<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, &[], body).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if self.base_url.is_empty() {
            return Err(BackendError::NotConfigured);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(&url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(&url, e))?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(BackendError::Status {
                status,
                message: error_message(&text),
            });
        }

        decode_body(&text)
    }
}

/// The backend answers either with the bare payload or with
/// `{ "success": .., "message": .., "data": <payload> }`. A present `data`
/// key must hold the payload; there is no fallback to the bare body.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, BackendError> {
    let mut body: Value =
        serde_json::from_str(text).map_err(|e| BackendError::Decode(e.to_string()))?;

    let data = body.as_object_mut().and_then(|fields| fields.remove("data"));
    let payload = data.unwrap_or(body);

    serde_json::from_value(payload).map_err(|e| BackendError::Decode(e.to_string()))
}

fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .or_else(|| v.get("error").and_then(Value::as_str))
                .or_else(|| v.pointer("/error/message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
