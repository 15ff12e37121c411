//! API Client - Contact Endpoint
//!
//! Every failure is captured and returned as a `SubmissionResult`; nothing
//! propagates past `send_contact_form`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::submission::{ContactSubmission, FailureKind, SubmissionResult};

pub const API_KEY_HEADER: &str = "x-api-key";

const EXCERPT_CHARS: usize = 100;
const LOG_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Contact API is not configured (NEXT_PUBLIC_API_BASE_URL / NEXT_PUBLIC_API_KEY)")]
    NotConfigured,

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned HTML instead of JSON - check API endpoint")]
    HtmlResponse,

    #[error("Invalid JSON response: {excerpt}...")]
    InvalidJson { excerpt: String },

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::NotConfigured | ApiError::InvalidUrl(_) => FailureKind::NotConfigured,
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::HtmlResponse => FailureKind::HtmlResponse,
            ApiError::InvalidJson { .. } => FailureKind::InvalidJson,
            ApiError::Api { .. } => FailureKind::Api,
        }
    }
}

impl From<ApiError> for SubmissionResult {
    fn from(err: ApiError) -> Self {
        SubmissionResult::failed(err.kind(), err.to_string())
    }
}

/// Seam between the coordinator and the network
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn send_contact_form(&self, payload: &ContactSubmission) -> SubmissionResult;
}

#[async_trait]
impl<T: ContactApi + ?Sized> ContactApi for Arc<T> {
    async fn send_contact_form(&self, payload: &ContactSubmission) -> SubmissionResult {
        (**self).send_contact_form(payload).await
    }
}

/// reqwest-backed client for `POST {base}/contact/`
#[derive(Debug, Clone)]
pub struct HttpContactClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl HttpContactClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn try_send(&self, payload: &ContactSubmission) -> Result<Value, ApiError> {
        if !self.config.is_configured() {
            tracing::warn!("contact api not configured, skipping request");
            return Err(ApiError::NotConfigured);
        }

        let url = self.config.contact_endpoint()?;
        tracing::info!(%url, api_key = %self.config.masked_key(), "sending contact form");

        let response = self
            .http
            .post(url.clone())
            .header(API_KEY_HEADER, self.config.api_key.trim())
            .json(&payload.trimmed())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%url, error = %e, "contact request failed");
                ApiError::Transport(e)
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "contact api responded");

        let body = response.text().await?;
        interpret_response(status, &body)
    }
}

#[async_trait]
impl ContactApi for HttpContactClient {
    async fn send_contact_form(&self, payload: &ContactSubmission) -> SubmissionResult {
        match self.try_send(payload).await {
            Ok(data) => {
                tracing::info!("contact form accepted");
                SubmissionResult::sent(data)
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), error = %err, "contact form rejected");
                err.into()
            }
        }
    }
}

/// Classify a raw response: body first, then status.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, body = %excerpt(body, LOG_EXCERPT_CHARS), "response was not JSON");
            return Err(if looks_like_html(body) {
                ApiError::HtmlResponse
            } else {
                ApiError::InvalidJson { excerpt: excerpt(body, EXCERPT_CHARS) }
            });
        }
    };

    if !status.is_success() {
        let message = string_field(&data, "message")
            .or_else(|| string_field(&data, "error"))
            .unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
        return Err(ApiError::Api { status: status.as_u16(), message });
    }

    Ok(data)
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("<!doctype") || lower.contains("<html")
}

fn excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
