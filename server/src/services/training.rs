//! Training-plan generator proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plan generation runs on the backend (LLM-backed). The site forwards the
//! member's request and bearer token unchanged and returns the backend's JSON.
//!
//! TRADE-OFFS
//! ==========
//! This is the only outbound call with a timeout: a fixed 10 seconds for the
//! whole round trip. Generation that takes longer is reported as a timeout
//! rather than holding the member's request open.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::TRAINING_PLAN_TIMEOUT_SECS;

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("training plan generator timed out")]
    Timeout,
    #[error("training plan generator unreachable: {0}")]
    Unreachable(String),
    /// Non-2xx from the backend; `body` is kept when it was JSON.
    #[error("training plan generator returned {status}")]
    Upstream { status: u16, body: Option<Value> },
    #[error("training plan response parse failed: {0}")]
    Parse(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

pub struct TrainingPlanClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TrainingPlanClient {
    /// Client for `{api_base_url}/api/training-plans/generate` with the fixed timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_base_url: &str) -> Result<Self, TrainingError> {
        Self::with_timeout(api_base_url, Duration::from_secs(TRAINING_PLAN_TIMEOUT_SECS))
    }

    pub(crate) fn with_timeout(api_base_url: &str, timeout: Duration) -> Result<Self, TrainingError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrainingError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: generate_endpoint(api_base_url) })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward `body` with the caller's `Authorization` header value.
    ///
    /// # Errors
    ///
    /// See [`TrainingError`]; timeouts while sending or reading the body are
    /// both reported as `Timeout`.
    pub async fn generate(&self, authorization: &str, body: &Value) -> Result<Value, TrainingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, authorization)
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let text = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(TrainingError::Upstream { status: status.as_u16(), body: serde_json::from_str(&text).ok() });
        }

        serde_json::from_str(&text).map_err(|e| TrainingError::Parse(e.to_string()))
    }
}

fn generate_endpoint(api_base_url: &str) -> String {
    format!("{}/api/training-plans/generate", api_base_url.trim_end_matches('/'))
}

fn classify(e: reqwest::Error) -> TrainingError {
    if e.is_timeout() { TrainingError::Timeout } else { TrainingError::Unreachable(e.to_string()) }
}

#[cfg(test)]
#[path = "training_test.rs"]
mod tests;
