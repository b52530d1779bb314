//! JSON error responses.
//!
//! Every error body is `{"detail": ...}`, the same shape the backend uses, so
//! clients need one parser for both.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::services::training::TrainingError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    GatewayTimeout(String),
    /// Passed through from an upstream service as-is.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, body: Value },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Upstream { body, .. } => body,
            other => serde_json::json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<TrainingError> for ApiError {
    fn from(err: TrainingError) -> Self {
        match err {
            TrainingError::Timeout => Self::GatewayTimeout(err.to_string()),
            TrainingError::Unreachable(_) | TrainingError::Parse(_) => Self::BadGateway(err.to_string()),
            TrainingError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = body.unwrap_or_else(|| {
                    serde_json::json!({ "detail": format!("training plan generator returned {}", status.as_u16()) })
                });
                Self::Upstream { status, body }
            }
            TrainingError::HttpClientBuild(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
