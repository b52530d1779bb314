//! Training-plan route.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Return the `Authorization` value if it is a non-empty bearer credential.
pub(crate) fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.trim().is_empty() { None } else { Some(value) }
}

/// `POST /api/training-plan`: forward to the backend generator.
pub async fn generate_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(client) = &state.training else {
        return Err(ApiError::ServiceUnavailable("training plan generator not configured".to_owned()));
    };
    let authorization = bearer_from_headers(&headers)
        .ok_or_else(|| ApiError::Unauthorized("sign in to generate a training plan".to_owned()))?;

    let plan = client.generate(authorization, &body).await.inspect_err(|e| {
        tracing::warn!(error = %e, "training plan generation failed");
    })?;
    Ok(Json(plan))
}
