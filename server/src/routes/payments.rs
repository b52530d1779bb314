//! Payment routes (placeholder).
//!
//! SYSTEM CONTEXT
//! ==============
//! No payment provider is wired in yet. Checkout validates the plan and
//! answers 501 with what would have been charged, so the pricing page can be
//! built against the final request/response shape.

use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::catalog;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    #[serde(default)]
    pub customer_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutPending {
    pub detail: &'static str,
    pub plan_id: &'static str,
    pub amount_cents: u32,
    pub currency: &'static str,
    /// Identifies this attempt in the logs.
    pub reference: Uuid,
}

const PROVIDER_PENDING: &str = "online payments are not available yet";

/// `POST /api/payments/checkout-session`.
pub async fn create_checkout_session(
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutPending>), ApiError> {
    let plan = catalog::find_plan(&req.plan_id)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown plan: {}", req.plan_id.trim())))?;

    let reference = Uuid::new_v4();
    tracing::info!(
        %reference,
        plan_id = plan.id,
        has_email = req.customer_email.is_some(),
        "checkout requested; payment provider not configured"
    );

    Ok((
        StatusCode::NOT_IMPLEMENTED,
        Json(CheckoutPending {
            detail: PROVIDER_PENDING,
            plan_id: plan.id,
            amount_cents: plan.price_cents,
            currency: plan.currency,
            reference,
        }),
    ))
}

/// `POST /api/payments/webhook`: accepts nothing until a provider is chosen.
pub async fn webhook(body: Bytes) -> ApiError {
    tracing::warn!(bytes = body.len(), "payment webhook received with no provider configured");
    ApiError::NotImplemented(PROVIDER_PENDING.to_owned())
}
