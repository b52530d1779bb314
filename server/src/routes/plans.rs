//! Membership plan routes.

use axum::Json;

use crate::services::catalog::{PLANS, Plan};

/// `GET /api/plans`: the membership catalog.
pub async fn list_plans() -> Json<&'static [Plan]> {
    Json(PLANS)
}
