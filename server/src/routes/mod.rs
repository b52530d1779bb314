//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API routes and the server-rendered dashboard placeholders are bound
//! explicitly; everything else falls through to the static marketing site.

pub mod dashboard;
pub mod payments;
pub mod plans;
pub mod training;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: API, dashboard pages, and the marketing site at `/`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/plans", get(plans::list_plans))
        .route("/api/payments/checkout-session", post(payments::create_checkout_session))
        .route("/api/payments/webhook", post(payments::webhook))
        .route("/api/training-plan", post(training::generate_plan))
        .route("/dashboard", get(dashboard::overview))
        .route("/dashboard/{section}", get(dashboard::section))
        .fallback_service(website)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
