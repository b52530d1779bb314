//! Remote auth service client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns accounts and token issuance; this module is the thin HTTP
//! layer `SessionContext` drives. `AuthApi` is the seam tests replace.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `AuthError::Http` with the backend's `detail`
//! message when present, otherwise a `"<operation> failed: <status>"` message.
//! No call here has a timeout or retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::store::StoreError;
use crate::types::{ErrorBody, LoginRequest, RefreshRequest, RegisterRequest, TokenPair, UserProfile};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never got a response (DNS, connect, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status. Displays as the
    /// user-facing message only.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The backend answered 2xx with a body of the wrong shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("token storage failed: {0}")]
    Storage(#[from] StoreError),

    /// The operation needs an access token and none is held.
    #[error("not signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// HTTP status for `Http` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn request_failed_message(operation: &str, status: u16) -> String {
    format!("{operation} failed: {status}")
}

fn login_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/auth/login")
}

fn register_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/auth/register")
}

fn me_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/auth/me")
}

fn refresh_endpoint(base_url: &str) -> String {
    format!("{base_url}/api/auth/refresh")
}

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the session needs from the remote auth service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, AuthError>;

    /// `POST /api/auth/register`. The response body is not used.
    async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError>;

    /// `GET /api/auth/me` with the bearer token.
    async fn me(&self, access_token: &str) -> Result<UserProfile, AuthError>;

    /// `POST /api/auth/refresh`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// `reqwest`-backed `AuthApi` against `{base_url}/api/auth/*`.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turn a non-success response into `AuthError::Http`.
async fn error_from_response(operation: &str, resp: reqwest::Response) -> AuthError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| request_failed_message(operation, status));
    AuthError::Http { status, message }
}

async fn read_json<T: DeserializeOwned>(operation: &str, resp: reqwest::Response) -> Result<T, AuthError> {
    if !resp.status().is_success() {
        return Err(error_from_response(operation, resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| AuthError::Parse(format!("{operation}: {e}")))
}

fn network_error(e: reqwest::Error) -> AuthError {
    AuthError::Network(e.to_string())
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, AuthError> {
        let resp = self
            .client
            .post(login_endpoint(&self.base_url))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        read_json("login", resp).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(register_endpoint(&self.base_url))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        if !resp.status().is_success() {
            return Err(error_from_response("registration", resp).await);
        }
        Ok(())
    }

    async fn me(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        let resp = self
            .client
            .get(me_endpoint(&self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;
        read_json("profile fetch", resp).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let body = RefreshRequest { refresh_token: refresh_token.to_owned() };
        let resp = self
            .client
            .post(refresh_endpoint(&self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;
        read_json("token refresh", resp).await
    }
}
