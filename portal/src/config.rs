//! Portal client configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::sync::Arc;

use crate::api::HttpAuthApi;
use crate::session::SessionContext;
use crate::store::TokenStore;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{0}`: expected an http(s) URL with a host")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Backend origin, without a trailing slash.
    pub api_base_url: String,
}

impl PortalConfig {
    /// # Errors
    ///
    /// Returns an error unless `api_base_url` is an http(s) URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { api_base_url: parse_base_url(api_base_url)? })
    }

    /// Build from `STUDIO_API_URL`, falling back to [`DEFAULT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set to something that is not an
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("STUDIO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self::new(&raw)
    }

    /// Build a hydrated session context over `store`.
    #[must_use]
    pub fn session_context(&self, store: Arc<dyn TokenStore>) -> SessionContext {
        let api = Arc::new(HttpAuthApi::new(&self.api_base_url));
        let ctx = SessionContext::new(api, store);
        ctx.hydrate();
        ctx
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidApiUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
