//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Fixed upper bound for one training-plan generation round trip.
pub const TRAINING_PLAN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid STUDIO_API_URL `{0}`: expected an http(s) URL with a host")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Root of the static marketing site.
    pub website_dir: PathBuf,
    /// Backend origin for proxied calls. `None` disables the training-plan proxy.
    pub api_base_url: Option<String>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `WEBSITE_DIR`: default `<server crate>/../website`
    /// - `STUDIO_API_URL`: backend origin; unset disables proxying
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `STUDIO_API_URL` is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let website_dir = std::env::var("WEBSITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_website_dir());
        let api_base_url = match std::env::var("STUDIO_API_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_api_url(&raw)?),
            _ => None,
        };

        Ok(Self { port, website_dir, api_base_url })
    }
}

fn default_website_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../website")
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
