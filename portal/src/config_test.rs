use super::*;
use crate::session::SessionStatus;
use crate::store::{ACCESS_TOKEN_KEY, MemoryStore};

#[test]
fn parse_base_url_trims_whitespace_and_trailing_slash() {
    assert_eq!(parse_base_url(" https://api.studio.test/ ").unwrap(), "https://api.studio.test");
    assert_eq!(parse_base_url("http://127.0.0.1:8000").unwrap(), "http://127.0.0.1:8000");
}

#[test]
fn parse_base_url_rejects_non_http() {
    assert!(matches!(parse_base_url("ftp://x"), Err(ConfigError::InvalidApiUrl(_))));
    assert!(matches!(parse_base_url("api.studio.test"), Err(ConfigError::InvalidApiUrl(_))));
    assert!(matches!(parse_base_url("https://"), Err(ConfigError::InvalidApiUrl(_))));
}

#[test]
fn from_env_uses_default_or_override() {
    unsafe { std::env::remove_var("STUDIO_API_URL") };
    assert_eq!(PortalConfig::from_env().unwrap().api_base_url, DEFAULT_API_URL);

    unsafe { std::env::set_var("STUDIO_API_URL", "https://api.studio.test/") };
    assert_eq!(PortalConfig::from_env().unwrap().api_base_url, "https://api.studio.test");

    unsafe { std::env::set_var("STUDIO_API_URL", "nope") };
    assert!(PortalConfig::from_env().is_err());

    unsafe { std::env::remove_var("STUDIO_API_URL") };
}

#[test]
fn session_context_comes_back_hydrated() {
    let store = Arc::new(MemoryStore::new());
    store.set(ACCESS_TOKEN_KEY, "T1").unwrap();

    let ctx = PortalConfig::new("http://127.0.0.1:1").unwrap().session_context(store);
    assert_eq!(ctx.status(), SessionStatus::TokenOnly);
}
