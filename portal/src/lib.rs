//! Member-portal session client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The studio backend owns accounts and issues bearer tokens. This crate keeps
//! the client side of that: a durable token store, the HTTP calls to
//! `/api/auth/*`, and the `SessionContext` that ties them into a
//! login/register/refresh/logout lifecycle.

pub mod api;
pub mod config;
pub mod session;
pub mod store;
pub mod types;

pub use api::{AuthApi, AuthError, HttpAuthApi};
pub use config::{ConfigError, PortalConfig};
pub use session::{Session, SessionContext, SessionStatus, SessionSummary};
pub use store::{FileStore, MemoryStore, StoreError, TokenStore};
pub use types::{RegisterRequest, UserProfile};
