//! Wire DTOs for the remote auth service.
//!
//! DESIGN
//! ======
//! Field names follow the backend's snake_case JSON. Optional request fields
//! are omitted rather than sent as `null`, which the backend treats as an
//! explicit empty value.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// PROFILE
// =============================================================================

/// Member profile as returned by `GET /api/auth/me`.
///
/// Read-only from the client's side; only the backend mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Client id in the studio's external booking system, once linked.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Creation timestamp as sent by the backend (ISO 8601).
    #[serde(default)]
    pub created_at: String,
}

impl UserProfile {
    /// Best human-readable name: full name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_owned(),
            (None, Some(last)) => last.to_owned(),
            (None, None) => self.username.clone().unwrap_or_else(|| self.email.clone()),
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload. Absent optionals are not serialized.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), ..Self::default() }
    }

    /// Credentials to log in with once registration succeeds.
    #[must_use]
    pub fn credentials(&self) -> LoginRequest {
        LoginRequest { email: self.email.clone(), password: self.password.clone() }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Token pair issued by login and refresh.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Error body shape used by the backend: `{"detail": ...}`.
///
/// `detail` is usually a string, but request-validation failures carry a list
/// of `{"msg": ...}` entries instead.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten `detail` into a single displayable message, if it has one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
            }
            _ => None,
        }
    }
}
