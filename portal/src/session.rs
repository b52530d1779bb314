//! Session context for the signed-in member.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` is built at start-up, hydrated from the token store,
//! and shared with everything that needs identity (CLI commands, route guards).
//! It is the only writer of the store's session slots.
//!
//! DESIGN
//! ======
//! Status is derived from the snapshot rather than tracked separately:
//! loading wins, then no access token means signed out, then a token without a
//! profile is `TokenOnly`. `TokenOnly` is what login leaves behind when the
//! backend issues tokens but the profile fetch fails; `reload_profile` is the
//! way out of it.
//!
//! The state lock is never held across an `.await`. Concurrent logins are not
//! coordinated; the last one to write wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::api::{AuthApi, AuthError};
use crate::store::{self, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, StoreError, TokenStore, USER_KEY};
use crate::types::{LoginRequest, RegisterRequest, TokenPair, UserProfile};

// =============================================================================
// STATE
// =============================================================================

/// Observable authentication state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unauthenticated,
    /// Hydration pending, or a login/register call is in flight.
    Authenticating,
    /// Tokens are held but no profile could be fetched for them.
    TokenOnly,
    Authenticated,
}

/// Point-in-time copy of the session.
///
/// `user` is only ever set while an access token is held, but the token may
/// have expired since; nothing here checks expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_loading: bool,
}

impl Session {
    /// State before `hydrate` has run.
    #[must_use]
    pub fn unhydrated() -> Self {
        Self { is_loading: true, ..Self::default() }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Authenticating
        } else if self.access_token.is_none() {
            SessionStatus::Unauthenticated
        } else if self.user.is_none() {
            SessionStatus::TokenOnly
        } else {
            SessionStatus::Authenticated
        }
    }

    /// Whether a route guard should send the caller to the login page.
    #[must_use]
    pub fn should_redirect_unauth(&self) -> bool {
        !self.is_loading && self.user.is_none()
    }

    /// Token-free view for display and logs.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            status: self.status(),
            has_access_token: self.access_token.is_some(),
            has_refresh_token: self.refresh_token.is_some(),
            user: self.user.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    pub user: Option<UserProfile>,
}

/// Store slots and session as they were before a login started writing.
struct Checkpoint {
    slots: [(&'static str, Option<String>); 3],
    session: Session,
}

fn read(state: &RwLock<Session>) -> RwLockReadGuard<'_, Session> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &RwLock<Session>) -> RwLockWriteGuard<'_, Session> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Sets `is_loading` for its lifetime, so an early return clears it too.
struct LoadingGuard<'a> {
    state: &'a RwLock<Session>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(state: &'a RwLock<Session>) -> Self {
        write(state).is_loading = true;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        write(self.state).is_loading = false;
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

pub struct SessionContext {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    state: RwLock<Session>,
}

impl SessionContext {
    /// Build an unhydrated context. Call [`SessionContext::hydrate`] before
    /// reading state.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        Self { api, store, state: RwLock::new(Session::unhydrated()) }
    }

    /// Reload state from the token store and clear the loading flag.
    ///
    /// A cached profile without an access token is ignored.
    pub fn hydrate(&self) -> Session {
        let access_token = self.store.get(ACCESS_TOKEN_KEY);
        let refresh_token = self.store.get(REFRESH_TOKEN_KEY);
        let user = if access_token.is_some() {
            store::load_json::<UserProfile>(self.store.as_ref(), USER_KEY)
        } else {
            None
        };

        let mut state = write(&self.state);
        *state = Session { access_token, refresh_token, user, is_loading: false };
        tracing::debug!(status = ?state.status(), "session hydrated");
        state.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        read(&self.state).clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        read(&self.state).status()
    }

    /// `Authorization` header value for calls to other portal APIs.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        read(&self.state)
            .access_token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    /// Sign in and fetch the member's profile.
    ///
    /// Returns `Authenticated`, or `TokenOnly` when tokens were issued but the
    /// profile fetch failed.
    ///
    /// # Errors
    ///
    /// Fails with the backend's message when credentials are rejected, leaving
    /// the prior session untouched. Also fails if the new session cannot be
    /// stored; the prior session is then restored, or signed out if even that
    /// cannot be written.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionStatus, AuthError> {
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        self.login_with(&request).await
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// # Errors
    ///
    /// Fails with the backend's message if registration or the follow-up login
    /// is rejected.
    pub async fn register(&self, request: &RegisterRequest) -> Result<SessionStatus, AuthError> {
        {
            let _loading = LoadingGuard::engage(&self.state);
            self.api
                .register(request)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "registration rejected"))?;
        }
        tracing::info!("registration accepted; signing in");
        self.login_with(&request.credentials()).await
    }

    /// Drop the session locally. No server call; storage failures are logged.
    pub fn logout(&self) {
        *write(&self.state) = Session::default();
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session slot");
            }
        }
        tracing::info!("signed out");
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Without a refresh token, or on any failure, this signs out. Never
    /// returns an error; the resulting status says what happened.
    ///
    /// Before [`SessionContext::hydrate`] has run, or while a login is in
    /// flight, nothing is touched and `Authenticating` is returned.
    pub async fn refresh_token(&self) -> SessionStatus {
        let (loading, held) = {
            let state = read(&self.state);
            (state.is_loading, state.refresh_token.clone())
        };
        if loading {
            tracing::debug!("session still loading; refresh skipped");
            return SessionStatus::Authenticating;
        }
        let Some(refresh_token) = held else {
            tracing::debug!("no refresh token held; signing out");
            self.logout();
            return SessionStatus::Unauthenticated;
        };

        let tokens = match self.api.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed; signing out");
                self.logout();
                return SessionStatus::Unauthenticated;
            }
        };

        if let Err(e) = self.store_tokens(&tokens) {
            tracing::warn!(error = %e, "could not store refreshed tokens; signing out");
            self.logout();
            return SessionStatus::Unauthenticated;
        }

        tracing::info!("access token refreshed");
        self.status()
    }

    /// Re-fetch the profile for the held access token and cache it.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without an access token; otherwise whatever the
    /// profile call or the store returns. The session is unchanged on error.
    pub async fn reload_profile(&self) -> Result<UserProfile, AuthError> {
        let access_token = read(&self.state)
            .access_token
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;
        let user = self.api.me(&access_token).await?;
        self.store_user(user.clone())?;
        Ok(user)
    }

    async fn login_with(&self, request: &LoginRequest) -> Result<SessionStatus, AuthError> {
        {
            let _loading = LoadingGuard::engage(&self.state);
            self.authenticate(request).await?;
        }
        Ok(self.status())
    }

    async fn authenticate(&self, request: &LoginRequest) -> Result<(), AuthError> {
        let tokens = self
            .api
            .login(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "login rejected"))?;

        let checkpoint = self.checkpoint();
        if let Err(e) = self.adopt(&tokens).await {
            tracing::warn!(error = %e, "could not store new session; restoring previous one");
            self.rollback(checkpoint);
            return Err(e.into());
        }
        Ok(())
    }

    /// Store freshly issued tokens and, if it can be fetched, their profile.
    async fn adopt(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.store_tokens(tokens)?;
        self.clear_cached_user()?;

        match self.api.me(&tokens.access_token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "signed in");
                self.store_user(user)?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed after login; session is token-only");
            }
        }
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            slots: SESSION_KEYS.map(|key| (key, self.store.get(key))),
            session: self.snapshot(),
        }
    }

    /// Put back every slot that differs from `checkpoint`. If a slot cannot be
    /// restored the store no longer matches any session, so sign out instead.
    fn rollback(&self, checkpoint: Checkpoint) {
        for (key, value) in &checkpoint.slots {
            let key: &str = key;
            if self.store.get(key) == *value {
                continue;
            }
            let restored = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = restored {
                tracing::warn!(key, error = %e, "failed to restore session slot; signing out");
                self.logout();
                return;
            }
        }

        let mut state = write(&self.state);
        state.access_token = checkpoint.session.access_token;
        state.refresh_token = checkpoint.session.refresh_token;
        state.user = checkpoint.session.user;
    }

    /// Persist both tokens, then mirror them in memory.
    fn store_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;

        let mut state = write(&self.state);
        state.access_token = Some(tokens.access_token.clone());
        state.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    fn store_user(&self, user: UserProfile) -> Result<(), StoreError> {
        store::save_json(self.store.as_ref(), USER_KEY, &user)?;
        write(&self.state).user = Some(user);
        Ok(())
    }

    fn clear_cached_user(&self) -> Result<(), StoreError> {
        self.store.remove(USER_KEY)?;
        write(&self.state).user = None;
        Ok(())
    }
}
