//! Authentication flow.
//!
//! DESIGN
//! ======
//! The startup check never produces a user-facing error: an unreachable or
//! slow backend simply lands the user on the login view with the stored
//! token intact, so a later start can still reuse it. Only an explicit 401
//! proves the token is dead and removes it.

use std::time::Duration;

use tracing::{info, warn};

use super::session::SessionStore;
use crate::net::Backend;
use crate::net::types::{ApiError, LoginRequest};
use crate::storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// Startup check still running.
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Outcome of the startup session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    Valid,
    /// Nothing stored; no request was made.
    NoToken,
    /// The backend answered 401; the token was removed.
    Expired,
    /// Timeout, transport failure or unexpected status; token kept.
    Unreachable,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("please enter both user ID and password")]
    MissingCredentials,
    #[error("cannot reach the backend server; make sure it is running")]
    Unreachable,
    #[error("{0}")]
    Rejected(String),
    #[error("the backend accepted the login but returned no session")]
    NoSession,
    #[error("could not save the session: {0}")]
    Storage(#[from] StorageError),
}

/// Authentication state for the shell and renderers.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn apply_check(&mut self, check: SessionCheck) {
        self.loading = false;
        self.error = None;
        self.status = match check {
            SessionCheck::Valid => AuthStatus::Authenticated,
            SessionCheck::NoToken | SessionCheck::Expired | SessionCheck::Unreachable => AuthStatus::Unauthenticated,
        };
    }

    pub fn apply_login(&mut self, outcome: &Result<(), LoginError>) {
        self.loading = false;
        match outcome {
            Ok(()) => {
                self.status = AuthStatus::Authenticated;
                self.error = None;
            }
            Err(e) => {
                self.status = AuthStatus::Unauthenticated;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn apply_logout(&mut self) {
        *self = Self { status: AuthStatus::Unauthenticated, ..Self::default() };
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }
}

/// Validate the stored token, bounded by `limit`.
pub async fn check_session(backend: &dyn Backend, session: &SessionStore, limit: Duration) -> SessionCheck {
    if !session.has_token() {
        info!("no stored session; login required");
        return SessionCheck::NoToken;
    }

    match tokio::time::timeout(limit, backend.check_session()).await {
        Ok(Ok(())) => SessionCheck::Valid,
        Ok(Err(ApiError::Unauthorized { .. })) => {
            warn!("session expired; clearing stored token");
            session.clear();
            SessionCheck::Expired
        }
        Ok(Err(e)) => {
            warn!(error = %e, "session check failed; backend may not be running");
            SessionCheck::Unreachable
        }
        Err(_) => {
            warn!(timeout = ?limit, "session check timed out");
            SessionCheck::Unreachable
        }
    }
}

/// Submit credentials and store the returned token so later runs reuse it.
///
/// # Errors
///
/// See [`LoginError`].
pub async fn login(
    backend: &dyn Backend,
    session: &SessionStore,
    user_id: &str,
    password: &str,
) -> Result<(), LoginError> {
    if user_id.trim().is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let req = LoginRequest { user_id: user_id.trim().to_owned(), user_pw: password.to_owned() };
    match backend.login(&req).await {
        Ok(resp) => {
            let Some(token) = resp.session_id.filter(|t| !t.is_empty()) else {
                warn!(user_id = %req.user_id, "login succeeded without a session token");
                return Err(LoginError::NoSession);
            };
            session.store(&token)?;
            info!(user_id = %req.user_id, "logged in");
            Ok(())
        }
        Err(e) if e.is_transport() => Err(LoginError::Unreachable),
        Err(ApiError::Unauthorized { message } | ApiError::Backend { message, .. }) => {
            Err(LoginError::Rejected(message))
        }
        Err(e) => {
            warn!(error = %e, "login response unreadable");
            Err(LoginError::Rejected("Login failed.".to_owned()))
        }
    }
}

/// Notify the backend (best effort) and forget the token.
pub async fn logout(backend: &dyn Backend, session: &SessionStore) {
    if let Err(e) = backend.logout().await {
        warn!(error = %e, "logout request failed; clearing session anyway");
    }
    session.clear();
    info!("logged out");
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
