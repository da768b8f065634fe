//! Session token store.
//!
//! The token is opaque. It is created by a successful login, sent on every
//! authenticated call as `X-Session-ID`, and removed on logout or when the
//! backend answers the startup check with 401.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::storage::{ClientStorage, SESSION_KEY, StorageError};

pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// Cookie the backend sets on login.
pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<ClientStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<ClientStorage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(SESSION_KEY).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted.
    pub fn store(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(SESSION_KEY, token)
    }

    /// Forget the token. A failed write is logged; the in-memory value is
    /// gone either way.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            warn!(error = %e, "failed to persist session removal");
        }
    }

    /// Headers for an authenticated call; empty when no token is held.
    #[must_use]
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token() {
            match HeaderValue::from_str(&token) {
                Ok(value) => {
                    headers.insert(SESSION_HEADER, value);
                }
                Err(_) => warn!("stored session token is not a valid header value; sending none"),
            }
        }
        headers
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
