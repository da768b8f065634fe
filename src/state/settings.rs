//! Provider credential settings.
//!
//! Credentials are stored by the backend per user; this state only mirrors
//! them. A failed load or save leaves the last known values in place.

use tracing::{info, warn};

use crate::net::Backend;
use crate::net::types::{ApiError, ApiKeys};
use crate::provider::Provider;

#[derive(Clone, Debug, Default)]
pub struct SettingsState {
    pub keys: ApiKeys,
    /// Set once a load has succeeded.
    pub loaded: bool,
    /// Set after a successful save, cleared by the next load or edit.
    pub saved: bool,
    pub error: Option<String>,
}

impl SettingsState {
    /// Fetch the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns the backend error; `self.keys` is left unchanged.
    pub async fn load(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        self.saved = false;
        match backend.load_keys().await {
            Ok(keys) => {
                self.keys = keys;
                self.loaded = true;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "loading API keys failed; keeping previous values");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Store `keys` on the backend and adopt them locally on success.
    ///
    /// # Errors
    ///
    /// Returns the backend error; `self.keys` is left unchanged.
    pub async fn save(&mut self, backend: &dyn Backend, keys: ApiKeys) -> Result<(), ApiError> {
        match backend.save_keys(&keys).await {
            Ok(()) => {
                info!(missing = ?keys.missing(), "API keys saved");
                self.keys = keys;
                self.saved = true;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "saving API keys failed");
                self.saved = false;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Local edit before saving.
    pub fn edit(&mut self, provider: Provider, key: &str) {
        self.keys.set(provider, key.trim());
        self.saved = false;
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
