//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::provider::Provider;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 30;
pub const DEFAULT_SYNTHESIS_PROVIDER: Provider = Provider::Gemini;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backend URL '{0}' (expected http:// or https://)")]
    InvalidBackendUrl(String),
    #[error("unknown MULTIDRAFT_SYNTHESIS_PROVIDER: {0}")]
    UnknownProvider(String),
    #[error("no config directory available; set MULTIDRAFT_STATE_DIR")]
    NoStateDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Upper bound for the startup session check.
    pub check: Duration,
    /// Upper bound for every other backend request.
    pub request: Duration,
    pub connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            check: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub timeouts: Timeouts,
    /// Delay between revealed characters; zero disables the effect.
    pub reveal_interval: Duration,
    /// Provider whose credential is sent with the synthesis request.
    pub synthesis_provider: Provider,
    /// Directory holding `storage.json`.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build a config with every tunable at its default.
    ///
    /// # Errors
    ///
    /// Returns an error if `backend_url` is not an http(s) URL.
    pub fn new(backend_url: &str, state_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: normalize_backend_url(backend_url)?,
            timeouts: Timeouts::default(),
            reveal_interval: Duration::from_millis(DEFAULT_REVEAL_INTERVAL_MS),
            synthesis_provider: DEFAULT_SYNTHESIS_PROVIDER,
            state_dir,
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `MULTIDRAFT_BACKEND_URL`: default `http://localhost:8000`
    /// - `MULTIDRAFT_CHECK_TIMEOUT_SECS`: default 5
    /// - `MULTIDRAFT_REQUEST_TIMEOUT_SECS`: default 180
    /// - `MULTIDRAFT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MULTIDRAFT_REVEAL_INTERVAL_MS`: default 30
    /// - `MULTIDRAFT_SYNTHESIS_PROVIDER`: `gemini` (default), `openai` or `groq`
    /// - `MULTIDRAFT_STATE_DIR`: default `<config dir>/multidraft`
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed URL, an unknown provider, or when no
    /// state directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = std::env::var("MULTIDRAFT_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned());
        let state_dir = match std::env::var_os("MULTIDRAFT_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };

        let timeouts = Timeouts {
            check: Duration::from_secs(env_parse_u64("MULTIDRAFT_CHECK_TIMEOUT_SECS", DEFAULT_CHECK_TIMEOUT_SECS)),
            request: Duration::from_secs(env_parse_u64("MULTIDRAFT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)),
            connect: Duration::from_secs(env_parse_u64("MULTIDRAFT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)),
        };

        Ok(Self {
            backend_url: normalize_backend_url(&backend_url)?,
            timeouts,
            reveal_interval: Duration::from_millis(env_parse_u64(
                "MULTIDRAFT_REVEAL_INTERVAL_MS",
                DEFAULT_REVEAL_INTERVAL_MS,
            )),
            synthesis_provider: parse_synthesis_provider(std::env::var("MULTIDRAFT_SYNTHESIS_PROVIDER").ok().as_deref())?,
            state_dir,
        })
    }

    /// Replace the backend URL (CLI override).
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an http(s) URL.
    pub fn with_backend_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.backend_url = normalize_backend_url(url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_state_dir(mut self, dir: PathBuf) -> Self {
        self.state_dir = dir;
        self
    }
}

pub(crate) fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBackendUrl(raw.to_owned()))
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_synthesis_provider(raw: Option<&str>) -> Result<Provider, ConfigError> {
    match raw {
        None => Ok(DEFAULT_SYNTHESIS_PROVIDER),
        Some(name) => name.parse().map_err(|_| ConfigError::UnknownProvider(name.to_owned())),
    }
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("multidraft"))
        .ok_or(ConfigError::NoStateDir)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
