//! Provider failure classification.
//!
//! Backend errors for generation calls carry the provider's raw error text,
//! which is rarely fit to show a user. A failure is matched against a small
//! set of known signatures in a fixed order; the first match wins. Anything
//! unrecognized keeps a cleaned-up version of its own text.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ApiError;

/// Raw messages longer than this are cut and suffixed with `...`.
pub const MAX_RAW_MESSAGE_CHARS: usize = 200;

const QUOTA_SIGNATURES: &[&str] = &["insufficient_quota", "quota", "할당량"];
const DEPRECATED_SIGNATURES: &[&str] = &["model_decommissioned", "decommissioned", "llama-3.1-70b-versatile"];
const RATE_LIMIT_SIGNATURES: &[&str] = &["rate_limit", "rate limit", "too many requests", "429", "요청 한도"];
const CREDENTIAL_SIGNATURES: &[&str] = &["invalid_api_key", "authentication", "api 키"];

static EMBEDDED_MESSAGE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"'message':\s*'([^']+)'").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    QuotaExceeded,
    ModelDeprecated,
    RateLimited,
    InvalidCredential,
    /// The backend never answered.
    Connectivity,
    /// Unrecognized; holds the message to display.
    Other(String),
}

impl ProviderFailure {
    #[must_use]
    pub fn classify(err: &ApiError) -> Self {
        match err {
            ApiError::Timeout | ApiError::Transport(_) => Self::Connectivity,
            ApiError::Backend { status: 429, message } => match Self::classify_message(message) {
                Self::Other(_) => Self::RateLimited,
                known => known,
            },
            ApiError::Backend { message, .. } | ApiError::Unauthorized { message } => Self::classify_message(message),
            ApiError::Decode(detail) | ApiError::HttpClientBuild(detail) => Self::classify_message(detail),
        }
    }

    #[must_use]
    pub fn classify_message(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let has = |signatures: &[&str]| signatures.iter().any(|s| lowered.contains(s));

        if has(QUOTA_SIGNATURES) {
            Self::QuotaExceeded
        } else if has(DEPRECATED_SIGNATURES) {
            Self::ModelDeprecated
        } else if has(RATE_LIMIT_SIGNATURES) {
            Self::RateLimited
        } else if has(CREDENTIAL_SIGNATURES) {
            Self::InvalidCredential
        } else {
            Self::Other(clean_message(raw))
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::QuotaExceeded => {
                "API quota exceeded.\nCheck the account's billing and usage (https://platform.openai.com/usage).".to_owned()
            }
            Self::ModelDeprecated => {
                "The provider's model is no longer supported.\nSee https://console.groq.com/docs/deprecations.".to_owned()
            }
            Self::RateLimited => "API rate limit reached.\nPlease try again shortly.".to_owned(),
            Self::InvalidCredential => "The API key is invalid.\nCheck the key in settings.".to_owned(),
            Self::Connectivity => "Network error: the backend could not be reached.".to_owned(),
            Self::Other(message) => message.clone(),
        }
    }
}

fn clean_message(raw: &str) -> String {
    if let Some(re) = EMBEDDED_MESSAGE.as_ref() {
        if let Some(found) = re.captures(raw).and_then(|c| c.get(1)) {
            return found.as_str().to_owned();
        }
    }
    truncate_chars(raw, MAX_RAW_MESSAGE_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
#[path = "failure_test.rs"]
mod tests;
