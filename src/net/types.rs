//! Wire types for the backend HTTP/JSON contract.
//!
//! Request structs serialize exactly the field names the backend expects.
//! Response structs are lenient where the backend omits empty fields and
//! strict where a shape mismatch means a broken contract (history).

use serde::{Deserialize, Serialize};

use crate::provider::Provider;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within its time bound.
    #[error("request timed out")]
    Timeout,

    /// The backend could not be reached.
    #[error("cannot reach backend: {0}")]
    Transport(String),

    /// The backend rejected the session (HTTP 401).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The backend returned a non-success status with a message.
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Map a reqwest failure to the transport/timeout/decode split.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Timeouts and connection failures; the backend never answered.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout => "E_TIMEOUT",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Backend { .. } => "E_BACKEND",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// Pull the human message out of an error body.
///
/// The backend reports errors as `{"detail": ...}`; `error` and `message`
/// are accepted as fallbacks. A non-JSON body is returned trimmed, and an
/// empty body becomes `HTTP <status>`.
#[must_use]
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(text)) if !text.is_empty() => return text.clone(),
                Some(serde_json::Value::Null | serde_json::Value::String(_)) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() { format!("HTTP {status}") } else { trimmed.to_owned() }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub user_pw: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Token from the body, or from the `session_id` cookie when the body has none.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// SETTINGS
// =============================================================================

/// The three provider credentials, keyed by backend identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openai: String,
    #[serde(default)]
    pub groq: String,
    #[serde(default)]
    pub gemini: String,
}

impl ApiKeys {
    #[must_use]
    pub fn for_provider(&self, provider: Provider) -> &str {
        match provider {
            Provider::ChatGpt => &self.openai,
            Provider::Gemini => &self.gemini,
            Provider::Groq => &self.groq,
        }
    }

    pub fn set(&mut self, provider: Provider, key: impl Into<String>) {
        let slot = match provider {
            Provider::ChatGpt => &mut self.openai,
            Provider::Gemini => &mut self.gemini,
            Provider::Groq => &mut self.groq,
        };
        *slot = key.into();
    }

    /// Providers whose credential is empty or whitespace.
    #[must_use]
    pub fn missing(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.for_provider(*p).trim().is_empty())
            .collect()
    }

    /// Credential shortened for display: first 3 and last 4 characters.
    #[must_use]
    pub fn masked(&self, provider: Provider) -> String {
        mask_key(self.for_provider(provider))
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    match chars.len() {
        0 => "(not set)".to_owned(),
        1..=8 => "*".repeat(chars.len()),
        n => {
            let head: String = chars[..3].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}…{tail}")
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeysEnvelope {
    #[serde(default)]
    pub api_keys: ApiKeys,
}

// =============================================================================
// GENERATION
// =============================================================================

/// Body of `POST /api/generate/draft`; one per provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftRequest {
    pub topic: String,
    pub article_intent: String,
    pub target_audience: String,
    pub tone_style: String,
    pub detailed_keywords: String,
    pub age_groups: Vec<String>,
    pub gender: String,
    pub model: String,
    pub api_key: String,
}

/// Body of `POST /api/analyze/draft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub draft_content: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub improvement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalDraft {
    /// Provider label, e.g. `"ChatGPT"`.
    pub model: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalAnalysis {
    pub model: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub improvement: String,
}

/// Body of `POST /api/generate/final`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalRequest {
    pub topic: String,
    pub article_intent: String,
    pub target_audience: String,
    pub tone_style: String,
    pub drafts: Vec<FinalDraft>,
    pub analyses: Vec<FinalAnalysis>,
    pub api_key: String,
    /// Backend identifier of the synthesizing provider.
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

// =============================================================================
// HISTORY
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
}

/// A previously generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub article_intent: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
