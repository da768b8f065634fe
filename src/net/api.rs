//! Backend trait and its HTTP implementation.
//!
//! DESIGN
//! ======
//! Everything above this module talks to [`Backend`], never to reqwest, so
//! controller tests substitute an in-memory backend. [`HttpBackend`] is the
//! only production implementation.
//!
//! ERROR HANDLING
//! ==============
//! Bodies are read as text first and decoded second, so a non-2xx answer
//! keeps its message even when it is not the JSON we expected. HTTP 401 is
//! split out as [`ApiError::Unauthorized`] because the auth check treats it
//! differently from every other failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{
    AnalysisResponse, AnalyzeRequest, ApiError, ApiKeys, ApiKeysEnvelope, Article, ArticleList, ContentResponse,
    DraftRequest, FinalRequest, LoginRequest, LoginResponse, error_message,
};
use crate::config::ClientConfig;
use crate::state::session::{SESSION_COOKIE, SessionStore};

/// Operations the client needs from the backend service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/auth/login`. `session_id` falls back to the session
    /// cookie when the body carries no token.
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET /api/auth/check`; `Ok` means the current session is valid.
    async fn check_session(&self) -> Result<(), ApiError>;

    /// `POST /api/auth/logout`; the response body is ignored.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /api/settings/api-keys`.
    async fn load_keys(&self) -> Result<ApiKeys, ApiError>;

    /// `POST /api/settings/api-keys`.
    async fn save_keys(&self, keys: &ApiKeys) -> Result<(), ApiError>;

    /// `POST /api/generate/draft`; returns the draft text.
    async fn generate_draft(&self, req: &DraftRequest) -> Result<String, ApiError>;

    /// `POST /api/analyze/draft`.
    async fn analyze_draft(&self, req: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError>;

    /// `POST /api/generate/final`; returns the final document text.
    async fn generate_final(&self, req: &FinalRequest) -> Result<String, ApiError>;

    /// `GET /api/history/articles`.
    async fn list_articles(&self) -> Result<Vec<Article>, ApiError>;
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    check_timeout: Duration,
    session: Arc<SessionStore>,
}

impl HttpBackend {
    /// Build the shared client. Cookies set by the backend are kept for the
    /// life of the process.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if reqwest cannot build a client.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request)
            .connect_timeout(config.timeouts.connect)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_owned(),
            check_timeout: config.timeouts.check,
            session,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        self.send_keeping_cookie(path, request).await.map(|(text, _)| text)
    }

    /// Like [`send`](Self::send), also returning the session cookie the
    /// response sets, if any.
    async fn send_keeping_cookie(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(String, Option<String>), ApiError> {
        let response = request
            .headers(self.session.auth_headers())
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;

        let status = response.status();
        let cookie = response.cookies().find(|c| c.name() == SESSION_COOKIE).map(|c| c.value().to_owned());
        let text = response.text().await.map_err(|e| ApiError::from_reqwest(&e))?;
        debug!(path, status = status.as_u16(), bytes = text.len(), "backend response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { message: error_message(status.as_u16(), &text) });
        }
        if !status.is_success() {
            return Err(ApiError::Backend { status: status.as_u16(), message: error_message(status.as_u16(), &text) });
        }
        Ok((text, cookie))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(path, self.http.get(self.url(path))).await?;
        decode(&text)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<T, ApiError> {
        let text = self.send(path, self.http.post(self.url(path)).json(body)).await?;
        decode(&text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let path = "/api/auth/login";
        let (text, cookie) = self.send_keeping_cookie(path, self.http.post(self.url(path)).json(req)).await?;
        let mut response: LoginResponse = decode(&text)?;
        if response.session_id.as_deref().is_none_or(str::is_empty) {
            response.session_id = cookie;
        }
        Ok(response)
    }

    async fn check_session(&self) -> Result<(), ApiError> {
        let path = "/api/auth/check";
        let request = self.http.get(self.url(path)).timeout(self.check_timeout);
        self.send(path, request).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let path = "/api/auth/logout";
        self.send(path, self.http.post(self.url(path))).await.map(|_| ())
    }

    async fn load_keys(&self) -> Result<ApiKeys, ApiError> {
        let envelope: ApiKeysEnvelope = self.get_json("/api/settings/api-keys").await?;
        Ok(envelope.api_keys)
    }

    async fn save_keys(&self, keys: &ApiKeys) -> Result<(), ApiError> {
        let path = "/api/settings/api-keys";
        self.send(path, self.http.post(self.url(path)).json(keys)).await.map(|_| ())
    }

    async fn generate_draft(&self, req: &DraftRequest) -> Result<String, ApiError> {
        let body: ContentResponse = self.post_json("/api/generate/draft", req).await?;
        Ok(body.content)
    }

    async fn analyze_draft(&self, req: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        self.post_json("/api/analyze/draft", req).await
    }

    async fn generate_final(&self, req: &FinalRequest) -> Result<String, ApiError> {
        let body: ContentResponse = self.post_json("/api/generate/final", req).await?;
        Ok(body.content)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, ApiError> {
        let list: ArticleList = self.get_json("/api/history/articles").await?;
        Ok(list.articles)
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
