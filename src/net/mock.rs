//! In-memory [`Backend`] for controller and state tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::api::Backend;
use super::types::{
    AnalysisResponse, AnalyzeRequest, ApiError, ApiKeys, Article, DraftRequest, FinalRequest, LoginRequest,
    LoginResponse,
};
use crate::provider::{PerProvider, Provider};

/// Scripted outcome of one mock call.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    /// Non-2xx answer; 401 maps to `Unauthorized`.
    Status(u16, String),
    Transport,
    /// Never completes.
    Hang,
}

impl<T> Reply<T> {
    async fn resolve(self, delay: Duration) -> Result<T, ApiError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self {
            Self::Ok(value) => Ok(value),
            Self::Status(401, message) => Err(ApiError::Unauthorized { message }),
            Self::Status(status, message) => Err(ApiError::Backend { status, message }),
            Self::Transport => Err(ApiError::Transport("connection refused".into())),
            Self::Hang => std::future::pending().await,
        }
    }
}

pub(crate) fn draft_text(provider: Provider) -> String {
    format!("# {} draft\n\nBody written by {}.", provider.label(), provider.label())
}

pub(crate) fn analysis_for(provider: Provider) -> AnalysisResponse {
    AnalysisResponse {
        pros: vec![format!("{} is clear", provider.label())],
        cons: vec!["too short".into()],
        improvement: "add examples".into(),
    }
}

#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub calls: Vec<&'static str>,
    pub drafts: Vec<DraftRequest>,
    pub analyses: Vec<AnalyzeRequest>,
    pub finals: Vec<FinalRequest>,
    pub saved_keys: Vec<ApiKeys>,
    pub logins: Vec<(String, String)>,
}

pub(crate) struct MockBackend {
    pub login: Mutex<Reply<LoginResponse>>,
    pub check: Mutex<Reply<()>>,
    pub logout: Mutex<Reply<()>>,
    pub keys: Mutex<Reply<ApiKeys>>,
    pub save: Mutex<Reply<()>>,
    pub drafts: Mutex<PerProvider<Reply<String>>>,
    pub draft_delays: Mutex<PerProvider<Duration>>,
    pub analyses: Mutex<PerProvider<Reply<AnalysisResponse>>>,
    pub final_doc: Mutex<Reply<String>>,
    pub articles: Mutex<Reply<Vec<Article>>>,
    pub recorded: Mutex<Recorded>,
}

impl MockBackend {
    /// Every call succeeds with canned content.
    pub fn new() -> Self {
        Self {
            login: Mutex::new(Reply::Ok(LoginResponse { session_id: Some("tok-mock".into()), message: None })),
            check: Mutex::new(Reply::Ok(())),
            logout: Mutex::new(Reply::Ok(())),
            keys: Mutex::new(Reply::Ok(ApiKeys {
                openai: "sk-openai".into(),
                groq: "gsk_groq".into(),
                gemini: "AIza-gemini".into(),
            })),
            save: Mutex::new(Reply::Ok(())),
            drafts: Mutex::new(PerProvider::from_fn(|p| Reply::Ok(draft_text(p)))),
            draft_delays: Mutex::new(PerProvider::default()),
            analyses: Mutex::new(PerProvider::from_fn(|p| Reply::Ok(analysis_for(p)))),
            final_doc: Mutex::new(Reply::Ok("# Final\n\nMerged body.".into())),
            articles: Mutex::new(Reply::Ok(Vec::new())),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn set_draft(&self, provider: Provider, reply: Reply<String>) {
        self.drafts.lock().unwrap()[provider] = reply;
    }

    pub fn set_draft_delay(&self, provider: Provider, delay: Duration) {
        self.draft_delays.lock().unwrap()[provider] = delay;
    }

    pub fn set_analysis(&self, provider: Provider, reply: Reply<AnalysisResponse>) {
        self.analyses.lock().unwrap()[provider] = reply;
    }

    pub fn set_final(&self, reply: Reply<String>) {
        *self.final_doc.lock().unwrap() = reply;
    }

    pub fn set_check(&self, reply: Reply<()>) {
        *self.check.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.recorded.lock().unwrap().calls.clone()
    }

    fn record(&self, call: &'static str) {
        self.recorded.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.calls.push("login");
            recorded.logins.push((req.user_id.clone(), req.user_pw.clone()));
        }
        let reply = self.login.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn check_session(&self) -> Result<(), ApiError> {
        self.record("check");
        let reply = self.check.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        let reply = self.logout.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn load_keys(&self) -> Result<ApiKeys, ApiError> {
        self.record("load_keys");
        let reply = self.keys.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn save_keys(&self, keys: &ApiKeys) -> Result<(), ApiError> {
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.calls.push("save_keys");
            recorded.saved_keys.push(keys.clone());
        }
        let reply = self.save.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn generate_draft(&self, req: &DraftRequest) -> Result<String, ApiError> {
        let provider = Provider::from_api_name(&req.model).unwrap();
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.calls.push("draft");
            recorded.drafts.push(req.clone());
        }
        let reply = self.drafts.lock().unwrap()[provider].clone();
        let delay = self.draft_delays.lock().unwrap()[provider];
        reply.resolve(delay).await
    }

    async fn analyze_draft(&self, req: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        let provider = Provider::from_api_name(&req.model).unwrap();
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.calls.push("analyze");
            recorded.analyses.push(req.clone());
        }
        let reply = self.analyses.lock().unwrap()[provider].clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn generate_final(&self, req: &FinalRequest) -> Result<String, ApiError> {
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.calls.push("final");
            recorded.finals.push(req.clone());
        }
        let reply = self.final_doc.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>, ApiError> {
        self.record("articles");
        let reply = self.articles.lock().unwrap().clone();
        reply.resolve(Duration::ZERO).await
    }
}
