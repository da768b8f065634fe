//! Wizard controller: topic → drafts → analyses → final document.
//!
//! DESIGN
//! ======
//! `Wizard` is the single owner of all wizard state. Every phase method
//! takes `&mut self`, so nothing else can write while requests are in
//! flight. A phase fans the same request out to every eligible provider,
//! applies each result to that provider's slot the moment it arrives, and
//! only changes step once every request has settled. One provider failing
//! never touches another provider's slot.
//!
//! STEPS
//! =====
//! `Input → Confirm → Generating → Drafted → Analyzing → Analyzed →
//! Synthesizing → Done`, shown to the user as steps 1–4. Going back never
//! discards results; only `restart` does.
//!
//! Progress is published as [`WizardEvent`]s on an optional channel so a
//! renderer can redraw while a phase is still running.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::request::{GenerationRequest, RequiredField};
use crate::config::ClientConfig;
use crate::net::Backend;
use crate::net::failure::ProviderFailure;
use crate::net::types::{AnalysisResponse, AnalyzeRequest, ApiError, ApiKeys, FinalAnalysis, FinalDraft, FinalRequest};
use crate::provider::{PerProvider, Provider};
use crate::util::reveal::Reveal;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Input,
    Confirm,
    Generating,
    Drafted,
    Analyzing,
    Analyzed,
    Synthesizing,
    Done,
}

impl WizardStep {
    /// Step number shown to the user (1–4).
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Input => 1,
            Self::Confirm | Self::Generating | Self::Drafted => 2,
            Self::Analyzing | Self::Analyzed => 3,
            Self::Synthesizing | Self::Done => 4,
        }
    }

    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Generating | Self::Analyzing | Self::Synthesizing)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self.number() {
            1 => "Topic",
            2 => "Drafts",
            3 => "Analysis",
            _ => "Final",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("please enter the {0}")]
    MissingField(RequiredField),
    #[error("at least one draft must succeed before analysis")]
    NoSuccessfulDrafts,
    #[error("at least one analysis must succeed before the final document")]
    NoSuccessfulAnalyses,
    #[error("cannot {action} from step {from}")]
    InvalidTransition { action: &'static str, from: WizardStep },
    #[error("final document failed: {0}")]
    Synthesis(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftResult {
    pub provider: Provider,
    pub content: String,
    pub status: SlotStatus,
    pub error: Option<String>,
}

impl DraftResult {
    fn idle(provider: Provider) -> Self {
        Self { provider, content: String::new(), status: SlotStatus::Idle, error: None }
    }

    /// First markdown heading of the draft, or `"Draft"`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.content
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with('#'))
            .map(|l| l.trim_start_matches('#').trim())
            .filter(|t| !t.is_empty())
            .unwrap_or("Draft")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub provider: Provider,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub improvement: String,
    pub status: SlotStatus,
    pub error: Option<String>,
}

impl AnalysisResult {
    fn idle(provider: Provider) -> Self {
        Self {
            provider,
            pros: Vec::new(),
            cons: Vec::new(),
            improvement: String::new(),
            status: SlotStatus::Idle,
            error: None,
        }
    }

    /// Markdown rendering used by the detail view.
    #[must_use]
    pub fn detail_text(&self) -> String {
        let bullets = |items: &[String]| {
            if items.is_empty() {
                "- (none)".to_owned()
            } else {
                items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
            }
        };
        format!(
            "# {} analysis\n\n## Strengths\n{}\n\n## Weaknesses\n{}\n\n## Improvements\n{}",
            self.provider.label(),
            bullets(&self.pros),
            bullets(&self.cons),
            self.improvement
        )
    }
}

#[derive(Debug)]
pub struct DraftSlot {
    pub result: DraftResult,
    /// Present once the draft succeeded; dropped when the slot is reset.
    pub reveal: Option<Reveal>,
}

#[derive(Debug)]
pub struct FinalDocument {
    pub content: String,
    pub reveal: Reveal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    StepChanged(WizardStep),
    DraftSettled { provider: Provider, status: SlotStatus },
    AnalysisSettled { provider: Provider, status: SlotStatus },
    FinalReady,
    FinalFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    pub reveal_interval: Duration,
    pub synthesis_provider: Provider,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self { reveal_interval: Duration::ZERO, synthesis_provider: Provider::Gemini }
    }
}

impl From<&ClientConfig> for WizardOptions {
    fn from(config: &ClientConfig) -> Self {
        Self { reveal_interval: config.reveal_interval, synthesis_provider: config.synthesis_provider }
    }
}

/// Count of `(succeeded, failed)` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct Wizard {
    backend: Arc<dyn Backend>,
    keys: ApiKeys,
    options: WizardOptions,
    events: Option<mpsc::UnboundedSender<WizardEvent>>,
    step: WizardStep,
    request: GenerationRequest,
    drafts: PerProvider<DraftSlot>,
    analyses: PerProvider<AnalysisResult>,
    final_doc: Option<FinalDocument>,
    last_error: Option<String>,
}

impl Wizard {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, keys: ApiKeys, options: WizardOptions) -> Self {
        Self {
            backend,
            keys,
            options,
            events: None,
            step: WizardStep::Input,
            request: GenerationRequest::default(),
            drafts: empty_drafts(),
            analyses: PerProvider::from_fn(AnalysisResult::idle),
            final_doc: None,
            last_error: None,
        }
    }

    /// Publish progress on `tx`.
    #[must_use]
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<WizardEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    // -- read access ---------------------------------------------------------

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Step 1 fields. Edits made in later steps apply to the next phase run.
    pub fn request_mut(&mut self) -> &mut GenerationRequest {
        &mut self.request
    }

    #[must_use]
    pub fn draft(&self, provider: Provider) -> &DraftSlot {
        &self.drafts[provider]
    }

    #[must_use]
    pub fn analysis(&self, provider: Provider) -> &AnalysisResult {
        &self.analyses[provider]
    }

    #[must_use]
    pub fn final_document(&self) -> Option<&FinalDocument> {
        self.final_doc.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn keys(&self) -> &ApiKeys {
        &self.keys
    }

    pub fn set_keys(&mut self, keys: ApiKeys) {
        self.keys = keys;
    }

    #[must_use]
    pub fn options(&self) -> WizardOptions {
        self.options
    }

    #[must_use]
    pub fn draft_tally(&self) -> Tally {
        tally(self.drafts.values().map(|s| s.result.status))
    }

    #[must_use]
    pub fn analysis_tally(&self) -> Tally {
        tally(self.analyses.values().map(|a| a.status))
    }

    // -- navigation ----------------------------------------------------------

    /// Step 1 → confirmation.
    ///
    /// # Errors
    ///
    /// [`WizardError::MissingField`] when topic or audience is blank.
    pub fn submit_input(&mut self) -> Result<(), WizardError> {
        self.require(&[WizardStep::Input], "continue")?;
        self.request.validate().map_err(WizardError::MissingField)?;
        self.set_step(WizardStep::Confirm);
        Ok(())
    }

    /// One step back; cached results stay.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] when there is nothing to go back to.
    pub fn back(&mut self) -> Result<(), WizardError> {
        let target = match self.step {
            WizardStep::Confirm | WizardStep::Drafted => WizardStep::Input,
            WizardStep::Analyzed => WizardStep::Drafted,
            from => return Err(WizardError::InvalidTransition { action: "go back", from }),
        };
        self.set_step(target);
        Ok(())
    }

    /// Return to step 1 without discarding results.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] while a phase is running.
    pub fn go_home(&mut self) -> Result<(), WizardError> {
        if self.step.is_busy() {
            return Err(WizardError::InvalidTransition { action: "go home", from: self.step });
        }
        self.set_step(WizardStep::Input);
        Ok(())
    }

    /// Discard everything and start over at step 1. Pending reveals stop.
    pub fn restart(&mut self) {
        self.request = GenerationRequest::default();
        self.drafts = empty_drafts();
        self.analyses = PerProvider::from_fn(AnalysisResult::idle);
        self.final_doc = None;
        self.last_error = None;
        info!("wizard restarted");
        self.set_step(WizardStep::Input);
    }

    // -- phases --------------------------------------------------------------

    /// Fan the draft request out to every provider and wait for all of them.
    ///
    /// Runs from the confirmation step, or from `Drafted` to regenerate.
    /// Previous analyses and the final document are discarded.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] from any other step, or
    /// [`WizardError::MissingField`] if the request was emptied meanwhile.
    pub async fn start_generation(&mut self) -> Result<Tally, WizardError> {
        self.require(&[WizardStep::Confirm, WizardStep::Drafted], "generate drafts")?;
        self.request.validate().map_err(WizardError::MissingField)?;

        let missing = self.keys.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|p| p.label()).collect();
            warn!(providers = ?names, "no API key configured; relying on backend defaults");
        }

        self.drafts = PerProvider::from_fn(|provider| DraftSlot {
            result: DraftResult { status: SlotStatus::Pending, ..DraftResult::idle(provider) },
            reveal: None,
        });
        self.analyses = PerProvider::from_fn(AnalysisResult::idle);
        self.final_doc = None;
        self.last_error = None;
        self.set_step(WizardStep::Generating);
        info!(topic = %self.request.topic.trim(), "generating drafts");

        let mut pending: FuturesUnordered<_> = Provider::ALL
            .into_iter()
            .map(|provider| {
                let backend = Arc::clone(&self.backend);
                let body = self.request.draft_request(provider, self.keys.for_provider(provider));
                async move { (provider, backend.generate_draft(&body).await) }
            })
            .collect();

        while let Some((provider, outcome)) = pending.next().await {
            self.apply_draft(provider, outcome);
        }

        self.set_step(WizardStep::Drafted);
        let tally = self.draft_tally();
        info!(succeeded = tally.succeeded, failed = tally.failed, "drafts settled");
        Ok(tally)
    }

    /// Ask each provider with a successful draft to critique it.
    ///
    /// # Errors
    ///
    /// [`WizardError::NoSuccessfulDrafts`] when every draft failed, or
    /// [`WizardError::InvalidTransition`] outside `Drafted`.
    pub async fn analyze(&mut self) -> Result<Tally, WizardError> {
        self.require(&[WizardStep::Drafted], "analyze")?;
        let eligible: Vec<Provider> = self
            .drafts
            .iter()
            .filter(|(_, slot)| slot.result.status == SlotStatus::Success)
            .map(|(provider, _)| provider)
            .collect();
        if eligible.is_empty() {
            return Err(WizardError::NoSuccessfulDrafts);
        }

        self.analyses = PerProvider::from_fn(|provider| {
            let status = if eligible.contains(&provider) { SlotStatus::Pending } else { SlotStatus::Idle };
            AnalysisResult { status, ..AnalysisResult::idle(provider) }
        });
        self.final_doc = None;
        self.last_error = None;
        self.set_step(WizardStep::Analyzing);

        let mut pending: FuturesUnordered<_> = eligible
            .into_iter()
            .map(|provider| {
                let backend = Arc::clone(&self.backend);
                let body = AnalyzeRequest {
                    draft_content: self.drafts[provider].result.content.clone(),
                    model: provider.api_name().to_owned(),
                    api_key: self.keys.for_provider(provider).to_owned(),
                };
                async move { (provider, backend.analyze_draft(&body).await) }
            })
            .collect();

        while let Some((provider, outcome)) = pending.next().await {
            self.apply_analysis(provider, outcome);
        }

        self.set_step(WizardStep::Analyzed);
        Ok(self.analysis_tally())
    }

    /// Merge every successful draft and analysis into the final document.
    ///
    /// On failure the wizard stays at `Analyzed` with the message in
    /// [`Wizard::last_error`] so the user can retry.
    ///
    /// # Errors
    ///
    /// [`WizardError::NoSuccessfulAnalyses`], [`WizardError::Synthesis`], or
    /// [`WizardError::InvalidTransition`] outside `Analyzed`.
    pub async fn synthesize(&mut self) -> Result<(), WizardError> {
        self.require(&[WizardStep::Analyzed], "generate the final document")?;
        let body = self.final_request();
        if body.analyses.is_empty() {
            return Err(WizardError::NoSuccessfulAnalyses);
        }

        self.final_doc = None;
        self.last_error = None;
        self.set_step(WizardStep::Synthesizing);
        info!(
            drafts = body.drafts.len(),
            analyses = body.analyses.len(),
            provider = %self.options.synthesis_provider,
            "synthesizing final document"
        );

        let outcome = self.backend.generate_final(&body).await;
        match outcome {
            Ok(content) => {
                let reveal = Reveal::start(content.as_str(), self.options.reveal_interval);
                self.final_doc = Some(FinalDocument { content, reveal });
                self.set_step(WizardStep::Done);
                self.emit(WizardEvent::FinalReady);
                Ok(())
            }
            Err(e) => {
                let message = ProviderFailure::classify(&e).user_message();
                warn!(error = %e, code = e.error_code(), "final document failed");
                self.last_error = Some(message.clone());
                self.set_step(WizardStep::Analyzed);
                self.emit(WizardEvent::FinalFailed(message.clone()));
                Err(WizardError::Synthesis(message))
            }
        }
    }

    /// Full text for the detail view of a successful draft or analysis.
    #[must_use]
    pub fn detail_text(&self, target: DetailTarget) -> Option<String> {
        match target {
            DetailTarget::Draft(provider) => {
                let result = &self.drafts[provider].result;
                (result.status == SlotStatus::Success).then(|| result.content.clone())
            }
            DetailTarget::Analysis(provider) => {
                let result = &self.analyses[provider];
                (result.status == SlotStatus::Success).then(|| result.detail_text())
            }
        }
    }

    // -- internals -----------------------------------------------------------

    fn final_request(&self) -> FinalRequest {
        let drafts = self
            .drafts
            .values()
            .filter(|s| s.result.status == SlotStatus::Success)
            .map(|s| FinalDraft { model: s.result.provider.label().to_owned(), content: s.result.content.clone() })
            .collect();
        let analyses = self
            .analyses
            .values()
            .filter(|a| a.status == SlotStatus::Success)
            .map(|a| FinalAnalysis {
                model: a.provider.label().to_owned(),
                pros: a.pros.clone(),
                cons: a.cons.clone(),
                improvement: a.improvement.clone(),
            })
            .collect();
        let synthesizer = self.options.synthesis_provider;
        FinalRequest {
            topic: self.request.topic.trim().to_owned(),
            article_intent: self.request.article_intent(),
            target_audience: self.request.audience.trim().to_owned(),
            tone_style: self.request.tone_style().to_owned(),
            drafts,
            analyses,
            api_key: self.keys.for_provider(synthesizer).to_owned(),
            model: synthesizer.api_name().to_owned(),
        }
    }

    fn apply_draft(&mut self, provider: Provider, outcome: Result<String, ApiError>) {
        let slot = &mut self.drafts[provider];
        match outcome {
            Ok(content) => {
                info!(%provider, chars = content.chars().count(), "draft ready");
                slot.reveal = Some(Reveal::start(content.as_str(), self.options.reveal_interval));
                slot.result = DraftResult { provider, content, status: SlotStatus::Success, error: None };
            }
            Err(e) => {
                warn!(%provider, error = %e, code = e.error_code(), "draft failed");
                slot.reveal = None;
                slot.result = DraftResult {
                    provider,
                    content: String::new(),
                    status: SlotStatus::Error,
                    error: Some(ProviderFailure::classify(&e).user_message()),
                };
            }
        }
        let status = slot.result.status;
        self.emit(WizardEvent::DraftSettled { provider, status });
    }

    fn apply_analysis(&mut self, provider: Provider, outcome: Result<AnalysisResponse, ApiError>) {
        let result = match outcome {
            Ok(body) => AnalysisResult {
                provider,
                pros: body.pros,
                cons: body.cons,
                improvement: body.improvement,
                status: SlotStatus::Success,
                error: None,
            },
            Err(e) => {
                warn!(%provider, error = %e, code = e.error_code(), "analysis failed");
                AnalysisResult {
                    status: SlotStatus::Error,
                    error: Some(ProviderFailure::classify(&e).user_message()),
                    ..AnalysisResult::idle(provider)
                }
            }
        };
        let status = result.status;
        self.analyses[provider] = result;
        self.emit(WizardEvent::AnalysisSettled { provider, status });
    }

    fn require(&self, allowed: &[WizardStep], action: &'static str) -> Result<(), WizardError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition { action, from: self.step })
        }
    }

    fn set_step(&mut self, step: WizardStep) {
        self.step = step;
        self.emit(WizardEvent::StepChanged(step));
    }

    fn emit(&self, event: WizardEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// Which result the detail view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTarget {
    Draft(Provider),
    Analysis(Provider),
}

fn empty_drafts() -> PerProvider<DraftSlot> {
    PerProvider::from_fn(|provider| DraftSlot { result: DraftResult::idle(provider), reveal: None })
}

fn tally(statuses: impl Iterator<Item = SlotStatus>) -> Tally {
    statuses.fold(Tally::default(), |mut t, status| {
        match status {
            SlotStatus::Success => t.succeeded += 1,
            SlotStatus::Error => t.failed += 1,
            SlotStatus::Idle | SlotStatus::Pending => {}
        }
        t
    })
}

#[cfg(test)]
#[path = "wizard_test.rs"]
mod tests;
