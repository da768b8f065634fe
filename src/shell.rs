//! Line-oriented shell that drives the wizard.
//!
//! DESIGN
//! ======
//! The shell owns every piece of client state (wizard, UI, settings,
//! history, preferences) and is the only place that performs terminal
//! output. Commands are parsed into [`Command`] first, then applied by
//! [`Shell::handle`], so tests can script a whole session against a mock
//! backend and a byte buffer.
//!
//! While a wizard phase is in flight the shell is not reading input; it
//! prints one progress line per settled provider from the wizard's event
//! channel and redraws the page once the phase completes. Revealed text
//! (the final document, the detail view) is streamed as it grows.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::components::provider_card::{self, PREVIEW_CHARS};
use crate::components::{floating_menu, modal, step_indicator};
use crate::net::Backend;
use crate::pages;
use crate::provider::{Provider, UnknownProvider};
use crate::state::history::{HistoryState, display_title};
use crate::state::request::{AgeBracket, Gender, Intent, Tone, UnknownChoice};
use crate::state::settings::SettingsState;
use crate::state::ui::{DetailModal, MenuAction, MenuItem, Preferences, UiState, View};
use crate::state::wizard::{
    DetailTarget, SlotStatus, Tally, Wizard, WizardError, WizardEvent, WizardOptions, WizardStep,
};
use crate::util::export::{ExportFormat, UnknownFormat, export, export_saved};
use crate::util::reveal::Reveal;

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Topic(String),
    Audience(String),
    Keywords(String),
    Intent(Intent),
    Tone(Tone),
    Age(AgeBracket),
    Gender(Gender),
    /// Validate step 1 and show the confirmation.
    Next,
    /// Generate (or regenerate) drafts.
    Start,
    Back,
    Analyze,
    Final,
    View(Provider),
    Close,
    Home,
    Restart,
    /// Open or close the floating menu.
    Menu,
    MenuVisible(bool),
    Choose(MenuItem),
    Key(Provider, String),
    Save,
    /// 1-based history position.
    Select(usize),
    Export(ExportFormat),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'; type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a position")]
    NotAPosition(String),
    #[error(transparent)]
    Choice(#[from] UnknownChoice),
    #[error(transparent)]
    Provider(#[from] UnknownProvider),
    #[error(transparent)]
    Format(#[from] UnknownFormat),
}

/// Parse one input line.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let word = word.to_ascii_lowercase();

    let arg = |name: &'static str| if rest.is_empty() { Err(ParseError::MissingArgument(name)) } else { Ok(rest) };

    let command = match word.as_str() {
        "topic" => Command::Topic(arg("topic")?.to_owned()),
        "audience" => Command::Audience(arg("audience")?.to_owned()),
        "keywords" => Command::Keywords(rest.to_owned()),
        "intent" => Command::Intent(arg("intent")?.parse()?),
        "tone" => match arg("tone")?.parse::<Tone>() {
            Ok(tone) => Command::Tone(tone),
            Err(never) => match never {},
        },
        "age" => Command::Age(arg("age")?.parse()?),
        "gender" => Command::Gender(arg("gender")?.parse()?),
        "next" => Command::Next,
        "start" | "generate" => Command::Start,
        "back" => Command::Back,
        "analyze" => Command::Analyze,
        "final" => Command::Final,
        "view" => Command::View(arg("view")?.parse()?),
        "close" => Command::Close,
        "home" => Command::Home,
        "restart" => Command::Restart,
        "menu" => match rest {
            "" => Command::Menu,
            "hide" => Command::MenuVisible(false),
            "show" => Command::MenuVisible(true),
            other => Command::Choose(floating_menu::parse_item(other).ok_or_else(|| ParseError::Unknown(line.to_owned()))?),
        },
        "settings" => Command::Choose(MenuItem::Settings),
        "history" => Command::Choose(MenuItem::History),
        "key" => {
            let (provider, key) = arg("key")?.split_once(char::is_whitespace).ok_or(ParseError::MissingArgument("key"))?;
            Command::Key(provider.parse()?, key.trim().to_owned())
        }
        "save" => Command::Save,
        "select" => {
            let raw = arg("select")?;
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => Command::Select(n),
                _ => return Err(ParseError::NotAPosition(raw.to_owned())),
            }
        }
        "export" => Command::Export(arg("export")?.parse()?),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => match floating_menu::parse_item(line) {
            Some(item) => Command::Choose(item),
            None => return Err(ParseError::Unknown(word)),
        },
    };
    Ok(command)
}

pub const HELP: &str = "\
step 1:   topic <text> · audience <text> · keywords <a, b> · intent <name> · tone <name|text>
          age <name> · gender <name> · next
wizard:   start · back · analyze · final · view <provider> · close · home · restart
menu:     menu · menu <1-4|name> · menu hide · menu show · settings · history
settings: key <provider> <value> · save
history:  select <n> · export <plain|html|naver>
other:    show · help · quit";

// =============================================================================
// SHELL
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W> {
    backend: Arc<dyn Backend>,
    wizard: Wizard,
    events: mpsc::UnboundedReceiver<WizardEvent>,
    ui: UiState,
    prefs: Preferences,
    settings: SettingsState,
    history: HistoryState,
    reveal_interval: Duration,
    color: bool,
    out: W,
}

impl<W: Write> Shell<W> {
    /// `settings` should already be loaded; its keys seed the wizard.
    pub fn new(
        backend: Arc<dyn Backend>,
        settings: SettingsState,
        prefs: Preferences,
        options: WizardOptions,
        out: W,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let wizard = Wizard::new(Arc::clone(&backend), settings.keys.clone(), options).with_events(tx);
        Self {
            backend,
            wizard,
            events,
            ui: UiState::default(),
            prefs,
            settings,
            history: HistoryState::default(),
            reveal_interval: options.reveal_interval,
            color: false,
            out,
        }
    }

    /// Colour provider badges with ANSI escapes.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Only terminal I/O failures end the loop early.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), ShellError> {
        self.render()?;
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(ParseError::Empty) => continue,
                Err(e) => {
                    writeln!(self.out, "! {e}")?;
                    continue;
                }
            };
            debug!(?command, "shell command");
            if self.handle(command).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Run every step without prompting: drafts, analyses, final document.
    ///
    /// # Errors
    ///
    /// The first [`WizardError`] stops the run, e.g. a missing topic or no
    /// successful drafts.
    pub async fn run_auto(&mut self) -> Result<(), ShellError> {
        self.wizard.submit_input()?;
        writeln!(self.out, "{}", pages::wizard::request_summary(self.wizard.request()))?;
        self.generate().await?;
        self.render()?;
        self.analyze().await?;
        self.render()?;
        self.finalize().await?;
        Ok(())
    }

    /// Apply one command and redraw.
    ///
    /// # Errors
    ///
    /// Terminal I/O failures only; user-level problems are printed.
    pub async fn handle(&mut self, command: Command) -> Result<Flow, ShellError> {
        match command {
            Command::Topic(topic) => self.wizard.request_mut().topic = topic,
            Command::Audience(audience) => self.wizard.request_mut().audience = audience,
            Command::Keywords(raw) => self.wizard.request_mut().set_keywords_from_str(&raw),
            Command::Intent(intent) => self.wizard.request_mut().toggle_intent(intent),
            Command::Tone(tone) => self.wizard.request_mut().tone = tone,
            Command::Age(bracket) => self.wizard.request_mut().toggle_age(bracket),
            Command::Gender(gender) => self.wizard.request_mut().gender = gender,
            Command::Next => {
                let outcome = self.wizard.submit_input().map_err(ShellError::from);
                self.report(outcome)?;
            }
            Command::Start => {
                let outcome = self.generate().await.map(|_| ());
                self.report(outcome)?;
            }
            Command::Back => {
                let outcome = self.wizard.back().map_err(ShellError::from);
                self.report(outcome)?;
            }
            Command::Analyze => {
                let outcome = self.analyze().await.map(|_| ());
                self.report(outcome)?;
            }
            Command::Final => {
                let outcome = self.finalize().await;
                let done = outcome.is_ok();
                self.report(outcome)?;
                if done {
                    writeln!(self.out, "\n{}", pages::wizard::DONE_HINT)?;
                    return Ok(Flow::Continue);
                }
            }
            Command::View(provider) => {
                self.view(provider).await?;
                return Ok(Flow::Continue);
            }
            Command::Close => {
                if self.ui.modal.is_none() {
                    writeln!(self.out, "Nothing to close.")?;
                }
                self.ui.close_modal();
            }
            Command::Home => self.go_home()?,
            Command::Restart => {
                self.ui.close_modal();
                self.ui.view = View::Wizard;
                self.wizard.restart();
            }
            Command::Menu => {
                if self.prefs.floating_menu_visible() {
                    self.ui.toggle_menu();
                } else {
                    writeln!(self.out, "The menu is hidden; `menu show` brings it back.")?;
                    return Ok(Flow::Continue);
                }
            }
            Command::MenuVisible(visible) => {
                if let Err(e) = self.prefs.set_floating_menu_visible(visible) {
                    warn!(error = %e, "saving menu preference failed");
                    writeln!(self.out, "! {e}")?;
                }
                if !visible {
                    self.ui.menu_open = false;
                }
            }
            Command::Choose(item) => self.choose(item).await?,
            Command::Key(provider, key) => {
                self.ui.view = View::Settings;
                self.settings.edit(provider, &key);
            }
            Command::Save => {
                let keys = self.settings.keys.clone();
                if self.settings.save(self.backend.as_ref(), keys).await.is_ok() {
                    self.wizard.set_keys(self.settings.keys.clone());
                }
                self.ui.view = View::Settings;
            }
            Command::Select(position) => {
                if !position.checked_sub(1).is_some_and(|index| self.history.select(index)) {
                    writeln!(self.out, "! no document #{position}")?;
                    return Ok(Flow::Continue);
                }
                self.ui.view = View::History;
            }
            Command::Export(format) => {
                self.export(format)?;
                return Ok(Flow::Continue);
            }
            Command::Show => {}
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        self.render()?;
        Ok(Flow::Continue)
    }

    // -- phases --------------------------------------------------------------

    async fn generate(&mut self) -> Result<Tally, ShellError> {
        self.ui.view = View::Wizard;
        if self.wizard.step() == WizardStep::Input {
            self.wizard.submit_input()?;
        }
        let tally = drive(self.wizard.start_generation(), &mut self.events, &mut self.out, self.color).await??;
        for provider in Provider::ALL {
            if let Some(reveal) = &self.wizard.draft(provider).reveal {
                reveal.reached(PREVIEW_CHARS).await;
            }
        }
        Ok(tally)
    }

    async fn analyze(&mut self) -> Result<Tally, ShellError> {
        self.ui.view = View::Wizard;
        Ok(drive(self.wizard.analyze(), &mut self.events, &mut self.out, self.color).await??)
    }

    async fn finalize(&mut self) -> Result<(), ShellError> {
        self.ui.view = View::Wizard;
        drive(self.wizard.synthesize(), &mut self.events, &mut self.out, self.color).await??;
        if let Some(doc) = self.wizard.final_document() {
            writeln!(self.out, "{}\n", step_indicator::render(self.wizard.step()))?;
            stream_reveal(&doc.reveal, &mut self.out, "").await?;
        }
        Ok(())
    }

    // -- views ---------------------------------------------------------------

    async fn view(&mut self, provider: Provider) -> Result<(), ShellError> {
        let analysed = self.wizard.step().number() >= 3 && self.wizard.analysis(provider).status == SlotStatus::Success;
        let (target, title) = if analysed {
            (DetailTarget::Analysis(provider), format!("{} analysis", provider.label()))
        } else {
            (DetailTarget::Draft(provider), format!("{} draft", provider.label()))
        };
        let Some(text) = self.wizard.detail_text(target) else {
            writeln!(self.out, "! no {} result to show", provider.label())?;
            return Ok(());
        };

        self.ui.open_modal(DetailModal::open(title, &text, self.reveal_interval));
        if let Some(open) = &self.ui.modal {
            writeln!(self.out, "{}", modal::header(&open.title))?;
            stream_reveal(&open.reveal, &mut self.out, "│ ").await?;
            writeln!(self.out, "{}", modal::FOOTER)?;
        }
        Ok(())
    }

    async fn choose(&mut self, item: MenuItem) -> Result<(), ShellError> {
        match self.ui.choose(item) {
            MenuAction::Open(View::Settings) => {
                if self.settings.load(self.backend.as_ref()).await.is_ok() {
                    self.wizard.set_keys(self.settings.keys.clone());
                }
            }
            MenuAction::Open(View::History) => {
                let _ = self.history.refresh(self.backend.as_ref()).await;
            }
            MenuAction::Open(View::Wizard) => {}
            MenuAction::Home => self.go_home()?,
            MenuAction::Notice(message) => writeln!(self.out, "{message}")?,
        }
        Ok(())
    }

    fn go_home(&mut self) -> Result<(), ShellError> {
        self.ui.view = View::Wizard;
        self.ui.menu_open = false;
        let outcome = self.wizard.go_home().map_err(ShellError::from);
        self.report(outcome)
    }

    /// Export the selected history document on the history page, the final
    /// document elsewhere.
    fn export(&mut self, format: ExportFormat) -> Result<(), ShellError> {
        let exported = match self.ui.view {
            View::History => self.history.selected().map(|a| export_saved(&a.content, display_title(a), format)),
            View::Wizard | View::Settings => self.wizard.final_document().map(|d| export(&d.content, format)),
        };
        match exported {
            Some(text) => writeln!(self.out, "{text}")?,
            None => writeln!(self.out, "! nothing to export yet")?,
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), ShellError> {
        let page = match self.ui.view {
            View::Wizard => pages::wizard::render(&self.wizard, self.color),
            View::Settings => pages::settings::render(&self.settings),
            View::History => pages::history::render(&self.history),
        };
        writeln!(self.out, "{page}")?;
        if let Some(open) = &self.ui.modal {
            writeln!(self.out, "{}", modal::render(open))?;
        }
        if let Some(menu) = floating_menu::render(self.prefs.floating_menu_visible(), self.ui.menu_open) {
            writeln!(self.out, "{menu}")?;
        }
        Ok(())
    }

    /// Print wizard failures for the user; pass I/O failures up.
    fn report(&mut self, outcome: Result<(), ShellError>) -> Result<(), ShellError> {
        match outcome {
            Ok(()) => Ok(()),
            Err(ShellError::Wizard(e)) => {
                writeln!(self.out, "! {e}")?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Await `phase`, printing a line for every provider that settles meanwhile.
async fn drive<T, W: Write>(
    phase: impl Future<Output = T>,
    events: &mut mpsc::UnboundedReceiver<WizardEvent>,
    out: &mut W,
    color: bool,
) -> io::Result<T> {
    tokio::pin!(phase);
    loop {
        tokio::select! {
            outcome = &mut phase => {
                while let Ok(event) = events.try_recv() {
                    progress_line(&event, out, color)?;
                }
                return Ok(outcome);
            }
            Some(event) = events.recv() => progress_line(&event, out, color)?,
        }
    }
}

fn progress_line<W: Write>(event: &WizardEvent, out: &mut W, color: bool) -> io::Result<()> {
    let (provider, status, what) = match event {
        WizardEvent::DraftSettled { provider, status } => (*provider, *status, "draft"),
        WizardEvent::AnalysisSettled { provider, status } => (*provider, *status, "analysis"),
        WizardEvent::StepChanged(_) | WizardEvent::FinalReady | WizardEvent::FinalFailed(_) => return Ok(()),
    };
    writeln!(
        out,
        "  {} {what} {}",
        provider_card::header(provider, color),
        provider_card::status_label(status)
    )?;
    out.flush()
}

/// Write the reveal's text as it grows, prefixing each line with `margin`.
async fn stream_reveal<W: Write>(reveal: &Reveal, out: &mut W, margin: &str) -> io::Result<()> {
    let mut shown = reveal.subscribe();
    let mut written = 0usize;
    write!(out, "{margin}")?;
    loop {
        written = write_delta(reveal.displayed(), written, out, margin)?;
        if reveal.is_complete() {
            break;
        }
        if shown.changed().await.is_err() {
            // ticker gone; print whatever it published last
            write_delta(reveal.displayed(), written, out, margin)?;
            break;
        }
    }
    writeln!(out)
}

fn write_delta<W: Write>(text: &str, from: usize, out: &mut W, margin: &str) -> io::Result<usize> {
    for ch in text[from..].chars() {
        if ch == '\n' {
            write!(out, "\n{margin}")?;
        } else {
            write!(out, "{ch}")?;
        }
    }
    out.flush()?;
    Ok(text.len())
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
