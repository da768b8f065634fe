use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use multidraft::config::{ClientConfig, ConfigError};
use multidraft::net::types::ApiError;
use multidraft::net::{Backend, HttpBackend};
use multidraft::pages;
use multidraft::provider::Provider;
use multidraft::shell::{Shell, ShellError};
use multidraft::state::auth::{self, AuthState, LoginError, SessionCheck};
use multidraft::state::history::{HistoryState, display_title};
use multidraft::state::request::{AgeBracket, Gender, GenerationRequest, Intent, Tone};
use multidraft::state::session::SessionStore;
use multidraft::state::settings::SettingsState;
use multidraft::state::ui::Preferences;
use multidraft::state::wizard::WizardOptions;
use multidraft::storage::{ClientStorage, StorageError};
use multidraft::util::export::{ExportFormat, export, export_saved};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("not signed in; run `multidraft login --user-id <ID>` first")]
    NotSignedIn,
    #[error("cannot reach the backend at {0}; the stored session was kept, try again once it is running")]
    BackendUnreachable(String),
    #[error("no document #{0} in history")]
    NoSuchDocument(usize),
}

#[derive(Parser, Debug)]
#[command(name = "multidraft", about = "Draft with ChatGPT, Gemini and Groq, compare, and merge")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "MULTIDRAFT_BACKEND_URL")]
    base_url: Option<String>,

    /// Directory for the session and preferences file.
    #[arg(long, env = "MULTIDRAFT_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the backend URL and whether the stored session is valid.
    Status,
    Login {
        #[arg(long)]
        user_id: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "MULTIDRAFT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    Keys(KeysCommand),
    /// List previously generated documents.
    History {
        /// 1-based position of the document to show.
        #[arg(long)]
        select: Option<usize>,
        #[arg(long)]
        export: Option<ExportFormat>,
    },
    /// Run the writing wizard.
    Write(WriteArgs),
    Menu(MenuCommand),
}

#[derive(Args, Debug)]
struct KeysCommand {
    #[command(subcommand)]
    command: KeysSubcommand,
}

#[derive(Subcommand, Debug)]
enum KeysSubcommand {
    Show,
    /// Update one or more provider keys; unspecified keys keep their value.
    Set {
        #[arg(long)]
        openai: Option<String>,
        #[arg(long)]
        gemini: Option<String>,
        #[arg(long)]
        groq: Option<String>,
    },
}

#[derive(Args, Debug)]
struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Subcommand, Debug)]
enum MenuSubcommand {
    /// Show or hide the floating menu.
    Toggle,
}

#[derive(Args, Debug)]
struct WriteArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    audience: Option<String>,
    /// Comma-separated keywords.
    #[arg(long)]
    keywords: Option<String>,
    #[arg(long = "intent")]
    intents: Vec<Intent>,
    /// Preset name or free text.
    #[arg(long)]
    tone: Option<String>,
    #[arg(long = "age")]
    ages: Vec<AgeBracket>,
    #[arg(long)]
    gender: Option<Gender>,
    /// Run every step without prompting.
    #[arg(long)]
    yes: bool,
    /// With `--yes`: print the final document in this format on stdout and
    /// send progress to stderr.
    #[arg(long, requires = "yes")]
    export: Option<ExportFormat>,
}

/// Everything a subcommand needs.
struct Context {
    config: ClientConfig,
    storage: Arc<ClientStorage>,
    session: Arc<SessionStore>,
    backend: Arc<dyn Backend>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_backend_url(url)?;
    }
    if let Some(dir) = cli.state_dir {
        config = config.with_state_dir(dir);
    }

    let storage = Arc::new(ClientStorage::open(&config.state_dir)?);
    let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config, Arc::clone(&session))?);
    let ctx = Context { config, storage, session, backend };

    match cli.command {
        Command::Status => run_status(&ctx).await,
        Command::Login { user_id, password } => run_login(&ctx, &user_id, password).await,
        Command::Logout => {
            auth::logout(ctx.backend.as_ref(), &ctx.session).await;
            println!("signed out");
            Ok(())
        }
        Command::Keys(keys) => run_keys(&ctx, keys).await,
        Command::History { select, export } => run_history(&ctx, select, export).await,
        Command::Write(args) => run_write(&ctx, args).await,
        Command::Menu(menu) => match menu.command {
            MenuSubcommand::Toggle => {
                let mut prefs = Preferences::load(Arc::clone(&ctx.storage));
                let visible = prefs.toggle_floating_menu()?;
                println!("floating menu {}", if visible { "shown" } else { "hidden" });
                Ok(())
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();
}

async fn run_status(ctx: &Context) -> Result<(), CliError> {
    println!("backend: {}", ctx.config.backend_url);
    println!("state:   {}", ctx.config.state_dir.display());
    let check = auth::check_session(ctx.backend.as_ref(), &ctx.session, ctx.config.timeouts.check).await;
    let mut state = AuthState::default();
    state.apply_check(check);
    let detail = match check {
        SessionCheck::Valid => "signed in",
        SessionCheck::NoToken => "no stored session",
        SessionCheck::Expired => "session expired (token removed)",
        SessionCheck::Unreachable => "backend unreachable (token kept)",
    };
    println!("session: {detail}");
    if !state.is_authenticated() {
        print!("\n{}", pages::login::render(&state));
    }
    Ok(())
}

async fn run_login(ctx: &Context, user_id: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    auth::login(ctx.backend.as_ref(), &ctx.session, user_id, &password).await?;
    println!("signed in as {}", user_id.trim());
    Ok(())
}

fn read_password() -> Result<String, CliError> {
    eprint!("password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

async fn require_session(ctx: &Context) -> Result<(), CliError> {
    let check = auth::check_session(ctx.backend.as_ref(), &ctx.session, ctx.config.timeouts.check).await;
    session_gate(check, &ctx.config.backend_url)
}

fn session_gate(check: SessionCheck, backend_url: &str) -> Result<(), CliError> {
    match check {
        SessionCheck::Valid => Ok(()),
        SessionCheck::NoToken | SessionCheck::Expired => Err(CliError::NotSignedIn),
        SessionCheck::Unreachable => Err(CliError::BackendUnreachable(backend_url.to_owned())),
    }
}

async fn run_keys(ctx: &Context, keys: KeysCommand) -> Result<(), CliError> {
    require_session(ctx).await?;
    let mut settings = SettingsState::default();
    settings.load(ctx.backend.as_ref()).await?;

    if let KeysSubcommand::Set { openai, gemini, groq } = keys.command {
        let updates = [(Provider::ChatGpt, openai), (Provider::Gemini, gemini), (Provider::Groq, groq)];
        for (provider, key) in updates {
            if let Some(key) = key {
                settings.edit(provider, &key);
            }
        }
        let keys = settings.keys.clone();
        settings.save(ctx.backend.as_ref(), keys).await?;
    }
    print!("{}", pages::settings::render(&settings));
    Ok(())
}

async fn run_history(ctx: &Context, select: Option<usize>, format: Option<ExportFormat>) -> Result<(), CliError> {
    require_session(ctx).await?;
    let mut history = HistoryState::default();
    history.refresh(ctx.backend.as_ref()).await?;
    if let Some(position) = select {
        if position == 0 || !history.select(position - 1) {
            return Err(CliError::NoSuchDocument(position));
        }
    }

    match (format, history.selected()) {
        (Some(format), Some(article)) => {
            println!("{}", export_saved(&article.content, display_title(article), format));
        }
        _ => print!("{}", pages::history::render(&history)),
    }
    Ok(())
}

async fn run_write(ctx: &Context, args: WriteArgs) -> Result<(), CliError> {
    require_session(ctx).await?;
    let mut settings = SettingsState::default();
    if let Err(e) = settings.load(ctx.backend.as_ref()).await {
        eprintln!("warning: could not load API keys ({e}); the backend defaults apply");
    }
    let prefs = Preferences::load(Arc::clone(&ctx.storage));
    let options = WizardOptions::from(&ctx.config);
    let request = build_request(&args);

    if let Some(format) = args.export {
        let mut shell = Shell::new(Arc::clone(&ctx.backend), settings, prefs, options, io::stderr());
        *shell.wizard_mut().request_mut() = request;
        shell.run_auto().await?;
        if let Some(doc) = shell.wizard().final_document() {
            println!("{}", export(&doc.content, format));
        }
        return Ok(());
    }

    let color = io::stdout().is_terminal();
    let mut shell = Shell::new(Arc::clone(&ctx.backend), settings, prefs, options, io::stdout()).with_color(color);
    *shell.wizard_mut().request_mut() = request;
    if args.yes {
        shell.run_auto().await?;
    } else {
        shell.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;
    }
    Ok(())
}

fn build_request(args: &WriteArgs) -> GenerationRequest {
    let mut request = GenerationRequest::new(
        args.topic.clone().unwrap_or_default(),
        args.audience.clone().unwrap_or_default(),
    );
    if let Some(keywords) = &args.keywords {
        request.set_keywords_from_str(keywords);
    }
    for intent in &args.intents {
        request.toggle_intent(*intent);
    }
    if let Some(tone) = &args.tone {
        request.tone = match tone.parse::<Tone>() {
            Ok(tone) => tone,
            Err(never) => match never {},
        };
    }
    for bracket in &args.ages {
        request.toggle_age(*bracket);
    }
    if let Some(gender) = args.gender {
        request.gender = gender;
    }
    request
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
