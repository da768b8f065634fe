use std::sync::Arc;

use super::*;
use crate::net::mock::{MockBackend, Reply};
use crate::net::types::Article;
use crate::state::request::GenerationRequest;
use crate::storage::ClientStorage;

fn shell(mock: &Arc<MockBackend>) -> Shell<Vec<u8>> {
    let settings = SettingsState { keys: crate::net::types::ApiKeys::default(), ..SettingsState::default() };
    let prefs = Preferences::load(Arc::new(ClientStorage::in_memory()));
    Shell::new(mock.clone(), settings, prefs, WizardOptions::default(), Vec::new())
}

fn prefilled(mock: &Arc<MockBackend>) -> Shell<Vec<u8>> {
    let mut shell = shell(mock);
    *shell.wizard_mut().request_mut() = GenerationRequest::new("블로그 수익화", "초보 블로거");
    shell
}

fn text(shell: &Shell<Vec<u8>>) -> String {
    String::from_utf8_lossy(shell.output()).into_owned()
}

fn article(id: &str, title: &str, content: &str) -> Article {
    Article {
        id: id.to_owned(),
        title: title.to_owned(),
        topic: None,
        content: content.to_owned(),
        created_date: String::new(),
        model: None,
        article_intent: None,
        target_audience: None,
    }
}

// =============================================================================
// parse_command
// =============================================================================

#[test]
fn parses_step_one_fields() {
    assert_eq!(parse_command("topic 블로그 수익화"), Ok(Command::Topic("블로그 수익화".into())));
    assert_eq!(parse_command("intent travel"), Ok(Command::Intent(Intent::TravelReview)));
    assert_eq!(parse_command("age 20s"), Ok(Command::Age(AgeBracket::Twenties)));
    assert_eq!(parse_command("gender 여성"), Ok(Command::Gender(Gender::Female)));
    assert_eq!(parse_command("tone 담백하게"), Ok(Command::Tone(Tone::Custom("담백하게".into()))));
    assert_eq!(parse_command("keywords"), Ok(Command::Keywords(String::new())));
}

#[test]
fn parses_wizard_and_menu_commands() {
    assert_eq!(parse_command("  START "), Ok(Command::Start));
    assert_eq!(parse_command("view groq"), Ok(Command::View(Provider::Groq)));
    assert_eq!(parse_command("view ChatGPT"), Ok(Command::View(Provider::ChatGpt)));
    assert_eq!(parse_command("menu"), Ok(Command::Menu));
    assert_eq!(parse_command("menu 4"), Ok(Command::Choose(MenuItem::QuickGenerate)));
    assert_eq!(parse_command("menu hide"), Ok(Command::MenuVisible(false)));
    assert_eq!(parse_command("2"), Ok(Command::Choose(MenuItem::History)));
    assert_eq!(parse_command("key gemini AIza-new"), Ok(Command::Key(Provider::Gemini, "AIza-new".into())));
    assert_eq!(parse_command("select 2"), Ok(Command::Select(2)));
    assert_eq!(parse_command("export naver"), Ok(Command::Export(ExportFormat::NaverBlog)));
}

#[test]
fn rejects_bad_input() {
    assert_eq!(parse_command("   "), Err(ParseError::Empty));
    assert_eq!(parse_command("topic"), Err(ParseError::MissingArgument("topic")));
    assert_eq!(parse_command("key groq"), Err(ParseError::MissingArgument("key")));
    assert_eq!(parse_command("select 0"), Err(ParseError::NotAPosition("0".into())));
    assert!(matches!(parse_command("view claude"), Err(ParseError::Provider(_))));
    assert!(matches!(parse_command("intent poetry"), Err(ParseError::Choice(_))));
    assert_eq!(parse_command("dance"), Err(ParseError::Unknown("dance".into())));
}

// =============================================================================
// interactive session
// =============================================================================

#[tokio::test]
async fn typed_fields_reach_confirmation() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    let script = "topic 블로그 수익화\naudience 초보 블로거\nintent informational\nage 20s\nnext\n";
    shell.run(script.as_bytes()).await.unwrap();

    let wizard = shell.wizard();
    assert_eq!(wizard.step(), WizardStep::Confirm);
    assert_eq!(wizard.request().ages(), &[AgeBracket::Twenties]);
    assert_eq!(wizard.request().article_intent(), "정보성");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn next_without_topic_prints_error() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    shell.run("next\nquit\n".as_bytes()).await.unwrap();
    assert!(text(&shell).contains("! please enter the topic\n"));
    assert_eq!(shell.wizard().step(), WizardStep::Input);
}

#[tokio::test]
async fn full_session_reaches_final_document() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = prefilled(&mock);
    shell.run("start\nanalyze\nfinal\nquit\n".as_bytes()).await.unwrap();

    let out = text(&shell);
    assert!(out.contains("  [GPT] ChatGPT draft done\n"));
    assert!(out.contains("\n3 succeeded\n`analyze`"));
    assert!(out.contains("  [G] Gemini analysis done\n"));
    assert!(out.contains("# Final\n\nMerged body.\n"));
    assert_eq!(shell.wizard().step(), WizardStep::Done);
}

#[tokio::test]
async fn failed_provider_has_nothing_to_view() {
    let mock = Arc::new(MockBackend::new());
    mock.set_draft(Provider::Groq, Reply::Status(429, "Too Many Requests".into()));
    let mut shell = prefilled(&mock);
    shell.run("start\nview groq\nview chatgpt\n".as_bytes()).await.unwrap();

    let out = text(&shell);
    assert!(out.contains("  [GQ] Groq draft failed\n"));
    assert!(out.contains("! no Groq result to show\n"));
    assert!(out.contains("┌─ ChatGPT draft\n│ # ChatGPT draft\n│ \n│ Body written by ChatGPT.\n└─ type `close` to return\n"));
    assert!(shell.ui().modal.is_some());
}

#[tokio::test]
async fn close_drops_the_modal() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = prefilled(&mock);
    shell.run("start\nview gemini\nclose\nclose\n".as_bytes()).await.unwrap();
    assert!(shell.ui().modal.is_none());
    assert!(text(&shell).contains("Nothing to close.\n"));
}

#[tokio::test]
async fn unknown_command_keeps_going() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = prefilled(&mock);
    shell.run("dance\nnext\n".as_bytes()).await.unwrap();
    assert!(text(&shell).contains("! unknown command 'dance'"));
    assert_eq!(shell.wizard().step(), WizardStep::Confirm);
}

// =============================================================================
// menu, settings, history
// =============================================================================

#[tokio::test]
async fn quick_generate_is_announced_and_closes_menu() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    shell.run("menu\n4\n".as_bytes()).await.unwrap();
    assert!(text(&shell).contains("Quick generate is coming soon.\n"));
    assert!(!shell.ui().menu_open);
}

#[tokio::test]
async fn hidden_menu_cannot_open() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    shell.run("menu hide\nmenu\n".as_bytes()).await.unwrap();
    assert!(text(&shell).contains("The menu is hidden"));
    assert!(!shell.ui().menu_open);
}

#[tokio::test]
async fn home_from_menu_keeps_results() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = prefilled(&mock);
    shell.run("start\nmenu\nhome\n".as_bytes()).await.unwrap();
    assert_eq!(shell.wizard().step(), WizardStep::Input);
    assert_eq!(shell.wizard().draft_tally().succeeded, 3);
}

#[tokio::test]
async fn saved_keys_reach_the_wizard() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    shell.run("settings\nkey groq gsk_new\nsave\n".as_bytes()).await.unwrap();

    assert_eq!(shell.wizard().keys().groq, "gsk_new");
    assert_eq!(shell.wizard().keys().openai, "sk-openai");
    let saved = mock.recorded.lock().unwrap().saved_keys.clone();
    assert_eq!(saved.last().map(|k| k.groq.as_str()), Some("gsk_new"));
    assert!(text(&shell).contains("Saved.\n"));
}

#[tokio::test]
async fn history_select_and_export() {
    let mock = Arc::new(MockBackend::new());
    *mock.articles.lock().unwrap() = Reply::Ok(vec![
        article("1", "first", "# One"),
        article("2", "second", "# Two\n- point"),
    ]);
    let mut shell = shell(&mock);
    shell.run("history\nselect 2\nexport html\nselect 9\n".as_bytes()).await.unwrap();

    let out = text(&shell);
    assert!(out.contains(">  2. second"));
    assert!(out.contains("<h1>second</h1>\n<h1>Two</h1>\n<li>point</li>\n"));
    assert!(out.contains("! no document #9\n"));
}

#[tokio::test]
async fn select_zero_reports_missing_document() {
    let mock = Arc::new(MockBackend::new());
    *mock.articles.lock().unwrap() = Reply::Ok(vec![article("1", "first", "# One")]);
    let mut shell = shell(&mock);
    shell.run("history\n".as_bytes()).await.unwrap();

    let flow = shell.handle(Command::Select(0)).await.unwrap();
    assert!(matches!(flow, Flow::Continue));
    assert!(text(&shell).contains("! no document #0\n"));
    assert_eq!(shell.history.selected().map(|a| a.id.as_str()), Some("1"));
}

#[tokio::test]
async fn export_before_final_has_nothing() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    shell.run("export plain\n".as_bytes()).await.unwrap();
    assert!(text(&shell).contains("! nothing to export yet\n"));
}

// =============================================================================
// automatic run
// =============================================================================

#[tokio::test]
async fn auto_run_writes_final_document() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = prefilled(&mock);
    shell.run_auto().await.unwrap();

    assert_eq!(shell.wizard().step(), WizardStep::Done);
    assert!(text(&shell).contains("Merged body."));
    assert_eq!(mock.recorded.lock().unwrap().finals.len(), 1);
}

#[tokio::test]
async fn auto_run_stops_without_drafts() {
    let mock = Arc::new(MockBackend::new());
    for provider in Provider::ALL {
        mock.set_draft(provider, Reply::Transport);
    }
    let mut shell = prefilled(&mock);
    let err = shell.run_auto().await.unwrap_err();
    assert!(matches!(err, ShellError::Wizard(WizardError::NoSuccessfulDrafts)));
}

#[tokio::test]
async fn auto_run_requires_topic() {
    let mock = Arc::new(MockBackend::new());
    let mut shell = shell(&mock);
    let err = shell.run_auto().await.unwrap_err();
    assert!(matches!(err, ShellError::Wizard(WizardError::MissingField(_))));
}

#[tokio::test(start_paused = true)]
async fn final_document_streams_in_full() {
    let mock = Arc::new(MockBackend::new());
    let options = WizardOptions { reveal_interval: Duration::from_millis(30), ..WizardOptions::default() };
    let prefs = Preferences::load(Arc::new(ClientStorage::in_memory()));
    let mut shell = Shell::new(mock.clone(), SettingsState::default(), prefs, options, Vec::new());
    *shell.wizard_mut().request_mut() = GenerationRequest::new("블로그 수익화", "초보 블로거");

    shell.run_auto().await.unwrap();
    assert!(text(&shell).contains("# Final\n\nMerged body.\n"));
}
