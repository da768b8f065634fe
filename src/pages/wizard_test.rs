use std::sync::Arc;

use super::*;
use crate::net::mock::{MockBackend, Reply};
use crate::net::types::ApiKeys;
use crate::state::wizard::WizardOptions;

fn wizard(mock: &Arc<MockBackend>) -> Wizard {
    let mut wizard = Wizard::new(mock.clone(), ApiKeys::default(), WizardOptions::default());
    *wizard.request_mut() = GenerationRequest::new("블로그 수익화", "초보 블로거");
    wizard
}

#[test]
fn input_page_lists_fields_and_choices() {
    let mock = Arc::new(MockBackend::new());
    let mut wizard = wizard(&mock);
    wizard.request_mut().toggle_intent(Intent::Informational);
    wizard.request_mut().set_keywords_from_str("애드센스, 제휴");

    let text = render(&wizard, false);
    assert!(text.starts_with("[1]─(2)─(3)─(4)  Step 1 · Topic\n\n"));
    assert!(text.contains("  topic:    블로그 수익화\n"));
    assert!(text.contains("  intent:   정보성\n"));
    assert!(text.contains("  keywords: 애드센스, 제휴\n"));
    assert!(text.contains("  ages:     전체\n"));
    assert!(text.contains("intents: informational, travel,"));
}

#[test]
fn blank_fields_show_placeholders() {
    let summary = request_summary(&GenerationRequest::default());
    assert!(summary.starts_with("  topic:    (required)\n  audience: (required)\n  intent:   (none)\n"));
}

#[tokio::test]
async fn drafted_page_shows_cards_and_summary() {
    let mock = Arc::new(MockBackend::new());
    mock.set_draft(Provider::Groq, Reply::Status(429, "Rate limit reached for model llama".into()));
    let mut wizard = wizard(&mock);
    wizard.submit_input().unwrap();
    wizard.start_generation().await.unwrap();

    let text = render(&wizard, false);
    assert!(text.contains("[GPT] ChatGPT · done\n  ChatGPT draft\n"));
    assert!(text.contains("[GQ] Groq · failed\n  ! API rate limit reached.\n"));
    assert!(text.contains("\n2 succeeded, 1 failed\n`analyze` to continue"));
}

#[tokio::test]
async fn all_failed_drafts_offer_retry() {
    let mock = Arc::new(MockBackend::new());
    for provider in Provider::ALL {
        mock.set_draft(provider, Reply::Transport);
    }
    let mut wizard = wizard(&mock);
    wizard.submit_input().unwrap();
    wizard.start_generation().await.unwrap();
    assert!(render(&wizard, false).contains("No draft succeeded."));
}

#[tokio::test]
async fn done_page_renders_document() {
    let mock = Arc::new(MockBackend::new());
    let mut wizard = wizard(&mock);
    wizard.submit_input().unwrap();
    wizard.start_generation().await.unwrap();
    wizard.analyze().await.unwrap();
    assert!(render(&wizard, false).contains("3 succeeded\n`final`"));

    wizard.synthesize().await.unwrap();
    let text = render(&wizard, false);
    assert!(text.starts_with("(1)━(2)━(3)━[4]  Step 4 · Final\n\nFinal\n═════\n\nMerged body.\n"));
}

#[tokio::test]
async fn synthesis_failure_is_shown() {
    let mock = Arc::new(MockBackend::new());
    mock.set_final(Reply::Status(500, "boom".into()));
    let mut wizard = wizard(&mock);
    wizard.submit_input().unwrap();
    wizard.start_generation().await.unwrap();
    wizard.analyze().await.unwrap();
    assert!(wizard.synthesize().await.is_err());
    assert!(render(&wizard, false).ends_with("! boom\n"));
}
