use super::*;
use crate::net::mock::{MockBackend, Reply};

#[tokio::test]
async fn load_adopts_backend_keys() {
    let mock = MockBackend::new();
    let mut state = SettingsState::default();
    state.load(&mock).await.unwrap();
    assert!(state.loaded);
    assert_eq!(state.keys.openai, "sk-openai");
}

#[tokio::test]
async fn failed_load_keeps_previous_keys() {
    let mock = MockBackend::new();
    let mut state = SettingsState::default();
    state.load(&mock).await.unwrap();

    *mock.keys.lock().unwrap() = Reply::Transport;
    assert!(state.load(&mock).await.is_err());
    assert_eq!(state.keys.gemini, "AIza-gemini");
    assert!(state.error.is_some());
}

#[tokio::test]
async fn save_sends_and_adopts_keys() {
    let mock = MockBackend::new();
    let mut state = SettingsState::default();
    let mut keys = ApiKeys::default();
    keys.set(Provider::Groq, "gsk_new");
    state.save(&mock, keys.clone()).await.unwrap();

    assert!(state.saved);
    assert_eq!(state.keys, keys);
    assert_eq!(mock.recorded.lock().unwrap().saved_keys, vec![keys]);
}

#[tokio::test]
async fn failed_save_keeps_previous_keys() {
    let mock = MockBackend::new();
    *mock.save.lock().unwrap() = Reply::Status(500, "API 키 저장 중 오류".into());
    let mut state = SettingsState::default();
    state.keys.set(Provider::ChatGpt, "sk-old");

    let mut keys = ApiKeys::default();
    keys.set(Provider::ChatGpt, "sk-new");
    assert!(state.save(&mock, keys).await.is_err());
    assert_eq!(state.keys.openai, "sk-old");
    assert!(!state.saved);
    assert!(state.error.as_deref().unwrap().contains("API 키 저장 중 오류"));
}

#[test]
fn edit_trims_and_clears_saved_flag() {
    let mut state = SettingsState { saved: true, ..SettingsState::default() };
    state.edit(Provider::Gemini, "  AIza-1 ");
    assert_eq!(state.keys.gemini, "AIza-1");
    assert!(!state.saved);
}
