use std::sync::Arc;

use super::*;
use crate::net::mock::{MockBackend, Reply};
use crate::storage::ClientStorage;

const LIMIT: Duration = Duration::from_secs(5);

fn session_with(token: Option<&str>) -> SessionStore {
    let session = SessionStore::new(Arc::new(ClientStorage::in_memory()));
    if let Some(token) = token {
        session.store(token).unwrap();
    }
    session
}

// =============================================================
// AuthState
// =============================================================

#[test]
fn auth_state_default_is_checking() {
    let state = AuthState::default();
    assert_eq!(state.status, AuthStatus::Checking);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn failed_login_records_error() {
    let mut state = AuthState { loading: true, ..AuthState::default() };
    state.apply_login(&Err(LoginError::Rejected("bad password".into())));
    assert!(!state.loading);
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert_eq!(state.error.as_deref(), Some("bad password"));

    state.apply_login(&Ok(()));
    assert!(state.is_authenticated());
    assert!(state.error.is_none());
}

#[test]
fn unreachable_check_shows_no_error() {
    let mut state = AuthState::default();
    state.apply_check(SessionCheck::Unreachable);
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert!(state.error.is_none());
}

// =============================================================
// check_session
// =============================================================

#[tokio::test]
async fn no_token_skips_network() {
    let mock = MockBackend::new();
    let session = session_with(None);
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::NoToken);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn valid_token_authenticates() {
    let mock = MockBackend::new();
    let session = session_with(Some("tok"));
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::Valid);
    assert!(session.has_token());
}

#[tokio::test]
async fn unauthorized_clears_token() {
    let mock = MockBackend::new();
    mock.set_check(Reply::Status(401, "expired".into()));
    let session = session_with(Some("tok"));
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::Expired);
    assert!(!session.has_token());
}

#[tokio::test(start_paused = true)]
async fn timeout_keeps_token() {
    let mock = MockBackend::new();
    mock.set_check(Reply::Hang);
    let session = session_with(Some("tok"));
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::Unreachable);
    assert_eq!(session.token().as_deref(), Some("tok"));
}

#[tokio::test]
async fn other_failures_keep_token() {
    let mock = MockBackend::new();
    mock.set_check(Reply::Status(500, "db down".into()));
    let session = session_with(Some("tok"));
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::Unreachable);
    assert!(session.has_token());

    mock.set_check(Reply::Transport);
    assert_eq!(check_session(&mock, &session, LIMIT).await, SessionCheck::Unreachable);
    assert!(session.has_token());
}

// =============================================================
// login / logout
// =============================================================

#[tokio::test]
async fn login_stores_token() {
    let mock = MockBackend::new();
    let session = session_with(None);
    login(&mock, &session, " writer ", "pw").await.unwrap();
    assert_eq!(session.token().as_deref(), Some("tok-mock"));
    assert_eq!(mock.recorded.lock().unwrap().logins, vec![("writer".to_owned(), "pw".to_owned())]);
}

#[tokio::test]
async fn login_without_any_token_fails() {
    let mock = MockBackend::new();
    *mock.login.lock().unwrap() = Reply::Ok(crate::net::types::LoginResponse::default());
    let session = session_with(None);
    let err = login(&mock, &session, "writer", "pw").await.unwrap_err();
    assert!(matches!(err, LoginError::NoSession));
    assert!(!session.has_token());
}

#[tokio::test]
async fn login_surfaces_backend_detail() {
    let mock = MockBackend::new();
    *mock.login.lock().unwrap() = Reply::Status(401, "아이디 또는 비밀번호가 올바르지 않습니다.".into());
    let session = session_with(None);
    let err = login(&mock, &session, "writer", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "아이디 또는 비밀번호가 올바르지 않습니다.");
}

#[tokio::test]
async fn login_unreachable_is_distinct() {
    let mock = MockBackend::new();
    *mock.login.lock().unwrap() = Reply::Transport;
    let session = session_with(None);
    let err = login(&mock, &session, "writer", "pw").await.unwrap_err();
    assert!(matches!(err, LoginError::Unreachable));
}

#[tokio::test]
async fn login_requires_both_fields() {
    let mock = MockBackend::new();
    let session = session_with(None);
    assert!(matches!(login(&mock, &session, "", "pw").await, Err(LoginError::MissingCredentials)));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn logout_clears_even_when_backend_fails() {
    let mock = MockBackend::new();
    *mock.logout.lock().unwrap() = Reply::Transport;
    let session = session_with(Some("tok"));
    logout(&mock, &session).await;
    assert!(!session.has_token());
    assert_eq!(mock.calls(), vec!["logout"]);
}
