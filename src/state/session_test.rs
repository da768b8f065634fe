use super::*;

fn store() -> SessionStore {
    SessionStore::new(Arc::new(ClientStorage::in_memory()))
}

#[test]
fn empty_store_has_no_headers() {
    let session = store();
    assert!(!session.has_token());
    assert!(session.auth_headers().is_empty());
}

#[test]
fn stored_token_becomes_header() {
    let session = store();
    session.store("abc123").unwrap();
    assert_eq!(session.token().as_deref(), Some("abc123"));
    let headers = session.auth_headers();
    assert_eq!(headers.get("X-Session-ID").unwrap(), "abc123");
}

#[test]
fn clear_removes_token() {
    let session = store();
    session.store("abc123").unwrap();
    session.clear();
    assert!(!session.has_token());
    assert!(session.auth_headers().is_empty());
}

#[test]
fn empty_token_counts_as_absent() {
    let session = store();
    session.store("").unwrap();
    assert!(!session.has_token());
}

#[test]
fn invalid_header_token_is_skipped() {
    let session = store();
    session.store("bad\nvalue").unwrap();
    assert!(session.has_token());
    assert!(session.auth_headers().is_empty());
}

#[test]
fn token_persists_across_stores() {
    let dir = tempfile::tempdir().unwrap();
    SessionStore::new(Arc::new(ClientStorage::open(dir.path()).unwrap()))
        .store("persisted")
        .unwrap();
    let reopened = SessionStore::new(Arc::new(ClientStorage::open(dir.path()).unwrap()));
    assert_eq!(reopened.token().as_deref(), Some("persisted"));
}
