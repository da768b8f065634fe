use super::*;

fn backend(status: u16, message: &str) -> ApiError {
    ApiError::Backend { status, message: message.to_owned() }
}

#[test]
fn quota_wins_over_rate_limit() {
    let err = backend(429, "Error code: 429 - {'error': {'code': 'insufficient_quota'}}");
    assert_eq!(ProviderFailure::classify(&err), ProviderFailure::QuotaExceeded);
}

#[test]
fn deprecated_model_detected() {
    let err = backend(400, "The model `llama-3.1-70b-versatile` has been decommissioned");
    assert_eq!(ProviderFailure::classify(&err), ProviderFailure::ModelDeprecated);
}

#[test]
fn rate_limit_by_text_or_status() {
    assert_eq!(ProviderFailure::classify_message("rate_limit_exceeded"), ProviderFailure::RateLimited);
    assert_eq!(ProviderFailure::classify_message("Too Many Requests"), ProviderFailure::RateLimited);
    assert_eq!(ProviderFailure::classify(&backend(429, "slow down")), ProviderFailure::RateLimited);
}

#[test]
fn invalid_credential_detected() {
    assert_eq!(ProviderFailure::classify_message("Incorrect API key: invalid_api_key"), ProviderFailure::InvalidCredential);
    assert_eq!(ProviderFailure::classify_message("API 키가 없습니다"), ProviderFailure::InvalidCredential);
}

#[test]
fn transport_is_connectivity() {
    assert_eq!(ProviderFailure::classify(&ApiError::Timeout), ProviderFailure::Connectivity);
    assert_eq!(
        ProviderFailure::classify(&ApiError::Transport("connection refused".into())),
        ProviderFailure::Connectivity
    );
}

#[test]
fn embedded_message_fragment_is_extracted() {
    let raw = "Error code: 400 - {'error': {'message': 'Context length exceeded', 'type': 'invalid_request'}}";
    assert_eq!(
        ProviderFailure::classify_message(raw),
        ProviderFailure::Other("Context length exceeded".into())
    );
}

#[test]
fn long_raw_message_is_truncated_on_char_boundary() {
    let raw = "가".repeat(250);
    let ProviderFailure::Other(message) = ProviderFailure::classify_message(&raw) else {
        panic!("expected Other");
    };
    assert!(message.ends_with("..."));
    assert_eq!(message.chars().count(), MAX_RAW_MESSAGE_CHARS + 3);
}

#[test]
fn short_raw_message_is_kept() {
    assert_eq!(ProviderFailure::classify_message("boom"), ProviderFailure::Other("boom".into()));
}

#[test]
fn user_messages_are_distinct() {
    let rate = ProviderFailure::RateLimited.user_message();
    assert!(rate.contains("rate limit"));
    assert_ne!(rate, ProviderFailure::QuotaExceeded.user_message());
    assert_eq!(ProviderFailure::Other("x".into()).user_message(), "x");
}
