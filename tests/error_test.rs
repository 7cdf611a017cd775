use std::time::Duration;

use heimdall::{HeimdallError, ModelId};

#[test]
fn error_display() {
    let err = HeimdallError::UnknownModel("gpt-9".into());
    assert_eq!(err.to_string(), "unknown model: gpt-9");

    let err = HeimdallError::Configuration("cache.max_size must be at least 1".into());
    assert_eq!(
        err.to_string(),
        "configuration error: cache.max_size must be at least 1"
    );

    let err = HeimdallError::Backend("503 service unavailable".into());
    assert_eq!(err.to_string(), "backend error: 503 service unavailable");

    let err = HeimdallError::Timeout(Duration::from_secs(5));
    assert_eq!(err.to_string(), "backend timed out after 5s");
}

#[test]
fn transient_errors() {
    assert!(HeimdallError::Backend("reset".into()).is_transient());
    assert!(HeimdallError::Timeout(Duration::from_millis(250)).is_transient());
    assert!(!HeimdallError::UnknownModel("x".into()).is_transient());
    assert!(!HeimdallError::Configuration("x".into()).is_transient());
}

#[test]
fn unknown_model_from_parse() {
    let err = "not-a-model".parse::<ModelId>().unwrap_err();
    assert!(matches!(err, HeimdallError::UnknownModel(ref s) if s == "not-a-model"));
}

#[test]
fn result_type_alias() {
    fn parse(s: &str) -> heimdall::Result<ModelId> {
        Ok(s.parse()?)
    }
    assert_eq!(parse("compound-beta").unwrap(), ModelId::WebSearch);
    assert!(parse("nope").is_err());
}
