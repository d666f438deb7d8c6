use tally_core::errors::*;

#[test]
fn article_not_found_carries_id() {
    let err = TallyError::ArticleNotFound { id: "17".into() };
    assert!(err.to_string().contains("17"));
    assert!(!err.is_store_failure());
}

#[test]
fn malformed_record_carries_key_and_reason() {
    let err = TallyError::MalformedRecord {
        key: "article:3".into(),
        reason: "missing field title".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("article:3"));
    assert!(msg.contains("missing field title"));
}

// --- From impls ---

#[test]
fn storage_error_converts_to_store_unavailable() {
    let storage_err = StorageError::SqliteError {
        message: "disk full".into(),
    };
    let err: TallyError = storage_err.into();
    assert!(err.is_store_failure());
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn wrong_type_names_both_structures() {
    let err: TallyError = StorageError::WrongType {
        key: "score:".into(),
        expected: "set",
        actual: "sorted set",
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("score:"));
    assert!(msg.contains("sorted set"));
}

#[test]
fn config_error_converts() {
    let err: TallyError = ConfigError::Parse {
        reason: "bad toml".into(),
    }
    .into();
    assert!(matches!(err, TallyError::Config(_)));
}
