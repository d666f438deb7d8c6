/// Failures of the backing store. All of them reach the caller as
/// `TallyError::StoreUnavailable`; the engine never retries.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("key {key} holds a {actual}, expected a {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid value at {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("store lock poisoned: {context}")]
    LockPoisoned { context: String },
}
