mod config_error;
mod storage_error;

pub use config_error::ConfigError;
pub use storage_error::StorageError;

/// Top-level error for every tally operation.
///
/// Rejected votes, duplicate votes and redundant membership changes are not
/// errors; they come back as values (`VoteOutcome`, `GroupChange`).
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    #[error("article not found: {id}")]
    ArticleNotFound { id: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("malformed record {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl TallyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True when the failure came from the store rather than from the caller.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

pub type TallyResult<T> = Result<T, TallyError>;
