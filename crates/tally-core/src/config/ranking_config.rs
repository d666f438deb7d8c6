use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Knobs of the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Score added per accepted vote.
    pub vote_score_increment: f64,
    /// Seconds after posting during which votes are accepted.
    pub voting_window_secs: i64,
    /// Page size used when the caller does not pass one.
    pub articles_per_page: usize,
    /// Lifetime of a cached group-ranked view, in seconds.
    pub group_view_ttl_secs: u64,
}

impl RankingConfig {
    pub fn group_view_ttl(&self) -> Duration {
        Duration::from_secs(self.group_view_ttl_secs)
    }

    /// The vote record lives exactly as long as the voting window.
    pub fn vote_record_ttl(&self) -> Duration {
        Duration::from_secs(self.voting_window_secs.max(0) as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vote_score_increment.is_finite() && self.vote_score_increment > 0.0) {
            return Err(invalid("ranking.vote_score_increment", "must be a positive number"));
        }
        if self.voting_window_secs <= 0 {
            return Err(invalid("ranking.voting_window_secs", "must be positive"));
        }
        if self.articles_per_page == 0 {
            return Err(invalid("ranking.articles_per_page", "must be at least 1"));
        }
        if self.group_view_ttl_secs == 0 {
            return Err(invalid("ranking.group_view_ttl_secs", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            vote_score_increment: defaults::DEFAULT_VOTE_SCORE_INCREMENT,
            voting_window_secs: defaults::DEFAULT_VOTING_WINDOW_SECS,
            articles_per_page: defaults::DEFAULT_ARTICLES_PER_PAGE,
            group_view_ttl_secs: defaults::DEFAULT_GROUP_VIEW_TTL_SECS,
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
