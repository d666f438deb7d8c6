// Single source of truth for all default values.

use crate::constants;

// --- Ranking ---
pub const DEFAULT_VOTE_SCORE_INCREMENT: f64 = constants::VOTE_SCORE_INCREMENT;
pub const DEFAULT_VOTING_WINDOW_SECS: i64 = constants::VOTING_WINDOW_SECS;
pub const DEFAULT_ARTICLES_PER_PAGE: usize = constants::ARTICLES_PER_PAGE;
pub const DEFAULT_GROUP_VIEW_TTL_SECS: u64 = constants::GROUP_VIEW_TTL_SECS;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "tally.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
