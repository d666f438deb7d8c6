/// Tally system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Score added to an article for each accepted vote.
pub const VOTE_SCORE_INCREMENT: f64 = 432.0;

/// How long after posting an article still accepts votes (one week).
pub const VOTING_WINDOW_SECS: i64 = 7 * 86_400;

/// Default page size for ranked listings.
pub const ARTICLES_PER_PAGE: usize = 25;

/// Lifetime of a cached group-ranked view.
pub const GROUP_VIEW_TTL_SECS: u64 = 60;

/// Vote count every article starts with (the poster's implicit vote).
pub const INITIAL_VOTES: u64 = 1;
