//! Vote Ledger.
//!
//! A vote counts when the article is inside the voting window and the user
//! is not yet in its vote record. The record insert is the arbiter: only the
//! caller whose insert succeeded applies the score and count increments, so
//! concurrent voters converge to exactly one increment each.

use tally_core::config::RankingConfig;
use tally_core::errors::{TallyError, TallyResult};
use tally_core::keys::{SCORE_INDEX, TIME_INDEX};
use tally_core::models::fields;
use tally_core::{ArticleId, IRankStore, VoteOutcome};

pub fn cast_vote(
    store: &dyn IRankStore,
    config: &RankingConfig,
    now: i64,
    user: &str,
    id: ArticleId,
) -> TallyResult<VoteOutcome> {
    let member = id.key().to_string();
    let posted = store
        .zset_score(TIME_INDEX, &member)?
        .ok_or_else(|| TallyError::ArticleNotFound { id: id.to_string() })?;

    let cutoff = now.saturating_sub(config.voting_window_secs);
    if posted < cutoff as f64 {
        tracing::debug!(article_id = %id, user, "vote rejected: window closed");
        return Ok(VoteOutcome::WindowClosed);
    }

    if !store.set_add(&id.voted_key().to_string(), user)? {
        tracing::debug!(article_id = %id, user, "vote ignored: duplicate");
        return Ok(VoteOutcome::Duplicate);
    }

    let score = store.zset_incr(SCORE_INDEX, &member, config.vote_score_increment)?;
    let votes = store.hash_incr(&member, fields::VOTES, 1)?;
    tracing::debug!(article_id = %id, user, votes, score, "vote accepted");
    Ok(VoteOutcome::Accepted {
        votes: votes.max(0) as u64,
        score,
    })
}
