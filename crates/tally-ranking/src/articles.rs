//! Article Store Adapter: creates article records and owns both global indices.

use tally_core::config::RankingConfig;
use tally_core::constants::INITIAL_VOTES;
use tally_core::errors::{TallyError, TallyResult};
use tally_core::keys::{ARTICLE_COUNTER, SCORE_INDEX, TIME_INDEX};
use tally_core::{Article, ArticleId, IRankStore};

/// Create an article posted by `user` at `now` and return its id.
///
/// Writes, in order: the vote record (poster only, expiring with the voting
/// window), the attributes, the score index entry, the time index entry. The
/// time index goes last, so a vote can never land on a half-written article.
pub fn submit(
    store: &dyn IRankStore,
    config: &RankingConfig,
    now: i64,
    user: &str,
    title: &str,
    link: &str,
) -> TallyResult<ArticleId> {
    let raw = store.incr(ARTICLE_COUNTER)?;
    let id = u64::try_from(raw)
        .map(ArticleId)
        .map_err(|_| TallyError::MalformedRecord {
            key: ARTICLE_COUNTER.to_string(),
            reason: format!("id counter went negative: {raw}"),
        })?;

    let voted = id.voted_key().to_string();
    store.set_add(&voted, user)?;
    store.expire(&voted, config.vote_record_ttl())?;

    let article = Article {
        id,
        title: title.to_string(),
        link: link.to_string(),
        poster: user.to_string(),
        time: now,
        votes: INITIAL_VOTES,
    };
    let member = id.key().to_string();
    store.hash_set_all(&member, &article.to_fields())?;
    store.zset_add(SCORE_INDEX, &member, now as f64 + config.vote_score_increment)?;
    store.zset_add(TIME_INDEX, &member, now as f64)?;

    tracing::info!(article_id = %id, poster = user, "article submitted");
    Ok(id)
}

/// Fetch every attribute of an article.
pub fn hydrate(store: &dyn IRankStore, id: ArticleId) -> TallyResult<Article> {
    let record = store.hash_get_all(&id.key().to_string())?;
    Article::from_fields(id, &record).inspect_err(|e| {
        if let TallyError::MalformedRecord { key, reason } = e {
            tracing::warn!(key = %key, reason = %reason, "malformed article record");
        }
    })
}

/// Current score-index value, `None` if the article was never indexed.
pub fn score(store: &dyn IRankStore, id: ArticleId) -> TallyResult<Option<f64>> {
    store.zset_score(SCORE_INDEX, &id.key().to_string())
}

/// Posting time as recorded in the time index.
pub fn posted_at(store: &dyn IRankStore, id: ArticleId) -> TallyResult<Option<i64>> {
    Ok(store
        .zset_score(TIME_INDEX, &id.key().to_string())?
        .map(|t| t as i64))
}
