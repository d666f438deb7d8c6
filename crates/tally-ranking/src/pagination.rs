//! Pagination View: a 1-based page of a ranked index, best first, hydrated.

use tally_core::errors::{TallyError, TallyResult};
use tally_core::{Article, ArticleId, IRankStore, RangeOrder};

use crate::articles;

/// Inclusive rank bounds of `page` (1-based).
pub fn page_bounds(page: usize, page_size: usize) -> TallyResult<(i64, i64)> {
    if page == 0 {
        return Err(TallyError::invalid("page numbers start at 1"));
    }
    if page_size == 0 {
        return Err(TallyError::invalid("page size must be at least 1"));
    }
    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size - 1);
    Ok((to_rank(start), to_rank(end)))
}

fn to_rank(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Hydrated articles ranked `[start, end]` in `index_key`, highest score first.
/// A page past the end is empty, not an error.
pub fn list(
    store: &dyn IRankStore,
    index_key: &str,
    page: usize,
    page_size: usize,
) -> TallyResult<Vec<Article>> {
    let (start, end) = page_bounds(page, page_size)?;
    let members = store.zset_range(index_key, start, end, RangeOrder::Descending)?;
    members
        .iter()
        .map(|member| {
            let id: ArticleId = member.parse().map_err(|_| TallyError::MalformedRecord {
                key: index_key.to_string(),
                reason: format!("member {member:?} is not an article key"),
            })?;
            articles::hydrate(store, id)
        })
        .collect()
}
