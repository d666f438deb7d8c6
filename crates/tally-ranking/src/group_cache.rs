//! Group Aggregation Cache.
//!
//! A group-ranked view is the intersection of a group's membership with one
//! global index, max-aggregated, stored under `<index><group>` with a TTL.
//! An existing entry is reused as-is until the store expires it. Two callers
//! that both find it absent both recompute; the result is a pure function of
//! membership and index, so the second write only repeats the first.

use tally_core::config::RankingConfig;
use tally_core::errors::TallyResult;
use tally_core::keys::group_key;
use tally_core::{Article, IRankStore, RankingOrder};

use crate::pagination;

/// Make sure the view for (`group`, `order`) exists. Returns its key and
/// whether this call computed it.
pub fn ensure_view(
    store: &dyn IRankStore,
    config: &RankingConfig,
    group: &str,
    order: RankingOrder,
) -> TallyResult<(String, bool)> {
    let view_key = order.group_view_key(group)?;
    if store.exists(&view_key)? {
        tracing::debug!(view = %view_key, "group view cache hit");
        return Ok((view_key, false));
    }

    let membership = group_key(group)?;
    let size = store.zset_intersect_max(&view_key, &[membership.as_str(), order.index_key()])?;
    store.expire(&view_key, config.group_view_ttl())?;
    tracing::debug!(view = %view_key, size, "group view computed");
    Ok((view_key, true))
}

/// One page of `group` ranked by `order`.
pub fn group_view(
    store: &dyn IRankStore,
    config: &RankingConfig,
    group: &str,
    order: RankingOrder,
    page: usize,
    page_size: usize,
) -> TallyResult<Vec<Article>> {
    pagination::page_bounds(page, page_size)?;
    let (view_key, _) = ensure_view(store, config, group, order)?;
    pagination::list(store, &view_key, page, page_size)
}
