//! Group Membership. Changes never touch cached group views; those age out
//! on their own TTL.

use tally_core::errors::TallyResult;
use tally_core::keys::group_key;
use tally_core::{ArticleId, GroupChange, IRankStore};

/// Resolve every group key up front so a bad name changes nothing.
fn group_keys(groups: &[&str]) -> TallyResult<Vec<String>> {
    groups.iter().map(|g| group_key(g)).collect()
}

pub fn add_to_groups(store: &dyn IRankStore, id: ArticleId, groups: &[&str]) -> TallyResult<GroupChange> {
    update_groups(store, id, groups, &[])
}

pub fn remove_from_groups(
    store: &dyn IRankStore,
    id: ArticleId,
    groups: &[&str],
) -> TallyResult<GroupChange> {
    update_groups(store, id, &[], groups)
}

/// Add to `to_add`, then remove from `to_remove`. Redundant changes are no-ops.
pub fn update_groups(
    store: &dyn IRankStore,
    id: ArticleId,
    to_add: &[&str],
    to_remove: &[&str],
) -> TallyResult<GroupChange> {
    let add_keys = group_keys(to_add)?;
    let remove_keys = group_keys(to_remove)?;
    let member = id.key().to_string();

    let mut change = GroupChange::default();
    for key in &add_keys {
        if store.set_add(key, &member)? {
            change.added += 1;
        }
    }
    for key in &remove_keys {
        if store.set_remove(key, &member)? {
            change.removed += 1;
        }
    }
    tracing::debug!(
        article_id = %id,
        added = change.added,
        removed = change.removed,
        "group membership updated"
    );
    Ok(change)
}
