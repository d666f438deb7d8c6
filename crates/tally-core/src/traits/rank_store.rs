use std::collections::HashMap;
use std::time::Duration;

use crate::errors::TallyResult;

/// Direction of a rank range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOrder {
    /// Lowest score first.
    Ascending,
    /// Highest score first.
    Descending,
}

/// The primitives the ranking engine needs from its store.
///
/// Every method is atomic on its own; the engine composes them without
/// cross-call transactions. Keys past their expiry deadline behave as absent
/// for every method, and whichever method touches one first purges it.
/// Touching a key with a different structure than the method expects fails
/// with `StorageError::WrongType`.
pub trait IRankStore: Send + Sync {
    // --- Counters ---
    /// Increment a counter (created at 0) and return the new value.
    fn incr(&self, key: &str) -> TallyResult<i64>;

    // --- Keys ---
    fn exists(&self, key: &str) -> TallyResult<bool>;
    /// Set a time-to-live: the key is live through second `now + ttl` and gone
    /// after it. Returns false when the key does not exist.
    fn expire(&self, key: &str, ttl: Duration) -> TallyResult<bool>;
    /// Remaining time-to-live, `None` for absent or persistent keys.
    fn ttl(&self, key: &str) -> TallyResult<Option<Duration>>;

    // --- Sets ---
    /// Returns true when `member` was newly inserted.
    fn set_add(&self, key: &str, member: &str) -> TallyResult<bool>;
    /// Returns true when `member` was present.
    fn set_remove(&self, key: &str, member: &str) -> TallyResult<bool>;
    fn set_contains(&self, key: &str, member: &str) -> TallyResult<bool>;
    fn set_members(&self, key: &str) -> TallyResult<Vec<String>>;

    // --- Hashes ---
    /// Write several fields in one step.
    fn hash_set_all(&self, key: &str, fields: &[(&str, String)]) -> TallyResult<()>;
    /// Add `delta` to an integer field (missing counts as 0), saturating.
    fn hash_incr(&self, key: &str, field: &str, delta: i64) -> TallyResult<i64>;
    /// Empty map when the key is absent.
    fn hash_get_all(&self, key: &str) -> TallyResult<HashMap<String, String>>;
    fn hash_get(&self, key: &str, field: &str) -> TallyResult<Option<String>>;

    // --- Sorted sets ---
    /// Insert or overwrite a member's score. Returns true when the member is new.
    fn zset_add(&self, key: &str, member: &str, score: f64) -> TallyResult<bool>;
    /// Add `delta` to a member's score (missing counts as 0) and return the new score.
    fn zset_incr(&self, key: &str, member: &str, delta: f64) -> TallyResult<f64>;
    fn zset_score(&self, key: &str, member: &str) -> TallyResult<Option<f64>>;
    fn zset_card(&self, key: &str) -> TallyResult<usize>;
    /// Members ranked `start..=stop` in the given direction. Negative ranks count
    /// from the end (-1 is the last). Equal scores order by member text.
    fn zset_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> TallyResult<Vec<String>>;
    /// Replace `dest` with the intersection of `sources`, keeping the maximum
    /// contributing score. Plain sets take part with a score of 1.0. Returns the
    /// size of the result; an empty result leaves `dest` absent.
    fn zset_intersect_max(&self, dest: &str, sources: &[&str]) -> TallyResult<usize>;
}

/// Resolve inclusive, possibly negative, rank bounds against a length.
/// `None` when the range selects nothing.
pub fn resolve_rank_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}
