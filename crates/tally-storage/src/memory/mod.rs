//! In-process store. Every primitive runs under the `DashMap` shard lock of
//! its key, which makes it atomic with respect to other primitives on that key.

mod sorted_set;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use tally_core::errors::{StorageError, TallyResult};
use tally_core::{Clock, IRankStore, RangeOrder};

pub use sorted_set::SortedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Counter,
    Set,
    Hash,
    SortedSet,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Set => "set",
            Self::Hash => "hash",
            Self::SortedSet => "sorted set",
        }
    }

    fn empty(self) -> Value {
        match self {
            Self::Counter => Value::Counter(0),
            Self::Set => Value::Set(HashSet::new()),
            Self::Hash => Value::Hash(HashMap::new()),
            Self::SortedSet => Value::SortedSet(SortedSet::default()),
        }
    }
}

#[derive(Debug, Clone)]
enum Value {
    Counter(i64),
    Set(HashSet<String>),
    Hash(HashMap<String, String>),
    SortedSet(SortedSet),
}

impl Value {
    fn kind(&self) -> Kind {
        match self {
            Self::Counter(_) => Kind::Counter,
            Self::Set(_) => Kind::Set,
            Self::Hash(_) => Kind::Hash,
            Self::SortedSet(_) => Kind::SortedSet,
        }
    }

    /// Collections disappear when their last member goes.
    fn is_empty_collection(&self) -> bool {
        match self {
            Self::Counter(_) => false,
            Self::Set(s) => s.is_empty(),
            Self::Hash(h) => h.is_empty(),
            Self::SortedSet(z) => z.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    /// Last unix second at which the key still exists.
    expires_at: Option<i64>,
}

impl Slot {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

fn wrong_type(key: &str, expected: Kind, actual: Kind) -> StorageError {
    StorageError::WrongType {
        key: key.to_string(),
        expected: expected.name(),
        actual: actual.name(),
    }
}

/// `DashMap`-backed store for tests, demos and single-process deployments.
pub struct MemoryStore {
    entries: DashMap<String, Slot>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of live keys.
    pub fn key_count(&self) -> usize {
        let now = self.clock.now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// Run `f` against a live value. Expired keys are purged and read as absent.
    fn read<T>(&self, key: &str, f: impl FnOnce(&Value) -> TallyResult<T>) -> TallyResult<Option<T>> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(slot) if !slot.is_expired(now) => return f(&slot.value).map(Some),
            Some(_) => true,
        };
        if expired {
            self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        }
        Ok(None)
    }

    /// Run `f` against the value at `key`, creating an empty `kind` when absent or expired.
    fn write<T>(
        &self,
        key: &str,
        kind: Kind,
        f: impl FnOnce(&mut Value) -> TallyResult<T>,
    ) -> TallyResult<T> {
        let now = self.clock.now();
        let (result, now_empty) = {
            let mut slot = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Slot::new(kind.empty()));
            if slot.is_expired(now) {
                *slot = Slot::new(kind.empty());
            }
            let actual = slot.value.kind();
            if actual != kind {
                return Err(wrong_type(key, kind, actual).into());
            }
            let result = f(&mut slot.value);
            (result, slot.value.is_empty_collection())
        };
        if now_empty {
            self.entries
                .remove_if(key, |_, slot| slot.value.is_empty_collection());
        }
        result
    }

    /// Copy of a live sorted set or set for intersection; sets score 1.0.
    fn snapshot_scores(&self, key: &str) -> TallyResult<Option<HashMap<String, f64>>> {
        self.read(key, |value| match value {
            Value::SortedSet(z) => Ok(z.iter().map(|(m, s)| (m.to_string(), s)).collect()),
            Value::Set(s) => Ok(s.iter().map(|m| (m.clone(), 1.0)).collect()),
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })
    }
}

fn check_score(key: &str, score: f64) -> TallyResult<()> {
    if score.is_nan() {
        return Err(StorageError::InvalidValue {
            key: key.to_string(),
            reason: "score is not a number".to_string(),
        }
        .into());
    }
    Ok(())
}

impl IRankStore for MemoryStore {
    fn incr(&self, key: &str) -> TallyResult<i64> {
        self.write(key, Kind::Counter, |value| match value {
            Value::Counter(n) => {
                *n = n.saturating_add(1);
                Ok(*n)
            }
            other => Err(wrong_type(key, Kind::Counter, other.kind()).into()),
        })
    }

    fn exists(&self, key: &str) -> TallyResult<bool> {
        Ok(self.read(key, |_| Ok(()))?.is_some())
    }

    fn expire(&self, key: &str, ttl: Duration) -> TallyResult<bool> {
        let now = self.clock.now();
        let expired = match self.entries.get_mut(key) {
            None => return Ok(false),
            Some(mut slot) if !slot.is_expired(now) => {
                slot.expires_at = Some(now.saturating_add(ttl.as_secs() as i64));
                return Ok(true);
            }
            Some(_) => true,
        };
        if expired {
            self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        }
        Ok(false)
    }

    fn ttl(&self, key: &str) -> TallyResult<Option<Duration>> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(slot) if !slot.is_expired(now) => {
                return Ok(slot
                    .expires_at
                    .map(|at| Duration::from_secs((at - now).max(0) as u64)));
            }
            Some(_) => true,
        };
        if expired {
            self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        }
        Ok(None)
    }

    fn set_add(&self, key: &str, member: &str) -> TallyResult<bool> {
        self.write(key, Kind::Set, |value| match value {
            Value::Set(s) => Ok(s.insert(member.to_string())),
            other => Err(wrong_type(key, Kind::Set, other.kind()).into()),
        })
    }

    fn set_remove(&self, key: &str, member: &str) -> TallyResult<bool> {
        self.write(key, Kind::Set, |value| match value {
            Value::Set(s) => Ok(s.remove(member)),
            other => Err(wrong_type(key, Kind::Set, other.kind()).into()),
        })
    }

    fn set_contains(&self, key: &str, member: &str) -> TallyResult<bool> {
        let found = self.read(key, |value| match value {
            Value::Set(s) => Ok(s.contains(member)),
            other => Err(wrong_type(key, Kind::Set, other.kind()).into()),
        })?;
        Ok(found.unwrap_or(false))
    }

    fn set_members(&self, key: &str) -> TallyResult<Vec<String>> {
        let members = self.read(key, |value| match value {
            Value::Set(s) => {
                let mut members: Vec<String> = s.iter().cloned().collect();
                members.sort();
                Ok(members)
            }
            other => Err(wrong_type(key, Kind::Set, other.kind()).into()),
        })?;
        Ok(members.unwrap_or_default())
    }

    fn hash_set_all(&self, key: &str, fields: &[(&str, String)]) -> TallyResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.write(key, Kind::Hash, |value| match value {
            Value::Hash(h) => {
                for (field, v) in fields {
                    h.insert((*field).to_string(), v.clone());
                }
                Ok(())
            }
            other => Err(wrong_type(key, Kind::Hash, other.kind()).into()),
        })
    }

    fn hash_incr(&self, key: &str, field: &str, delta: i64) -> TallyResult<i64> {
        self.write(key, Kind::Hash, |value| match value {
            Value::Hash(h) => {
                let current = match h.get(field) {
                    None => 0,
                    Some(raw) => raw.parse::<i64>().map_err(|_| StorageError::InvalidValue {
                        key: key.to_string(),
                        reason: format!("field {field} is not an integer"),
                    })?,
                };
                let next = current.saturating_add(delta);
                h.insert(field.to_string(), next.to_string());
                Ok(next)
            }
            other => Err(wrong_type(key, Kind::Hash, other.kind()).into()),
        })
    }

    fn hash_get_all(&self, key: &str) -> TallyResult<HashMap<String, String>> {
        let record = self.read(key, |value| match value {
            Value::Hash(h) => Ok(h.clone()),
            other => Err(wrong_type(key, Kind::Hash, other.kind()).into()),
        })?;
        Ok(record.unwrap_or_default())
    }

    fn hash_get(&self, key: &str, field: &str) -> TallyResult<Option<String>> {
        let found = self.read(key, |value| match value {
            Value::Hash(h) => Ok(h.get(field).cloned()),
            other => Err(wrong_type(key, Kind::Hash, other.kind()).into()),
        })?;
        Ok(found.flatten())
    }

    fn zset_add(&self, key: &str, member: &str, score: f64) -> TallyResult<bool> {
        check_score(key, score)?;
        self.write(key, Kind::SortedSet, |value| match value {
            Value::SortedSet(z) => Ok(z.insert(member, score)),
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })
    }

    fn zset_incr(&self, key: &str, member: &str, delta: f64) -> TallyResult<f64> {
        check_score(key, delta)?;
        self.write(key, Kind::SortedSet, |value| match value {
            Value::SortedSet(z) => {
                let next = z.score(member).unwrap_or(0.0) + delta;
                check_score(key, next)?;
                z.insert(member, next);
                Ok(next)
            }
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })
    }

    fn zset_score(&self, key: &str, member: &str) -> TallyResult<Option<f64>> {
        let found = self.read(key, |value| match value {
            Value::SortedSet(z) => Ok(z.score(member)),
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })?;
        Ok(found.flatten())
    }

    fn zset_card(&self, key: &str) -> TallyResult<usize> {
        let len = self.read(key, |value| match value {
            Value::SortedSet(z) => Ok(z.len()),
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })?;
        Ok(len.unwrap_or(0))
    }

    fn zset_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> TallyResult<Vec<String>> {
        let members = self.read(key, |value| match value {
            Value::SortedSet(z) => Ok(z.range(start, stop, order)),
            other => Err(wrong_type(key, Kind::SortedSet, other.kind()).into()),
        })?;
        Ok(members.unwrap_or_default())
    }

    fn zset_intersect_max(&self, dest: &str, sources: &[&str]) -> TallyResult<usize> {
        let mut result: Option<HashMap<String, f64>> = None;
        for source in sources {
            let scores = self.snapshot_scores(source)?.unwrap_or_default();
            result = Some(match result {
                None => scores,
                Some(acc) => acc
                    .into_iter()
                    .filter_map(|(member, score)| {
                        scores.get(&member).map(|other| (member, score.max(*other)))
                    })
                    .collect(),
            });
        }
        let result = result.unwrap_or_default();

        if result.is_empty() {
            self.entries.remove(dest);
            return Ok(0);
        }
        let mut z = SortedSet::default();
        for (member, score) in &result {
            z.insert(member, *score);
        }
        // Single insert: readers see the old view or the new one, never a gap.
        self.entries
            .insert(dest.to_string(), Slot::new(Value::SortedSet(z)));
        Ok(result.len())
    }
}
