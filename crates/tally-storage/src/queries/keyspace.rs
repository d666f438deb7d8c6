//! The kv_keys registry: structure kind and expiry deadline per key.

use rusqlite::{params, Connection, OptionalExtension};

use tally_core::errors::{StorageError, TallyResult};

use crate::to_storage_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Counter,
    Set,
    Hash,
    SortedSet,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Set => "set",
            Self::Hash => "hash",
            Self::SortedSet => "sorted set",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "counter" => Some(Self::Counter),
            "set" => Some(Self::Set),
            "hash" => Some(Self::Hash),
            "sorted set" => Some(Self::SortedSet),
            _ => None,
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::Counter => "kv_counters",
            Self::Set => "kv_sets",
            Self::Hash => "kv_hashes",
            Self::SortedSet => "kv_zsets",
        }
    }
}

struct KeyRow {
    kind: KeyKind,
    expires_at: Option<i64>,
}

fn key_row(conn: &Connection, key: &str) -> TallyResult<Option<KeyRow>> {
    let row: Option<(String, Option<i64>)> = conn
        .query_row(
            "SELECT kind, expires_at FROM kv_keys WHERE key = ?1",
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    match row {
        None => Ok(None),
        Some((kind, expires_at)) => {
            let kind = KeyKind::parse(&kind).ok_or_else(|| StorageError::InvalidValue {
                key: key.to_string(),
                reason: format!("unknown key kind {kind:?}"),
            })?;
            Ok(Some(KeyRow { kind, expires_at }))
        }
    }
}

/// A key is still live during its deadline second.
fn is_expired(expires_at: Option<i64>, now: i64) -> bool {
    expires_at.is_some_and(|at| at < now)
}

fn wrong_type(key: &str, expected: KeyKind, actual: KeyKind) -> StorageError {
    StorageError::WrongType {
        key: key.to_string(),
        expected: expected.as_str(),
        actual: actual.as_str(),
    }
}

/// Registry row of a live key. An expired key is purged and reads as absent.
fn live_row(conn: &Connection, key: &str, now: i64) -> TallyResult<Option<KeyRow>> {
    match key_row(conn, key)? {
        Some(row) if is_expired(row.expires_at, now) => {
            purge_key(conn, key)?;
            Ok(None)
        }
        row => Ok(row),
    }
}

/// Kind of a live key, `None` when absent or expired.
pub fn live_kind(conn: &Connection, key: &str, now: i64) -> TallyResult<Option<KeyKind>> {
    Ok(live_row(conn, key, now)?.map(|row| row.kind))
}

/// For reads: true when `key` is live and of `kind`, false when absent, error on a kind clash.
pub fn expect_kind(conn: &Connection, key: &str, kind: KeyKind, now: i64) -> TallyResult<bool> {
    match live_kind(conn, key, now)? {
        None => Ok(false),
        Some(actual) if actual == kind => Ok(true),
        Some(actual) => Err(wrong_type(key, kind, actual).into()),
    }
}

/// For writes: purge an expired key, refuse a kind clash, register the key if new.
pub fn prepare_write(conn: &Connection, key: &str, kind: KeyKind, now: i64) -> TallyResult<()> {
    match live_row(conn, key, now)? {
        Some(row) if row.kind != kind => return Err(wrong_type(key, kind, row.kind).into()),
        Some(_) => return Ok(()),
        None => {}
    }
    conn.execute(
        "INSERT INTO kv_keys (key, kind, expires_at) VALUES (?1, ?2, NULL)",
        params![key, kind.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete a key and everything stored under it, whatever its kind.
pub fn purge_key(conn: &Connection, key: &str) -> TallyResult<()> {
    for table in ["kv_keys", "kv_counters", "kv_sets", "kv_hashes", "kv_zsets"] {
        conn.execute(&format!("DELETE FROM {table} WHERE key = ?1"), params![key])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Collections disappear when their last member goes.
pub fn drop_if_empty(conn: &Connection, key: &str, kind: KeyKind) -> TallyResult<()> {
    let remaining: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE key = ?1", kind.table()),
            params![key],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if remaining == 0 {
        conn.execute("DELETE FROM kv_keys WHERE key = ?1", params![key])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Set the deadline of a live key. False when the key is absent or expired.
pub fn set_deadline(conn: &Connection, key: &str, deadline: i64, now: i64) -> TallyResult<bool> {
    match live_row(conn, key, now)? {
        None => Ok(false),
        Some(_) => {
            conn.execute(
                "UPDATE kv_keys SET expires_at = ?2 WHERE key = ?1",
                params![key, deadline],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(true)
        }
    }
}

/// Deadline of a live key, `None` when absent, expired, or persistent.
pub fn deadline(conn: &Connection, key: &str, now: i64) -> TallyResult<Option<i64>> {
    Ok(live_row(conn, key, now)?.and_then(|row| row.expires_at))
}

/// Rows in the key registry, expired-but-untouched keys included.
pub fn registered_keys(conn: &Connection) -> TallyResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_keys", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}
