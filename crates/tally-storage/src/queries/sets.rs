use rusqlite::{params, Connection};

use tally_core::errors::TallyResult;

use super::keyspace::{drop_if_empty, expect_kind, prepare_write, KeyKind};
use crate::to_storage_err;

pub fn add(conn: &Connection, key: &str, member: &str, now: i64) -> TallyResult<bool> {
    prepare_write(conn, key, KeyKind::Set, now)?;
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO kv_sets (key, member) VALUES (?1, ?2)",
            params![key, member],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(inserted == 1)
}

pub fn remove(conn: &Connection, key: &str, member: &str, now: i64) -> TallyResult<bool> {
    if !expect_kind(conn, key, KeyKind::Set, now)? {
        return Ok(false);
    }
    let removed = conn
        .execute(
            "DELETE FROM kv_sets WHERE key = ?1 AND member = ?2",
            params![key, member],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    drop_if_empty(conn, key, KeyKind::Set)?;
    Ok(removed == 1)
}

pub fn contains(conn: &Connection, key: &str, member: &str, now: i64) -> TallyResult<bool> {
    if !expect_kind(conn, key, KeyKind::Set, now)? {
        return Ok(false);
    }
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM kv_sets WHERE key = ?1 AND member = ?2",
            params![key, member],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

pub fn members(conn: &Connection, key: &str, now: i64) -> TallyResult<Vec<String>> {
    if !expect_kind(conn, key, KeyKind::Set, now)? {
        return Ok(Vec::new());
    }
    let mut stmt = conn
        .prepare("SELECT member FROM kv_sets WHERE key = ?1 ORDER BY member")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![key], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<String>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
