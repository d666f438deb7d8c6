use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use tally_core::errors::{StorageError, TallyResult};

use super::keyspace::{expect_kind, prepare_write, KeyKind};
use crate::to_storage_err;

pub fn set_all(conn: &Connection, key: &str, fields: &[(&str, String)], now: i64) -> TallyResult<()> {
    if fields.is_empty() {
        return Ok(());
    }
    prepare_write(conn, key, KeyKind::Hash, now)?;
    let mut stmt = conn
        .prepare(
            "INSERT INTO kv_hashes (key, field, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(key, field) DO UPDATE SET value = excluded.value",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (field, value) in fields {
        stmt.execute(params![key, field, value])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

pub fn incr(conn: &Connection, key: &str, field: &str, delta: i64, now: i64) -> TallyResult<i64> {
    prepare_write(conn, key, KeyKind::Hash, now)?;
    let current = match field_value(conn, key, field)? {
        None => 0,
        Some(raw) => raw.parse::<i64>().map_err(|_| StorageError::InvalidValue {
            key: key.to_string(),
            reason: format!("field {field} is not an integer"),
        })?,
    };
    let next = current.saturating_add(delta);
    conn.execute(
        "INSERT INTO kv_hashes (key, field, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(key, field) DO UPDATE SET value = excluded.value",
        params![key, field, next.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(next)
}

pub fn get_all(conn: &Connection, key: &str, now: i64) -> TallyResult<HashMap<String, String>> {
    if !expect_kind(conn, key, KeyKind::Hash, now)? {
        return Ok(HashMap::new());
    }
    let mut stmt = conn
        .prepare("SELECT field, value FROM kv_hashes WHERE key = ?1")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<HashMap<String, String>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get(conn: &Connection, key: &str, field: &str, now: i64) -> TallyResult<Option<String>> {
    if !expect_kind(conn, key, KeyKind::Hash, now)? {
        return Ok(None);
    }
    field_value(conn, key, field)
}

fn field_value(conn: &Connection, key: &str, field: &str) -> TallyResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_hashes WHERE key = ?1 AND field = ?2",
        params![key, field],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
