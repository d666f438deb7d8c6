use rusqlite::{params, Connection};

use tally_core::errors::TallyResult;

use super::keyspace::{prepare_write, KeyKind};
use crate::to_storage_err;

/// Increment (saturating at i64::MAX) and return the new value.
pub fn incr(conn: &Connection, key: &str, now: i64) -> TallyResult<i64> {
    prepare_write(conn, key, KeyKind::Counter, now)?;
    conn.query_row(
        "INSERT INTO kv_counters (key, value) VALUES (?1, 1)
         ON CONFLICT(key) DO UPDATE SET value =
             CASE WHEN value < 9223372036854775807 THEN value + 1 ELSE value END
         RETURNING value",
        params![key],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(format!("incr {key}: {e}")))
}
