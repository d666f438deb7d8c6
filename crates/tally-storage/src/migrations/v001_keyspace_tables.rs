//! v001: kv_keys registry plus one table per structure.

use rusqlite::Connection;

use tally_core::errors::TallyResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TallyResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_keys (
            key         TEXT PRIMARY KEY,
            kind        TEXT NOT NULL,
            expires_at  INTEGER
        );

        CREATE TABLE IF NOT EXISTS kv_counters (
            key    TEXT PRIMARY KEY,
            value  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv_sets (
            key     TEXT NOT NULL,
            member  TEXT NOT NULL,
            PRIMARY KEY (key, member)
        );

        CREATE TABLE IF NOT EXISTS kv_hashes (
            key    TEXT NOT NULL,
            field  TEXT NOT NULL,
            value  TEXT NOT NULL,
            PRIMARY KEY (key, field)
        );

        CREATE TABLE IF NOT EXISTS kv_zsets (
            key     TEXT NOT NULL,
            member  TEXT NOT NULL,
            score   REAL NOT NULL,
            PRIMARY KEY (key, member)
        );

        CREATE INDEX IF NOT EXISTS idx_zsets_rank ON kv_zsets(key, score, member);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
