//! SqliteStore: owns the write connection, runs migrations at open, and maps
//! each `IRankStore` primitive onto one transaction. Reads included, since a
//! read that finds an expired key purges it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use tally_core::config::StorageConfig;
use tally_core::errors::TallyResult;
use tally_core::{Clock, IRankStore, RangeOrder};

use crate::migrations;
use crate::pool::pragmas::verify_wal_mode;
use crate::pool::WriteConnection;
use crate::queries::{counters, hashes, keyspace, sets, zsets};
use crate::to_storage_err;

/// Persistent store backed by a single SQLite database.
pub struct SqliteStore {
    conn: WriteConnection,
    clock: Arc<dyn Clock>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> TallyResult<Self> {
        Self::open_file(path, StorageConfig::default().busy_timeout_ms, clock)
    }

    pub fn open_with_config(config: &StorageConfig, clock: Arc<dyn Clock>) -> TallyResult<Self> {
        Self::open_file(Path::new(&config.db_path), config.busy_timeout_ms, clock)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> TallyResult<Self> {
        let store = Self {
            conn: WriteConnection::open_in_memory()?,
            clock,
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    fn open_file(path: &Path, busy_timeout_ms: u32, clock: Arc<dyn Clock>) -> TallyResult<Self> {
        let store = Self {
            conn: WriteConnection::open(path, busy_timeout_ms)?,
            clock,
            db_path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> TallyResult<()> {
        let version = self.conn.with_conn(migrations::run_migrations)?;
        tracing::debug!(path = ?self.db_path, schema_version = version, "sqlite store ready");
        Ok(())
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// True when the connection runs in WAL journal mode (file-backed stores only).
    pub fn is_wal(&self) -> TallyResult<bool> {
        self.conn.with_conn(verify_wal_mode)
    }

    pub fn schema_version(&self) -> TallyResult<u32> {
        self.conn.with_conn(migrations::current_version)
    }

    /// Keys present in the registry, including expired keys nothing has touched yet.
    pub fn registered_keys(&self) -> TallyResult<usize> {
        self.conn.with_conn(keyspace::registered_keys)
    }

    /// Run `f` inside a transaction with the current clock reading.
    fn with_tx<F, T>(&self, op: &str, f: F) -> TallyResult<T>
    where
        F: FnOnce(&Connection, i64) -> TallyResult<T>,
    {
        let now = self.clock.now();
        self.conn.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("{op} begin: {e}")))?;
            match f(&*tx, now) {
                Ok(value) => {
                    tx.commit()
                        .map_err(|e| to_storage_err(format!("{op} commit: {e}")))?;
                    Ok(value)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })
    }

}

impl IRankStore for SqliteStore {
    fn incr(&self, key: &str) -> TallyResult<i64> {
        self.with_tx("incr", |conn, now| counters::incr(conn, key, now))
    }

    fn exists(&self, key: &str) -> TallyResult<bool> {
        self.with_tx("exists", |conn, now| Ok(keyspace::live_kind(conn, key, now)?.is_some()))
    }

    fn expire(&self, key: &str, ttl: Duration) -> TallyResult<bool> {
        self.with_tx("expire", |conn, now| {
            let deadline = now.saturating_add(ttl.as_secs() as i64);
            keyspace::set_deadline(conn, key, deadline, now)
        })
    }

    fn ttl(&self, key: &str) -> TallyResult<Option<Duration>> {
        self.with_tx("ttl", |conn, now| {
            Ok(keyspace::deadline(conn, key, now)?
                .map(|at| Duration::from_secs((at - now).max(0) as u64)))
        })
    }

    fn set_add(&self, key: &str, member: &str) -> TallyResult<bool> {
        self.with_tx("set_add", |conn, now| sets::add(conn, key, member, now))
    }

    fn set_remove(&self, key: &str, member: &str) -> TallyResult<bool> {
        self.with_tx("set_remove", |conn, now| sets::remove(conn, key, member, now))
    }

    fn set_contains(&self, key: &str, member: &str) -> TallyResult<bool> {
        self.with_tx("set_contains", |conn, now| sets::contains(conn, key, member, now))
    }

    fn set_members(&self, key: &str) -> TallyResult<Vec<String>> {
        self.with_tx("set_members", |conn, now| sets::members(conn, key, now))
    }

    fn hash_set_all(&self, key: &str, fields: &[(&str, String)]) -> TallyResult<()> {
        self.with_tx("hash_set_all", |conn, now| hashes::set_all(conn, key, fields, now))
    }

    fn hash_incr(&self, key: &str, field: &str, delta: i64) -> TallyResult<i64> {
        self.with_tx("hash_incr", |conn, now| {
            hashes::incr(conn, key, field, delta, now)
        })
    }

    fn hash_get_all(&self, key: &str) -> TallyResult<HashMap<String, String>> {
        self.with_tx("hash_get_all", |conn, now| hashes::get_all(conn, key, now))
    }

    fn hash_get(&self, key: &str, field: &str) -> TallyResult<Option<String>> {
        self.with_tx("hash_get", |conn, now| hashes::get(conn, key, field, now))
    }

    fn zset_add(&self, key: &str, member: &str, score: f64) -> TallyResult<bool> {
        self.with_tx("zset_add", |conn, now| zsets::add(conn, key, member, score, now))
    }

    fn zset_incr(&self, key: &str, member: &str, delta: f64) -> TallyResult<f64> {
        self.with_tx("zset_incr", |conn, now| {
            zsets::incr(conn, key, member, delta, now)
        })
    }

    fn zset_score(&self, key: &str, member: &str) -> TallyResult<Option<f64>> {
        self.with_tx("zset_score", |conn, now| zsets::score(conn, key, member, now))
    }

    fn zset_card(&self, key: &str) -> TallyResult<usize> {
        self.with_tx("zset_card", |conn, now| zsets::card(conn, key, now))
    }

    fn zset_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> TallyResult<Vec<String>> {
        self.with_tx("zset_range", |conn, now| zsets::range(conn, key, start, stop, order, now))
    }

    fn zset_intersect_max(&self, dest: &str, sources: &[&str]) -> TallyResult<usize> {
        self.with_tx("zset_intersect_max", |conn, now| {
            zsets::intersect_max(conn, dest, sources, now)
        })
    }
}
