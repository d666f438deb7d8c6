//! Versioned schema migrations, applied in order at open.

mod v001_keyspace_tables;

use rusqlite::{params, Connection};

use tally_core::errors::{StorageError, TallyResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> TallyResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[(1, v001_keyspace_tables::migrate)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Apply every migration newer than the database's version. Returns the resulting version.
pub fn run_migrations(conn: &Connection) -> TallyResult<u32> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut version = current_version(conn)?;
    for (target, migrate) in MIGRATIONS {
        if *target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {target} begin: {e}")))?;
        let applied = migrate(&*tx).and_then(|_| {
            tx.execute("INSERT INTO schema_version (version) VALUES (?1)", params![target])
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        });
        match applied {
            Ok(()) => tx.commit().map_err(|e| to_storage_err(e.to_string()))?,
            Err(e) => {
                let _ = tx.rollback();
                return Err(StorageError::MigrationFailed {
                    version: *target,
                    reason: e.to_string(),
                }
                .into());
            }
        }
        tracing::debug!(version = target, "applied migration");
        version = *target;
    }
    Ok(version)
}

pub fn current_version(conn: &Connection) -> TallyResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
