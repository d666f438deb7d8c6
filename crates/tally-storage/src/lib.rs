//! # tally-storage
//!
//! Backends implementing `IRankStore`.
//!
//! - `MemoryStore`: in-process, `DashMap`-backed, per-key atomicity.
//! - `SqliteStore`: persistent, one statement or transaction per primitive,
//!   WAL journal, versioned migrations.
//!
//! Both evaluate key expiry lazily against the injected `Clock`.

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod sqlite;

use std::sync::Arc;

use tally_core::config::{StorageBackend, StorageConfig};
use tally_core::errors::{StorageError, TallyError, TallyResult};
use tally_core::{Clock, IRankStore};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Map a SQLite failure message into the tally error type.
pub(crate) fn to_storage_err(message: String) -> TallyError {
    TallyError::StoreUnavailable(StorageError::SqliteError { message })
}

/// Open the backend named by `config`.
pub fn open_store(config: &StorageConfig, clock: Arc<dyn Clock>) -> TallyResult<Arc<dyn IRankStore>> {
    let store: Arc<dyn IRankStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new(clock)),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open_with_config(config, clock)?),
    };
    tracing::info!(backend = ?config.backend, "store opened");
    Ok(store)
}
