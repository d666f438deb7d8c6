//! Connection handling for the SQLite backend.
//!
//! Expired keys are purged by writers, so every primitive goes through the
//! single write connection; there is no separate read pool.

pub mod pragmas;
pub mod write_connection;

pub use write_connection::WriteConnection;
