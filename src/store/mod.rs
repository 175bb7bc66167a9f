//! Durable key-value storage for the gamification ledger.
//!
//! The ledger lives under a single storage key, so one `set` is one atomic
//! logical update. Backends implement [`KvStore`]; the app ships with
//! [`SqliteStore`] (device-local database) and tests inject [`MemoryStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

/// Errors surfaced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A persistent, process-surviving string key/value medium.
///
/// `get` never fails for a missing key; it returns `Ok(None)`. A successful
/// `set` is expected to be durable, but callers must tolerate the write
/// failing or the process dying between a `get` and the matching `set` -
/// the award engine keeps the whole ledger under one key for exactly that
/// reason.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
