//! Store Module
//!
//! Key-value persistence for job records. Values are JSON documents; the
//! only conditional write is [`KvStore::compare_and_swap`], which terminal
//! job transitions rely on.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store holding JSON values
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Inserts or overwrites `key`
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Removes `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All entries whose key starts with `prefix`, in key order
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Writes `value` only if `key` currently holds `expected`
    ///
    /// Returns `false` when the key is missing or holds something else.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &Value,
        value: Value,
    ) -> Result<bool, StoreError>;

    /// Checks the store is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
