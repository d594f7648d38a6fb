//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured, and in tests. Contents are
//! lost on restart.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{KvStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &Value,
        value: Value,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(current) if current == expected => {
                *current = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
