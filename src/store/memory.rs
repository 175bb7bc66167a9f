//! In-memory key-value store for tests and previews.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{KvStore, StorageError};

/// Volatile store used to unit-test the award engine without touching disk.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, to exercise persistence-error paths.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw snapshot of a stored value (test inspection).
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().expect("memory store lock").get(key).cloned()
    }

    /// Seed a raw value, bypassing the codec (e.g. corrupted or legacy data).
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("memory store lock")
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().expect("memory store lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write failure injected".into()));
        }
        self.values
            .lock()
            .expect("memory store lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_injected_failure() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.fail_writes(true);
        assert!(store.set("k", "v2").await.is_err());
        // Failed write leaves the old value in place
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }
}
