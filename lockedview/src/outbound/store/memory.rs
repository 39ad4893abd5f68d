//! Process-local key-value store.
//!
//! Values vanish with the process, so this adapter suits tests and ephemeral
//! sessions rather than durable identity storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Mutex-guarded map implementing [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Whether no keys are stored. A poisoned lock never reads as empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_ok_and(|entries| entries.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, KeyValueStoreError> {
        self.entries
            .lock()
            .map_err(|_| KeyValueStoreError::backend("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "v").await.expect("set succeeds");

        assert_eq!(store.get("k").await.expect("get succeeds"), Some("v".to_owned()));
        assert!(!store.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn set_overwrites() {
        let store = InMemoryKeyValueStore::from_entries([("k", "old")]);
        store.set("k", "new").await.expect("set succeeds");

        assert_eq!(store.get("k").await.expect("get succeeds").as_deref(), Some("new"));
    }

    #[rstest]
    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = InMemoryKeyValueStore::from_entries([("k", "v")]);

        store.remove("k").await.expect("first remove");
        store.remove("k").await.expect("second remove");

        assert!(store.get("k").await.expect("get succeeds").is_none());
        assert!(store.is_empty());
    }
}
