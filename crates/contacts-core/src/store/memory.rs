// # Memory Record Store
//
// In-memory implementation of the record store port.
//
// ## Purpose
//
// Provides a fast store that doesn't persist across restarts. Used by the
// test suites and by `CONTACTS_STORE_TYPE=memory` for local runs.
//
// ## Atomicity
//
// The conditional primitives run their check and mutation inside one write
// lock, so concurrent creates on the same key have exactly one winner.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::traits::record_store::{RecordStore, StoreConnector, StoreConnectorFactory};
use crate::Error;

/// In-memory record store
///
/// Clones share the same map, so the value returned by `connect()` sees every
/// write made through the connector.
///
/// # Example
///
/// ```rust,no_run
/// use contacts_core::store::MemoryRecordStore;
/// use contacts_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRecordStore::new();
///
///     store.set("89090000000", "Elm St").await?;
///     assert_eq!(store.get("89090000000").await?.as_deref(), Some("Elm St"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryRecordStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Clear all records from the store
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(key);
        Ok(())
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, Error> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(key) {
            return Ok(false);
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn replace_if_present(&self, key: &str, value: &str) -> Result<bool, Error> {
        let mut guard = self.inner.write().await;
        match guard.get_mut(key) {
            Some(existing) => {
                *existing = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_if_present(&self, key: &str) -> Result<bool, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.remove(key).is_some())
    }
}

#[async_trait]
impl StoreConnector for MemoryRecordStore {
    async fn connect(&self) -> Result<Box<dyn RecordStore>, Error> {
        Ok(Box::new(self.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory registered under the "memory" store type
#[derive(Debug, Default)]
pub struct MemoryRecordStoreFactory;

impl StoreConnectorFactory for MemoryRecordStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn StoreConnector>, Error> {
        match config {
            StoreConfig::Memory => Ok(Arc::new(MemoryRecordStore::new())),
            other => Err(Error::config(format!(
                "Memory store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
