// # Record Store Port
//
// Defines the capability the contact service needs from the external
// key-value store.
//
// ## Purpose
//
// The port is deliberately thin: string keys, string values, and three
// required commands. It holds no business semantics. A missing key is
// `Ok(None)`; every `Err` is an infrastructure failure.
//
// ## Connections
//
// A [`StoreConnector`] is long-lived and shared. Each request asks it for a
// fresh [`RecordStore`] via `connect()` and drops the returned box when the
// request ends. Dropping is the release, so every exit path (success,
// business failure, store failure, cancellation) gives the connection back.
//
// ## Conditional primitives
//
// `insert_if_absent`, `replace_if_present` and `remove_if_present` have
// default check-then-act implementations built on `get/set/delete`. Those
// defaults are NOT atomic: two concurrent callers can both observe the same
// state. Backends with a native conditional command must override them.
//
// ## Usage
//
// ```rust
// use contacts_core::{MemoryRecordStore, StoreConnector};
//
// #[tokio::main]
// async fn main() -> contacts_core::Result<()> {
//     let connector = MemoryRecordStore::new();
//     let conn = connector.connect().await?;
//
//     if conn.insert_if_absent("89090000000", "Elm St").await? {
//         assert_eq!(conn.get("89090000000").await?.as_deref(), Some("Elm St"));
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StoreConfig;

/// One live connection to the key-value store
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Responsibilities
///
/// - Issue commands and report transport failures as `Err`
/// - Never decide whether a transition is allowed (owned by `ContactService`)
/// - Never cache values across connections
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get the value stored under `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key is present
    /// - `Ok(None)`: Key is absent
    /// - `Err(Error)`: Storage error
    async fn get(&self, key: &str) -> Result<Option<String>, crate::Error>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), crate::Error>;

    /// Remove `key`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Removed (or didn't exist)
    /// - `Err(Error)`: Storage error
    async fn delete(&self, key: &str) -> Result<(), crate::Error>;

    /// Store `value` only if `key` is absent
    ///
    /// Returns `true` if the value was written.
    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool, crate::Error> {
        if self.get(key).await?.is_some() {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }

    /// Overwrite `key` only if it is present
    ///
    /// Returns `true` if the value was written.
    async fn replace_if_present(&self, key: &str, value: &str) -> Result<bool, crate::Error> {
        if self.get(key).await?.is_none() {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }

    /// Remove `key` only if it is present
    ///
    /// Returns `true` if a value was removed.
    async fn remove_if_present(&self, key: &str) -> Result<bool, crate::Error> {
        if self.get(key).await?.is_none() {
            return Ok(false);
        }
        self.delete(key).await?;
        Ok(true)
    }
}

/// Source of per-request store connections
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Open a connection scoped to the caller
    ///
    /// The connection is released when the returned box is dropped.
    async fn connect(&self) -> Result<Box<dyn RecordStore>, crate::Error>;

    /// Short backend name for logs (e.g. "memory", "redis")
    fn backend_name(&self) -> &'static str;
}

/// Helper trait for constructing connectors from configuration
pub trait StoreConnectorFactory: Send + Sync {
    /// Create a connector from configuration
    ///
    /// Construction must not perform network I/O; the first connection is
    /// opened by the first request.
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn StoreConnector>, crate::Error>;
}
