//! Test doubles and common utilities for contract tests
//!
//! These doubles observe how the service uses the store port (connection
//! count, command count) without a real key-value server.

#![allow(dead_code)]

use async_trait::async_trait;
use contacts_core::error::{Error, Result};
use contacts_core::traits::{RecordStore, StoreConnector};
use contacts_core::{ContactService, MemoryRecordStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const PHONE: &str = "89090000000";
pub const OTHER_PHONE: &str = "89091111111";

/// Connector that counts connections and can inject failures
///
/// Commands are forwarded to a shared [`MemoryRecordStore`], so the atomic
/// conditional primitives are preserved.
pub struct CountingConnector {
    backing: MemoryRecordStore,
    connect_count: Arc<AtomicUsize>,
    open_connections: Arc<AtomicUsize>,
    command_count: Arc<AtomicUsize>,
    fail_commands: Arc<AtomicBool>,
    stall_commands: Arc<AtomicBool>,
}

impl CountingConnector {
    pub fn new() -> Self {
        Self {
            backing: MemoryRecordStore::new(),
            connect_count: Arc::new(AtomicUsize::new(0)),
            open_connections: Arc::new(AtomicUsize::new(0)),
            command_count: Arc::new(AtomicUsize::new(0)),
            fail_commands: Arc::new(AtomicBool::new(false)),
            stall_commands: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of times connect() was called
    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    /// Connections handed out and not yet dropped
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    /// Number of store commands issued
    pub fn command_count(&self) -> usize {
        self.command_count.load(Ordering::SeqCst)
    }

    /// Make every subsequent command fail with a store error
    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent command hang forever
    pub fn stall_commands(&self, stall: bool) {
        self.stall_commands.store(stall, Ordering::SeqCst);
    }

    /// Direct access to the backing data
    pub fn backing(&self) -> &MemoryRecordStore {
        &self.backing
    }
}

#[async_trait]
impl StoreConnector for CountingConnector {
    async fn connect(&self) -> Result<Box<dyn RecordStore>> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.open_connections.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(CountingConnection {
            backing: self.backing.clone(),
            open_connections: Arc::clone(&self.open_connections),
            command_count: Arc::clone(&self.command_count),
            fail_commands: Arc::clone(&self.fail_commands),
            stall_commands: Arc::clone(&self.stall_commands),
        }))
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// Connection handed out by [`CountingConnector`]; decrements the open count on drop
struct CountingConnection {
    backing: MemoryRecordStore,
    open_connections: Arc<AtomicUsize>,
    command_count: Arc<AtomicUsize>,
    fail_commands: Arc<AtomicBool>,
    stall_commands: Arc<AtomicBool>,
}

impl CountingConnection {
    async fn before_command(&self) -> Result<()> {
        self.command_count.fetch_add(1, Ordering::SeqCst);
        if self.stall_commands.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(Error::store("injected failure: READONLY replica"));
        }
        Ok(())
    }
}

impl Drop for CountingConnection {
    fn drop(&mut self) {
        self.open_connections.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for CountingConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.before_command().await?;
        self.backing.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.before_command().await?;
        self.backing.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.before_command().await?;
        self.backing.delete(key).await
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        self.before_command().await?;
        self.backing.insert_if_absent(key, value).await
    }

    async fn replace_if_present(&self, key: &str, value: &str) -> Result<bool> {
        self.before_command().await?;
        self.backing.replace_if_present(key, value).await
    }

    async fn remove_if_present(&self, key: &str) -> Result<bool> {
        self.before_command().await?;
        self.backing.remove_if_present(key).await
    }
}

/// Connector whose connect() always fails, like an unreachable server
pub struct UnreachableConnector;

#[async_trait]
impl StoreConnector for UnreachableConnector {
    async fn connect(&self) -> Result<Box<dyn RecordStore>> {
        Err(Error::connection("Connection refused (os error 111)"))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

/// Store implementing only get/set/delete
///
/// Exercises the default check-then-act conditional primitives.
#[derive(Clone, Default)]
pub struct PlainStore {
    data: Arc<std::sync::Mutex<HashMap<String, String>>>,
}

impl PlainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for PlainStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }
}

#[async_trait]
impl StoreConnector for PlainStore {
    async fn connect(&self) -> Result<Box<dyn RecordStore>> {
        Ok(Box::new(self.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "plain"
    }
}

/// Service over a fresh in-memory store
pub fn memory_service() -> ContactService {
    ContactService::new(Arc::new(MemoryRecordStore::new()))
}

/// Service over a counting connector, returning the connector for inspection
pub fn counting_service() -> (ContactService, Arc<CountingConnector>) {
    let connector = Arc::new(CountingConnector::new());
    let service = ContactService::new(connector.clone());
    (service, connector)
}
