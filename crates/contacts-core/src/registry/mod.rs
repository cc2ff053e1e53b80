//! Plugin-based store registry
//!
//! The registry lets store backends be registered by type name at startup,
//! avoiding hardcoded if-else chains in the daemon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contacts_core::registry::StoreRegistry;
//! use contacts_core::config::StoreConfig;
//!
//! let registry = StoreRegistry::with_builtin();
//! contacts_store_redis::register(&registry);
//!
//! let connector = registry.create_connector(&StoreConfig::Memory)?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::MemoryRecordStoreFactory;
use crate::traits::{StoreConnector, StoreConnectorFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry mapping store type names to connector factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    factories: RwLock<HashMap<String, Box<dyn StoreConnectorFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the in-process backends already registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register("memory", Box::new(MemoryRecordStoreFactory));
        registry
    }

    /// Register a connector factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "memory", "redis")
    /// - `factory`: Factory object for creating connectors
    pub fn register(&self, name: impl Into<String>, factory: Box<dyn StoreConnectorFactory>) {
        let name = name.into();
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.insert(name, factory);
    }

    /// Create a connector from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn StoreConnector>)`: Created connector
    /// - `Err(Error)`: If the store type is not registered or creation fails
    pub fn create_connector(&self, config: &StoreConfig) -> Result<Arc<dyn StoreConnector>> {
        let store_type = config.type_name();
        let factories = self
            .factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = factories
            .get(store_type)
            .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?;

        factory.create(config)
    }

    /// List all registered store types
    pub fn list(&self) -> Vec<String> {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has(&self, name: &str) -> bool {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        factories.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFactory;

    impl StoreConnectorFactory for FailingFactory {
        fn create(&self, _config: &StoreConfig) -> Result<Arc<dyn StoreConnector>> {
            Err(Error::config("mock store not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = StoreRegistry::new();

        // Initially empty
        assert!(!registry.has("redis"));

        registry.register("redis", Box::new(FailingFactory));

        assert!(registry.has("redis"));
        assert!(registry.list().contains(&"redis".to_string()));
        assert!(registry.create_connector(&StoreConfig::default()).is_err());
    }

    #[test]
    fn test_builtin_memory() {
        let registry = StoreRegistry::with_builtin();
        let connector = registry.create_connector(&StoreConfig::Memory).unwrap();
        assert_eq!(connector.backend_name(), "memory");
    }

    #[test]
    fn test_unknown_type() {
        let registry = StoreRegistry::with_builtin();
        let err = match registry.create_connector(&StoreConfig::default()) {
            Ok(_) => panic!("redis is not registered"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("Unknown store type: redis"));
    }
}
