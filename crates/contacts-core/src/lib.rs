// # contacts-core
//
// Core library for the phone-to-address contacts service.
//
// ## Architecture Overview
//
// - **Validator** (`validate`): pure phone and address checks
// - **RecordStore / StoreConnector** (`traits`): port over the key-value store
// - **ContactService** (`service`): existence-dependent state transitions
// - **Outcome mapper** (`outcome`): service results to status + payload
// - **StoreRegistry** (`registry`): backends registered by type name
//
// ## Design Principles
//
// 1. **Validate first**: no store connection is opened for invalid input
// 2. **Scoped connections**: one connection per operation, released on drop
// 3. **Discriminated failures**: business-rule and store failures never share a handler
// 4. **Library-first**: transport and process configuration live in other crates

pub mod config;
pub mod error;
pub mod model;
pub mod outcome;
pub mod registry;
pub mod service;
pub mod store;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use traits::{RecordStore, StoreConnector, StoreConnectorFactory};
pub use service::ContactService;
pub use registry::StoreRegistry;
pub use config::{HttpConfig, ServiceConfig, StoreConfig};
pub use error::{ContactError, Error, ErrorKind, Result};
pub use model::{Address, ContactRecord, Phone};
pub use outcome::{BoundaryResponse, Operation, Outcome, map_outcome};
pub use store::MemoryRecordStore;
pub use validate::{validate_address, validate_phone};
