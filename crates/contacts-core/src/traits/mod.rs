//! Core traits for the contacts service
//!
//! This module defines the abstract store interfaces that backends implement.
//!
//! - [`RecordStore`]: `get/set/delete` capability over one live connection
//! - [`StoreConnector`]: opens a [`RecordStore`] connection per request
//! - [`StoreConnectorFactory`]: builds a connector from configuration

pub mod record_store;

pub use record_store::{RecordStore, StoreConnector, StoreConnectorFactory};
