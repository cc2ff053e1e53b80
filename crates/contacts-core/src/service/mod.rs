//! Contact service
//!
//! The ContactService owns every business-rule decision:
//! - Validating phone and address before touching the store
//! - Opening one store connection per operation
//! - Applying the Absent/Present transition for each operation
//! - Separating store failures from business-rule failures
//!
//! ## State Machine
//!
//! ```text
//!            create                     delete
//!  ┌────────┐ ─────────────────▶ ┌─────────┐ ─────────────────▶ ┌────────┐
//!  │ Absent │                    │ Present │                    │ Absent │
//!  └────────┘                    └─────────┘                    └────────┘
//!                                  │     ▲
//!                                  └─────┘
//!                               update / read
//! ```
//!
//! Each mutation is one conditional store call, so the presence check and
//! the write cannot interleave with another request on backends that
//! implement the primitives atomically.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ContactError, Error};
use crate::model::{ContactRecord, Phone};
use crate::outcome::{Operation, Outcome};
use crate::traits::{RecordStore, StoreConnector};
use crate::validate::{validate_address, validate_phone};

/// Orchestrates validation, presence checks and mutations
///
/// Holds no per-record state; every call reads the store afresh. Cloning is
/// cheap and clones share the connector.
#[derive(Clone)]
pub struct ContactService {
    connector: Arc<dyn StoreConnector>,
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService")
            .field("backend", &self.connector.backend_name())
            .finish()
    }
}

impl ContactService {
    /// Create a service over the given connector
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self { connector }
    }

    /// Name of the backing store (for logs)
    pub fn backend_name(&self) -> &'static str {
        self.connector.backend_name()
    }

    /// Create a record; fails with `AlreadyExists` if the phone is taken
    #[instrument(level = "debug", skip(self, address))]
    pub async fn create(&self, phone: &str, address: &str) -> Result<Outcome, ContactError> {
        let phone = validate_phone(phone)?;
        let address = validate_address(address)?;

        let conn = self.open(Operation::Create).await?;
        let inserted = conn
            .insert_if_absent(phone.as_str(), address.as_str())
            .await
            .map_err(|e| store_failure(Operation::Create, &phone, e))?;

        if !inserted {
            warn!("Create rejected, {} already exists", phone);
            return Err(ContactError::AlreadyExists);
        }

        info!("Created record {}", phone);
        Ok(Outcome::Created(ContactRecord::new(phone, address)))
    }

    /// Read the address stored for a phone number
    #[instrument(level = "debug", skip(self))]
    pub async fn read(&self, phone: &str) -> Result<Outcome, ContactError> {
        let phone = validate_phone(phone)?;

        let conn = self.open(Operation::Read).await?;
        let address = conn
            .get(phone.as_str())
            .await
            .map_err(|e| store_failure(Operation::Read, &phone, e))?;

        match address {
            Some(address) => {
                debug!("Found record {}", phone);
                Ok(Outcome::Found(address))
            }
            None => {
                debug!("No record for {}", phone);
                Err(ContactError::NotFound)
            }
        }
    }

    /// Replace the address of an existing record
    #[instrument(level = "debug", skip(self, address))]
    pub async fn update(&self, phone: &str, address: &str) -> Result<Outcome, ContactError> {
        let phone = validate_phone(phone)?;
        let address = validate_address(address)?;

        let conn = self.open(Operation::Update).await?;
        let replaced = conn
            .replace_if_present(phone.as_str(), address.as_str())
            .await
            .map_err(|e| store_failure(Operation::Update, &phone, e))?;

        if !replaced {
            warn!("Update rejected, {} not found", phone);
            return Err(ContactError::NotFound);
        }

        info!("Updated record {}", phone);
        Ok(Outcome::Updated(ContactRecord::new(phone, address)))
    }

    /// Remove an existing record
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, phone: &str) -> Result<Outcome, ContactError> {
        let phone = validate_phone(phone)?;

        let conn = self.open(Operation::Delete).await?;
        let removed = conn
            .remove_if_present(phone.as_str())
            .await
            .map_err(|e| store_failure(Operation::Delete, &phone, e))?;

        if !removed {
            warn!("Delete rejected, {} not found", phone);
            return Err(ContactError::NotFound);
        }

        info!("Deleted record {}", phone);
        Ok(Outcome::Deleted)
    }

    /// Open a connection released when the returned box drops
    async fn open(&self, op: Operation) -> Result<Box<dyn RecordStore>, ContactError> {
        self.connector.connect().await.map_err(|e| {
            error!(
                "Failed to connect to {} store during {}: {}",
                self.connector.backend_name(),
                op,
                e
            );
            ContactError::store_unavailable(e)
        })
    }
}

fn store_failure(op: Operation, phone: &Phone, err: Error) -> ContactError {
    error!("Store command failed during {} of {}: {}", op, phone, err);
    ContactError::store_unavailable(err)
}
