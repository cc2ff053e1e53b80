//! Error types for the contacts service
//!
//! Two layers live here:
//! - [`Error`]: infrastructure failures (store, connection, configuration)
//! - [`ContactError`]: the per-operation outcome taxonomy returned by
//!   [`ContactService`](crate::ContactService)

use thiserror::Error;

/// Result type alias for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure error type
///
/// Returned by store backends, the registry and configuration validation.
/// It carries no business meaning: a missing record is `Ok(None)`, not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// A store command failed
    #[error("Store error: {0}")]
    Store(String),

    /// The store connection could not be opened or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of a single contact operation
///
/// Validation (`InvalidFormat`, `EmptyValue`) and business-rule
/// (`AlreadyExists`, `NotFound`) failures are the caller's fault and are never
/// retried. `StoreUnavailable` is transient; its source is kept for logging
/// only and must not reach the caller.
#[derive(Error, Debug)]
pub enum ContactError {
    /// Phone number is not exactly 11 ASCII digits
    #[error("invalid phone number format: {value}")]
    InvalidFormat {
        /// The rejected input
        value: String,
    },

    /// Address is empty or whitespace-only
    #[error("address must not be empty")]
    EmptyValue,

    /// Create targeted a phone number that already has a record
    #[error("phone number already exists")]
    AlreadyExists,

    /// Read, update or delete targeted a phone number with no record
    #[error("phone number not found")]
    NotFound,

    /// The key-value store could not be reached or rejected a command
    #[error("store unavailable")]
    StoreUnavailable {
        /// Underlying infrastructure failure
        #[source]
        source: Error,
    },
}

impl ContactError {
    /// Create an invalid-format error for the given input
    pub fn invalid_format(value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            value: value.into(),
        }
    }

    /// Wrap an infrastructure failure
    pub fn store_unavailable(source: Error) -> Self {
        Self::StoreUnavailable { source }
    }

    /// Fieldless discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ContactError::EmptyValue => ErrorKind::EmptyValue,
            ContactError::AlreadyExists => ErrorKind::AlreadyExists,
            ContactError::NotFound => ErrorKind::NotFound,
            ContactError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
        }
    }

    /// Whether the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContactError::StoreUnavailable { .. })
    }
}

/// Discriminant of [`ContactError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    EmptyValue,
    AlreadyExists,
    NotFound,
    StoreUnavailable,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::EmptyValue => "empty_value",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
