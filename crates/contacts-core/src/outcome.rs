//! Outcome mapping
//!
//! Translates [`ContactService`](crate::ContactService) results into a
//! transport-neutral status code and JSON payload. The HTTP crate only has to
//! copy these onto a response.
//!
//! | Result | Status |
//! |---|---|
//! | `Created` | 201 |
//! | `Found` / `Updated` | 200 |
//! | `Deleted` | 204, no body |
//! | `AlreadyExists` | 400 |
//! | `NotFound` | 404 |
//! | `InvalidFormat` / `EmptyValue` | 422 |
//! | `StoreUnavailable` | 500, generic message |

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ContactError, ErrorKind};
use crate::model::ContactRecord;

/// The four record operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Message returned in place of a store failure's cause
    pub const fn store_failure_message(self) -> &'static str {
        match self {
            Self::Create => "failed to write data",
            Self::Read => "failed to retrieve data",
            Self::Update => "failed to update data",
            Self::Delete => "failed to delete data",
        }
    }

    const fn not_found_message(self) -> &'static str {
        match self {
            Self::Read => "address not found",
            _ => "phone number not found",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful result of a contact operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record was created
    Created(ContactRecord),
    /// Record exists; carries its address
    Found(String),
    /// Record address was replaced
    Updated(ContactRecord),
    /// Record was removed
    Deleted,
}

/// Status code and optional JSON body for the caller
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl BoundaryResponse {
    fn with_body(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn error(status: u16, detail: impl Into<String>) -> Self {
        Self::with_body(status, json!({ "detail": detail.into() }))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Echo body for create and update
#[derive(Debug, Serialize)]
struct RecordEnvelope<'a> {
    status: &'static str,
    code: u16,
    entity: &'a ContactRecord,
}

/// Status code for a failure kind
pub const fn error_status(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::InvalidFormat | ErrorKind::EmptyValue => 422,
        ErrorKind::AlreadyExists => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::StoreUnavailable => 500,
    }
}

/// Map a service result to the boundary representation
pub fn map_outcome(op: Operation, result: Result<Outcome, ContactError>) -> BoundaryResponse {
    match result {
        Ok(outcome) => map_success(outcome),
        Err(err) => map_failure(op, &err),
    }
}

fn map_success(outcome: Outcome) -> BoundaryResponse {
    match outcome {
        Outcome::Created(record) => echo("created", 201, &record),
        Outcome::Updated(record) => echo("updated", 200, &record),
        Outcome::Found(address) => BoundaryResponse::with_body(200, json!({ "address": address })),
        Outcome::Deleted => BoundaryResponse {
            status: 204,
            body: None,
        },
    }
}

fn echo(label: &'static str, code: u16, record: &ContactRecord) -> BoundaryResponse {
    let envelope = RecordEnvelope {
        status: label,
        code,
        entity: record,
    };
    // Phone and Address serialize as plain strings; this cannot fail.
    let body = serde_json::to_value(&envelope).unwrap_or(Value::Null);
    BoundaryResponse::with_body(code, body)
}

fn map_failure(op: Operation, err: &ContactError) -> BoundaryResponse {
    let status = error_status(err.kind());
    match err {
        ContactError::InvalidFormat { .. }
        | ContactError::EmptyValue
        | ContactError::AlreadyExists => BoundaryResponse::error(status, err.to_string()),
        ContactError::NotFound => BoundaryResponse::error(status, op.not_found_message()),
        ContactError::StoreUnavailable { .. } => {
            BoundaryResponse::error(status, op.store_failure_message())
        }
    }
}
