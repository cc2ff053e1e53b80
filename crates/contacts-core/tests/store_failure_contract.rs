//! Contract Test: Store Failure Isolation
//!
//! Verifies that infrastructure failures and business-rule failures stay in
//! separate branches:
//! - an unreachable store is StoreUnavailable, never NotFound/AlreadyExists
//! - a conflict is AlreadyExists (400), never a generic 500
//! - the store's error text never reaches the caller

mod common;

use common::*;
use contacts_core::{ContactService, ContactError, ErrorKind, Operation, map_outcome};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn unreachable_store_is_store_unavailable_for_every_operation() {
    let service = ContactService::new(Arc::new(UnreachableConnector));

    let results = [
        (Operation::Create, service.create(PHONE, "Elm St").await),
        (Operation::Read, service.read(PHONE).await),
        (Operation::Update, service.update(PHONE, "Elm St").await),
        (Operation::Delete, service.delete(PHONE).await),
    ];

    for (op, result) in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable, "operation {}", op);
        assert!(err.is_retryable());
    }
}

#[tokio::test]
async fn failing_commands_are_store_unavailable() {
    let (service, connector) = counting_service();
    connector.fail_commands(true);

    // Without the failure these would be NotFound; the store error must win
    assert_eq!(
        service.read(PHONE).await.unwrap_err().kind(),
        ErrorKind::StoreUnavailable
    );
    assert_eq!(
        service.update(PHONE, "Elm St").await.unwrap_err().kind(),
        ErrorKind::StoreUnavailable
    );
    assert_eq!(
        service.delete(PHONE).await.unwrap_err().kind(),
        ErrorKind::StoreUnavailable
    );
    assert_eq!(
        service.create(PHONE, "Elm St").await.unwrap_err().kind(),
        ErrorKind::StoreUnavailable
    );

    connector.fail_commands(false);
    assert!(connector.backing().is_empty().await, "failed create must not write");
}

#[tokio::test]
async fn conflict_on_create_maps_to_400_not_500() {
    let service = memory_service();
    service.create(PHONE, "Elm St").await.unwrap();

    let response = map_outcome(Operation::Create, service.create(PHONE, "Oak Ave").await);

    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        Some(json!({ "detail": "phone number already exists" }))
    );
}

#[tokio::test]
async fn store_error_detail_is_not_exposed() {
    let (service, connector) = counting_service();
    connector.fail_commands(true);

    let result = service.update(PHONE, "Elm St").await;
    match &result {
        Err(ContactError::StoreUnavailable { source }) => {
            assert!(source.to_string().contains("READONLY"));
        }
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }

    let response = map_outcome(Operation::Update, result);
    assert_eq!(response.status, 500);

    let body = response.body.unwrap().to_string();
    assert!(!body.contains("READONLY"));
    assert!(body.contains("failed to update data"));
}

#[tokio::test]
async fn validation_wins_over_unreachable_store() {
    let service = ContactService::new(Arc::new(UnreachableConnector));

    let err = service.create("8909000000", "Elm St").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);

    let response = map_outcome(Operation::Create, Err(err));
    assert_eq!(response.status, 422);
}
