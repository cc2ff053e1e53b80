//! HTTP transport for the contacts service
//!
//! Thin adapter: extract input, call [`ContactService`], copy the mapped
//! status and body onto the response. No business decisions are made here.
//!
//! | Method | Path | Input |
//! |---|---|---|
//! | POST | `/write_data` | JSON `{phone, address}` |
//! | GET | `/check_data` | query `phone` |
//! | PUT | `/update_data` | JSON `{phone, address}` |
//! | DELETE | `/delete_data` | query `phone` |
//!
//! All paths are mounted under [`HttpConfig::normalized_prefix`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use contacts_core::{
    BoundaryResponse, ContactError, ContactService, HttpConfig, Operation, Outcome, map_outcome,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state
pub type AppState = Arc<ContactService>;

/// Body of create and update requests
#[derive(Debug, Clone, Deserialize)]
pub struct DataIn {
    pub phone: String,
    pub address: String,
}

/// Query string of read and delete requests
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

/// Build the router with every route mounted under the configured prefix
pub fn build_router(service: AppState, http: &HttpConfig) -> Router {
    let routes = Router::new()
        .route("/write_data", post(write_data))
        .route("/check_data", get(check_data))
        .route("/update_data", put(update_data))
        .route("/delete_data", delete(delete_data));

    let prefix = http.normalized_prefix();
    let router = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn write_data(
    State(service): State<AppState>,
    body: Result<Json<DataIn>, JsonRejection>,
) -> Response {
    let Json(data) = match body {
        Ok(body) => body,
        Err(rejection) => return unprocessable(rejection.body_text()),
    };
    respond(
        Operation::Create,
        service.create(&data.phone, &data.address).await,
    )
}

async fn check_data(
    State(service): State<AppState>,
    query: Result<Query<PhoneQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return unprocessable(rejection.body_text()),
    };
    respond(Operation::Read, service.read(&query.phone).await)
}

async fn update_data(
    State(service): State<AppState>,
    body: Result<Json<DataIn>, JsonRejection>,
) -> Response {
    let Json(data) = match body {
        Ok(body) => body,
        Err(rejection) => return unprocessable(rejection.body_text()),
    };
    respond(
        Operation::Update,
        service.update(&data.phone, &data.address).await,
    )
}

async fn delete_data(
    State(service): State<AppState>,
    query: Result<Query<PhoneQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return unprocessable(rejection.body_text()),
    };
    respond(Operation::Delete, service.delete(&query.phone).await)
}

fn respond(op: Operation, result: Result<Outcome, ContactError>) -> Response {
    into_response(map_outcome(op, result))
}

/// Copy a mapped outcome onto an HTTP response
pub fn into_response(mapped: BoundaryResponse) -> Response {
    let status =
        StatusCode::from_u16(mapped.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match mapped.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}

/// Malformed or missing input rejected before the service runs
fn unprocessable(detail: String) -> Response {
    tracing::debug!("Rejected request input: {}", detail);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}
