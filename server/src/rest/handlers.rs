//! HTTP request handlers and shared application state.
//!
//! Every handler reads a JSON body (even for lookups), runs one store
//! operation, and answers with the record as it now stands in the store.
//! Any failure returns immediately.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::de::DeserializeOwned;

use crate::{
    error::ValidationError,
    rest::{
        errors::ApiError,
        models::{BatchQueryBody, EmailEntryBody},
    },
    storage::{BatchQuery, EmailEntry, EmailStore, StoreError},
};

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: EmailStore,
}

/// `POST /email/create`
pub async fn create_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Option<EmailEntryBody>>, ApiError> {
    let request: EmailEntryBody = decode_body(&body)?;
    tracing::debug!("create {}", request.email);
    if request.email.is_empty() {
        return Err(ApiError::BadRequest(ValidationError::MissingEmail.to_string()));
    }

    state
        .store
        .insert_email(&request.email)
        .await
        .map_err(mutation_failed)?;
    lookup(&state.store, &request.email).await
}

/// `GET /email/get`
pub async fn get_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Option<EmailEntryBody>>, ApiError> {
    let request: EmailEntryBody = decode_body(&body)?;
    tracing::debug!("get {}", request.email);
    lookup(&state.store, &request.email).await
}

/// `GET /email/get/batch`
pub async fn get_email_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<EmailEntryBody>>, ApiError> {
    let request: BatchQueryBody = decode_body(&body)?;
    tracing::debug!("get batch page={} count={}", request.page, request.count);

    // Existing clients expect 500 for bad pagination.
    let query = BatchQuery::try_from(request).map_err(|e| ApiError::Internal(e.to_string()))?;

    let entries = state
        .store
        .get_email_batch(&query)
        .await
        .map_err(read_failed)?;
    Ok(Json(entries.into_iter().map(EmailEntryBody::from).collect()))
}

/// `PUT /email/update`
pub async fn update_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Option<EmailEntryBody>>, ApiError> {
    let request: EmailEntryBody = decode_body(&body)?;
    tracing::debug!("update {}", request.email);
    let entry = EmailEntry::try_from(request).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .store
        .update_email(&entry)
        .await
        .map_err(mutation_failed)?;
    lookup(&state.store, &entry.email).await
}

/// `POST /email/delete`
pub async fn delete_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Option<EmailEntryBody>>, ApiError> {
    let request: EmailEntryBody = decode_body(&body)?;
    tracing::debug!("delete {}", request.email);

    state
        .store
        .delete_email(&request.email)
        .await
        .map_err(mutation_failed)?;
    lookup(&state.store, &request.email).await
}

/// Re-read the canonical record; `null` when it doesn't exist.
async fn lookup(store: &EmailStore, email: &str) -> Result<Json<Option<EmailEntryBody>>, ApiError> {
    let entry = store.get_email(email).await.map_err(read_failed)?;
    Ok(Json(entry.map(EmailEntryBody::from)))
}

/// Decode a JSON body regardless of `Content-Type`. An empty body is the
/// default value.
fn decode_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

#[allow(clippy::needless_pass_by_value)]
fn mutation_failed(err: StoreError) -> ApiError {
    tracing::warn!("store write failed: {err}");
    ApiError::BadRequest(err.to_string())
}

#[allow(clippy::needless_pass_by_value)]
fn read_failed(err: StoreError) -> ApiError {
    tracing::warn!("store read failed: {err}");
    ApiError::Internal(err.to_string())
}
