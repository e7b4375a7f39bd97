//! JSON-over-HTTP front-end.
//!
//! | Operation | Method | Path               |
//! |-----------|--------|--------------------|
//! | Create    | POST   | `/email/create`    |
//! | Get       | GET    | `/email/get`       |
//! | GetBatch  | GET    | `/email/get/batch` |
//! | Update    | PUT    | `/email/update`    |
//! | Delete    | POST   | `/email/delete`    |
//!
//! A request with the wrong method for a path gets `405 Method Not Allowed`.

pub mod errors;
pub mod handlers;
pub mod models;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;

use crate::{error::TransportError, storage::EmailStore};

use handlers::AppState;

/// Build the router with every `/email/*` route.
pub fn create_router(store: EmailStore) -> Router {
    Router::new()
        .route("/email/create", post(handlers::create_email))
        .route("/email/get", get(handlers::get_email))
        .route("/email/get/batch", get(handlers::get_email_batch))
        .route("/email/update", put(handlers::update_email))
        .route("/email/delete", post(handlers::delete_email))
        .with_state(AppState { store })
}

/// Bind `addr` and serve HTTP requests against `store`.
///
/// # Errors
///
/// Returns [`TransportError::BindFailure`] if the address cannot be bound.
pub async fn serve(store: EmailStore, addr: SocketAddr) -> Result<(), TransportError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::BindFailure { addr, source })?;
    tracing::info!("REST server listening on {addr}");
    axum::serve(listener, create_router(store))
        .await
        .map_err(TransportError::Serve)
}
