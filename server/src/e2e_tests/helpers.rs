//! Common helpers for end-to-end tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::proto::{self, google::rpc::Code, rpc_request::Method, rpc_response::Payload};
use crate::rest::create_router;
use crate::rpc::{self, RpcService};
use crate::storage::EmailStore;
use crate::testing::new_test_store;

/// Both front-ends over one fresh store. The database is removed on drop.
pub struct TestServer {
    pub store: EmailStore,
    pub rpc: RpcService,
    pub router: Router,
    next_request_id: AtomicU32,
    _dir: TempDir,
}

impl TestServer {
    pub async fn new() -> Self {
        let (store, dir) = new_test_store().await;
        Self {
            rpc: RpcService::new(store.clone()),
            router: create_router(store.clone()),
            store,
            next_request_id: AtomicU32::new(1),
            _dir: dir,
        }
    }

    /// Send one RPC call and check the request id comes back.
    pub async fn rpc(&self, method: Method) -> proto::RpcResponse {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .rpc
            .handle_request(proto::RpcRequest {
                request_id: Some(request_id),
                method: Some(method),
            })
            .await;
        assert_eq!(response.request_id, Some(request_id));
        response
    }

    /// Send one HTTP request with a JSON body and parse the JSON reply.
    ///
    /// An empty reply body parses as `Value::Null`.
    pub async fn rest(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let (status, text) = self.rest_raw(method, uri, &body.to_string()).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, value)
    }

    /// Send one HTTP request with a raw body and return the raw reply.
    pub async fn rest_raw(&self, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Serve the RPC front-end on an ephemeral local port.
    pub async fn spawn_rpc_listener(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(rpc::run(listener, self.rpc.clone()));
        addr
    }
}

pub fn create(email: &str) -> Method {
    Method::CreateEmail(proto::CreateEmailRequest {
        email: email.to_string(),
    })
}

pub fn get(email: &str) -> Method {
    Method::GetEmail(proto::GetEmailRequest {
        email: email.to_string(),
    })
}

pub fn batch(page: i32, count: i32) -> Method {
    Method::GetEmailBatch(proto::GetEmailBatchRequest { page, count })
}

pub fn update(email: &str, confirmed_at: i64, opt_out: bool) -> Method {
    Method::UpdateEmail(proto::UpdateEmailRequest {
        email_entry: Some(proto::EmailEntry {
            id: 0,
            email: email.to_string(),
            confirmed_at,
            opt_out,
        }),
    })
}

pub fn delete(email: &str) -> Method {
    Method::DeleteEmail(proto::DeleteEmailRequest {
        email: email.to_string(),
    })
}

pub fn code(response: &proto::RpcResponse) -> Code {
    let status = response.status.as_ref().unwrap();
    Code::try_from(status.code).unwrap()
}

pub fn is_ok(response: &proto::RpcResponse) -> bool {
    code(response) == Code::Ok
}

/// The entry in a single-entry response, if any.
pub fn entry(response: &proto::RpcResponse) -> Option<&proto::EmailEntry> {
    match response.payload.as_ref().unwrap() {
        Payload::Email(email) => email.email_entry.as_ref(),
        Payload::Batch(_) => panic!("Expected Email payload, got Batch"),
    }
}

/// The entries in a batch response.
pub fn entries(response: &proto::RpcResponse) -> &[proto::EmailEntry] {
    match response.payload.as_ref().unwrap() {
        Payload::Batch(batch) => &batch.email_entries,
        Payload::Email(_) => panic!("Expected Batch payload, got Email"),
    }
}
