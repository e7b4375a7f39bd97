use crate::{
    proto::{
        self,
        google::rpc::{Code, Status},
        rpc_request::Method,
        rpc_response::Payload,
    },
    storage::{EmailEntry, EmailStore, StoreError},
    types::{ProtoDeserializable, ProtoSerializable, rpc_request::RpcMethod},
};

/// The five email procedures, independent of any transport.
///
/// Stateless apart from the shared store handle; clone it once per call.
#[derive(Debug, Clone)]
pub struct RpcService {
    store: EmailStore,
}

impl RpcService {
    #[must_use]
    pub const fn new(store: EmailStore) -> Self {
        Self { store }
    }

    /// Run one request and build its response.
    ///
    /// The response always carries a status and echoes `request_id`. On
    /// failure the payload is present but empty.
    pub async fn handle_request(&self, request: proto::RpcRequest) -> proto::RpcResponse {
        let request_id = request.request_id;
        let is_batch = matches!(request.method, Some(Method::GetEmailBatch(_)));

        let mut response = match RpcMethod::from_proto(request) {
            Ok(method) => self.call(method).await,
            Err(err) => {
                tracing::debug!("rejected request {request_id:?}: {err}");
                failure(Code::InvalidArgument, err.to_string(), is_batch)
            }
        };
        response.request_id = request_id;
        response
    }

    async fn call(&self, method: RpcMethod) -> proto::RpcResponse {
        let name = method.name();
        tracing::debug!("rpc {name}");

        let is_batch = matches!(method, RpcMethod::GetEmailBatch(_));
        let result = match method {
            RpcMethod::CreateEmail { email } => self.create_email(&email).await.map(Payload::Email),
            RpcMethod::GetEmail { email } => self.email_response(&email).await.map(Payload::Email),
            RpcMethod::GetEmailBatch(query) => self
                .store
                .get_email_batch(&query)
                .await
                .map(|entries| Payload::Batch(entries.to_proto())),
            RpcMethod::UpdateEmail(entry) => self.update_email(&entry).await.map(Payload::Email),
            RpcMethod::DeleteEmail { email } => self.delete_email(&email).await.map(Payload::Email),
        };

        match result {
            Ok(payload) => proto::RpcResponse {
                status: Some(ok_status()),
                payload: Some(payload),
                ..Default::default()
            },
            Err(err) => {
                tracing::warn!("rpc {name} failed: {err}");
                failure(store_code(&err), err.to_string(), is_batch)
            }
        }
    }

    async fn create_email(&self, email: &str) -> Result<proto::EmailResponse, StoreError> {
        self.store.insert_email(email).await?;
        self.email_response(email).await
    }

    async fn update_email(&self, entry: &EmailEntry) -> Result<proto::EmailResponse, StoreError> {
        self.store.update_email(entry).await?;
        self.email_response(&entry.email).await
    }

    async fn delete_email(&self, email: &str) -> Result<proto::EmailResponse, StoreError> {
        self.store.delete_email(email).await?;
        self.email_response(email).await
    }

    /// Re-read the canonical record for `email`.
    async fn email_response(&self, email: &str) -> Result<proto::EmailResponse, StoreError> {
        Ok(self.store.get_email(email).await?.to_proto())
    }
}

/// Response to a frame that could not be decoded at all.
#[must_use]
pub fn malformed_request_response(message: &str) -> proto::RpcResponse {
    proto::RpcResponse {
        request_id: None,
        status: Some(Status {
            code: Code::InvalidArgument.into(),
            message: format!("Failed to decode message: {message}"),
            ..Default::default()
        }),
        payload: None,
    }
}

fn ok_status() -> Status {
    Status {
        code: Code::Ok.into(),
        ..Default::default()
    }
}

fn failure(code: Code, message: String, is_batch: bool) -> proto::RpcResponse {
    let payload = if is_batch {
        Payload::Batch(proto::EmailBatchResponse::default())
    } else {
        Payload::Email(proto::EmailResponse::default())
    };
    proto::RpcResponse {
        status: Some(Status {
            code: code.into(),
            message,
            ..Default::default()
        }),
        payload: Some(payload),
        ..Default::default()
    }
}

fn store_code(err: &StoreError) -> Code {
    match err {
        StoreError::NotFound { .. } => Code::NotFound,
        StoreError::ConstraintViolation(_) => Code::AlreadyExists,
        StoreError::ConnectivityFailure(_) => Code::Unavailable,
    }
}
