use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use prost::Message;
use tokio::net::TcpStream;

use crate::{
    proto::{
        self,
        google::rpc::Code,
        rpc_request::Method,
        rpc_response::Payload,
    },
    rpc::framing::{read_frame, write_frame},
};

/// Per-call deadline used unless overridden.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// A sequential client for the email RPC server.
///
/// Each call is bounded by the call timeout. A call that times out may leave
/// a half-read frame on the stream, so the client refuses further calls
/// afterwards; connect again instead.
#[derive(Debug)]
pub struct MailerClient {
    stream: TcpStream,
    call_timeout: Duration,
    next_request_id: u32,
    broken: bool,
}

impl MailerClient {
    /// Connect to `addr`, bounded by [`DEFAULT_CALL_TIMEOUT`].
    pub async fn connect(addr: SocketAddr) -> Result<Self, ClientError> {
        let stream = tokio::time::timeout(DEFAULT_CALL_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::Timeout(DEFAULT_CALL_TIMEOUT))??;
        Ok(Self {
            stream,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            next_request_id: 1,
            broken: false,
        })
    }

    #[must_use]
    pub const fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub async fn create_email(&mut self, email: &str) -> Result<proto::EmailResponse, ClientError> {
        let method = Method::CreateEmail(proto::CreateEmailRequest {
            email: email.to_string(),
        });
        self.call_email(method).await
    }

    pub async fn get_email(&mut self, email: &str) -> Result<proto::EmailResponse, ClientError> {
        let method = Method::GetEmail(proto::GetEmailRequest {
            email: email.to_string(),
        });
        self.call_email(method).await
    }

    pub async fn get_email_batch(
        &mut self,
        page: i32,
        count: i32,
    ) -> Result<proto::EmailBatchResponse, ClientError> {
        let method = Method::GetEmailBatch(proto::GetEmailBatchRequest { page, count });
        match self.call(method).await? {
            Payload::Batch(response) => Ok(response),
            Payload::Email(_) => Err(ClientError::UnexpectedPayload),
        }
    }

    pub async fn update_email(
        &mut self,
        entry: proto::EmailEntry,
    ) -> Result<proto::EmailResponse, ClientError> {
        let method = Method::UpdateEmail(proto::UpdateEmailRequest {
            email_entry: Some(entry),
        });
        self.call_email(method).await
    }

    pub async fn delete_email(&mut self, email: &str) -> Result<proto::EmailResponse, ClientError> {
        let method = Method::DeleteEmail(proto::DeleteEmailRequest {
            email: email.to_string(),
        });
        self.call_email(method).await
    }

    async fn call_email(&mut self, method: Method) -> Result<proto::EmailResponse, ClientError> {
        match self.call(method).await? {
            Payload::Email(response) => Ok(response),
            Payload::Batch(_) => Err(ClientError::UnexpectedPayload),
        }
    }

    async fn call(&mut self, method: Method) -> Result<Payload, ClientError> {
        if self.broken {
            return Err(ClientError::Disconnected);
        }

        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let request = proto::RpcRequest {
            request_id: Some(request_id),
            method: Some(method),
        };

        let limit = self.call_timeout;
        let response = match tokio::time::timeout(limit, self.round_trip(request)).await {
            Ok(response) => response?,
            Err(_) => {
                self.broken = true;
                return Err(ClientError::Timeout(limit));
            }
        };

        let status = response.status.unwrap_or_default();
        let code = Code::try_from(status.code).unwrap_or(Code::Unknown);
        if code != Code::Ok {
            return Err(ClientError::Status {
                code,
                message: status.message,
            });
        }
        response.payload.ok_or(ClientError::UnexpectedPayload)
    }

    async fn round_trip(
        &mut self,
        request: proto::RpcRequest,
    ) -> Result<proto::RpcResponse, ClientError> {
        write_frame(&mut self.stream, &request.encode_to_vec()).await?;
        loop {
            let Some(payload) = read_frame(&mut self.stream).await? else {
                self.broken = true;
                return Err(ClientError::Disconnected);
            };
            let response = proto::RpcResponse::decode(payload.as_slice())?;
            if response.request_id == request.request_id {
                return Ok(response);
            }
            tracing::debug!(
                "skipping response for request {:?} while waiting for {:?}",
                response.request_id,
                request.request_id
            );
        }
    }
}

/// Errors returned by [`MailerClient`].
#[derive(Debug)]
pub enum ClientError {
    /// Socket I/O failed.
    Io(io::Error),
    /// The server sent bytes that are not an `RpcResponse`.
    Decode(prost::DecodeError),
    /// No response within the call timeout.
    Timeout(Duration),
    /// The server answered with a non-OK status.
    Status { code: Code, message: String },
    /// The server closed the connection, or an earlier call timed out.
    Disconnected,
    /// The response payload does not match the procedure called.
    UnexpectedPayload,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Decode(e) => write!(f, "failed to decode response: {e}"),
            Self::Timeout(limit) => write!(f, "call timed out after {limit:?}"),
            Self::Status { code, message } => write!(f, "{}: {message}", code.as_str_name()),
            Self::Disconnected => write!(f, "connection closed"),
            Self::UnexpectedPayload => write!(f, "unexpected response payload"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Timeout(_) | Self::Status { .. } | Self::Disconnected | Self::UnexpectedPayload => {
                None
            }
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<prost::DecodeError> for ClientError {
    fn from(e: prost::DecodeError) -> Self {
        Self::Decode(e)
    }
}
