//! RPC front-end.
//!
//! Protobuf messages from `proto/mailer.proto` carried in length-prefixed
//! frames over TCP. A client sends `RpcRequest` frames and receives one
//! `RpcResponse` per request, tagged with the same `request_id`. Every
//! response carries a `google.rpc.Status`; failures also carry an empty
//! payload of the procedure's response type.

mod client;
mod framing;
mod server;
mod service;

pub use client::{ClientError, DEFAULT_CALL_TIMEOUT, MailerClient};
pub use framing::{MAX_FRAME_SIZE, read_frame, write_frame};
pub use server::{run, serve};
pub use service::RpcService;
