use std::net::SocketAddr;
use std::time::Duration;

use prost::Message;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::{
    error::TransportError,
    proto,
    rpc::{
        framing::{read_frame, write_frame},
        service::{RpcService, malformed_request_response},
    },
    storage::EmailStore,
};

/// Responses waiting to be written on one connection.
const RESPONSE_QUEUE: usize = 64;

/// Pause after a failed `accept` so a persistent error doesn't spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Bind `addr` and serve RPC calls against `store`.
///
/// # Errors
///
/// Returns [`TransportError::BindFailure`] if the address cannot be bound.
/// Once listening, this only returns if the process is torn down.
pub async fn serve(store: EmailStore, addr: SocketAddr) -> Result<(), TransportError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::BindFailure { addr, source })?;
    tracing::info!("RPC server listening on {addr}");
    run(listener, RpcService::new(store)).await;
    Ok(())
}

/// Accept connections on an already bound listener, forever.
pub async fn run(listener: TcpListener, service: RpcService) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!("RPC connection from {peer}");
                tokio::spawn(handle_connection(stream, service.clone()));
            }
            Err(e) => {
                tracing::warn!("failed to accept RPC connection: {e}");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Read requests until the peer hangs up.
///
/// Every decoded request runs on its own task; responses go back through
/// a single writer task in completion order, matched by `request_id`.
async fn handle_connection(stream: TcpStream, service: RpcService) {
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::channel::<proto::RpcResponse>(RESPONSE_QUEUE);

    let writer_task = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            if let Err(e) = write_frame(&mut writer, &response.encode_to_vec()).await {
                tracing::debug!("RPC client went away mid-response: {e}");
                return;
            }
        }
    });

    loop {
        let payload = match read_frame(&mut reader).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!("RPC client disconnected");
                break;
            }
            Err(e) => {
                tracing::warn!("RPC read error: {e}");
                break;
            }
        };

        let request = match proto::RpcRequest::decode(payload.as_slice()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("failed to decode RpcRequest: {e}");
                if tx.send(malformed_request_response(&e.to_string())).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = service.handle_request(request).await;
            if tx.send(response).await.is_err() {
                tracing::debug!("RPC connection closed before response was sent");
            }
        });
    }

    // In-flight calls hold their own senders; the writer drains them.
    drop(tx);
    if let Err(e) = writer_task.await {
        tracing::warn!("RPC writer task failed: {e}");
    }
}
