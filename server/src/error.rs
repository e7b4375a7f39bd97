//! Errors shared by both front-ends.
//!
//! Store failures live with the store in [`crate::storage::StoreError`].

use std::io;
use std::net::SocketAddr;

/// A request was rejected before any store operation ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `page` and `count` must both be at least 1.
    BadPagination { page: i64, count: i64 },
    /// The request carried an empty email address.
    MissingEmail,
    /// An update request carried no entry.
    MissingEntry,
    /// An RPC request named no procedure.
    MissingMethod,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadPagination { page, count } => write!(
                f,
                "page and count are required and must be positive (page={page}, count={count})"
            ),
            Self::MissingEmail => write!(f, "email is required"),
            Self::MissingEntry => write!(f, "email entry is required"),
            Self::MissingMethod => write!(f, "request must name a method"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A front-end could not listen or stopped serving.
#[derive(Debug)]
pub enum TransportError {
    /// The listener could not be bound. Fatal: the process cannot serve.
    BindFailure { addr: SocketAddr, source: io::Error },
    /// The accept loop failed after binding.
    Serve(io::Error),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BindFailure { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Serve(e) => write!(f, "server error: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BindFailure { source, .. } => Some(source),
            Self::Serve(e) => Some(e),
        }
    }
}
