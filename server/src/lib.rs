// Life of a request:
// 1. A call arrives on one of the two front-ends
//     - RPC: a length-prefixed protobuf frame over TCP
//     - REST: a JSON body on one of the `/email/*` routes
// 2. Decode / validate the wire shape into the internal request format
// 3. Run exactly one store operation
// 4. Re-read the canonical record, translate it to the wire shape, respond
//
// System components:
//  - SQLite-backed email store (shared by both front-ends)
//  - Record translator (stored instant <-> wire seconds)
//  - RPC front-end
//  - REST front-end

pub mod config;
pub mod error;
pub mod proto;
pub mod rest;
pub mod rpc;
pub mod storage;
pub mod types;


pub use error::{TransportError, ValidationError};
pub use storage::{BatchQuery, EmailEntry, EmailStore, StoreError, UNCONFIRMED};
