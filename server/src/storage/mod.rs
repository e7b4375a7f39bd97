//! SQLite-backed email subscription store.
//!
//! One table, one entity. Every operation is a single statement against a
//! shared connection pool, so an [`EmailStore`] can be cloned freely and
//! used from any number of tasks at once.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE emails (
//!     id           INTEGER PRIMARY KEY AUTOINCREMENT,
//!     email        TEXT    NOT NULL UNIQUE,
//!     confirmed_at TEXT    NOT NULL,
//!     opt_out      INTEGER NOT NULL DEFAULT 0
//! )
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let store = EmailStore::open(path, 5).await?;
//! store.create_schema().await?;
//!
//! store.insert_email("a@x.com").await?;
//! let entry = store.get_email("a@x.com").await?;
//! ```

mod email_store;
mod entry;

pub use email_store::{EmailStore, StoreError};
pub use entry::{BatchQuery, EmailEntry, UNCONFIRMED};
