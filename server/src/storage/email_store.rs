use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::storage::entry::{BatchQuery, EmailEntry, UNCONFIRMED};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS emails (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        email        TEXT    NOT NULL UNIQUE,
        confirmed_at TEXT    NOT NULL,
        opt_out      INTEGER NOT NULL DEFAULT 0
    )";

/// Handle to the email table.
///
/// Cloning is cheap: every clone shares the same connection pool. The pool
/// is safe to use from many tasks at once and SQLite serializes
/// conflicting writes, so callers need no extra locking.
#[derive(Debug, Clone)]
pub struct EmailStore {
    pool: SqlitePool,
}

impl EmailStore {
    /// Open the database file at `path`, creating it if it doesn't exist.
    ///
    /// The schema is not touched; call [`EmailStore::create_schema`] next.
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Ensure the `emails` table exists. Idempotent.
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::debug!("email schema ready");
        Ok(())
    }

    /// Insert a new, unconfirmed, opted-in entry and return its id.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConstraintViolation`] if the address already exists.
    pub async fn insert_email(&self, email: &str) -> Result<i64, StoreError> {
        let result =
            sqlx::query("INSERT INTO emails (email, confirmed_at, opt_out) VALUES (?, ?, 0)")
                .bind(email)
                .bind(UNCONFIRMED)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Look up an entry by address. A missing address is `Ok(None)`.
    pub async fn get_email(&self, email: &str) -> Result<Option<EmailEntry>, StoreError> {
        let entry = sqlx::query_as::<_, EmailEntry>(
            "SELECT id, email, confirmed_at, opt_out FROM emails WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// One page of entries in insertion order.
    ///
    /// A page past the end of the table is an empty vector, not an error.
    pub async fn get_email_batch(&self, query: &BatchQuery) -> Result<Vec<EmailEntry>, StoreError> {
        let entries = sqlx::query_as::<_, EmailEntry>(
            "SELECT id, email, confirmed_at, opt_out FROM emails ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Overwrite `confirmed_at` and `opt_out` for the row matching
    /// `entry.email`. `entry.id` is ignored.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no row has that address.
    pub async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE emails SET confirmed_at = ?, opt_out = ? WHERE email = ?")
            .bind(entry.confirmed_at)
            .bind(entry.opt_out)
            .bind(&entry.email)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                email: entry.email.clone(),
            });
        }
        Ok(())
    }

    /// Permanently remove the row matching `email`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no row has that address.
    pub async fn delete_email(&self, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM emails WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                email: email.to_string(),
            });
        }
        Ok(())
    }

    /// Close every pooled connection. Later calls fail with
    /// [`StoreError::ConnectivityFailure`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No row matches the address.
    NotFound { email: String },
    /// The engine rejected the write, e.g. a duplicate address.
    ConstraintViolation(String),
    /// The engine could not be reached or failed for another reason.
    ConnectivityFailure(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { email } => write!(f, "email not found: {email}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::ConnectivityFailure(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConnectivityFailure(e) => Some(e),
            Self::NotFound { .. } | Self::ConstraintViolation(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &e {
            // SQLITE_CONSTRAINT is 19; extended codes share its low byte.
            let constraint_code = db_error
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| (code & 0xff) == 19);
            if constraint_code || !matches!(db_error.kind(), sqlx::error::ErrorKind::Other) {
                return Self::ConstraintViolation(db_error.message().to_string());
            }
        }
        Self::ConnectivityFailure(e)
    }
}
