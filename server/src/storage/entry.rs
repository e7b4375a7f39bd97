use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// Confirmation instant given to every newly created entry.
///
/// An entry whose `confirmed_at` equals this value has not been confirmed.
/// It travels over the wire as `0` seconds.
pub const UNCONFIRMED: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// One stored subscription record.
///
/// `email` is the lookup key for every operation; `id` is assigned by the
/// store and never taken from callers.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailEntry {
    pub id: i64,
    pub email: String,
    pub confirmed_at: DateTime<Utc>,
    pub opt_out: bool,
}

impl EmailEntry {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at != UNCONFIRMED
    }
}

/// A validated page request for [`crate::EmailStore::get_email_batch`].
///
/// Both values are at least 1. The only way to build one from untrusted
/// input is [`BatchQuery::new`], so the store never sees a bad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchQuery {
    page: i64,
    count: i64,
}

impl BatchQuery {
    /// Validate a 1-based `page` and a page size `count`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BadPagination`] if either value is below 1.
    pub const fn new(page: i64, count: i64) -> Result<Self, ValidationError> {
        if page < 1 || count < 1 {
            return Err(ValidationError::BadPagination { page, count });
        }
        Ok(Self { page, count })
    }

    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// Number of rows to skip: `(page - 1) * count`, saturating at `i64::MAX`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.count)
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.count
    }
}
