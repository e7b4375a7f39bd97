//! JSON request and response bodies.

use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    storage::{BatchQuery, EmailEntry},
    types::timestamp::{from_wire_seconds, to_wire_seconds},
};

/// Wire shape of an entry. Every field is optional on input, so lookups
/// can send just `{"email": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailEntryBody {
    pub id: i64,
    pub email: String,
    /// Seconds since the Unix epoch; `0` when unconfirmed.
    pub confirmed_at: i64,
    pub opt_out: bool,
}

impl From<EmailEntry> for EmailEntryBody {
    fn from(entry: EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            confirmed_at: to_wire_seconds(entry.confirmed_at),
            opt_out: entry.opt_out,
        }
    }
}

impl TryFrom<EmailEntryBody> for EmailEntry {
    type Error = ValidationError;

    fn try_from(body: EmailEntryBody) -> Result<Self, Self::Error> {
        if body.email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        Ok(Self {
            id: body.id,
            email: body.email,
            confirmed_at: from_wire_seconds(body.confirmed_at),
            opt_out: body.opt_out,
        })
    }
}

/// `GET /email/get/batch` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchQueryBody {
    pub page: i64,
    pub count: i64,
}

impl TryFrom<BatchQueryBody> for BatchQuery {
    type Error = ValidationError;

    fn try_from(body: BatchQueryBody) -> Result<Self, Self::Error> {
        Self::new(body.page, body.count)
    }
}
