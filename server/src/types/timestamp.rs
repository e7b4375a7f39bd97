//! Stored instant <-> wire seconds.
//!
//! Both front-ends carry `confirmed_at` as a signed count of whole seconds
//! since the Unix epoch. Sub-second precision is dropped on the way out, so
//! a round trip is exact only at whole-second resolution.

use chrono::{DateTime, Utc};

/// Seconds since the Unix epoch, truncating any fractional second.
#[must_use]
pub fn to_wire_seconds(instant: DateTime<Utc>) -> i64 {
    instant.timestamp()
}

/// The instant `seconds` after the Unix epoch.
///
/// Never fails: values beyond what `chrono` can represent clamp to
/// [`DateTime::<Utc>::MIN_UTC`] or [`DateTime::<Utc>::MAX_UTC`].
#[must_use]
pub fn from_wire_seconds(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(if seconds < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
