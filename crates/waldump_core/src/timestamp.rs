//! Nanosecond timestamp helpers shared by segment headers and envelopes.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, TimeZone, Utc};

/// Converts unix nanoseconds to a UTC timestamp.
pub(crate) fn from_unix_nanos(nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(nanos)
}

/// Converts a UTC timestamp to unix nanoseconds.
pub(crate) fn to_unix_nanos(at: &DateTime<Utc>) -> CoreResult<i64> {
    at.timestamp_nanos_opt()
        .ok_or_else(|| CoreError::malformed(format!("timestamp {at} outside the nanosecond range")))
}
