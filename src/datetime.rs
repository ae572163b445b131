//! Date/time utilities for File Hub.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a DateTime<Utc> as an RFC 3339 string with millisecond precision.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a filesystem timestamp to UTC.
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Milliseconds since the Unix epoch for the current instant.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
