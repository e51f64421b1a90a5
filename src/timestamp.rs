//! Wall-clock timestamps in the wire format shared by every endpoint.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string with millisecond precision.
#[must_use]
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
