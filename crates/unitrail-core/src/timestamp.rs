//! Timestamp canonicalization to UTC.
//!
//! # Rules
//!
//! - A trailing `Z` designator is the same instant as a `+00:00`
//!   offset.
//! - An input carrying an explicit offset is converted to UTC.
//! - An input with no offset or zone designator is naive and assumed to
//!   already be UTC: the zone is attached, the clock value is not
//!   shifted.
//! - Anything else is rejected as [`NormalizeError::InvalidTimestamp`].
//!
//! Only fixed-offset arithmetic is performed; there is no timezone
//! database and no named-zone handling.
//!
//! # Accepted shapes
//!
//! RFC 3339 date-times (with `Z` or numeric offset), naive date-times
//! with `T` or space separators and optional fractional seconds, and
//! bare dates (taken as midnight UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use crate::error::NormalizeError;

/// Naive date-time shapes tried after the offset-aware parse, in order.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Canonicalize an extracted payload value to a UTC instant.
///
/// Only strings are recognized timestamp representations in raw
/// payloads; any other JSON kind is rejected with its stringified form
/// in the failure context.
pub fn normalize_timestamp(raw: &Value) -> Result<DateTime<Utc>, NormalizeError> {
    match raw {
        Value::String(s) => parse_utc_instant(s),
        other => Err(NormalizeError::InvalidTimestamp {
            raw: other.to_string(),
        }),
    }
}

/// Parse an ISO-8601-style string into a UTC instant.
pub fn parse_utc_instant(raw: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let trimmed = raw.trim();

    // Offset-aware forms, including the trailing-Z designator.
    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(aware.with_timezone(&Utc));
    }

    // Naive forms: attach UTC, do not convert.
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(NormalizeError::InvalidTimestamp {
        raw: raw.to_string(),
    })
}
