//! Time normalization to canonical integer seconds.
//!
//! # Responsibilities
//! - Coerce heterogeneous time representations into a non-negative 64-bit
//!   seconds count
//! - Validate interval ordering before anything touches the remote system
//!
//! # Design Decisions
//! - Explicit unit variants ([`TimeInput::Seconds`], [`TimeInput::Millis`])
//!   are preferred; [`TimeInput::Numeric`] keeps legacy untyped callers
//!   working through a magnitude heuristic (values above 1e12 read as
//!   milliseconds), which is inherently ambiguous near the threshold
//! - String parsing assumes UTC when the input carries no offset

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use crate::error::{AdapterError, AdapterResult};

/// Numeric values above this are treated as millisecond timestamps.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// A point in time in one of the representations callers actually hold.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// Seconds since the Unix epoch.
    Seconds(u64),
    /// Milliseconds since the Unix epoch.
    Millis(u64),
    /// Untyped numeric timestamp; unit inferred by magnitude.
    Numeric(i64),
    /// A date string (RFC 3339 or a small set of common formats).
    Text(String),
    /// An already-parsed instant.
    At(DateTime<Utc>),
}

impl TimeInput {
    /// Classify a loose JSON value as a time input.
    ///
    /// Fractional numbers are floored; non-scalar shapes carry no instant
    /// and fail with `UnsupportedTimeType`.
    pub fn from_json(value: &Value) -> AdapterResult<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Numeric(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Numeric(f.floor() as i64))
                } else {
                    // u64 beyond i64::MAX; already past any plausible instant.
                    Err(AdapterError::OutOfRange {
                        field: "time".into(),
                        value: n.to_string(),
                    })
                }
            }
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Null => Err(AdapterError::UnsupportedTimeType("null")),
            Value::Bool(_) => Err(AdapterError::UnsupportedTimeType("boolean")),
            Value::Array(_) => Err(AdapterError::UnsupportedTimeType("array")),
            Value::Object(_) => Err(AdapterError::UnsupportedTimeType("object")),
        }
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::At(instant)
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Normalize any supported representation to canonical epoch seconds.
pub fn normalize_to_seconds(input: &TimeInput) -> AdapterResult<u64> {
    match input {
        TimeInput::Seconds(s) => Ok(*s),
        TimeInput::Millis(ms) => Ok(ms / 1000),
        TimeInput::Numeric(n) => {
            if *n < 0 {
                return Err(AdapterError::OutOfRange {
                    field: "time".into(),
                    value: n.to_string(),
                });
            }
            if *n > MILLIS_THRESHOLD {
                Ok((*n as u64) / 1000)
            } else {
                Ok(*n as u64)
            }
        }
        TimeInput::Text(s) => parse_text(s),
        TimeInput::At(instant) => epoch_seconds(instant.timestamp(), || instant.to_rfc3339()),
    }
}

/// Fail with `InvalidInterval` unless `end` lies strictly after `start`.
pub fn validate_range(start: &TimeInput, end: &TimeInput) -> AdapterResult<()> {
    let start_secs = normalize_to_seconds(start)?;
    let end_secs = normalize_to_seconds(end)?;
    if end_secs <= start_secs {
        return Err(AdapterError::InvalidInterval {
            start: start_secs,
            end: end_secs,
        });
    }
    Ok(())
}

/// Normalize and narrow to the 32-bit seconds width used by slot fields.
pub fn to_u32_seconds(input: &TimeInput) -> AdapterResult<u32> {
    let seconds = normalize_to_seconds(input)?;
    u32::try_from(seconds).map_err(|_| AdapterError::OutOfRange {
        field: "time".into(),
        value: seconds.to_string(),
    })
}

fn parse_text(text: &str) -> AdapterResult<u64> {
    let trimmed = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return epoch_seconds(instant.timestamp(), || trimmed.to_string());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return epoch_seconds(naive.and_utc().timestamp(), || trimmed.to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date.and_time(NaiveTime::MIN);
        return epoch_seconds(naive.and_utc().timestamp(), || trimmed.to_string());
    }
    Err(AdapterError::InvalidTimeFormat(text.to_string()))
}

fn epoch_seconds(timestamp: i64, shown: impl FnOnce() -> String) -> AdapterResult<u64> {
    u64::try_from(timestamp).map_err(|_| AdapterError::OutOfRange {
        field: "time".into(),
        value: shown(),
    })
}
