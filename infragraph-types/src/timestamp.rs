//! Canonical timestamp representation.
//!
//! All timestamps carried by graph elements are UTC with second precision and
//! render in [`TIMESTAMP_FORMAT`]. The format is fixed width, so the string
//! form sorts the same way as the instant it represents.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;

/// Canonical timestamp format used across the graph.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A point in time, UTC, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

/// Error returned when a string is not a valid canonical timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{value}': {reason}")]
pub struct ParseTimestampError {
    pub value: String,
    pub reason: String,
}

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap a UTC datetime, dropping sub-second precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Interpret a naive datetime as UTC.
    pub fn from_naive_utc(naive: NaiveDateTime) -> Self {
        Self::from_datetime(naive.and_utc())
    }

    /// Build from seconds since the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Parse a timestamp in canonical form, also accepting RFC 3339.
    pub fn parse(value: &str) -> Result<Self, ParseTimestampError> {
        let trimmed = value.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
            return Ok(Self::from_naive_utc(naive));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| ParseTimestampError {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// The underlying UTC datetime.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Seconds since the Unix epoch.
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render with an arbitrary strftime format.
    pub fn format(&self, format: &str) -> String {
        self.0.format(format).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}
