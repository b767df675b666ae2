//! Timestamp normalization and reconciliation.
//!
//! Sources report "last changed" times in their own formats. Those are parsed
//! as UTC, then reconciled against the poll cycle's sample time: the result
//! is never later than the sample, and falls back to the sample when the
//! native value is missing or unparseable.

use chrono::{DateTime, NaiveDateTime, Utc};
use infragraph_types::{ParseTimestampError, Timestamp};
use tracing::debug;

use crate::{Diagnostics, EntityEvent, TransformWarning};

pub use infragraph_types::TIMESTAMP_FORMAT;

/// Parse a native timestamp with its source format.
///
/// Formats without an offset are read as UTC; formats with `%z` are
/// converted to UTC.
pub fn parse_native(value: &str, native_format: &str) -> Result<Timestamp, ParseTimestampError> {
    let trimmed = value.trim();
    let parsed = if has_offset(native_format) {
        DateTime::parse_from_str(trimmed, native_format)
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
    } else {
        NaiveDateTime::parse_from_str(trimmed, native_format).map(Timestamp::from_naive_utc)
    };
    parsed.map_err(|e| ParseTimestampError {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

// NaiveDateTime parsing silently drops offsets, so offset-bearing formats
// must go through DateTime.
fn has_offset(format: &str) -> bool {
    ["%z", "%:z", "%::z", "%#z"]
        .iter()
        .any(|spec| format.contains(spec))
}

/// Convert a native timestamp string into another format.
pub fn normalize_format(
    value: &str,
    native_format: &str,
    canonical_format: &str,
) -> Result<String, ParseTimestampError> {
    parse_native(value, native_format).map(|ts| ts.format(canonical_format))
}

/// Resolve the update time against the sample time.
///
/// A source cannot claim a change after it was observed, so anything later
/// than `sample` (or no value at all) yields `sample`.
pub fn reconcile(update: Option<Timestamp>, sample: Timestamp) -> Timestamp {
    match update {
        Some(ts) if ts <= sample => ts,
        Some(ts) => {
            debug!(update = %ts, sample = %sample, "update timestamp after sample, clamping");
            sample
        }
        None => sample,
    }
}

/// Read, parse and reconcile an event's native "last changed" field.
///
/// An unparseable value is recorded as a warning and the sample time is
/// used instead. A missing value falls back to the sample time silently.
pub fn reconcile_field(
    event: &EntityEvent,
    field: &str,
    native_format: &str,
    diagnostics: &mut Diagnostics,
) -> Timestamp {
    let sample = event.sample_timestamp();
    let update = event.str_field(field).and_then(|raw| {
        match parse_native(raw, native_format) {
            Ok(ts) => Some(ts),
            Err(e) => {
                diagnostics.warn(TransformWarning::TimestampParseFailure {
                    sync_type: event.sync_type().to_string(),
                    field: field.to_string(),
                    value: e.value,
                    reason: e.reason,
                });
                None
            }
        }
    });
    reconcile(update, sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncMode;
    use serde_json::{json, Value};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn event_with(fields: Value) -> EntityEvent {
        let Value::Object(map) = fields else {
            panic!("fields must be an object");
        };
        EntityEvent::new("nagios", SyncMode::Snapshot, ts("2024-01-01T10:05:00Z"), map)
    }

    #[test]
    fn test_normalize_format() {
        let out =
            normalize_format("2024-01-01 10:00:00", "%Y-%m-%d %H:%M:%S", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(out, "2024-01-01T10:00:00Z");
    }

    #[test]
    fn test_parse_native_fractional_seconds() {
        let parsed = parse_native("2024-01-01T10:00:00.123456", "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert_eq!(parsed, ts("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_parse_native_with_offset() {
        let parsed = parse_native("2024-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap();
        assert_eq!(parsed, ts("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_parse_native_rejects_wrong_format() {
        let err = parse_native("01/01/2024", "%Y-%m-%d %H:%M:%S").unwrap_err();
        assert_eq!(err.value, "01/01/2024");
    }

    #[test]
    fn test_reconcile_never_after_sample() {
        let sample = ts("2024-01-01T10:05:00Z");
        let earlier = ts("2024-01-01T10:00:00Z");
        let later = ts("2024-01-01T10:10:00Z");

        assert_eq!(reconcile(Some(earlier), sample), earlier);
        assert_eq!(reconcile(Some(sample), sample), sample);
        assert_eq!(reconcile(Some(later), sample), sample);
        assert_eq!(reconcile(None, sample), sample);
    }

    #[test]
    fn test_reconcile_field_uses_native_time() {
        let event = event_with(json!({"last_check": "2024-01-01 10:00:00"}));
        let mut diagnostics = Diagnostics::new();
        let out = reconcile_field(&event, "last_check", "%Y-%m-%d %H:%M:%S", &mut diagnostics);
        assert_eq!(out, ts("2024-01-01T10:00:00Z"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_reconcile_field_falls_back_with_warning() {
        let event = event_with(json!({"last_check": "not a time"}));
        let mut diagnostics = Diagnostics::new();
        let out = reconcile_field(&event, "last_check", "%Y-%m-%d %H:%M:%S", &mut diagnostics);
        assert_eq!(out, event.sample_timestamp());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.warnings()[0],
            TransformWarning::TimestampParseFailure { .. }
        ));
    }

    #[test]
    fn test_reconcile_field_missing_is_silent() {
        let event = event_with(json!({}));
        let mut diagnostics = Diagnostics::new();
        let out = reconcile_field(&event, "last_check", "%Y-%m-%d %H:%M:%S", &mut diagnostics);
        assert_eq!(out, event.sample_timestamp());
        assert!(diagnostics.is_empty());
    }
}
