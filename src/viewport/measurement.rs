//! Measurement normalization.
//!
//! Converts the raw JSON payload returned by the measurement endpoint into the
//! canonical point sequence: sorted by instant, indexed by position, with every
//! unparsable timestamp filtered out. Normalization never fails; malformed
//! input simply yields fewer (or zero) points.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Timestamp layouts accepted without an explicit offset (interpreted as UTC)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Timestamp layouts with a numeric offset that RFC 3339 parsing rejects
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

// ============================================================================
// Value coercion
// ============================================================================

/// Outcome of coercing an untrusted `value` field to a number.
///
/// Keeps "the sensor really reported 0" apart from "nothing usable was there",
/// even though both render as 0 on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSource {
    /// A finite number was present (as a JSON number or numeric string)
    Parsed(f64),
    /// Missing, null, non-numeric or non-finite; the point renders as 0
    Fallback,
}

impl ValueSource {
    /// The number used for display and export
    pub fn value(&self) -> f64 {
        match self {
            ValueSource::Parsed(v) => *v,
            ValueSource::Fallback => 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ValueSource::Fallback)
    }
}

/// Total coercion of a raw `value` field.
pub fn parse_value(raw: Option<&Value>) -> ValueSource {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => ValueSource::Parsed(v),
        _ => ValueSource::Fallback,
    }
}

// ============================================================================
// Timestamp parsing
// ============================================================================

/// Parse a user- or server-supplied instant.
///
/// Accepts RFC 3339, ISO-8601 with or without offset (no offset means UTC),
/// `YYYY-MM-DD HH:MM[:SS]` and bare dates (UTC midnight).
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse the `time` field of a raw record: a date string or epoch milliseconds
fn parse_record_time(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::String(s) => parse_instant(s),
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => {
                    let ms = n.as_f64()?;
                    if !ms.is_finite() {
                        return None;
                    }
                    ms.trunc() as i64
                }
            };
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

fn identifier(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// Canonical points
// ============================================================================

/// One point of the canonical sequence
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPoint {
    /// Position in the canonical (sorted) sequence
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    /// Relaxation level, nominally 0..=100
    pub anxiety: f64,
    /// How `anxiety` was obtained from the raw record
    pub value_source: ValueSource,
    /// Server-side unique id (`uuid`); empty when the record had none
    pub source_id: String,
    pub sensor_type: String,
}

/// Normalize a raw measurement payload into the canonical sequence.
///
/// Non-array payloads produce an empty sequence. Records whose `time` cannot
/// be parsed are dropped. The sort is stable, so records sharing an instant
/// keep their server order.
pub fn normalize(payload: &Value) -> Vec<MeasurementPoint> {
    let Some(records) = payload.as_array() else {
        return Vec::new();
    };

    let mut points: Vec<MeasurementPoint> = records
        .iter()
        .filter_map(|record| {
            let timestamp = parse_record_time(record.get("time"))?;
            let value_source = parse_value(record.get("value"));
            Some(MeasurementPoint {
                index: 0,
                timestamp,
                anxiety: value_source.value(),
                value_source,
                source_id: identifier(record.get("uuid")),
                sensor_type: record
                    .get("sensorType")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect();

    points.sort_by_key(|p| p.timestamp);

    for (index, point) in points.iter_mut().enumerate() {
        point.index = index;
    }

    points
}

/// Trailing unique identifier of a canonical sequence ("" when empty)
pub fn trailing_id(points: &[MeasurementPoint]) -> &str {
    points.last().map(|p| p.source_id.as_str()).unwrap_or("")
}
