//! Timestamp coercion for contract fields declared as datetimes.
//!
//! Accepted inputs:
//! - JSON integer: epoch seconds
//! - JSON float: epoch seconds, fraction kept to nanosecond precision
//! - RFC 3339 string (`2023-11-14T22:13:20Z`, `2023-11-14T22:13:20+02:00`)
//! - Naive ISO string (`2023-11-14T22:13:20`, `2023-11-14 22:13:20.123`), read as UTC
//! - Numeric string: epoch seconds

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerce a JSON value into a UTC timestamp
pub fn coerce(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                from_epoch_secs(secs, 0)
            } else if let Some(secs) = n.as_f64() {
                from_fractional_secs(secs)
            } else {
                Err(format!("epoch seconds out of range: {}", n))
            }
        }
        Value::String(s) => parse_str(s),
        other => Err(format!("cannot coerce {} into a datetime", super::schema::kind_of(other))),
    }
}

fn parse_str(raw: &str) -> Result<DateTime<Utc>, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("empty datetime string".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(secs) = s.parse::<i64>() {
        return from_epoch_secs(secs, 0);
    }
    if let Ok(secs) = s.parse::<f64>() {
        return from_fractional_secs(secs);
    }

    Err(format!("unrecognized datetime string '{}'", raw))
}

fn from_fractional_secs(secs: f64) -> Result<DateTime<Utc>, String> {
    if !secs.is_finite() {
        return Err(format!("epoch seconds not finite: {}", secs));
    }
    let whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round() as u32;
    let mut whole = whole as i64;
    if nanos >= 1_000_000_000 {
        whole += 1;
        nanos -= 1_000_000_000;
    }
    from_epoch_secs(whole, nanos)
}

fn from_epoch_secs(secs: i64, nanos: u32) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| format!("epoch seconds out of range: {}", secs))
}

/// serde adapter for typed records: `#[serde(deserialize_with = "datetime::deserialize")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce(&value).map_err(serde::de::Error::custom)
}
