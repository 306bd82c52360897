//! Lenient deserializers for loosely-typed service payloads.
//!
//! The service is not consistent about JSON types: counters and timings show
//! up as numbers in one payload and as strings in the next, and timestamps
//! arrive as ISO-8601 strings or Unix epochs. These helpers are used through
//! `#[serde(deserialize_with = "...")]` and fail the whole decode when a
//! value cannot be coerced.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{Deserializer, Error};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

/// Any scalar the service may send in place of a typed value
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Integer from a JSON number or a numeric string
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + FromStr,
    <T as FromStr>::Err: Display,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => T::try_from(n).map_err(|_| D::Error::custom(format!("integer {n} out of range"))),
        Scalar::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => T::try_from(f as i64)
            .map_err(|_| D::Error::custom(format!("integer {f} out of range"))),
        Scalar::Float(f) => Err(D::Error::custom(format!("expected an integer, found {f}"))),
        Scalar::Str(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}"))),
    }
}

/// Float from a JSON number or a numeric string
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => Ok(n as f64),
        Scalar::Float(f) => Ok(f),
        Scalar::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid float {s:?}: {e}"))),
    }
}

/// Timestamp from an ISO-8601 string or Unix epoch seconds
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => DateTime::from_timestamp(n, 0),
        Scalar::Float(f) => from_epoch(f),
        Scalar::Str(s) => {
            return parse_timestamp(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp {s:?}")))
        }
    };
    parsed.ok_or_else(|| D::Error::custom("epoch timestamp out of range"))
}

/// Parse the timestamp spellings the service is known to emit.
///
/// Naive date-times and bare dates are taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    value.parse::<f64>().ok().and_then(from_epoch)
}

fn from_epoch(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}
