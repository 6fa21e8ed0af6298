//! Value-level coercion for retailer payloads: prices and timestamps.
//!
//! Retailers disagree on both units and shapes, so everything here takes an
//! untyped [`serde_json::Value`] and either produces a canonical value or
//! `None`. Nothing in this module fails loudly; see [`crate::normalize`] for
//! how these compose into a [`fuelwatch_core::Station`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Keys that may hold a price inside a price object, in priority order.
/// After these, the remaining values of the object are searched in the order
/// the feed wrote them.
pub const PRICE_KEYS: [&str; 11] = [
    "price",
    "value",
    "amount",
    "amount_ppl",
    "amountPpl",
    "amountPencePerLitre",
    "amount_pence_per_litre",
    "cash_price",
    "cashPrice",
    "pence_per_litre",
    "ppl",
];

/// Values at or above this are read as tenths of a penny (e.g. `1429` → £1.429).
const MILLI_BAND_FLOOR: f64 = 1000.0;
/// Values at or above this (and below [`MILLI_BAND_FLOOR`]) are read as pence.
///
/// Inferred from observed feeds rather than any published contract: a
/// retailer quoting a genuine GBP price of £50+/litre would be misread, and a
/// feed switching to pounds-with-pence-fraction above 50 would be too. Monitor
/// new feeds against this band before trusting them.
const PENCE_BAND_FLOOR: f64 = 50.0;

/// Naive (zone-less) formats tried in order; matches are taken as UTC.
const NAIVE_FORMATS: [&str; 6] = [
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Coerces a raw price field into GBP per litre, rounded to 3 decimal places.
///
/// Accepts a number, a numeric string, an object holding one of
/// [`PRICE_KEYS`], or any nesting of arrays and objects thereof. The search
/// is depth-first and the first finite, non-negative number wins.
///
/// Unit inference: `>= 1000` is divided by 1000, `>= 50` by 100, anything
/// smaller is taken as GBP already.
#[must_use]
pub fn coerce_price(value: &Value) -> Option<f64> {
    first_numeric(value).map(scale_to_gbp)
}

fn first_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| is_price_like(*v)),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| is_price_like(*v)),
        Value::Object(map) => PRICE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .chain(
                map.iter()
                    .filter(|(key, _)| !PRICE_KEYS.contains(&key.as_str()))
                    .map(|(_, v)| v),
            )
            .find_map(first_numeric),
        Value::Array(items) => items.iter().find_map(first_numeric),
        Value::Null | Value::Bool(_) => None,
    }
}

fn is_price_like(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn scale_to_gbp(raw: f64) -> f64 {
    let gbp = if raw >= MILLI_BAND_FLOOR {
        raw / 1000.0
    } else if raw >= PENCE_BAND_FLOOR {
        raw / 100.0
    } else {
        raw
    };
    round_to(gbp, 3)
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Normalizes a raw timestamp into an ISO-8601 / RFC 3339 string.
///
/// Numbers are UNIX epoch seconds. Strings are tried against a fixed list of
/// formats and then a generic RFC 3339 parse; values without a zone are taken
/// as UTC and rendered with an explicit `+00:00`. Zoned values keep their
/// offset. Returns `None` for empty, zero, or unparseable input.
#[must_use]
pub fn normalize_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => from_epoch_seconds(n.as_f64()?),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_epoch_seconds(secs: f64) -> Option<String> {
    if !secs.is_finite() || secs == 0.0 {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    // Out-of-range floats saturate on cast and are then rejected by chrono.
    let dt = DateTime::<Utc>::from_timestamp(whole as i64, nanos)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

fn parse_timestamp_str(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }

    for fmt in &NAIVE_FORMATS[..4] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(render_utc(naive));
        }
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false));
    }

    for fmt in &NAIVE_FORMATS[4..] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(render_utc(naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(render_utc)
}

fn render_utc(naive: NaiveDateTime) -> String {
    naive
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
