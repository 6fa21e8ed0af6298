//! Normalization from raw retailer station objects to [`Station`].
//!
//! All knowledge of how retailers shape a station lives here: which keys
//! carry the identifier, where coordinates may be nested, and how price
//! collections are laid out. Value-level coercion is delegated to
//! [`crate::parse`].

use std::collections::BTreeMap;

use fuelwatch_core::{FuelPrice, GeoPoint, Station};
use serde_json::{Map, Value};

use crate::parse::{coerce_price, normalize_timestamp, PRICE_KEYS};

/// Keys that may carry the station identifier, in priority order.
const SITE_ID_KEYS: [&str; 3] = ["site_id", "siteId", "id"];

/// Serialized names of the named [`Station`] fields.
const STATION_FIELDS: [&str; 12] = [
    "site_id",
    "brand",
    "name",
    "address",
    "postcode",
    "town",
    "latitude",
    "longitude",
    "prices",
    "last_updated",
    "source_endpoint",
    "distance_km",
];

/// Fields lifted out of a nested `location` object.
const LOCATION_KEYS: [&str; 5] = ["address", "postcode", "latitude", "longitude", "town"];

/// Normalizes one raw station object from a retailer feed.
///
/// `dataset_timestamp` is the feed-level `last_updated`, already normalized;
/// it is used when the station carries no timestamp of its own (or one that
/// cannot be parsed).
///
/// Returns `None` when the entry is not an object or lacks valid coordinates.
#[must_use]
pub fn normalize_station(
    raw: &Value,
    source_url: &str,
    dataset_timestamp: Option<&str>,
) -> Option<Station> {
    let mut fields = raw.as_object()?.clone();

    flatten_location(&mut fields);

    // A present-but-null coordinate is not overridden by a nested location.
    let latitude = take_coordinate(&mut fields, "latitude")?;
    let longitude = take_coordinate(&mut fields, "longitude")?;
    let point = GeoPoint::new(latitude, longitude)?;

    let site_id = take_site_id(&mut fields);
    let last_updated = take_last_updated(&mut fields, dataset_timestamp);
    let prices = normalize_prices(fields.remove("prices"));

    let brand = take_text(&mut fields, "brand");
    let name = take_text(&mut fields, "name");
    let address = take_text(&mut fields, "address");
    let postcode = take_text(&mut fields, "postcode");
    let town = take_text(&mut fields, "town");

    // `extra` is flattened on output; a leftover key would shadow a field.
    for key in STATION_FIELDS {
        fields.remove(key);
    }

    Some(Station {
        site_id,
        brand,
        name,
        address,
        postcode,
        town,
        latitude: point.latitude,
        longitude: point.longitude,
        prices,
        last_updated,
        source_endpoint: source_url.to_string(),
        distance_km: None,
        extra: fields,
    })
}

/// Re-keys a station's `prices` field into a map of fuel code to price.
///
/// A mapping is used as-is; a list of `{fuelType, ...}` objects is keyed by
/// `fuelType` (later duplicates win). Entries whose price cannot be coerced
/// to a positive GBP value are dropped.
#[must_use]
pub fn normalize_prices(prices: Option<Value>) -> BTreeMap<String, FuelPrice> {
    let entries: Vec<(String, Value)> = match prices {
        Some(Value::Object(map)) => map.into_iter().collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| {
                let code = item.get("fuelType")?.as_str()?.to_string();
                Some((code, item))
            })
            .collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|(code, entry)| {
            let code = code.trim().to_string();
            if code.is_empty() {
                return None;
            }
            let price = coerce_price(&entry).filter(|p| *p > 0.0)?;
            let metadata = match entry {
                Value::Object(mut map) => {
                    for key in PRICE_KEYS {
                        map.remove(key);
                    }
                    map
                }
                _ => Map::new(),
            };
            Some((code, FuelPrice { price, metadata }))
        })
        .collect()
}

fn flatten_location(fields: &mut Map<String, Value>) {
    if !matches!(fields.get("location"), Some(Value::Object(_))) {
        return;
    }
    let Some(Value::Object(location)) = fields.remove("location") else {
        return;
    };
    for key in LOCATION_KEYS {
        if fields.contains_key(key) {
            continue;
        }
        if let Some(value) = location.get(key) {
            fields.insert(key.to_string(), value.clone());
        }
    }
}

fn take_coordinate(fields: &mut Map<String, Value>, key: &str) -> Option<f64> {
    let value = fields.remove(key)?;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Removes every identifier key and returns the first usable one.
fn take_site_id(fields: &mut Map<String, Value>) -> Option<String> {
    SITE_ID_KEYS
        .iter()
        .filter_map(|key| fields.remove(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn take_last_updated(
    fields: &mut Map<String, Value>,
    dataset_timestamp: Option<&str>,
) -> Option<String> {
    let own = fields
        .remove("last_updated")
        .and_then(|v| normalize_timestamp(&v));
    own.or_else(|| dataset_timestamp.map(str::to_string))
}

/// Removes `key` and returns it trimmed if it held text (or a number).
fn take_text(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
