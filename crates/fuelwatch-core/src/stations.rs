use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One retailer's published price feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerEndpoint {
    /// Display name, e.g. `"Sainsbury's"`.
    pub name: String,
    pub url: String,
}

impl RetailerEndpoint {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Fuel grades reported in the UK open-data scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelType {
    E10,
    E5,
    B7,
    #[serde(rename = "SDV")]
    Sdv,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [FuelType::E10, FuelType::E5, FuelType::B7, FuelType::Sdv];

    /// Feed code, as used for keys in a station's `prices` map.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            FuelType::E10 => "E10",
            FuelType::E5 => "E5",
            FuelType::B7 => "B7",
            FuelType::Sdv => "SDV",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FuelType::E10 => "E10 (Unleaded Petrol)",
            FuelType::E5 => "E5 (Super Unleaded)",
            FuelType::B7 => "B7 (Diesel)",
            FuelType::Sdv => "SDV (Super Diesel)",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported fuel type code: {0}")]
pub struct UnknownFuelType(pub String);

impl FromStr for FuelType {
    type Err = UnknownFuelType;

    /// Codes are matched exactly; `"e10"` or `"diesel"` are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .into_iter()
            .find(|fuel| fuel.code() == s)
            .ok_or_else(|| UnknownFuelType(s.to_string()))
    }
}

/// A validated WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` when either component is non-finite or out of range.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Price for one fuel grade at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    /// GBP per litre, rounded to three decimal places. Always positive.
    pub price: f64,
    /// Remaining fields of the retailer's price entry (e.g. `fuelType`,
    /// per-grade update times), kept verbatim.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A fuel station normalized from any retailer feed.
///
/// Instances are built once per refresh and never mutated in the cache;
/// query results that need per-request annotations (distance) work on clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Retailer-assigned site identifier. Opaque; compared case-insensitively.
    pub site_id: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub town: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Keyed by the feed's fuel code (`"E10"`, `"B7"`, ...).
    pub prices: BTreeMap<String, FuelPrice>,
    /// ISO-8601 timestamp of the station's (or the feed's) last update.
    pub last_updated: Option<String>,
    /// URL of the feed this station came from.
    pub source_endpoint: String,
    /// Great-circle distance from the query point, set by radius searches only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Any other fields the retailer published for this station.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Station {
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// GBP-per-litre price for `fuel`, if this station reports one.
    #[must_use]
    pub fn price_for(&self, fuel: FuelType) -> Option<f64> {
        self.prices.get(fuel.code()).map(|p| p.price)
    }

    /// Returns `true` if `site_id` matches this station's identifier,
    /// ignoring case.
    #[must_use]
    pub fn has_site_id(&self, site_id: &str) -> bool {
        self.site_id
            .as_deref()
            .is_some_and(|id| id.to_lowercase() == site_id.to_lowercase())
    }
}
