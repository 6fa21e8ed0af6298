//! HTTP client for retailer price feeds.

use std::time::Duration;

use fuelwatch_core::{RetailerEndpoint, Station};
use reqwest::Client;
use serde_json::Value;

use crate::error::FeedError;
use crate::normalize::normalize_station;
use crate::parse::normalize_timestamp;

/// Default per-endpoint timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Fetches and normalizes one retailer feed at a time.
///
/// Each call is a single GET with no retries: a failed feed is simply absent
/// from the current refresh and tried again on the next one.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with the given total request timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()
            .map_err(FeedError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches one retailer feed and normalizes its stations.
    ///
    /// The body is decoded as JSON regardless of the `Content-Type` header.
    /// A payload without a `stations` array yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`]: connection failure, timeout, or body read error.
    /// - [`FeedError::UnexpectedStatus`]: any non-2xx status.
    /// - [`FeedError::Deserialize`]: the body is not valid JSON.
    pub async fn fetch(&self, endpoint: &RetailerEndpoint) -> Result<Vec<Station>, FeedError> {
        let http_err = |source| FeedError::Http {
            retailer: endpoint.name.clone(),
            url: endpoint.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&endpoint.url)
            .header(reqwest::header::ACCEPT, "application/json, */*;q=0.8")
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                retailer: endpoint.name.clone(),
                url: endpoint.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(http_err)?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|source| FeedError::Deserialize {
                retailer: endpoint.name.clone(),
                url: endpoint.url.clone(),
                source,
            })?;

        let stations = parse_feed(&payload, &endpoint.url);
        tracing::debug!(
            retailer = %endpoint.name,
            stations = stations.len(),
            "fetched retailer feed"
        );
        Ok(stations)
    }
}

/// Normalizes every station in a decoded feed payload.
///
/// Entries that fail normalization (no usable coordinates) are skipped.
#[must_use]
pub fn parse_feed(payload: &Value, source_url: &str) -> Vec<Station> {
    let Some(entries) = payload.get("stations").and_then(Value::as_array) else {
        tracing::debug!(source_url, "feed has no stations array");
        return Vec::new();
    };

    let dataset_timestamp = payload.get("last_updated").and_then(normalize_timestamp);

    let stations: Vec<Station> = entries
        .iter()
        .filter_map(|entry| normalize_station(entry, source_url, dataset_timestamp.as_deref()))
        .collect();

    let dropped = entries.len() - stations.len();
    if dropped > 0 {
        tracing::debug!(source_url, dropped, "skipped stations without usable coordinates");
    }
    stations
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const URL: &str = "https://feed.example.test/data.json";

    #[test]
    fn parse_feed_applies_dataset_timestamp() {
        let payload = json!({
            "last_updated": "02/01/2024 13:45:00",
            "stations": [
                {"site_id": "a", "location": {"latitude": 51.0, "longitude": -0.1}},
                {"site_id": "b", "latitude": 52.0, "longitude": -1.0, "last_updated": 1_700_000_000}
            ]
        });
        let stations = parse_feed(&payload, URL);
        assert_eq!(stations.len(), 2);
        assert_eq!(
            stations[0].last_updated.as_deref(),
            Some("2024-01-02T13:45:00+00:00")
        );
        assert_eq!(
            stations[1].last_updated.as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
    }

    #[test]
    fn parse_feed_skips_stations_without_coordinates() {
        let payload = json!({
            "stations": [
                {"site_id": "a", "latitude": null, "longitude": -0.1},
                {"site_id": "b", "latitude": 52.0, "longitude": -1.0}
            ]
        });
        let stations = parse_feed(&payload, URL);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].site_id.as_deref(), Some("b"));
    }

    #[test]
    fn parse_feed_without_stations_array_is_empty() {
        assert!(parse_feed(&json!({}), URL).is_empty());
        assert!(parse_feed(&json!({"stations": {"a": 1}}), URL).is_empty());
        assert!(parse_feed(&json!([1, 2, 3]), URL).is_empty());
    }
}
