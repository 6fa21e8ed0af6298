//! Lookups, text search, radius search and price ranking over the corpus.
//!
//! The free functions operate on a borrowed station slice and are pure; the
//! [`QueryEngine`] wraps them around a shared [`StationCache`] so every query
//! sees a fresh-enough corpus.

use std::collections::HashSet;
use std::sync::Arc;

use fuelwatch_core::{FuelType, GeoPoint, Station};

use crate::cache::StationCache;
use crate::geo::haversine_km;
use crate::parse::round_to;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// First station whose identifier matches `site_id`, ignoring case.
#[must_use]
pub fn find_by_id<'a>(stations: &'a [Station], site_id: &str) -> Option<&'a Station> {
    if site_id.is_empty() {
        return None;
    }
    stations.iter().find(|s| s.has_site_id(site_id))
}

/// Stations within `radius_km` of `center`, nearest first.
///
/// Distances are compared and sorted at metre precision (3 decimal places),
/// so a station 5.0004 km away is inside a 5 km radius. Each result is a copy
/// annotated with its distance rounded to 2 decimal places. Equal distances
/// keep corpus order.
#[must_use]
pub fn within_radius(stations: &[Station], center: GeoPoint, radius_km: f64) -> Vec<Station> {
    let mut matches: Vec<(f64, &Station)> = stations
        .iter()
        .filter_map(|station| {
            let distance = round_to(haversine_km(center, station.point()), 3);
            (distance <= radius_km).then_some((distance, station))
        })
        .collect();
    matches.sort_by(|a, b| a.0.total_cmp(&b.0));

    matches
        .into_iter()
        .map(|(distance, station)| {
            let mut annotated = station.clone();
            annotated.distance_km = Some(round_to(distance, 2));
            annotated
        })
        .collect()
}

/// Case-insensitive substring search over brand, address and postcode.
///
/// Returns at most `limit` stations in corpus order. Blank text matches
/// nothing.
#[must_use]
pub fn search(stations: &[Station], text: &str, limit: usize) -> Vec<Station> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    stations
        .iter()
        .filter(|station| {
            [&station.brand, &station.address, &station.postcode]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(limit)
        .cloned()
        .collect()
}

/// Orders stations by their price for `fuel_type`, cheapest first.
///
/// Stations without a price for that fuel are left out. An unsupported code
/// is not an error: the input is returned unchanged.
#[must_use]
pub fn sort_by_price(stations: &[Station], fuel_type: &str) -> Vec<Station> {
    let Ok(fuel) = fuel_type.parse::<FuelType>() else {
        return stations.to_vec();
    };

    let mut priced: Vec<(f64, &Station)> = stations
        .iter()
        .filter_map(|station| Some((station.price_for(fuel)?, station)))
        .collect();
    priced.sort_by(|a, b| a.0.total_cmp(&b.0));
    priced.into_iter().map(|(_, s)| s.clone()).collect()
}

/// Ranks `stations` by each fuel type in turn and merges the rankings,
/// keeping the first occurrence of each station identifier.
///
/// Stations without an identifier cannot be merged and are left out. If no
/// station survives ranking, the input is returned unchanged.
#[must_use]
pub fn rank_by_fuel_types(stations: &[Station], fuel_types: &[String]) -> Vec<Station> {
    let mut seen: HashSet<String> = HashSet::new();
    let ranked: Vec<Station> = fuel_types
        .iter()
        .flat_map(|fuel| sort_by_price(stations, fuel))
        .filter(|station| {
            station
                .site_id
                .as_ref()
                .is_some_and(|id| seen.insert(id.to_lowercase()))
        })
        .collect();

    if ranked.is_empty() {
        stations.to_vec()
    } else {
        ranked
    }
}

/// Centre and radius for a radius search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: GeoPoint,
    pub radius_km: f64,
}

/// Combined criteria. Exactly one of id, text or area is applied, in that
/// priority order; `fuel_types` only ranks an area result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationQuery {
    pub site_id: Option<String>,
    pub text: Option<String>,
    pub area: Option<SearchArea>,
    pub fuel_types: Vec<String>,
}

/// Query surface over a shared [`StationCache`].
#[derive(Debug, Clone)]
pub struct QueryEngine {
    cache: Arc<StationCache>,
}

impl QueryEngine {
    #[must_use]
    pub fn new(cache: Arc<StationCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<StationCache> {
        &self.cache
    }

    pub async fn get_all(&self) -> Vec<Station> {
        self.cache.get_corpus(false).await.stations().to_vec()
    }

    pub async fn get_by_id(&self, site_id: &str) -> Option<Station> {
        if site_id.is_empty() {
            return None;
        }
        let corpus = self.cache.get_corpus(false).await;
        find_by_id(corpus.stations(), site_id).cloned()
    }

    pub async fn get_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Vec<Station> {
        let Some(center) = GeoPoint::new(latitude, longitude) else {
            tracing::debug!(latitude, longitude, "radius search with invalid centre");
            return Vec::new();
        };
        let corpus = self.cache.get_corpus(false).await;
        within_radius(corpus.stations(), center, radius_km)
    }

    pub async fn search(&self, text: &str, limit: usize) -> Vec<Station> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let corpus = self.cache.get_corpus(false).await;
        search(corpus.stations(), text, limit)
    }

    /// See [`sort_by_price`]; does not touch the cache.
    #[must_use]
    pub fn sort_by_price(stations: &[Station], fuel_type: &str) -> Vec<Station> {
        sort_by_price(stations, fuel_type)
    }

    /// Applies a [`StationQuery`]: id lookup, else text search, else radius
    /// search ranked by the requested fuel types.
    pub async fn find(&self, query: &StationQuery) -> Vec<Station> {
        if let Some(site_id) = query.site_id.as_deref().filter(|s| !s.is_empty()) {
            let found: Vec<Station> = self.get_by_id(site_id).await.into_iter().collect();
            tracing::debug!(site_id, found = found.len(), "station id lookup");
            return found;
        }

        if let Some(text) = query.text.as_deref().filter(|s| !s.trim().is_empty()) {
            let results = self.search(text, DEFAULT_SEARCH_LIMIT).await;
            tracing::debug!(text, found = results.len(), "station text search");
            return results;
        }

        if let Some(area) = query.area {
            let stations = self
                .get_within_radius(area.center.latitude, area.center.longitude, area.radius_km)
                .await;
            tracing::debug!(
                radius_km = area.radius_km,
                found = stations.len(),
                "station radius search"
            );
            if query.fuel_types.is_empty() || stations.is_empty() {
                return stations;
            }
            return rank_by_fuel_types(&stations, &query.fuel_types);
        }

        tracing::warn!("station query has no id, text or area; returning nothing");
        Vec::new()
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
