//! Standing queries evaluated on every scheduled refresh.

use fuelwatch_core::Station;

use crate::query::{QueryEngine, SearchArea, StationQuery};

/// What a scheduled watch reports on.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchTarget {
    /// Stations around a point, ranked by the given fuel types.
    Area {
        area: SearchArea,
        fuel_types: Vec<String>,
    },
    /// A fixed list of station identifiers.
    Stations(Vec<String>),
}

impl WatchTarget {
    /// Builds a target from optional parts. An area takes precedence over a
    /// station list; with neither, returns `None`.
    #[must_use]
    pub fn from_parts(
        area: Option<SearchArea>,
        fuel_types: Vec<String>,
        site_ids: Vec<String>,
    ) -> Option<Self> {
        if let Some(area) = area {
            return Some(WatchTarget::Area { area, fuel_types });
        }
        let site_ids: Vec<String> = site_ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        (!site_ids.is_empty()).then_some(WatchTarget::Stations(site_ids))
    }

    /// Evaluates the target against the engine's current corpus.
    ///
    /// Identifiers with no matching station are logged and skipped.
    pub async fn collect(&self, engine: &QueryEngine) -> Vec<Station> {
        match self {
            WatchTarget::Area { area, fuel_types } => {
                let query = StationQuery {
                    area: Some(*area),
                    fuel_types: fuel_types.clone(),
                    ..StationQuery::default()
                };
                engine.find(&query).await
            }
            WatchTarget::Stations(site_ids) => {
                let mut stations = Vec::with_capacity(site_ids.len());
                for site_id in site_ids {
                    match engine.get_by_id(site_id).await {
                        Some(station) => stations.push(station),
                        None => tracing::warn!(site_id, "no station data for watched site id"),
                    }
                }
                stations
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fuelwatch_core::GeoPoint;

    use super::*;

    fn area() -> SearchArea {
        SearchArea {
            center: GeoPoint::new(51.5, -0.12).unwrap(),
            radius_km: 5.0,
        }
    }

    #[test]
    fn area_beats_station_list() {
        let target = WatchTarget::from_parts(
            Some(area()),
            vec!["E10".to_string()],
            vec!["gb-1".to_string()],
        );
        assert!(matches!(target, Some(WatchTarget::Area { .. })));
    }

    #[test]
    fn blank_station_ids_are_ignored() {
        let target =
            WatchTarget::from_parts(None, vec![], vec![" ".to_string(), "gb-1 ".to_string()]);
        assert_eq!(target, Some(WatchTarget::Stations(vec!["gb-1".to_string()])));
    }

    #[test]
    fn nothing_to_watch_is_none() {
        assert_eq!(WatchTarget::from_parts(None, vec![], vec![]), None);
        assert_eq!(
            WatchTarget::from_parts(None, vec!["E10".to_string()], vec![String::new()]),
            None
        );
    }
}
