//! Time-boxed cache over the merged retailer corpus.
//!
//! A refresh fans out one fetch per retailer concurrently and waits for all
//! of them. Failed feeds reduce coverage for that cycle; they never fail the
//! refresh, and a cycle with no usable data leaves the previous corpus in
//! place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use fuelwatch_core::{RetailerEndpoint, Station};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::client::FeedClient;
use crate::error::FeedError;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// The merged set of stations from one refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    stations: Vec<Station>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Corpus {
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Wall-clock time of the refresh that produced this corpus; `None`
    /// before the first successful refresh.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Outcome of one fan-out across all retailer feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub sources_ok: usize,
    pub sources_failed: usize,
    /// Stations in the new corpus; zero when the corpus was left unchanged.
    pub stations: usize,
    /// Whether the cached corpus was replaced.
    pub applied: bool,
}

impl RefreshSummary {
    #[must_use]
    pub fn is_total_outage(&self) -> bool {
        self.sources_ok == 0
    }
}

#[derive(Debug, Default)]
struct CacheState {
    corpus: Arc<Corpus>,
    refreshed: Option<Instant>,
}

/// Shared, in-process cache of normalized stations.
///
/// Construct once and share behind an `Arc`. Reads of a fresh corpus take
/// only a brief read lock; stale reads serialize on a refresh lock so that
/// concurrent callers collapse into a single fan-out.
#[derive(Debug)]
pub struct StationCache {
    client: FeedClient,
    endpoints: Vec<RetailerEndpoint>,
    ttl: Duration,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
}

impl StationCache {
    #[must_use]
    pub fn new(client: FeedClient, endpoints: Vec<RetailerEndpoint>, ttl: Duration) -> Self {
        Self {
            client,
            endpoints,
            ttl,
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> &[RetailerEndpoint] {
        &self.endpoints
    }

    /// Returns the cached corpus, refreshing first if it is stale or
    /// `force_refresh` is set.
    ///
    /// Never fails: if every feed is down, the previous corpus (possibly
    /// empty) is returned.
    pub async fn get_corpus(&self, force_refresh: bool) -> Arc<Corpus> {
        if !force_refresh {
            if let Some(corpus) = self.fresh_corpus().await {
                return corpus;
            }
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited for the lock.
        if !force_refresh {
            if let Some(corpus) = self.fresh_corpus().await {
                return corpus;
            }
        }
        self.refresh_locked().await;
        self.snapshot().await
    }

    /// The current corpus, without triggering a refresh.
    pub async fn snapshot(&self) -> Arc<Corpus> {
        Arc::clone(&self.state.read().await.corpus)
    }

    /// Forces a refresh cycle and reports what happened.
    pub async fn refresh_now(&self) -> RefreshSummary {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Performs the initial refresh for a newly constructed cache.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotReady`] if no feed produced data and the cache
    /// holds nothing from an earlier refresh. Callers should retry later.
    pub async fn prime(&self) -> Result<RefreshSummary, FeedError> {
        let summary = self.refresh_now().await;
        if !summary.applied && self.state.read().await.refreshed.is_none() {
            return Err(FeedError::NotReady {
                failed: summary.sources_failed,
                total: self.endpoints.len(),
            });
        }
        Ok(summary)
    }

    async fn fresh_corpus(&self) -> Option<Arc<Corpus>> {
        let state = self.state.read().await;
        let refreshed = state.refreshed?;
        (refreshed.elapsed() < self.ttl).then(|| Arc::clone(&state.corpus))
    }

    /// Must be called with `refresh_lock` held.
    async fn refresh_locked(&self) -> RefreshSummary {
        let total = self.endpoints.len();
        let results = join_all(
            self.endpoints
                .iter()
                .map(|endpoint| async move { (endpoint, self.client.fetch(endpoint).await) }),
        )
        .await;

        let mut stations: Vec<Station> = Vec::new();
        let mut failures: Vec<(&RetailerEndpoint, FeedError)> = Vec::new();
        let mut sources_ok = 0usize;
        for (endpoint, result) in results {
            match result {
                Ok(batch) => {
                    sources_ok += 1;
                    stations.extend(batch);
                }
                Err(err) => failures.push((endpoint, err)),
            }
        }
        let sources_failed = failures.len();

        if sources_ok == 0 {
            match failures.last() {
                Some((endpoint, err)) => tracing::error!(
                    total,
                    last_retailer = %endpoint.name,
                    error = %err,
                    "all retailer feeds failed; keeping previous station data"
                ),
                None => tracing::error!("no retailer feeds configured; keeping previous station data"),
            }
            return RefreshSummary {
                sources_ok,
                sources_failed,
                stations: 0,
                applied: false,
            };
        }

        if sources_failed > 0 {
            tracing::warn!(
                failed = sources_failed,
                total,
                "some retailer feeds failed; serving partial coverage"
            );
            for (endpoint, err) in &failures {
                tracing::debug!(
                    retailer = %endpoint.name,
                    url = %endpoint.url,
                    error = %err,
                    "retailer feed failed"
                );
            }
        }

        if stations.is_empty() {
            tracing::warn!(
                sources_ok,
                "retailer feeds returned no usable stations; keeping previous station data"
            );
            return RefreshSummary {
                sources_ok,
                sources_failed,
                stations: 0,
                applied: false,
            };
        }

        let count = stations.len();
        let corpus = Arc::new(Corpus {
            stations,
            refreshed_at: Some(Utc::now()),
        });
        {
            let mut state = self.state.write().await;
            state.corpus = corpus;
            state.refreshed = Some(Instant::now());
        }
        tracing::info!(
            stations = count,
            sources_ok,
            sources_failed,
            "station cache refreshed"
        );

        RefreshSummary {
            sources_ok,
            sources_failed,
            stations: count,
            applied: true,
        }
    }
}
