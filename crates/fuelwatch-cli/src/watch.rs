//! Scheduled refresh for the `watch` subcommand.
//!
//! Primes the cache once, then registers a repeated job that force-refreshes
//! every retailer feed and logs the watched stations. Runs until Ctrl-C or
//! SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use fuelwatch_core::{FuelType, Station};
use fuelwatch_feeds::{QueryEngine, WatchTarget};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

pub(crate) async fn run_watch(
    engine: QueryEngine,
    target: Option<WatchTarget>,
    interval: Duration,
) -> anyhow::Result<()> {
    let summary = engine
        .cache()
        .prime()
        .await
        .context("initial refresh failed; retry once the retailer feeds are reachable")?;
    tracing::info!(
        stations = summary.stations,
        sources_ok = summary.sources_ok,
        sources_failed = summary.sources_failed,
        interval_secs = interval.as_secs(),
        "watch: station cache primed"
    );

    let target = target.map(Arc::new);
    report(&engine, target.as_deref()).await;

    let mut scheduler = build_scheduler(engine, target, interval).await?;
    shutdown_signal().await?;
    scheduler.shutdown().await?;
    Ok(())
}

/// Builds and starts a scheduler with one repeated refresh job.
///
/// The returned handle must be kept alive; dropping it stops the job.
async fn build_scheduler(
    engine: QueryEngine,
    target: Option<Arc<WatchTarget>>,
    interval: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let engine = engine.clone();
        let target = target.clone();

        Box::pin(async move {
            tracing::info!("watch: starting scheduled refresh");
            let summary = engine.cache().refresh_now().await;
            tracing::debug!(
                applied = summary.applied,
                stations = summary.stations,
                "watch: scheduled refresh finished"
            );
            report(&engine, target.as_deref()).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn report(engine: &QueryEngine, target: Option<&WatchTarget>) {
    let Some(target) = target else {
        tracing::warn!("watch: no location or station ids configured; nothing to report");
        return;
    };

    let stations = target.collect(engine).await;
    for station in &stations {
        tracing::info!(
            site_id = station.site_id.as_deref().unwrap_or("-"),
            brand = station.brand.as_deref().unwrap_or("-"),
            distance_km = station.distance_km,
            prices = %price_line(station),
            "watch: station"
        );
    }
    tracing::info!(count = stations.len(), "watch: report complete");
}

/// Known fuels in display order, e.g. `E10=1.399 B7=1.479`.
pub(crate) fn price_line(station: &Station) -> String {
    let line = FuelType::ALL
        .iter()
        .filter_map(|fuel| Some(format!("{}={:.3}", fuel.code(), station.price_for(*fuel)?)))
        .collect::<Vec<_>>()
        .join(" ");
    if line.is_empty() {
        "no prices".to_string()
    } else {
        line
    }
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("received shutdown signal, stopping watch");
    Ok(())
}
