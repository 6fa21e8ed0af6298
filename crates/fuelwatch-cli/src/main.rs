mod watch;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use fuelwatch_core::{AppConfig, GeoPoint};
use fuelwatch_feeds::geo::{parse_coordinates, DistanceUnit};
use fuelwatch_feeds::{
    default_endpoints, FeedClient, QueryEngine, SearchArea, StationCache, StationQuery,
    WatchTarget, DEFAULT_SEARCH_LIMIT,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_RADIUS: f64 = 5.0;

#[derive(Debug, Parser)]
#[command(name = "fuelwatch")]
#[command(about = "Query live UK retailer fuel prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every station from all reachable retailer feeds.
    All,
    /// Look up a single station by its site id.
    Station { site_id: String },
    /// Stations around a point, nearest first or ranked by fuel price.
    Near(NearArgs),
    /// Match text against brand, address and postcode.
    Search {
        text: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Fetch every feed once and print the refresh summary.
    Refresh,
    /// Refresh on a schedule and log the watched stations after each cycle.
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
struct NearArgs {
    #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "at")]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,
    /// Centre as "lat,lon".
    #[arg(long)]
    at: Option<String>,
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: f64,
    /// Interpret `--radius` as miles.
    #[arg(long)]
    miles: bool,
    /// Rank by these fuel codes (E10, E5, B7, SDV) in priority order.
    #[arg(long = "fuel", value_delimiter = ',')]
    fuel_types: Vec<String>,
}

impl NearArgs {
    fn area(&self) -> anyhow::Result<SearchArea> {
        let center = match (self.lat, self.lon, self.at.as_deref()) {
            (Some(lat), Some(lon), _) => GeoPoint::new(lat, lon)
                .with_context(|| format!("invalid coordinates {lat},{lon}"))?,
            (_, _, Some(text)) => parse_coordinates(text)
                .with_context(|| format!("invalid coordinates '{text}'; expected \"lat,lon\""))?,
            _ => anyhow::bail!("pass either --lat and --lon or --at \"lat,lon\""),
        };
        Ok(search_area(center, self.radius, self.miles))
    }
}

#[derive(Debug, Args)]
struct WatchArgs {
    /// Watched location as "lat,lon".
    #[arg(long, env = "FUELWATCH_WATCH_AT")]
    at: Option<String>,
    #[arg(long, env = "FUELWATCH_WATCH_RADIUS", default_value_t = DEFAULT_RADIUS)]
    radius: f64,
    #[arg(long)]
    miles: bool,
    #[arg(long = "fuel", env = "FUELWATCH_WATCH_FUELS", value_delimiter = ',')]
    fuel_types: Vec<String>,
    /// Station ids to watch when no location is given.
    #[arg(long = "station", env = "FUELWATCH_WATCH_STATIONS", value_delimiter = ',')]
    site_ids: Vec<String>,
}

impl WatchArgs {
    fn target(&self) -> anyhow::Result<Option<WatchTarget>> {
        let area = match self.at.as_deref() {
            Some(text) => {
                let center = parse_coordinates(text)
                    .with_context(|| format!("invalid watch location '{text}'"))?;
                Some(search_area(center, self.radius, self.miles))
            }
            None => None,
        };
        Ok(WatchTarget::from_parts(
            area,
            self.fuel_types.clone(),
            self.site_ids.clone(),
        ))
    }
}

fn search_area(center: GeoPoint, radius: f64, miles: bool) -> SearchArea {
    let unit = if miles {
        DistanceUnit::Miles
    } else {
        DistanceUnit::Kilometres
    };
    SearchArea {
        center,
        radius_km: unit.to_km(radius),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = fuelwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let engine = build_engine(&config)?;

    match cli.command {
        Commands::All => {
            prime(&engine).await?;
            print_json(&engine.get_all().await)?;
        }
        Commands::Station { site_id } => {
            prime(&engine).await?;
            let station = engine
                .get_by_id(&site_id)
                .await
                .with_context(|| format!("no station with site id '{site_id}'"))?;
            print_json(&station)?;
        }
        Commands::Near(args) => {
            let area = args.area()?;
            prime(&engine).await?;
            let query = StationQuery {
                area: Some(area),
                fuel_types: args.fuel_types,
                ..StationQuery::default()
            };
            print_json(&engine.find(&query).await)?;
        }
        Commands::Search { text, limit } => {
            prime(&engine).await?;
            print_json(&engine.search(&text, limit).await)?;
        }
        Commands::Refresh => {
            let summary = engine.cache().refresh_now().await;
            print_json(&summary)?;
            if summary.is_total_outage() {
                anyhow::bail!("every retailer feed failed; try again later");
            }
        }
        Commands::Watch(args) => {
            let target = args.target()?;
            let interval = Duration::from_secs(config.update_interval_secs);
            watch::run_watch(engine, target, interval).await?;
        }
    }

    Ok(())
}

fn build_engine(config: &AppConfig) -> anyhow::Result<QueryEngine> {
    let client = FeedClient::new(config.request_timeout_secs, &config.user_agent)?;
    let cache = StationCache::new(
        client,
        default_endpoints(),
        Duration::from_secs(config.cache_ttl_secs),
    );
    Ok(QueryEngine::new(Arc::new(cache)))
}

async fn prime(engine: &QueryEngine) -> anyhow::Result<()> {
    engine
        .cache()
        .prime()
        .await
        .context("no retailer data available; try again later")?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests;
