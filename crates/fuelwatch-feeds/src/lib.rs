pub mod cache;
pub mod client;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod parse;
pub mod query;
pub mod retailers;
pub mod watch;

pub use cache::{Corpus, RefreshSummary, StationCache, DEFAULT_CACHE_TTL};
pub use client::{FeedClient, DEFAULT_TIMEOUT_SECS};
pub use error::FeedError;
pub use normalize::normalize_station;
pub use parse::{coerce_price, normalize_timestamp};
pub use query::{QueryEngine, SearchArea, StationQuery, DEFAULT_SEARCH_LIMIT};
pub use retailers::default_endpoints;
pub use watch::WatchTarget;
