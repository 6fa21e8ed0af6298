/// Lower bound for the scheduled refresh interval. Retailers publish roughly
/// hourly, and polling all fourteen feeds faster than this is wasted load.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Per-endpoint fetch timeout.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long a refreshed corpus is served before the next fan-out.
    pub cache_ttl_secs: u64,
    /// Interval between scheduled refreshes in watch mode.
    pub update_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_secs: 15,
            user_agent: "fuelwatch/0.1 (+uk-fuel-price-aggregator)".to_string(),
            cache_ttl_secs: 3600,
            update_interval_secs: 3600,
        }
    }
}
