pub mod app_config;
pub mod config;
pub mod stations;

pub use app_config::{AppConfig, MIN_UPDATE_INTERVAL_SECS};
pub use config::{load_app_config, load_app_config_from_env};
pub use stations::{FuelPrice, FuelType, GeoPoint, RetailerEndpoint, Station};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
