use crate::app_config::{AppConfig, MIN_UPDATE_INTERVAL_SECS};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is
/// out of range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or is
/// out of range.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration from the provided env-var lookup function.
///
/// Every variable is optional; defaults come from [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let log_level = lookup("FUELWATCH_LOG_LEVEL").unwrap_or(defaults.log_level);
    let user_agent = lookup("FUELWATCH_USER_AGENT")
        .ok()
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or(defaults.user_agent);

    let request_timeout_secs =
        parse_u64("FUELWATCH_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FUELWATCH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let cache_ttl_secs = parse_u64("FUELWATCH_CACHE_TTL_SECS", defaults.cache_ttl_secs)?;

    let update_interval_secs =
        parse_u64("FUELWATCH_UPDATE_INTERVAL_SECS", defaults.update_interval_secs)?;
    if update_interval_secs < MIN_UPDATE_INTERVAL_SECS {
        return Err(ConfigError::InvalidEnvVar {
            var: "FUELWATCH_UPDATE_INTERVAL_SECS".to_string(),
            reason: format!(
                "interval must be at least {MIN_UPDATE_INTERVAL_SECS}s, got {update_interval_secs}s"
            ),
        });
    }

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        cache_ttl_secs,
        update_interval_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
