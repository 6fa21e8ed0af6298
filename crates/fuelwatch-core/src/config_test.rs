use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert_eq!(cfg.update_interval_secs, 3600);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_LOG_LEVEL", "debug");
    map.insert("FUELWATCH_REQUEST_TIMEOUT_SECS", "5");
    map.insert("FUELWATCH_CACHE_TTL_SECS", "60");
    map.insert("FUELWATCH_UPDATE_INTERVAL_SECS", "900");
    map.insert("FUELWATCH_USER_AGENT", "fuelwatch-test/0.1");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.cache_ttl_secs, 60);
    assert_eq!(cfg.update_interval_secs, 900);
    assert_eq!(cfg.user_agent, "fuelwatch-test/0.1");
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_REQUEST_TIMEOUT_SECS", "fifteen");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FUELWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FUELWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_REQUEST_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn build_app_config_enforces_minimum_update_interval() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_UPDATE_INTERVAL_SECS", "299");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FUELWATCH_UPDATE_INTERVAL_SECS"),
        "expected InvalidEnvVar(FUELWATCH_UPDATE_INTERVAL_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_minimum_update_interval() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_UPDATE_INTERVAL_SECS", "300");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.update_interval_secs, MIN_UPDATE_INTERVAL_SECS);
}

#[test]
fn build_app_config_blank_user_agent_falls_back_to_default() {
    let mut map = HashMap::new();
    map.insert("FUELWATCH_USER_AGENT", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, AppConfig::default().user_agent);
}
