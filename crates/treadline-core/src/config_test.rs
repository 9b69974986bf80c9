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

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("TREADLINE_API_BASE_URL", "https://api.example-tires.test/api");
    m
}

#[test]
fn parse_environment_variants() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_api_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TREADLINE_API_BASE_URL"),
        "expected MissingEnvVar(TREADLINE_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_base_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("TREADLINE_API_BASE_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("TREADLINE_API_BASE_URL", "ftp://files.example.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREADLINE_API_BASE_URL"),
        "expected InvalidEnvVar(TREADLINE_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("expected valid config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.api_token.is_none());
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "treadline/0.1 (storefront)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.retry_max_delay_ms, 30_000);
    assert_eq!(cfg.search_debounce_ms, 400);
    assert_eq!(
        cfg.vehicles_path.to_string_lossy(),
        "./data/userVehicles.json"
    );
    assert_eq!(
        cfg.storefront_path.to_string_lossy(),
        "./config/storefront.yaml"
    );
}

#[test]
fn search_debounce_override() {
    let mut map = full_env();
    map.insert("TREADLINE_SEARCH_DEBOUNCE_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_debounce_ms, 250);
}

#[test]
fn search_debounce_invalid() {
    let mut map = full_env();
    map.insert("TREADLINE_SEARCH_DEBOUNCE_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREADLINE_SEARCH_DEBOUNCE_MS"),
        "expected InvalidEnvVar(TREADLINE_SEARCH_DEBOUNCE_MS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("TREADLINE_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREADLINE_MAX_RETRIES")
    );
}

#[test]
fn retry_cap_below_backoff_base_is_rejected() {
    let mut map = full_env();
    map.insert("TREADLINE_RETRY_BACKOFF_BASE_MS", "2000");
    map.insert("TREADLINE_RETRY_MAX_DELAY_MS", "1000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREADLINE_RETRY_MAX_DELAY_MS")
    );
}

#[test]
fn zero_timeout_is_rejected() {
    let mut map = full_env();
    map.insert("TREADLINE_HTTP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TREADLINE_HTTP_TIMEOUT_SECS")
    );
}

#[test]
fn blank_api_token_reads_as_none() {
    let mut map = full_env();
    map.insert("TREADLINE_API_TOKEN", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_token.is_none());
}

#[test]
fn debug_output_redacts_token() {
    let mut map = full_env();
    map.insert("TREADLINE_API_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
