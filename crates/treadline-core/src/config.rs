use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = require("TREADLINE_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TREADLINE_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }
    let api_token = lookup("TREADLINE_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let env = parse_environment(&or_default("TREADLINE_ENV", "development"));
    let log_level = or_default("TREADLINE_LOG_LEVEL", "info");

    let http_timeout_secs = parse_u64("TREADLINE_HTTP_TIMEOUT_SECS", "30")?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TREADLINE_HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("TREADLINE_USER_AGENT", "treadline/0.1 (storefront)");
    let max_retries = parse_u32("TREADLINE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("TREADLINE_RETRY_BACKOFF_BASE_MS", "500")?;
    let retry_max_delay_ms = parse_u64("TREADLINE_RETRY_MAX_DELAY_MS", "30000")?;
    if retry_max_delay_ms < retry_backoff_base_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "TREADLINE_RETRY_MAX_DELAY_MS".to_string(),
            reason: format!("must be at least the back-off base ({retry_backoff_base_ms} ms)"),
        });
    }
    let search_debounce_ms = parse_u64("TREADLINE_SEARCH_DEBOUNCE_MS", "400")?;

    let vehicles_path = PathBuf::from(or_default(
        "TREADLINE_VEHICLES_PATH",
        "./data/userVehicles.json",
    ));
    let storefront_path = PathBuf::from(or_default(
        "TREADLINE_STOREFRONT_PATH",
        "./config/storefront.yaml",
    ));

    Ok(AppConfig {
        api_base_url,
        api_token,
        env,
        log_level,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        retry_max_delay_ms,
        search_debounce_ms,
        vehicles_path,
        storefront_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
