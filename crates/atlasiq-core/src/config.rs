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
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
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

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let meta_access_token = require("META_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("ATLASIQ_ENV", "development"))?;
    let log_level = or_default("ATLASIQ_LOG_LEVEL", "info");
    let meta_graph_base_url = or_default("META_GRAPH_BASE_URL", "https://graph.facebook.com/v18.0");

    let request_timeout_secs = parse_u64("ATLASIQ_REQUEST_TIMEOUT_SECS", "5")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "ATLASIQ_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let max_calls_per_hour = parse_u32("ATLASIQ_MAX_CALLS_PER_HOUR", "200")?;

    let raw_radius = or_default("ATLASIQ_SEARCH_RADIUS_METERS", "16093.4");
    let search_radius_meters = raw_radius
        .parse::<f64>()
        .map_err(|e| invalid("ATLASIQ_SEARCH_RADIUS_METERS", e.to_string()))?;
    if !search_radius_meters.is_finite() || search_radius_meters <= 0.0 {
        return Err(invalid(
            "ATLASIQ_SEARCH_RADIUS_METERS",
            format!("must be a positive number of meters, got {raw_radius}"),
        ));
    }

    let place_query = or_default("ATLASIQ_PLACE_QUERY", "restaurant");
    let max_places = parse_usize("ATLASIQ_MAX_PLACES", "5")?;
    let posts_per_place = parse_u32("ATLASIQ_POSTS_PER_PLACE", "25")?;
    let max_retries = parse_u32("ATLASIQ_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("ATLASIQ_RETRY_BACKOFF_BASE_MS", "500")?;
    let categories_path = lookup("ATLASIQ_CATEGORIES_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        meta_access_token,
        meta_graph_base_url,
        request_timeout_secs,
        max_calls_per_hour,
        search_radius_meters,
        place_query,
        max_places,
        posts_per_place,
        max_retries,
        retry_backoff_base_ms,
        categories_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ATLASIQ_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
