use crate::app_config::{AnchorSetting, AppConfig, Environment};
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
/// Decoupled from the real environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let places_api_key = require("PLACES_API_KEY")?;

    let env = parse_environment(&or_default("PLACEFINDER_ENV", "development"))?;
    let bind_addr = or_default("PLACEFINDER_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PLACEFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PLACEFINDER_LOG_LEVEL", "info");

    let places_base_url = or_default(
        "PLACEFINDER_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/",
    );
    let maps_embed_api_key = optional("MAPS_EMBED_API_KEY");

    let anchor = match optional("PLACEFINDER_ANCHOR_COORDINATE") {
        Some(raw) => parse_anchor_coordinate(&raw)?,
        None => optional("PLACEFINDER_ANCHOR_LOCATION")
            .map_or(AnchorSetting::None, AnchorSetting::Location),
    };

    let search_radius_m = parse_u32("PLACEFINDER_SEARCH_RADIUS_M", "50000")?;
    let page_token_delay_ms = parse_u64("PLACEFINDER_PAGE_TOKEN_DELAY_MS", "2000")?;
    let request_timeout_secs = parse_u64("PLACEFINDER_REQUEST_TIMEOUT_SECS", "10")?;
    let search_timeout_secs = parse_u64("PLACEFINDER_SEARCH_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("PLACEFINDER_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PLACEFINDER_RETRY_BACKOFF_BASE_MS", "500")?;

    if search_timeout_secs == 0 {
        return Err(invalid(
            "PLACEFINDER_SEARCH_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let rewrite_api_key = optional("OPENAI_API_KEY");
    let rewrite_model = or_default("PLACEFINDER_REWRITE_MODEL", "gpt-4o-mini");
    let rewrite_base_url = or_default(
        "PLACEFINDER_REWRITE_BASE_URL",
        "https://api.openai.com/v1/",
    );

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        maps_embed_api_key,
        anchor,
        search_radius_m,
        page_token_delay_ms,
        request_timeout_secs,
        search_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        rewrite_api_key,
        rewrite_model,
        rewrite_base_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACEFINDER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parses `"lat,lng"` into a coordinate anchor, rejecting out-of-range values.
fn parse_anchor_coordinate(raw: &str) -> Result<AnchorSetting, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "PLACEFINDER_ANCHOR_COORDINATE".to_string(),
        reason,
    };

    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| invalid(format!("expected \"lat,lng\", got \"{raw}\"")))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("latitude: {e}")))?;
    let longitude = lng
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("longitude: {e}")))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid(format!(
            "coordinate {latitude},{longitude} is out of range"
        )));
    }

    Ok(AnchorSetting::Coordinate {
        latitude,
        longitude,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
