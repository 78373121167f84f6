use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default Graph API root, pinned to the API version the field lists target.
pub const DEFAULT_INSTAGRAM_API_BASE_URL: &str = "https://graph.instagram.com/v18.0";

/// Upper bound on transport retries per upstream call.
pub const MAX_INSTAGRAM_RETRIES: u32 = 2;

/// Largest page size the media endpoint accepts.
pub const MAX_MEDIA_LIMIT: u32 = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

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

    let env = parse_environment(&or_default("INSTAMETRICS_ENV", "development"))?;

    let bind_addr = or_default("INSTAMETRICS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("INSTAMETRICS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("INSTAMETRICS_LOG_LEVEL", "info");

    let instagram_access_token = lookup("INSTAGRAM_ACCESS_TOKEN")
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    let instagram_api_base_url =
        or_default("INSTAGRAM_API_BASE_URL", DEFAULT_INSTAGRAM_API_BASE_URL);

    let instagram_media_limit = parse_u32("INSTAGRAM_MEDIA_LIMIT", "25")?;
    if !(1..=MAX_MEDIA_LIMIT).contains(&instagram_media_limit) {
        return Err(invalid(
            "INSTAGRAM_MEDIA_LIMIT",
            format!("must be between 1 and {MAX_MEDIA_LIMIT}"),
        ));
    }

    let instagram_request_timeout_secs = parse_u64("INSTAGRAM_REQUEST_TIMEOUT_SECS", "30")?;

    let instagram_max_retries = parse_u32("INSTAGRAM_MAX_RETRIES", "2")?;
    if instagram_max_retries > MAX_INSTAGRAM_RETRIES {
        return Err(invalid(
            "INSTAGRAM_MAX_RETRIES",
            format!("must be at most {MAX_INSTAGRAM_RETRIES}"),
        ));
    }

    let instagram_retry_backoff_base_ms = parse_u64("INSTAGRAM_RETRY_BACKOFF_BASE_MS", "500")?;
    let cache_ttl_secs = parse_u64("INSTAMETRICS_CACHE_TTL_SECS", "300")?;

    let rate_limit_per_minute = parse_usize("INSTAMETRICS_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "INSTAMETRICS_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        instagram_access_token,
        instagram_api_base_url,
        instagram_media_limit,
        instagram_request_timeout_secs,
        instagram_max_retries,
        instagram_retry_backoff_base_ms,
        cache_ttl_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INSTAMETRICS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
