use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

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
/// Decoupled from the real process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("COMPETEAWARE_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_var(&lookup, "COMPETEAWARE_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("COMPETEAWARE_LOG_LEVEL", "info");
    let competitors_path = PathBuf::from(or_default(
        "COMPETEAWARE_COMPETITORS_PATH",
        "./config/competitors.yaml",
    ));

    let db_max_connections = parse_var(&lookup, "COMPETEAWARE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_var(&lookup, "COMPETEAWARE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs =
        parse_var(&lookup, "COMPETEAWARE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs =
        parse_var(&lookup, "COMPETEAWARE_SCRAPER_REQUEST_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("COMPETEAWARE_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_min_delay_ms: u64 = parse_var(&lookup, "COMPETEAWARE_SCRAPER_MIN_DELAY_MS", "1000")?;
    let scraper_max_delay_ms: u64 = parse_var(&lookup, "COMPETEAWARE_SCRAPER_MAX_DELAY_MS", "3000")?;
    if scraper_max_delay_ms < scraper_min_delay_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMPETEAWARE_SCRAPER_MAX_DELAY_MS".to_string(),
            reason: format!(
                "must be >= COMPETEAWARE_SCRAPER_MIN_DELAY_MS ({scraper_min_delay_ms}), got {scraper_max_delay_ms}"
            ),
        });
    }

    let dedup_prefix_chars: usize = parse_var(&lookup, "COMPETEAWARE_DEDUP_PREFIX_CHARS", "50")?;
    if dedup_prefix_chars == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMPETEAWARE_DEDUP_PREFIX_CHARS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let dedup_window_hours: i64 = parse_var(&lookup, "COMPETEAWARE_DEDUP_WINDOW_HOURS", "24")?;
    if dedup_window_hours <= 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMPETEAWARE_DEDUP_WINDOW_HOURS".to_string(),
            reason: format!("must be positive, got {dedup_window_hours}"),
        });
    }

    let classifier_model_path = PathBuf::from(or_default(
        "COMPETEAWARE_CLASSIFIER_MODEL_PATH",
        "./classifier_model.json",
    ));

    let scrape_schedule_enabled =
        parse_bool(&or_default("COMPETEAWARE_SCRAPE_SCHEDULE_ENABLED", "true"))
            .ok_or_else(|| ConfigError::InvalidEnvVar {
                var: "COMPETEAWARE_SCRAPE_SCHEDULE_ENABLED".to_string(),
                reason: "expected true/false".to_string(),
            })?;
    let scrape_initial_delay_secs =
        parse_var(&lookup, "COMPETEAWARE_SCRAPE_INITIAL_DELAY_SECS", "5")?;
    let scrape_interval_secs = parse_var(&lookup, "COMPETEAWARE_SCRAPE_INTERVAL_SECS", "3600")?;
    let scrape_retry_cooldown_secs =
        parse_var(&lookup, "COMPETEAWARE_SCRAPE_RETRY_COOLDOWN_SECS", "300")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        competitors_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_min_delay_ms,
        scraper_max_delay_ms,
        dedup_prefix_chars,
        dedup_window_hours,
        classifier_model_path,
        scrape_schedule_enabled,
        scrape_initial_delay_secs,
        scrape_interval_secs,
        scrape_retry_cooldown_secs,
    })
}

/// Read `var` through `lookup` (falling back to `default`) and parse it.
fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COMPETEAWARE_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
