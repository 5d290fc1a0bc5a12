use std::str::FromStr;

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
/// Parsing is decoupled from the process environment so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    let database_url =
        lookup("DATABASE_URL").map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

    let tei_url = or_default("REVSCOPE_TEI_URL", "http://localhost:8080")
        .trim_end_matches('/')
        .to_string();
    if tei_url.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVSCOPE_TEI_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env: parse_environment(&or_default("REVSCOPE_ENV", "development"))?,
        bind_addr: parse_or(&lookup, "REVSCOPE_BIND_ADDR", "0.0.0.0:5001")?,
        log_level: or_default("REVSCOPE_LOG_LEVEL", "info"),
        db_max_connections: parse_or(&lookup, "REVSCOPE_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: parse_or(&lookup, "REVSCOPE_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: parse_or(&lookup, "REVSCOPE_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
        tei_url,
        tei_timeout_secs: parse_or(&lookup, "REVSCOPE_TEI_TIMEOUT_SECS", "30")?,
    })
}

/// Parse `var` with `FromStr`, falling back to `default` when it is unset.
fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVSCOPE_ENV".to_string(),
            reason: format!("unknown environment `{other}`"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
