use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_AI_MODEL: &str = "gpt-4-turbo-preview";

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
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("CREATORFLOW_ENV", "development"))?;

    let bind_addr = parse_addr("CREATORFLOW_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CREATORFLOW_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("CREATORFLOW_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CREATORFLOW_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("CREATORFLOW_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "CREATORFLOW_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds CREATORFLOW_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let ai_base_url = or_default("CREATORFLOW_AI_BASE_URL", DEFAULT_AI_BASE_URL);
    let ai_model = or_default("CREATORFLOW_AI_MODEL", DEFAULT_AI_MODEL);
    let ai_timeout_secs = parse_u64("CREATORFLOW_AI_TIMEOUT_SECS", "30")?;
    if ai_timeout_secs == 0 {
        return Err(invalid(
            "CREATORFLOW_AI_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let strict_transitions = parse_bool("CREATORFLOW_STRICT_TRANSITIONS", "false")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        openai_api_key,
        ai_base_url,
        ai_model,
        ai_timeout_secs,
        strict_transitions,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CREATORFLOW_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
