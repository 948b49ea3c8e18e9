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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("VEYRA_ENV", "development"))?;
    let log_level = or_default("VEYRA_LOG_LEVEL", "info");
    let watchlist_path = PathBuf::from(or_default(
        "VEYRA_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));

    let x_read_bearer_token = optional("X_READ_BEARER_TOKEN");
    let x_write_access_token = optional("X_WRITE_ACCESS_TOKEN");
    let openai_api_key = optional("OPENAI_API_KEY");

    let x_api_base_url = or_default("VEYRA_X_API_BASE_URL", "https://api.twitter.com/2/");
    let openai_base_url = or_default("VEYRA_OPENAI_BASE_URL", "https://api.openai.com/v1/");
    let openai_model = or_default("VEYRA_OPENAI_MODEL", "gpt-4o");

    let db_max_connections = parse_u32("VEYRA_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("VEYRA_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("VEYRA_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "VEYRA_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let http_timeout_secs = parse_u64("VEYRA_HTTP_TIMEOUT_SECS", "30")?;

    let read_rate_max_calls = parse_usize("VEYRA_READ_RATE_MAX_CALLS", "15")?;
    let read_rate_period_secs = parse_positive_u64(
        "VEYRA_READ_RATE_PERIOD_SECS",
        parse_u64("VEYRA_READ_RATE_PERIOD_SECS", "900")?,
    )?;
    let write_rate_max_calls = parse_usize("VEYRA_WRITE_RATE_MAX_CALLS", "300")?;
    let write_rate_period_secs = parse_positive_u64(
        "VEYRA_WRITE_RATE_PERIOD_SECS",
        parse_u64("VEYRA_WRITE_RATE_PERIOD_SECS", "86400")?,
    )?;

    let ingest_max_tweets = parse_usize("VEYRA_INGEST_MAX_TWEETS", "10")?;
    let ingest_lookback_days = i64::from(parse_u32("VEYRA_INGEST_LOOKBACK_DAYS", "7")?);
    let narrative_chunk_limit = parse_usize("VEYRA_NARRATIVE_CHUNK_LIMIT", "260")?;
    if narrative_chunk_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VEYRA_NARRATIVE_CHUNK_LIMIT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let followers_account = or_default("VEYRA_FOLLOWERS_ACCOUNT", "AbbleIntel");
    let followers_max = parse_usize("VEYRA_FOLLOWERS_MAX", "1000")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        watchlist_path,
        x_read_bearer_token,
        x_write_access_token,
        openai_api_key,
        x_api_base_url,
        openai_base_url,
        openai_model,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        read_rate_max_calls,
        read_rate_period_secs,
        write_rate_max_calls,
        write_rate_period_secs,
        ingest_max_tweets,
        ingest_lookback_days,
        narrative_chunk_limit,
        followers_account,
        followers_max,
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
            var: "VEYRA_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_positive_u64(var: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
