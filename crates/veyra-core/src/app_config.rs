use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub watchlist_path: PathBuf,
    pub x_read_bearer_token: Option<String>,
    pub x_write_access_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub x_api_base_url: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub read_rate_max_calls: usize,
    pub read_rate_period_secs: u64,
    pub write_rate_max_calls: usize,
    pub write_rate_period_secs: u64,
    pub ingest_max_tweets: usize,
    pub ingest_lookback_days: i64,
    pub narrative_chunk_limit: usize,
    pub followers_account: String,
    pub followers_max: usize,
}

impl AppConfig {
    /// Bearer token for the read-side X API client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `X_READ_BEARER_TOKEN` was not set.
    pub fn require_x_read_token(&self) -> Result<&str, ConfigError> {
        self.x_read_bearer_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("X_READ_BEARER_TOKEN".to_string()))
    }

    /// User-context access token for posting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `X_WRITE_ACCESS_TOKEN` was not set.
    pub fn require_x_write_token(&self) -> Result<&str, ConfigError> {
        self.x_write_access_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("X_WRITE_ACCESS_TOKEN".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `OPENAI_API_KEY` was not set.
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("watchlist_path", &self.watchlist_path)
            .field("database_url", &"[redacted]")
            .field(
                "x_read_bearer_token",
                &self.x_read_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "x_write_access_token",
                &self.x_write_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("x_api_base_url", &self.x_api_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("read_rate_max_calls", &self.read_rate_max_calls)
            .field("read_rate_period_secs", &self.read_rate_period_secs)
            .field("write_rate_max_calls", &self.write_rate_max_calls)
            .field("write_rate_period_secs", &self.write_rate_period_secs)
            .field("ingest_max_tweets", &self.ingest_max_tweets)
            .field("ingest_lookback_days", &self.ingest_lookback_days)
            .field("narrative_chunk_limit", &self.narrative_chunk_limit)
            .field("followers_account", &self.followers_account)
            .field("followers_max", &self.followers_max)
            .finish()
    }
}
