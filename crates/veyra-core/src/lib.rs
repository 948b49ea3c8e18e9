//! Shared domain types and configuration for veyra.

pub mod app_config;
pub mod config;
pub mod types;
pub mod watchlist;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    DailyTrend, Follower, Narrative, PublicMetrics, SentimentTrend, TrackedNode, Tweet,
    TweetSentiment, UnscoredTweet,
};
pub use watchlist::{load_watchlist, Watchlist};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watchlist file {path}: {source}")]
    WatchlistFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watchlist file: {0}")]
    WatchlistFileParse(#[from] serde_yaml::Error),

    #[error("watchlist validation failed: {0}")]
    Validation(String),
}
