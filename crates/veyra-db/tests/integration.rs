//! Offline tests for veyra-db pool configuration and row conversions.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use chrono::Utc;
use sqlx::types::Json;
use veyra_core::{AppConfig, Environment, PublicMetrics, TrackedNode, Tweet};
use veyra_db::{NodeRow, PoolConfig, TweetRow};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        watchlist_path: PathBuf::from("./config/watchlist.yaml"),
        x_read_bearer_token: None,
        x_write_access_token: None,
        openai_api_key: None,
        x_api_base_url: "https://api.twitter.com/2".to_string(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        http_timeout_secs: 30,
        read_rate_max_calls: 15,
        read_rate_period_secs: 900,
        write_rate_max_calls: 300,
        write_rate_period_secs: 86_400,
        ingest_max_tweets: 10,
        ingest_lookback_days: 7,
        narrative_chunk_limit: 280,
        followers_account: "AbbleIntel".to_string(),
        followers_max: 1000,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn tweet_row_converts_into_domain_tweet() {
    let now = Utc::now();
    let row = TweetRow {
        id: 1,
        tweet_id: "42".to_string(),
        content: "gm".to_string(),
        created_at: now,
        username: "moonshot".to_string(),
        metrics: Json(PublicMetrics {
            reply_count: 2,
            ..PublicMetrics::default()
        }),
        sentiment_score: Some(0.25),
        inserted_at: now,
    };

    let tweet = Tweet::from(row);
    assert_eq!(tweet.tweet_id, "42");
    assert_eq!(tweet.metrics.reply_count, 2);
    assert_eq!(tweet.sentiment_score, Some(0.25));
}

#[test]
fn node_row_converts_into_tracked_node() {
    let row = NodeRow {
        id: 3,
        username: "phantom".to_string(),
        user_id: None,
        total_engagement: 12,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let node = TrackedNode::from(row);
    assert_eq!(node.username, "phantom");
    assert!(node.user_id.is_none());
    assert_eq!(node.total_engagement, 12);
}
