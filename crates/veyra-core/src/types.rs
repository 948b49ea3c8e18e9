//! Domain records shared by the store, the API clients, and the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engagement counters reported by the X API for a single post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
    #[serde(default)]
    pub impression_count: u64,
}

/// A stored post from a tracked account.
///
/// `tweet_id` is assigned by the X API and unique across the store.
/// `sentiment_score` stays `None` until the scorer runs, then is set once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub tweet_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub metrics: PublicMetrics,
    pub sentiment_score: Option<f64>,
}

impl Tweet {
    /// UTC calendar day (`YYYY-MM-DD`) the tweet was created on.
    #[must_use]
    pub fn day(&self) -> String {
        day_key(&self.created_at)
    }
}

/// Format a timestamp as its UTC `YYYY-MM-DD` day key.
#[must_use]
pub fn day_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// A monitored account whose posts are ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedNode {
    pub username: String,
    /// Cached X user id. `None` until resolved.
    pub user_id: Option<String>,
    pub total_engagement: i64,
}

/// Per-day sentiment aggregate as produced by the trend aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub day: String,
    /// Mean over scored tweets of the day; `None` if none were scored yet.
    pub average_sentiment: Option<f64>,
    pub total_tweets: i64,
}

/// A persisted sentiment trend, one per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrend {
    pub day: String,
    pub average_sentiment: Option<f64>,
    pub total_tweets: i64,
    pub updated_at: DateTime<Utc>,
}

/// A generated narrative and the thread it was published as.
///
/// `tweets` holds every chunk in reply-chain order; `tweet_ids` holds the ids
/// of the chunks that were actually posted, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub created_at: DateTime<Utc>,
    pub narrative: String,
    pub tweets: Vec<String>,
    pub tweet_ids: Vec<String>,
}

/// A follower profile. Always overwritten with the latest fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follower {
    pub user_id: String,
    pub username: String,
    pub name: String,
    /// Remaining profile fields as returned by the API.
    pub profile: serde_json::Value,
}

/// Projection of a tweet awaiting a sentiment score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnscoredTweet {
    pub tweet_id: String,
    pub content: String,
}

/// Projection used by the trend aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetSentiment {
    pub created_at: DateTime<Utc>,
    pub sentiment_score: Option<f64>,
}
