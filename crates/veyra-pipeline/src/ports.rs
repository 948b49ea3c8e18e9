//! Interfaces the pipeline consumes. Production implementations live in
//! [`crate::pg`] and [`crate::adapters`]; tests substitute in-memory fakes.

use async_trait::async_trait;
use veyra_core::{
    Follower, Narrative, SentimentTrend, TrackedNode, Tweet, TweetSentiment, UnscoredTweet,
};
use veyra_db::DbError;
use veyra_llm::{GenerationParams, LlmError};
use veyra_x::{FollowersPage, RecentPostsQuery, XApiError, XPost, XUser};

/// The shared persistent store.
///
/// Every mutation is either an insert-if-absent or an upsert keyed on the
/// entity's natural key, so re-running an invocation is safe.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_node(&self, username: &str) -> Result<Option<TrackedNode>, DbError>;
    async fn upsert_node_user_id(&self, username: &str, user_id: &str) -> Result<(), DbError>;
    /// Nodes ordered by engagement, highest first.
    async fn top_nodes(&self, limit: usize) -> Result<Vec<TrackedNode>, DbError>;

    async fn tweet_exists(&self, tweet_id: &str) -> Result<bool, DbError>;
    /// Returns `false` when a tweet with the same id was already stored.
    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool, DbError>;
    async fn unscored_tweets(&self) -> Result<Vec<UnscoredTweet>, DbError>;
    /// Sets each score only where the tweet is still unscored. Returns the
    /// number of tweets updated.
    async fn apply_sentiment_scores(&self, scores: &[(String, f64)]) -> Result<u64, DbError>;
    async fn tweet_sentiments(&self) -> Result<Vec<TweetSentiment>, DbError>;
    async fn tweet_contents(&self) -> Result<Vec<String>, DbError>;
    /// Texts of the most recently created tweets, newest first.
    async fn recent_tweet_texts(&self, limit: usize) -> Result<Vec<String>, DbError>;

    async fn upsert_sentiment_trend(&self, trend: &SentimentTrend) -> Result<(), DbError>;
    /// Most recent days first.
    async fn recent_sentiment_trends(&self, limit: usize)
        -> Result<Vec<SentimentTrend>, DbError>;

    /// Texts of the most recent narratives, newest first.
    async fn recent_narratives(&self, limit: usize) -> Result<Vec<String>, DbError>;
    async fn insert_narrative(&self, narrative: &Narrative) -> Result<i64, DbError>;

    /// Returns `(new, updated)` counts.
    async fn upsert_followers(&self, followers: &[Follower]) -> Result<(u64, u64), DbError>;
}

/// Read side of the X API.
#[async_trait]
pub trait ReadApi: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<XUser, XApiError>;

    async fn get_followers(
        &self,
        user_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<FollowersPage, XApiError>;

    async fn get_recent_posts(
        &self,
        user_id: &str,
        query: &RecentPostsQuery,
    ) -> Result<Vec<XPost>, XApiError>;
}

/// Write side of the X API.
#[async_trait]
pub trait WriteApi: Send + Sync {
    /// Publishes `text`, as a reply to `reply_to` when given, and returns
    /// the new post's id.
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<String, XApiError>;
}

/// Free-text generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError>;
}
