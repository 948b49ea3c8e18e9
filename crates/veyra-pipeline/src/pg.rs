//! [`Store`] backed by the Postgres queries in `veyra-db`.

use async_trait::async_trait;
use sqlx::PgPool;
use veyra_core::{
    Follower, Narrative, SentimentTrend, TrackedNode, Tweet, TweetSentiment, UnscoredTweet,
};
use veyra_db::DbError;

use crate::ports::Store;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_node(&self, username: &str) -> Result<Option<TrackedNode>, DbError> {
        let row = veyra_db::get_node_by_username(&self.pool, username).await?;
        Ok(row.map(TrackedNode::from))
    }

    async fn upsert_node_user_id(&self, username: &str, user_id: &str) -> Result<(), DbError> {
        veyra_db::upsert_node_user_id(&self.pool, username, user_id).await
    }

    async fn top_nodes(&self, limit: usize) -> Result<Vec<TrackedNode>, DbError> {
        let rows = veyra_db::list_top_nodes(&self.pool, limit).await?;
        Ok(rows.into_iter().map(TrackedNode::from).collect())
    }

    async fn tweet_exists(&self, tweet_id: &str) -> Result<bool, DbError> {
        veyra_db::tweet_exists(&self.pool, tweet_id).await
    }

    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool, DbError> {
        veyra_db::insert_tweet_if_absent(&self.pool, tweet).await
    }

    async fn unscored_tweets(&self) -> Result<Vec<UnscoredTweet>, DbError> {
        veyra_db::list_unscored_tweets(&self.pool).await
    }

    async fn apply_sentiment_scores(&self, scores: &[(String, f64)]) -> Result<u64, DbError> {
        veyra_db::apply_sentiment_scores(&self.pool, scores).await
    }

    async fn tweet_sentiments(&self) -> Result<Vec<TweetSentiment>, DbError> {
        veyra_db::list_tweet_sentiments(&self.pool).await
    }

    async fn tweet_contents(&self) -> Result<Vec<String>, DbError> {
        veyra_db::list_tweet_contents(&self.pool).await
    }

    async fn recent_tweet_texts(&self, limit: usize) -> Result<Vec<String>, DbError> {
        veyra_db::list_recent_tweet_texts(&self.pool, limit).await
    }

    async fn upsert_sentiment_trend(&self, trend: &SentimentTrend) -> Result<(), DbError> {
        veyra_db::upsert_sentiment_trend(&self.pool, trend).await
    }

    async fn recent_sentiment_trends(
        &self,
        limit: usize,
    ) -> Result<Vec<SentimentTrend>, DbError> {
        let rows = veyra_db::list_recent_sentiment_trends(&self.pool, limit).await?;
        Ok(rows.into_iter().map(SentimentTrend::from).collect())
    }

    async fn recent_narratives(&self, limit: usize) -> Result<Vec<String>, DbError> {
        let rows = veyra_db::list_recent_narratives(&self.pool, limit).await?;
        Ok(rows.into_iter().map(|row| row.narrative).collect())
    }

    async fn insert_narrative(&self, narrative: &Narrative) -> Result<i64, DbError> {
        veyra_db::insert_narrative(&self.pool, narrative).await
    }

    async fn upsert_followers(&self, followers: &[Follower]) -> Result<(u64, u64), DbError> {
        veyra_db::upsert_followers(&self.pool, followers).await
    }
}
