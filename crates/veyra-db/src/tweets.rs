//! Database operations for the `tweets` table.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use veyra_core::{PublicMetrics, Tweet, TweetSentiment, UnscoredTweet};

use crate::{sql_limit, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `tweets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetRow {
    pub id: i64,
    pub tweet_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub metrics: Json<PublicMetrics>,
    pub sentiment_score: Option<f64>,
    pub inserted_at: DateTime<Utc>,
}

impl From<TweetRow> for Tweet {
    fn from(row: TweetRow) -> Self {
        Self {
            tweet_id: row.tweet_id,
            content: row.content,
            created_at: row.created_at,
            username: row.username,
            metrics: row.metrics.0,
            sentiment_score: row.sentiment_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns `true` if a tweet with this X id is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn tweet_exists(pool: &PgPool, tweet_id: &str) -> Result<bool, DbError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tweets WHERE tweet_id = $1)")
            .bind(tweet_id)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Inserts a tweet unless one with the same `tweet_id` already exists.
///
/// Existing rows are never overwritten: `ON CONFLICT DO NOTHING` is the full
/// strategy. Returns `true` when a new row was written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_tweet_if_absent(pool: &PgPool, tweet: &Tweet) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO tweets \
             (tweet_id, content, created_at, username, metrics, sentiment_score) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (tweet_id) DO NOTHING",
    )
    .bind(&tweet.tweet_id)
    .bind(&tweet.content)
    .bind(tweet.created_at)
    .bind(&tweet.username)
    .bind(Json(&tweet.metrics))
    .bind(tweet.sentiment_score)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Fetch a single tweet by its X id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_tweet(pool: &PgPool, tweet_id: &str) -> Result<Option<TweetRow>, DbError> {
    let row = sqlx::query_as::<_, TweetRow>(
        "SELECT id, tweet_id, content, created_at, username, metrics, sentiment_score, inserted_at \
         FROM tweets \
         WHERE tweet_id = $1",
    )
    .bind(tweet_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All tweets that have not been scored yet, oldest insert first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unscored_tweets(pool: &PgPool) -> Result<Vec<UnscoredTweet>, DbError> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT tweet_id, content \
         FROM tweets \
         WHERE sentiment_score IS NULL \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(tweet_id, content)| UnscoredTweet { tweet_id, content })
        .collect())
}

/// Writes a batch of sentiment scores in one statement.
///
/// Each `(tweet_id, score)` pair only applies while the row's score is still
/// `NULL`, so tweets scored by a concurrent run are left untouched. Returns
/// the number of rows updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn apply_sentiment_scores(
    pool: &PgPool,
    scores: &[(String, f64)],
) -> Result<u64, DbError> {
    if scores.is_empty() {
        return Ok(0);
    }

    let (ids, values): (Vec<String>, Vec<f64>) = scores.iter().cloned().unzip();

    let result = sqlx::query(
        "UPDATE tweets AS t \
         SET sentiment_score = u.score \
         FROM UNNEST($1::text[], $2::float8[]) AS u(tweet_id, score) \
         WHERE t.tweet_id = u.tweet_id \
           AND t.sentiment_score IS NULL",
    )
    .bind(&ids)
    .bind(&values)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Creation time and score of every stored tweet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tweet_sentiments(pool: &PgPool) -> Result<Vec<TweetSentiment>, DbError> {
    let rows: Vec<(DateTime<Utc>, Option<f64>)> =
        sqlx::query_as("SELECT created_at, sentiment_score FROM tweets ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(created_at, sentiment_score)| TweetSentiment {
            created_at,
            sentiment_score,
        })
        .collect())
}

/// Text of the `limit` most recently created tweets, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_tweet_texts(pool: &PgPool, limit: usize) -> Result<Vec<String>, DbError> {
    let texts = sqlx::query_scalar::<_, String>(
        "SELECT content FROM tweets ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(texts)
}

/// Text of every stored tweet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tweet_contents(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let texts = sqlx::query_scalar::<_, String>("SELECT content FROM tweets ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(texts)
}
