//! Database operations for the `sentiment_trends` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use veyra_core::SentimentTrend;

use crate::{sql_limit, DbError};

/// A row from the `sentiment_trends` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentimentTrendRow {
    pub id: i64,
    pub day: String,
    pub average_sentiment: Option<f64>,
    pub total_tweets: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<SentimentTrendRow> for SentimentTrend {
    fn from(row: SentimentTrendRow) -> Self {
        Self {
            day: row.day,
            average_sentiment: row.average_sentiment,
            total_tweets: row.total_tweets,
            updated_at: row.updated_at,
        }
    }
}

/// Upserts the trend for one day.
///
/// Conflicts on `day` overwrite `average_sentiment`, `total_tweets`, and
/// `updated_at`, so recomputing a day never produces a second row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_sentiment_trend(pool: &PgPool, trend: &SentimentTrend) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO sentiment_trends (day, average_sentiment, total_tweets, updated_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (day) DO UPDATE SET \
             average_sentiment = EXCLUDED.average_sentiment, \
             total_tweets      = EXCLUDED.total_tweets, \
             updated_at        = EXCLUDED.updated_at",
    )
    .bind(&trend.day)
    .bind(trend.average_sentiment)
    .bind(trend.total_tweets)
    .bind(trend.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// The `limit` most recent days, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_sentiment_trends(
    pool: &PgPool,
    limit: usize,
) -> Result<Vec<SentimentTrendRow>, DbError> {
    let rows = sqlx::query_as::<_, SentimentTrendRow>(
        "SELECT id, day, average_sentiment, total_tweets, updated_at \
         FROM sentiment_trends \
         ORDER BY day DESC \
         LIMIT $1",
    )
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
