//! Database operations for the `narratives` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use veyra_core::Narrative;

use crate::{sql_limit, DbError};

/// A row from the `narratives` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NarrativeRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub narrative: String,
    pub tweets: Vec<String>,
    pub tweet_ids: Vec<String>,
}

/// Insert a published narrative and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when
/// `tweet_ids` is empty (rejected by a `CHECK` constraint).
pub async fn insert_narrative(pool: &PgPool, narrative: &Narrative) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO narratives (created_at, narrative, tweets, tweet_ids) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(narrative.created_at)
    .bind(&narrative.narrative)
    .bind(&narrative.tweets)
    .bind(&narrative.tweet_ids)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// The `limit` most recent narratives, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_narratives(
    pool: &PgPool,
    limit: usize,
) -> Result<Vec<NarrativeRow>, DbError> {
    let rows = sqlx::query_as::<_, NarrativeRow>(
        "SELECT id, created_at, narrative, tweets, tweet_ids \
         FROM narratives \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
