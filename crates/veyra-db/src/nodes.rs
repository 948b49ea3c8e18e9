//! Database operations for the `nodes` table (tracked accounts).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use veyra_core::TrackedNode;

use crate::{sql_limit, DbError};

/// A row from the `nodes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NodeRow {
    pub id: i64,
    pub username: String,
    pub user_id: Option<String>,
    pub total_engagement: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NodeRow> for TrackedNode {
    fn from(row: NodeRow) -> Self {
        Self {
            username: row.username,
            user_id: row.user_id,
            total_engagement: row.total_engagement,
        }
    }
}

/// Look up a tracked account by its username.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_node_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<NodeRow>, DbError> {
    let row = sqlx::query_as::<_, NodeRow>(
        "SELECT id, username, user_id, total_engagement, created_at, updated_at \
         FROM nodes \
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// The `limit` accounts with the highest engagement, highest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_top_nodes(pool: &PgPool, limit: usize) -> Result<Vec<NodeRow>, DbError> {
    let rows = sqlx::query_as::<_, NodeRow>(
        "SELECT id, username, user_id, total_engagement, created_at, updated_at \
         FROM nodes \
         ORDER BY total_engagement DESC, username \
         LIMIT $1",
    )
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Cache the resolved X user id for an account, creating the node if needed.
///
/// Conflicts on `username` update `user_id` and `updated_at`; the engagement
/// counter is left as is.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_node_user_id(
    pool: &PgPool,
    username: &str,
    user_id: &str,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO nodes (username, user_id) \
         VALUES ($1, $2) \
         ON CONFLICT (username) DO UPDATE SET \
             user_id    = EXCLUDED.user_id, \
             updated_at = NOW()",
    )
    .bind(username)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
