//! Write operations for the `followers` table.

use sqlx::PgPool;
use veyra_core::Follower;

use crate::DbError;

/// Upsert a batch of followers keyed by `user_id`.
///
/// Returns `(new_count, updated_count)`. Existing rows are overwritten with
/// the latest profile; there is no versioning.
///
/// Uses a single `INSERT … SELECT * FROM UNNEST(…) ON CONFLICT` so the
/// whole batch is written in one round-trip.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_followers(pool: &PgPool, followers: &[Follower]) -> Result<(u64, u64), DbError> {
    if followers.is_empty() {
        return Ok((0, 0));
    }

    let mut user_ids: Vec<String> = Vec::with_capacity(followers.len());
    let mut usernames: Vec<String> = Vec::with_capacity(followers.len());
    let mut names: Vec<String> = Vec::with_capacity(followers.len());
    let mut profiles: Vec<serde_json::Value> = Vec::with_capacity(followers.len());

    for follower in followers {
        user_ids.push(follower.user_id.clone());
        usernames.push(follower.username.clone());
        names.push(follower.name.clone());
        profiles.push(follower.profile.clone());
    }

    let rows: Vec<bool> = sqlx::query_scalar::<_, bool>(
        "INSERT INTO followers (user_id, username, name, profile) \
         SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::jsonb[]) \
         ON CONFLICT (user_id) DO UPDATE SET \
             username   = EXCLUDED.username, \
             name       = EXCLUDED.name, \
             profile    = EXCLUDED.profile, \
             updated_at = NOW() \
         RETURNING (xmax = 0) AS is_new",
    )
    .bind(&user_ids)
    .bind(&usernames)
    .bind(&names)
    .bind(&profiles)
    .fetch_all(pool)
    .await?;

    let new_count = rows.iter().filter(|&&is_new| is_new).count() as u64;
    let updated_count = rows.len() as u64 - new_count;

    Ok((new_count, updated_count))
}
