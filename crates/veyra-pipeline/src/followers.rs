//! Follower sync for a single account.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use veyra_core::Follower;
use veyra_x::{RateLimiter, XApiError, XUser};

use crate::error::PipelineError;
use crate::ports::{ReadApi, Store};

pub const FOLLOWERS_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowerReport {
    pub username: String,
    pub user_id: String,
    pub fetched: usize,
    pub new: u64,
    pub updated: u64,
}

/// Pages through the followers of `username` and upserts up to
/// `max_followers` of them.
///
/// One read limiter slot is taken for the user lookup and one before every
/// page. Nothing is written unless every page was fetched.
///
/// # Errors
///
/// - [`PipelineError::UnknownAccount`] if `username` does not exist.
/// - [`PipelineError::XApi`] if the lookup or any page fails.
/// - [`PipelineError::Store`] if the upsert fails.
pub async fn sync_followers(
    store: &dyn Store,
    api: &dyn ReadApi,
    limiter: &RateLimiter,
    username: &str,
    max_followers: usize,
) -> Result<FollowerReport, PipelineError> {
    limiter.acquire_slot().await;
    let user = match api.get_user(username).await {
        Ok(user) => user,
        Err(XApiError::UserNotFound { username }) => {
            return Err(PipelineError::UnknownAccount(username));
        }
        Err(e) => return Err(e.into()),
    };

    let mut users: Vec<XUser> = Vec::new();
    let mut page_token: Option<String> = None;

    while users.len() < max_followers {
        limiter.acquire_slot().await;
        let page = api
            .get_followers(&user.id, FOLLOWERS_PAGE_SIZE, page_token.as_deref())
            .await
            .inspect_err(|e| {
                tracing::error!(username, error = %e, "failed to fetch followers page");
            })?;

        if page.users.is_empty() {
            tracing::debug!(username, "empty followers page, stopping");
            break;
        }
        tracing::debug!(username, page_len = page.users.len(), "followers page fetched");
        users.extend(page.users);

        match page.next_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }
    users.truncate(max_followers);

    let fetched = users.len();
    let mut seen = HashSet::new();
    let followers: Vec<Follower> = users
        .into_iter()
        .filter(|u| seen.insert(u.id.clone()))
        .map(to_follower)
        .collect();

    let (new, updated) = store.upsert_followers(&followers).await?;
    tracing::info!(username, fetched, new, updated, "followers synced");

    Ok(FollowerReport {
        username: user.username,
        user_id: user.id,
        fetched,
        new,
        updated,
    })
}

/// The full profile, including the identity fields, is kept as JSON.
fn to_follower(user: XUser) -> Follower {
    let mut profile = user.extra;
    profile.insert("id".to_string(), Value::String(user.id.clone()));
    profile.insert("username".to_string(), Value::String(user.username.clone()));
    profile.insert("name".to_string(), Value::String(user.name.clone()));

    Follower {
        user_id: user.id,
        username: user.username,
        name: user.name,
        profile: Value::Object(profile),
    }
}
