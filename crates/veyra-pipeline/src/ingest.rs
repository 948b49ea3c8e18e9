//! Pulls recent posts from tracked accounts and stores the relevant ones.

use chrono::{Duration, Utc};
use serde::Serialize;
use veyra_core::{Tweet, Watchlist};
use veyra_x::{RateLimiter, RecentPostsQuery};

use crate::error::PipelineError;
use crate::ports::{ReadApi, Store};
use crate::relevance::RelevanceFilter;

const EXCLUDED_KINDS: [&str; 2] = ["retweets", "replies"];
const TWEET_FIELDS: [&str; 3] = ["created_at", "text", "public_metrics"];

#[derive(Debug, Clone, Copy)]
pub struct IngestSettings {
    /// Stop the whole run once this many new tweets are stored.
    pub max_tweets: usize,
    /// Only posts created within this many trailing days are requested.
    pub lookback_days: i64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_tweets: 10,
            lookback_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub stored: usize,
    pub skipped_irrelevant: usize,
    pub skipped_duplicate: usize,
    /// Accounts with no cached user id.
    pub unresolved_accounts: Vec<String>,
    /// Accounts whose timeline fetch failed.
    pub failed_accounts: Vec<String>,
    pub reached_limit: bool,
}

/// Fetches each watchlist account's recent original posts and stores the
/// relevant ones that are not yet in the store.
///
/// Accounts are processed in watchlist order. Unresolved accounts and
/// per-account fetch failures are logged and skipped. The run stops as
/// soon as `settings.max_tweets` new tweets are stored.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if any store call fails.
pub async fn ingest_tweets(
    store: &dyn Store,
    api: &dyn ReadApi,
    limiter: &RateLimiter,
    watchlist: &Watchlist,
    settings: IngestSettings,
) -> Result<IngestReport, PipelineError> {
    let filter = RelevanceFilter::new(&watchlist.keywords);
    let query = RecentPostsQuery {
        max_results: settings.max_tweets,
        start_time: Utc::now() - Duration::days(settings.lookback_days),
        exclude: EXCLUDED_KINDS.iter().map(ToString::to_string).collect(),
        tweet_fields: TWEET_FIELDS.iter().map(ToString::to_string).collect(),
    };

    let mut report = IngestReport::default();

    for account in &watchlist.accounts {
        if report.stored >= settings.max_tweets {
            report.reached_limit = true;
            break;
        }

        let node = store.find_node(account).await?;
        let Some(user_id) = node.and_then(|n| n.user_id) else {
            tracing::info!(account = %account, "user id not cached, skipping account");
            report.unresolved_accounts.push(account.clone());
            continue;
        };

        limiter.acquire_slot().await;
        let posts = match api.get_recent_posts(&user_id, &query).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "failed to fetch recent posts");
                report.failed_accounts.push(account.clone());
                continue;
            }
        };

        if posts.is_empty() {
            tracing::info!(account = %account, "no recent posts");
            continue;
        }

        for post in posts {
            if !filter.is_relevant(&post.text) {
                report.skipped_irrelevant += 1;
                continue;
            }

            if store.tweet_exists(&post.id).await? {
                tracing::debug!(tweet_id = %post.id, "tweet already stored, skipping");
                report.skipped_duplicate += 1;
                continue;
            }

            let tweet = Tweet {
                tweet_id: post.id,
                content: post.text,
                created_at: post.created_at.unwrap_or_else(Utc::now),
                username: account.clone(),
                metrics: post.public_metrics,
                sentiment_score: None,
            };

            if store.insert_tweet_if_absent(&tweet).await? {
                report.stored += 1;
            } else {
                // Stored by a concurrent run between the check and the insert.
                tracing::debug!(tweet_id = %tweet.tweet_id, "tweet stored concurrently, skipping");
                report.skipped_duplicate += 1;
            }

            if report.stored >= settings.max_tweets {
                tracing::info!(
                    stored = report.stored,
                    "reached max tweets for this run, stopping"
                );
                report.reached_limit = true;
                return Ok(report);
            }
        }
    }

    tracing::info!(
        stored = report.stored,
        skipped_irrelevant = report.skipped_irrelevant,
        skipped_duplicate = report.skipped_duplicate,
        unresolved = report.unresolved_accounts.len(),
        failed = report.failed_accounts.len(),
        "ingestion finished"
    );

    Ok(report)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
