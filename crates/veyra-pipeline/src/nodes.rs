//! Resolves and caches the X user ids of tracked accounts.

use serde::Serialize;
use veyra_core::Watchlist;
use veyra_x::{RateLimiter, XApiError};

use crate::error::PipelineError;
use crate::ports::{ReadApi, Store};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeSyncReport {
    /// Accounts whose user id was looked up and stored by this run.
    pub resolved: Vec<String>,
    pub already_cached: usize,
    /// Accounts the API does not know.
    pub unknown: Vec<String>,
    /// Accounts whose lookup failed for any other reason.
    pub failed: Vec<String>,
}

/// Looks up the user id of every watchlist account that has none cached and
/// upserts it into the node record. Each lookup takes a read limiter slot.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if a store call fails. API failures are
/// per-account and only logged.
pub async fn sync_nodes(
    store: &dyn Store,
    api: &dyn ReadApi,
    limiter: &RateLimiter,
    watchlist: &Watchlist,
) -> Result<NodeSyncReport, PipelineError> {
    let mut report = NodeSyncReport::default();

    for account in &watchlist.accounts {
        let cached = store
            .find_node(account)
            .await?
            .is_some_and(|node| node.user_id.is_some());
        if cached {
            report.already_cached += 1;
            continue;
        }

        limiter.acquire_slot().await;
        match api.get_user(account).await {
            Ok(user) => {
                store.upsert_node_user_id(account, &user.id).await?;
                tracing::info!(account = %account, user_id = %user.id, "node resolved");
                report.resolved.push(account.clone());
            }
            Err(XApiError::UserNotFound { .. }) => {
                tracing::warn!(account = %account, "account not found, skipping");
                report.unknown.push(account.clone());
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "failed to resolve account");
                report.failed.push(account.clone());
            }
        }
    }

    tracing::info!(
        resolved = report.resolved.len(),
        already_cached = report.already_cached,
        unknown = report.unknown.len(),
        failed = report.failed.len(),
        "node sync finished"
    );

    Ok(report)
}
