//! Structured result of one pipeline invocation.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::Instrument;

use crate::error::PipelineError;
use crate::followers::FollowerReport;
use crate::ingest::IngestReport;
use crate::narrative::NarrativeReport;
use crate::nodes::NodeSyncReport;
use crate::scorer::ScoreReport;
use crate::trends::TrendsReport;

/// A pipeline stage that can be triggered on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    FetchTweets,
    FetchFollowers,
    Score,
    Trends,
    Narrative,
    SyncNodes,
}

impl Job {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchTweets => "fetch_tweets",
            Self::FetchFollowers => "fetch_followers",
            Self::Score => "score",
            Self::Trends => "trends",
            Self::Narrative => "narrative",
            Self::SyncNodes => "sync_nodes",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-line human summary of a stage report.
pub trait Summary {
    fn summary(&self) -> String;
}

impl Summary for IngestReport {
    fn summary(&self) -> String {
        format!(
            "stored {} new tweets ({} irrelevant, {} duplicate)",
            self.stored, self.skipped_irrelevant, self.skipped_duplicate
        )
    }
}

impl Summary for FollowerReport {
    fn summary(&self) -> String {
        format!(
            "synced {} followers of @{} ({} new, {} updated)",
            self.fetched, self.username, self.new, self.updated
        )
    }
}

impl Summary for ScoreReport {
    fn summary(&self) -> String {
        format!("scored {} of {} unscored tweets", self.updated, self.unscored)
    }
}

impl Summary for TrendsReport {
    fn summary(&self) -> String {
        format!("upserted {} daily sentiment trends", self.days.len())
    }
}

impl Summary for NarrativeReport {
    fn summary(&self) -> String {
        if self.complete {
            format!("published narrative as a {}-post thread", self.tweet_ids.len())
        } else {
            format!(
                "published {} of {} narrative posts",
                self.tweet_ids.len(),
                self.chunks
            )
        }
    }
}

impl Summary for NodeSyncReport {
    fn summary(&self) -> String {
        format!(
            "resolved {} accounts ({} cached, {} unknown, {} failed)",
            self.resolved.len(),
            self.already_cached,
            self.unknown.len(),
            self.failed.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationStatus {
    /// `"success"` or `"error"`.
    pub status: &'static str,
    pub job: &'static str,
    pub message: String,
    pub details: Value,
}

impl InvocationStatus {
    /// A report that fails to serialize still yields a success status, with
    /// `null` details and a warning logged.
    #[must_use]
    pub fn success<R: Serialize + Summary>(job: Job, report: &R) -> Self {
        let details = serde_json::to_value(report).unwrap_or_else(|e| {
            tracing::warn!(
                job = job.as_str(),
                error = %e,
                "failed to serialize job report"
            );
            Value::Null
        });

        Self {
            status: "success",
            job: job.as_str(),
            message: report.summary(),
            details,
        }
    }

    #[must_use]
    pub fn error(job: Job, err: &PipelineError) -> Self {
        Self {
            status: "error",
            job: job.as_str(),
            message: err.to_string(),
            details: json!({ "kind": err.kind() }),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Runs one job inside its own span and converts the outcome into an
/// [`InvocationStatus`]. Errors are logged, never propagated.
pub async fn invoke<R, F>(job: Job, work: F) -> InvocationStatus
where
    R: Serialize + Summary,
    F: Future<Output = Result<R, PipelineError>>,
{
    let span = tracing::info_span!(
        "invocation",
        job = job.as_str(),
        run_id = %uuid::Uuid::new_v4()
    );

    async move {
        tracing::info!("invocation started");
        match work.await {
            Ok(report) => {
                let status = InvocationStatus::success(job, &report);
                tracing::info!(message = %status.message, "invocation succeeded");
                status
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "invocation failed");
                InvocationStatus::error(job, &e)
            }
        }
    }
    .instrument(span)
    .await
}
