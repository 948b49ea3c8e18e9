//! The veyra pipeline: ingestion, scoring, trend aggregation, and narrative
//! publishing, written against injected ports so each stage can run against
//! Postgres and the live APIs or against in-memory fakes.
//!
//! Stages coordinate only through the store. Each public `run_*`/`sync_*`
//! function is one invocation; [`invoke`] wraps it in a tracing span and
//! turns its result into an [`InvocationStatus`].

pub mod adapters;
pub mod error;
pub mod followers;
pub mod hashtags;
pub mod ingest;
pub mod narrative;
pub mod nodes;
pub mod pg;
pub mod ports;
pub mod relevance;
pub mod scorer;
pub mod status;
pub mod trends;

#[cfg(test)]
pub(crate) mod testing;

pub use error::PipelineError;
pub use followers::{sync_followers, FollowerReport, FOLLOWERS_PAGE_SIZE};
pub use hashtags::{extract_trending_hashtags, HashtagCount};
pub use ingest::{ingest_tweets, IngestReport, IngestSettings};
pub use narrative::{
    build_prompt, gather_context, publish_thread, run_narrative, split_narrative,
    NarrativeContext, NarrativeReport, NarrativeSettings, PublishOutcome,
};
pub use nodes::{sync_nodes, NodeSyncReport};
pub use pg::PgStore;
pub use ports::{ReadApi, Store, TextGenerator, WriteApi};
pub use relevance::RelevanceFilter;
pub use scorer::{compound_score, score_unscored, ScoreReport};
pub use status::{invoke, InvocationStatus, Job, Summary};
pub use trends::{aggregate_daily, run_trends, TrendsReport};
