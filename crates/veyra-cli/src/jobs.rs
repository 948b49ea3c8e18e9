//! Dependency construction and one handler per pipeline job.
//!
//! Every handler builds the clients it needs from [`AppConfig`], runs its
//! stage through [`invoke`], and returns the resulting status. Missing
//! credentials are setup failures and surface as `anyhow` errors.

use std::time::Duration;

use veyra_core::{AppConfig, Watchlist};
use veyra_llm::LlmClient;
use veyra_pipeline::trends::DEFAULT_HASHTAG_LIMIT;
use veyra_pipeline::{
    ingest_tweets, invoke, run_narrative, run_trends, score_unscored, sync_followers,
    sync_nodes, IngestSettings, InvocationStatus, Job, NarrativeSettings, PgStore,
};
use veyra_x::{RateLimiter, XClient};

/// Everything a job needs, constructed once per process.
///
/// The read and write limiters are shared by every job this process runs.
pub(crate) struct Runtime {
    config: AppConfig,
    store: PgStore,
    watchlist: Watchlist,
    read_limiter: RateLimiter,
    write_limiter: RateLimiter,
}

impl Runtime {
    pub(crate) fn new(config: AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        let watchlist = veyra_core::load_watchlist(&config.watchlist_path)?;
        tracing::debug!(
            accounts = watchlist.accounts.len(),
            keywords = watchlist.keywords.len(),
            "watchlist loaded"
        );

        let read_limiter = RateLimiter::new(
            config.read_rate_max_calls,
            Duration::from_secs(config.read_rate_period_secs),
        );
        let write_limiter = RateLimiter::new(
            config.write_rate_max_calls,
            Duration::from_secs(config.write_rate_period_secs),
        );

        Ok(Self {
            store: PgStore::new(pool),
            watchlist,
            read_limiter,
            write_limiter,
            config,
        })
    }

    fn read_client(&self) -> anyhow::Result<XClient> {
        Ok(XClient::with_base_url(
            self.config.require_x_read_token()?,
            self.config.http_timeout_secs,
            &self.config.x_api_base_url,
        )?)
    }

    fn write_client(&self) -> anyhow::Result<XClient> {
        Ok(XClient::with_base_url(
            self.config.require_x_write_token()?,
            self.config.http_timeout_secs,
            &self.config.x_api_base_url,
        )?)
    }

    fn generator(&self) -> anyhow::Result<LlmClient> {
        Ok(LlmClient::with_base_url(
            self.config.require_openai_key()?,
            &self.config.openai_model,
            self.config.http_timeout_secs,
            &self.config.openai_base_url,
        )?)
    }

    fn ingest_settings(
        &self,
        max_tweets: Option<usize>,
        lookback_days: Option<i64>,
    ) -> IngestSettings {
        IngestSettings {
            max_tweets: max_tweets.unwrap_or(self.config.ingest_max_tweets),
            lookback_days: lookback_days.unwrap_or(self.config.ingest_lookback_days),
        }
    }

    fn narrative_settings(&self) -> NarrativeSettings {
        NarrativeSettings {
            chunk_limit: self.config.narrative_chunk_limit,
            ..NarrativeSettings::default()
        }
    }

    pub(crate) async fn fetch_tweets(
        &self,
        max_tweets: Option<usize>,
        lookback_days: Option<i64>,
    ) -> anyhow::Result<InvocationStatus> {
        let api = self.read_client()?;
        let settings = self.ingest_settings(max_tweets, lookback_days);
        Ok(self.ingest_with(&api, settings).await)
    }

    async fn ingest_with(&self, api: &XClient, settings: IngestSettings) -> InvocationStatus {
        invoke(
            Job::FetchTweets,
            ingest_tweets(
                &self.store,
                api,
                &self.read_limiter,
                &self.watchlist,
                settings,
            ),
        )
        .await
    }

    pub(crate) async fn fetch_followers(
        &self,
        username: Option<&str>,
        max_followers: Option<usize>,
    ) -> anyhow::Result<InvocationStatus> {
        let api = self.read_client()?;
        let username = username.unwrap_or(&self.config.followers_account);
        let max_followers = max_followers.unwrap_or(self.config.followers_max);

        Ok(invoke(
            Job::FetchFollowers,
            sync_followers(
                &self.store,
                &api,
                &self.read_limiter,
                username,
                max_followers,
            ),
        )
        .await)
    }

    pub(crate) async fn score(&self) -> InvocationStatus {
        invoke(Job::Score, score_unscored(&self.store)).await
    }

    pub(crate) async fn trends(&self, hashtag_limit: usize) -> InvocationStatus {
        invoke(Job::Trends, run_trends(&self.store, hashtag_limit)).await
    }

    pub(crate) async fn narrative(&self) -> anyhow::Result<InvocationStatus> {
        let generator = self.generator()?;
        let writer = self.write_client()?;
        Ok(self.narrative_with(&generator, &writer).await)
    }

    async fn narrative_with(&self, generator: &LlmClient, writer: &XClient) -> InvocationStatus {
        invoke(
            Job::Narrative,
            run_narrative(
                &self.store,
                generator,
                writer,
                &self.write_limiter,
                &self.watchlist,
                self.narrative_settings(),
            ),
        )
        .await
    }

    pub(crate) async fn sync_nodes(&self) -> anyhow::Result<InvocationStatus> {
        let api = self.read_client()?;
        Ok(invoke(
            Job::SyncNodes,
            sync_nodes(&self.store, &api, &self.read_limiter, &self.watchlist),
        )
        .await)
    }

    /// Runs ingest, score, trends, and narrative in order.
    ///
    /// All clients are built before the first stage starts. A failed stage
    /// is reported and the next one still runs against whatever the store
    /// holds.
    pub(crate) async fn run_all(&self) -> anyhow::Result<Vec<InvocationStatus>> {
        let reader = self.read_client()?;
        let writer = self.write_client()?;
        let generator = self.generator()?;

        let mut statuses = Vec::with_capacity(4);
        let settings = self.ingest_settings(None, None);
        statuses.push(self.ingest_with(&reader, settings).await);
        statuses.push(self.score().await);
        statuses.push(self.trends(DEFAULT_HASHTAG_LIMIT).await);
        statuses.push(self.narrative_with(&generator, &writer).await);
        Ok(statuses)
    }
}
