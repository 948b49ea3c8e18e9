use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod jobs;
mod nodes;

use jobs::Runtime;
use nodes::NodesCommands;

#[derive(Debug, Parser)]
#[command(name = "veyra")]
#[command(about = "Crypto culture ingestion, sentiment, and narrative pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Ingest recent relevant tweets from the tracked accounts
    FetchTweets {
        /// Stop after this many new tweets (defaults to `VEYRA_INGEST_MAX_TWEETS`)
        #[arg(long)]
        max_tweets: Option<usize>,
        /// Only request posts from the last N days
        #[arg(long)]
        lookback_days: Option<i64>,
    },
    /// Sync the followers of one account
    FetchFollowers {
        /// Account to sync (defaults to `VEYRA_FOLLOWERS_ACCOUNT`)
        #[arg(long)]
        username: Option<String>,
        /// Maximum followers to store (defaults to `VEYRA_FOLLOWERS_MAX`)
        #[arg(long)]
        max_followers: Option<usize>,
    },
    /// Score every tweet that has no sentiment yet
    Score,
    /// Recompute daily sentiment trends
    Trends {
        /// Number of trending hashtags to report
        #[arg(long, default_value_t = veyra_pipeline::trends::DEFAULT_HASHTAG_LIMIT)]
        hashtags: usize,
    },
    /// Generate and publish a narrative thread
    Narrative,
    /// Manage tracked nodes
    Nodes {
        #[command(subcommand)]
        command: NodesCommands,
    },
    /// Ingest, score, aggregate trends, and publish a narrative in order
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = veyra_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = veyra_db::PoolConfig::from_app_config(&config);
    let pool = veyra_db::connect_pool(&config.database_url, pool_config).await?;
    veyra_db::health_check(&pool).await?;

    if matches!(cli.command, Commands::Migrate) {
        let applied = veyra_db::run_migrations(&pool).await?;
        tracing::info!(applied, "migrations applied");
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = Runtime::new(config, pool)?;
    let statuses = match cli.command {
        Commands::Migrate => Vec::new(),
        Commands::FetchTweets {
            max_tweets,
            lookback_days,
        } => vec![runtime.fetch_tweets(max_tweets, lookback_days).await?],
        Commands::FetchFollowers {
            username,
            max_followers,
        } => vec![
            runtime
                .fetch_followers(username.as_deref(), max_followers)
                .await?,
        ],
        Commands::Score => vec![runtime.score().await],
        Commands::Trends { hashtags } => vec![runtime.trends(hashtags).await],
        Commands::Narrative => vec![runtime.narrative().await?],
        Commands::Nodes { command } => vec![nodes::run(&runtime, command).await?],
        Commands::Run => runtime.run_all().await?,
    };

    let mut failed = false;
    for status in &statuses {
        println!("{}", serde_json::to_string_pretty(status)?);
        failed |= !status.is_success();
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
