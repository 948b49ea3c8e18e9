//! Tracked node management.

use clap::Subcommand;
use veyra_pipeline::InvocationStatus;

use crate::jobs::Runtime;

/// Sub-commands available under `nodes`.
#[derive(Debug, Subcommand)]
pub enum NodesCommands {
    /// Resolve and cache user ids for watchlist accounts
    Sync,
}

pub(crate) async fn run(
    runtime: &Runtime,
    command: NodesCommands,
) -> anyhow::Result<InvocationStatus> {
    match command {
        NodesCommands::Sync => runtime.sync_nodes().await,
    }
}
