//! Trellis CLI - ordered kanban boards on the local filesystem.
//!
//! Commands:
//! - `trellis board create|list|show|update|delete`
//! - `trellis column add|update|move|delete`
//! - `trellis card add|update|move|delete`
//! - `trellis ops`: List operations and their parameters
//!
//! Environment variables:
//! - TRELLIS_ROOT: Data directory
//! - TRELLIS_MIN_GAP: Rebalance threshold for neighbor gaps
//! - TRELLIS_LOCK_TIMEOUT_MS: Store lock timeout
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

mod cli;
mod run;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trellis_board::{BoardConfig, BoardError, BoardStore, Session};

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("trellis=debug,trellis_board=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match execute(cli).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(board_error) = e.downcast_ref::<BoardError>() {
                if board_error.is_retryable() {
                    eprintln!("The store is busy; try again.");
                }
            }
            1
        }
    };

    std::process::exit(exit_code);
}

async fn execute(cli: Cli) -> anyhow::Result<String> {
    let mut config =
        BoardConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }
    tracing::debug!(root = %config.root.display(), user = %cli.user, "starting");

    let store = Arc::new(BoardStore::from_config(&config));
    let ctx = store.session(Session::new(cli.user));

    let value = run::run(cli.command, &ctx).await?;
    Ok(serde_json::to_string_pretty(&value)?)
}
