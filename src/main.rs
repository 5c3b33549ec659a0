//! Bearer client CLI
//!
//! Command-line interface for calling APIs with a stored bearer token

use anyhow::Context;
use bearer_client::cli::{Cli, Runner};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let command = format!("{:?}", cli.command);
    let runner = Runner::new(cli);

    runner
        .run()
        .await
        .with_context(|| format!("bearer-client command failed: {command}"))?;

    Ok(())
}
