mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Apply { manifests_dir } => commands::apply(manifests_dir).await,
        Command::Status { manifests_dir } => commands::status(manifests_dir).await,
        Command::Serve { manifests_dir, bind, token } => {
            commands::serve(manifests_dir, bind, token).await
        }
    }
}
