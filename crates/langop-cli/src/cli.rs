use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "langop",
    about = "Language agent platform orchestration via YAML-driven reconciliation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a manifest root, then reconcile every resource to convergence.
    Apply {
        /// Directory containing clusters/, tools/, agents/, personas/ subdirectories.
        manifests_dir: PathBuf,
    },

    /// Validate a manifest root and print resource counts without reconciling.
    Status {
        /// Directory containing clusters/, tools/, agents/, personas/ subdirectories.
        manifests_dir: PathBuf,
    },

    /// Reconcile continuously, serving the health/status HTTP surface alongside.
    Serve {
        /// Directory containing clusters/, tools/, agents/, personas/ subdirectories.
        manifests_dir: PathBuf,

        /// Address the HTTP surface listens on.
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,

        /// Bearer token required by the HTTP surface.
        #[arg(long, env = "LANGOP_TOKEN")]
        token: String,
    },
}
