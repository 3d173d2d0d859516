//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// banker - deadlock-avoiding resource allocator
#[derive(Parser)]
#[command(name = "banker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deadlock-avoiding resource allocator")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format (logs and final report)
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario against a fresh pool
    Run {
        /// Scenario file (TOML); the built-in textbook scenario if omitted
        #[arg(long, value_name = "PATH")]
        scenario: Option<PathBuf>,

        /// Await each step before starting the next
        #[arg(long)]
        serial: bool,

        /// Do not run the invariant monitor
        #[arg(long)]
        no_monitor: bool,

        /// Run the background grower regardless of config
        #[arg(long)]
        grow: bool,
    },

    /// Report whether a manifest's initial state is safe
    Check {
        /// Manifest file (TOML); the built-in textbook manifest if omitted
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },
}
